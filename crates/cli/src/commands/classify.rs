use crossell_core::classify;

use crate::commands::{load_config, load_snapshot_for, CommandResult, DataOptions};

/// Print the classification for one customer without running the full
/// recommendation pipeline.
pub fn run(customer: &str, options: &DataOptions) -> CommandResult {
    let config = match load_config(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("classify", "config_validation", error.to_string(), 2)
        }
    };

    let snapshot = match load_snapshot_for("classify", &config) {
        Ok(snapshot) => snapshot,
        Err(failure) => return failure,
    };

    match classify(&snapshot, &customer.into()) {
        Some(classification) => CommandResult::artifact("classify", &classification),
        None => CommandResult::failure(
            "classify",
            "unknown_customer",
            format!("customer `{customer}` not found in snapshot"),
            6,
        ),
    }
}
