use crate::commands::{build_engine, load_config, CommandResult, DataOptions};

/// Generate and print the four-part recommendation report for one customer.
///
/// Unknown customers still print a well-formed (all-empty) report; only
/// infrastructure problems produce an error envelope.
pub fn run(customer: &str, options: &DataOptions) -> CommandResult {
    let config = match load_config(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("recommend", "config_validation", error.to_string(), 2)
        }
    };

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                5,
            )
        }
    };

    match runtime.block_on(engine.recommend(&customer.into())) {
        Ok(report) => CommandResult::artifact("recommend", &report),
        Err(error) => CommandResult::failure("recommend", "engine", error.to_string(), 4),
    }
}
