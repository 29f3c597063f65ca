pub mod classify;
pub mod customers;
pub mod doctor;
pub mod recommend;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crossell_agent::PerplexityOracle;
use crossell_core::config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
use crossell_core::{CharFrequencyEmbedder, FailPolicy, RecommendationEngine};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Emit an artifact (report, classification, customer list) as the raw
    /// command output instead of wrapping it in a status envelope.
    pub fn artifact<T: Serialize>(command: &str, value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Per-invocation overrides shared by the data-driven commands.
#[derive(Debug, Clone, Default)]
pub struct DataOptions {
    pub data_dir: Option<PathBuf>,
    pub fail_policy: Option<FailPolicy>,
}

pub(crate) fn parse_fail_policy(raw: Option<&str>) -> Result<Option<FailPolicy>, CommandResult> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    raw.parse::<FailPolicy>()
        .map(Some)
        .map_err(|error| CommandResult::failure("recommend", "invalid_argument", error, 2))
}

pub(crate) fn load_config(options: &DataOptions) -> Result<AppConfig, ConfigError> {
    AppConfig::load(LoadOptions {
        overrides: ConfigOverrides {
            data_dir: options.data_dir.clone(),
            oracle_fail_policy: options.fail_policy,
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    })
}

pub(crate) fn load_snapshot_for(
    command: &str,
    config: &AppConfig,
) -> Result<crossell_core::CatalogSnapshot, CommandResult> {
    crossell_store::load_snapshot(&config.data.dir)
        .map_err(|error| CommandResult::failure(command, "snapshot_load", error.to_string(), 3))
}

pub(crate) fn build_engine(config: &AppConfig) -> Result<RecommendationEngine, CommandResult> {
    let snapshot = load_snapshot_for("recommend", config)?;

    let oracle = PerplexityOracle::from_config(&config.oracle).map_err(|error| {
        CommandResult::failure(
            "recommend",
            "oracle_client",
            format!("could not build oracle HTTP client: {error}"),
            4,
        )
    })?;

    RecommendationEngine::new(
        snapshot,
        Arc::new(CharFrequencyEmbedder::default()),
        Arc::new(oracle),
    )
    .map_err(|error| CommandResult::failure("recommend", "engine", error.to_string(), 4))
}
