use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::oracle::FailPolicy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data: DataConfig,
    pub oracle: OracleConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DataConfig {
    /// Directory holding the CSV snapshot files.
    pub dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct OracleConfig {
    /// Bearer credential for the remote confirmation service. Absent means
    /// the adapter runs unconfigured and every candidate takes the fail
    /// policy path.
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub fail_policy: FailPolicy,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub oracle_api_key: Option<String>,
    pub oracle_fail_policy: Option<FailPolicy>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig { dir: PathBuf::from("data") },
            oracle: OracleConfig {
                api_key: None,
                base_url: "https://api.perplexity.ai/chat/completions".to_string(),
                model: "sonar".to_string(),
                timeout_secs: 30,
                fail_policy: FailPolicy::FailOpen,
            },
            server: ServerConfig { bind_address: "127.0.0.1".to_string(), port: 8080 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("crossell.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(data) = patch.data {
            if let Some(dir) = data.dir {
                self.data.dir = dir;
            }
        }

        if let Some(oracle) = patch.oracle {
            if let Some(api_key_value) = oracle.api_key {
                self.oracle.api_key = Some(api_key_value.into());
            }
            if let Some(base_url) = oracle.base_url {
                self.oracle.base_url = base_url;
            }
            if let Some(model) = oracle.model {
                self.oracle.model = model;
            }
            if let Some(timeout_secs) = oracle.timeout_secs {
                self.oracle.timeout_secs = timeout_secs;
            }
            if let Some(fail_policy) = oracle.fail_policy {
                self.oracle.fail_policy = fail_policy;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CROSSELL_DATA_DIR") {
            self.data.dir = PathBuf::from(value);
        }

        if let Some(value) = read_env("CROSSELL_ORACLE_API_KEY") {
            self.oracle.api_key = Some(value.into());
        }
        if let Some(value) = read_env("CROSSELL_ORACLE_BASE_URL") {
            self.oracle.base_url = value;
        }
        if let Some(value) = read_env("CROSSELL_ORACLE_MODEL") {
            self.oracle.model = value;
        }
        if let Some(value) = read_env("CROSSELL_ORACLE_TIMEOUT_SECS") {
            self.oracle.timeout_secs = parse_u64("CROSSELL_ORACLE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("CROSSELL_ORACLE_FAIL_POLICY") {
            self.oracle.fail_policy =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "CROSSELL_ORACLE_FAIL_POLICY".to_string(),
                    value,
                })?;
        }

        if let Some(value) = read_env("CROSSELL_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("CROSSELL_SERVER_PORT") {
            self.server.port = parse_u16("CROSSELL_SERVER_PORT", &value)?;
        }

        if let Some(value) = read_env("CROSSELL_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("CROSSELL_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(data_dir) = overrides.data_dir {
            self.data.dir = data_dir;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(api_key) = overrides.oracle_api_key {
            self.oracle.api_key = Some(api_key.into());
        }
        if let Some(fail_policy) = overrides.oracle_fail_policy {
            self.oracle.fail_policy = fail_policy;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("data.dir must not be empty".to_string()));
        }

        if self.oracle.timeout_secs == 0 || self.oracle.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "oracle.timeout_secs must be in range 1..=300".to_string(),
            ));
        }
        if !self.oracle.base_url.starts_with("http://")
            && !self.oracle.base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "oracle.base_url must start with http:// or https://".to_string(),
            ));
        }
        if let Some(api_key) = &self.oracle.api_key {
            if api_key.expose_secret().trim().is_empty() {
                return Err(ConfigError::Validation(
                    "oracle.api_key must not be blank when set".to_string(),
                ));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be greater than zero".to_string(),
            ));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::Validation(
                "logging.level must be one of trace|debug|info|warn|error".to_string(),
            )),
        }
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("crossell.toml"), PathBuf::from("config/crossell.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    data: Option<DataPatch>,
    oracle: Option<OraclePatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DataPatch {
    dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct OraclePatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    fail_policy: Option<FailPolicy>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
