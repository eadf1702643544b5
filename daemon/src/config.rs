//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{DaemonError, LogFormat};

/// Configuration for one synchronizer.
///
/// Every field has a default, so an empty file is valid (though a
/// delegator still has to be supplied before running).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    /// Account whose vote orders are answered.
    #[serde(default)]
    pub delegator: String,

    /// First block to scan. `0` resumes after the delegator's latest
    /// confirmation.
    #[serde(default)]
    pub start_height: u64,

    /// Wait before asking again for a block that is not produced yet.
    #[serde(default = "default_block_retry_delay_ms")]
    pub block_retry_delay_ms: u64,

    /// Broadcast confirmations. When false the daemon runs dry.
    #[serde(default)]
    pub send_enabled: bool,

    /// Capacity of the event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Stop by itself after processing this block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_at_height: Option<u64>,

    #[serde(default = "default_custom_rpc_timeout_secs")]
    pub custom_rpc_timeout_secs: u64,

    /// `"human"` or `"json"`.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_block_retry_delay_ms() -> u64 {
    3100
}

fn default_event_buffer() -> usize {
    64
}

fn default_custom_rpc_timeout_secs() -> u64 {
    10
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    pub fn for_delegator(delegator: impl Into<String>) -> Self {
        Self {
            delegator: delegator.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DaemonError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DaemonError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DaemonError> {
        toml::from_str(s).map_err(|e| DaemonError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, DaemonError> {
        toml::to_string_pretty(self).map_err(|e| DaemonError::Config(e.to_string()))
    }

    /// Check the settings a run cannot do without.
    pub fn validate(&self) -> Result<(), DaemonError> {
        if self.delegator.is_empty() {
            return Err(DaemonError::Config("delegator is not set".into()));
        }
        if self.event_buffer == 0 {
            return Err(DaemonError::Config("event_buffer must be positive".into()));
        }
        self.log_format()?;
        Ok(())
    }

    pub fn block_retry_delay(&self) -> Duration {
        Duration::from_millis(self.block_retry_delay_ms)
    }

    pub fn custom_rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.custom_rpc_timeout_secs)
    }

    pub fn log_format(&self) -> Result<LogFormat, DaemonError> {
        self.log_format.parse()
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            delegator: String::new(),
            start_height: 0,
            block_retry_delay_ms: default_block_retry_delay_ms(),
            send_enabled: false,
            event_buffer: default_event_buffer(),
            stop_at_height: None,
            custom_rpc_timeout_secs: default_custom_rpc_timeout_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaemonConfig::for_delegator("noisy");
        let toml_str = config.to_toml_string().unwrap();
        let parsed = DaemonConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.block_retry_delay(), Duration::from_millis(3100));
        assert_eq!(config.event_buffer, 64);
        assert!(!config.send_enabled);
        assert_eq!(config.log_format().unwrap(), LogFormat::Human);
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            delegator = "noisy"
            send_enabled = true
            stop_at_height = 22710600
            log_format = "json"
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.delegator, "noisy");
        assert!(config.send_enabled);
        assert_eq!(config.stop_at_height, Some(22_710_600));
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
        assert_eq!(config.custom_rpc_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = DaemonConfig::from_toml_str("delegatr = \"typo\"");
        assert!(matches!(result, Err(DaemonError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "delegator = \"noisy\"\nstart_height = 22710500").unwrap();
        let config = DaemonConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.start_height, 22_710_500);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = DaemonConfig::from_toml_file("/nonexistent/wise.toml");
        assert!(matches!(result, Err(DaemonError::Config(_))));
    }
}
