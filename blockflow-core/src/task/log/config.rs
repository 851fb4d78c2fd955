//! Log processor configuration.

use serde::{Deserialize, Serialize};

/// Log processor that outputs event data to logs.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize, Default)]
pub struct Processor {
    /// Task name identifier.
    pub name: String,
    /// Log level for output.
    #[serde(default)]
    pub level: LogLevel,
    /// Whether to output structured JSON fields instead of pretty-printed strings.
    /// When true, logs JSON as structured fields for systems like Grafana/Loki.
    /// When false, logs pretty-printed JSON strings for console readability.
    #[serde(default)]
    pub structured: bool,
}

/// Log level options.
#[derive(PartialEq, Eq, Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level logging.
    Trace,
    /// Debug level logging.
    Debug,
    /// Info level logging (default).
    #[default]
    Info,
    /// Warn level logging.
    Warn,
    /// Error level logging.
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_defaults_to_info() {
        let config: Processor = serde_json::from_str(r#"{"name": "log"}"#).unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert!(!config.structured);
    }

    #[test]
    fn test_log_level_lowercase_names() {
        let config: Processor =
            serde_json::from_str(r#"{"name": "log", "level": "warn", "structured": true}"#)
                .unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert!(config.structured);
    }
}
