//! Configuration structures for generate task types.
//!
//! Defines configuration options for event generation tasks that trigger
//! downstream blocks on a schedule.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for generate subscriber tasks that produce scheduled events.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize, Default)]
pub struct Subscriber {
    /// The unique name / identifier of the task.
    pub name: String,
    /// Optional JSON payload carried by generated events.
    pub message: Option<serde_json::Value>,
    /// Interval between generated events.
    /// Accepts duration strings: "100ms", "30s", "5m", etc.
    #[serde(default, with = "humantime_serde")]
    pub interval: Option<Duration>,
    /// Optional maximum number of events to generate before stopping.
    pub count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscriber_config_default() {
        let config = Subscriber::default();
        assert_eq!(config.name, String::new());
        assert!(config.message.is_none());
        assert!(config.interval.is_none());
        assert!(config.count.is_none());
    }

    #[test]
    fn test_subscriber_config_with_interval() {
        let config = Subscriber {
            name: "test_task_name".to_string(),
            message: Some(json!({"trigger": true})),
            interval: Some(Duration::from_secs(5)),
            count: Some(10),
        };

        assert_eq!(config.name, "test_task_name");
        assert_eq!(config.message, Some(json!({"trigger": true})));
        assert_eq!(config.interval, Some(Duration::from_secs(5)));
        assert_eq!(config.count, Some(10));
    }

    #[test]
    fn test_subscriber_config_interval_from_duration_string() {
        let config: Subscriber =
            serde_json::from_str(r#"{"name": "timer", "interval": "30s"}"#).unwrap();
        assert_eq!(config.interval, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_subscriber_config_serialization() {
        let config = Subscriber {
            name: "serialize_test".to_string(),
            message: None,
            interval: Some(Duration::from_secs(1)),
            count: Some(5),
        };

        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: Subscriber = serde_json::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }
}
