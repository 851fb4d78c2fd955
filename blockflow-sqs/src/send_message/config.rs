//! SQS SendMessage task configuration.

use blockflow_core::config::ConfigExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the SQS SendMessage task.
///
/// Field values may contain `{{placeholder}}` templates that resolve against
/// the triggering event's data at invocation time.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize, Default)]
pub struct Processor {
    /// The unique name / identifier of the task.
    pub name: String,
    /// AWS region the queue lives in.
    pub region: String,
    /// Optional IAM role to assume before the call.
    pub assume_role_arn: Option<String>,
    /// Path to the AWS credentials file.
    pub credentials_path: PathBuf,
    /// URL of the target queue.
    pub queue_url: String,
    /// Message body to send.
    pub message_body: String,
    /// Seconds to delay delivery of the message.
    pub delay_seconds: Option<i32>,
    /// Message group id for FIFO queues.
    pub message_group_id: Option<String>,
    /// Deduplication id for FIFO queues.
    pub message_deduplication_id: Option<String>,
}

impl ConfigExt for Processor {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_deserialization() {
        let config: Processor = serde_json::from_str(
            r#"
            {
                "name": "notify",
                "region": "eu-central-1",
                "credentials_path": "/etc/blockflow/aws.json",
                "queue_url": "https://sqs.eu-central-1.amazonaws.com/123456789012/orders",
                "message_body": "hello",
                "delay_seconds": 10
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "notify");
        assert_eq!(config.region, "eu-central-1");
        assert!(config.assume_role_arn.is_none());
        assert_eq!(config.delay_seconds, Some(10));
    }

    #[test]
    fn test_config_render_resolves_event_fields() {
        let config = Processor {
            name: "notify".to_string(),
            region: "eu-central-1".to_string(),
            queue_url: "https://sqs.eu-central-1.amazonaws.com/123456789012/orders".to_string(),
            message_body: "{{order.id}}".to_string(),
            credentials_path: PathBuf::from("/etc/blockflow/aws.json"),
            ..Default::default()
        };

        let rendered = config.render(&json!({"order": {"id": "A-42"}})).unwrap();
        assert_eq!(rendered.message_body, "A-42");
        assert_eq!(rendered.queue_url, config.queue_url);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Processor {
            name: "notify".to_string(),
            region: "us-east-1".to_string(),
            assume_role_arn: Some("arn:aws:iam::123456789012:role/sender".to_string()),
            credentials_path: PathBuf::from("/tmp/creds.json"),
            queue_url: "https://sqs.us-east-1.amazonaws.com/123456789012/q.fifo".to_string(),
            message_body: "body".to_string(),
            delay_seconds: None,
            message_group_id: Some("group".to_string()),
            message_deduplication_id: Some("dedup".to_string()),
        };

        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: Processor = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
