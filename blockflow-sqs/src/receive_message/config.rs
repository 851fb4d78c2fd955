//! SQS ReceiveMessage task configuration.

use blockflow_core::config::ConfigExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the SQS ReceiveMessage task.
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
    /// URL of the queue to receive from.
    pub queue_url: String,
    /// Maximum number of messages to return, between 1 and 10.
    pub max_number_of_messages: Option<i32>,
    /// Long-poll wait time in seconds.
    pub wait_time_seconds: Option<i32>,
    /// Visibility timeout applied to received messages.
    pub visibility_timeout: Option<i32>,
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
                "name": "drain",
                "region": "us-east-1",
                "credentials_path": "/etc/blockflow/aws.json",
                "queue_url": "https://sqs.us-east-1.amazonaws.com/123456789012/inbox",
                "max_number_of_messages": 10,
                "wait_time_seconds": 20
            }"#,
        )
        .unwrap();

        assert_eq!(config.max_number_of_messages, Some(10));
        assert_eq!(config.wait_time_seconds, Some(20));
        assert!(config.visibility_timeout.is_none());
    }

    #[test]
    fn test_config_render_resolves_queue_url() {
        let config = Processor {
            name: "drain".to_string(),
            region: "us-east-1".to_string(),
            queue_url: "{{queue}}".to_string(),
            credentials_path: PathBuf::from("/etc/blockflow/aws.json"),
            ..Default::default()
        };

        let rendered = config
            .render(&json!({"queue": "https://sqs.us-east-1.amazonaws.com/123456789012/inbox"}))
            .unwrap();
        assert_eq!(
            rendered.queue_url,
            "https://sqs.us-east-1.amazonaws.com/123456789012/inbox"
        );
    }
}
