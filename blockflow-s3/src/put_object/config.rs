//! S3 PutObject task configuration.

use blockflow_core::config::ConfigExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the S3 PutObject task.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize, Default)]
pub struct Processor {
    /// The unique name / identifier of the task.
    pub name: String,
    /// AWS region the bucket lives in.
    pub region: String,
    /// Optional IAM role to assume before the call.
    pub assume_role_arn: Option<String>,
    /// Path to the AWS credentials file.
    pub credentials_path: PathBuf,
    /// Bucket to write into.
    pub bucket: String,
    /// Key of the object to write.
    pub key: String,
    /// Object content. Placeholders resolve against the triggering event.
    pub body: String,
    /// Optional content type stored with the object.
    pub content_type: Option<String>,
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
                "name": "archive",
                "region": "eu-west-1",
                "credentials_path": "/etc/blockflow/aws.json",
                "bucket": "archive",
                "key": "events/latest.json",
                "body": "{}",
                "content_type": "application/json"
            }"#,
        )
        .unwrap();

        assert_eq!(config.bucket, "archive");
        assert_eq!(config.content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_config_render_resolves_body() {
        let config = Processor {
            name: "archive".to_string(),
            region: "eu-west-1".to_string(),
            bucket: "archive".to_string(),
            key: "events/{{id}}.json".to_string(),
            body: "{{payload}}".to_string(),
            credentials_path: PathBuf::from("/etc/blockflow/aws.json"),
            ..Default::default()
        };

        let rendered = config
            .render(&json!({"id": "e-7", "payload": "content"}))
            .unwrap();
        assert_eq!(rendered.key, "events/e-7.json");
        assert_eq!(rendered.body, "content");
    }
}
