//! S3 GetObject task configuration.

use blockflow_core::config::ConfigExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the S3 GetObject task.
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
    /// Bucket holding the object.
    pub bucket: String,
    /// Key of the object to fetch.
    pub key: String,
    /// Optional byte range, e.g. "bytes=0-1023".
    pub range: Option<String>,
    /// Optional version id for versioned buckets.
    pub version_id: Option<String>,
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
                "name": "fetch",
                "region": "eu-west-1",
                "credentials_path": "/etc/blockflow/aws.json",
                "bucket": "reports",
                "key": "2026/08/report.json",
                "range": "bytes=0-1023"
            }"#,
        )
        .unwrap();

        assert_eq!(config.bucket, "reports");
        assert_eq!(config.key, "2026/08/report.json");
        assert_eq!(config.range.as_deref(), Some("bytes=0-1023"));
        assert!(config.version_id.is_none());
    }

    #[test]
    fn test_config_render_resolves_key() {
        let config = Processor {
            name: "fetch".to_string(),
            region: "eu-west-1".to_string(),
            bucket: "reports".to_string(),
            key: "{{prefix}}/report.json".to_string(),
            credentials_path: PathBuf::from("/etc/blockflow/aws.json"),
            ..Default::default()
        };

        let rendered = config.render(&json!({"prefix": "2026/08"})).unwrap();
        assert_eq!(rendered.key, "2026/08/report.json");
    }
}
