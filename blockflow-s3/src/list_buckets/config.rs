//! S3 ListBuckets task configuration.

use blockflow_core::config::ConfigExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the S3 ListBuckets task.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize, Default)]
pub struct Processor {
    /// The unique name / identifier of the task.
    pub name: String,
    /// AWS region for the API call.
    pub region: String,
    /// Optional IAM role to assume before the call.
    pub assume_role_arn: Option<String>,
    /// Path to the AWS credentials file.
    pub credentials_path: PathBuf,
}

impl ConfigExt for Processor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let config: Processor = serde_json::from_str(
            r#"
            {
                "name": "inventory",
                "region": "ap-southeast-2",
                "assume_role_arn": "arn:aws:iam::123456789012:role/reader",
                "credentials_path": "/etc/blockflow/aws.json"
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "inventory");
        assert_eq!(
            config.assume_role_arn.as_deref(),
            Some("arn:aws:iam::123456789012:role/reader")
        );
    }
}
