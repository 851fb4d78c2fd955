//! Lambda AddPermission task configuration.

use blockflow_core::config::ConfigExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the Lambda AddPermission task.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize, Default)]
pub struct Processor {
    /// The unique name / identifier of the task.
    pub name: String,
    /// AWS region the function lives in.
    pub region: String,
    /// Optional IAM role to assume before the call.
    pub assume_role_arn: Option<String>,
    /// Path to the AWS credentials file.
    pub credentials_path: PathBuf,
    /// Name, ARN, or partial ARN of the target function.
    pub function_name: String,
    /// Statement identifier unique within the function policy.
    pub statement_id: String,
    /// Action being granted, e.g. "lambda:InvokeFunction".
    pub action: String,
    /// Principal receiving the permission, e.g. "s3.amazonaws.com".
    pub principal: String,
    /// Optional source ARN restricting the granting resource.
    pub source_arn: Option<String>,
    /// Optional account id restricting the granting account.
    pub source_account: Option<String>,
    /// Optional version or alias the permission applies to.
    pub qualifier: Option<String>,
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
                "name": "allow-s3",
                "region": "us-west-2",
                "credentials_path": "/etc/blockflow/aws.json",
                "function_name": "thumbnailer",
                "statement_id": "s3-invoke",
                "action": "lambda:InvokeFunction",
                "principal": "s3.amazonaws.com",
                "source_arn": "arn:aws:s3:::uploads"
            }"#,
        )
        .unwrap();

        assert_eq!(config.statement_id, "s3-invoke");
        assert_eq!(config.principal, "s3.amazonaws.com");
        assert_eq!(config.source_arn.as_deref(), Some("arn:aws:s3:::uploads"));
        assert!(config.source_account.is_none());
    }
}
