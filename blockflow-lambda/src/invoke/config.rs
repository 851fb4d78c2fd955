//! Lambda Invoke task configuration.

use blockflow_core::config::ConfigExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the Lambda Invoke task.
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
    /// Name, ARN, or partial ARN of the function to invoke.
    pub function_name: String,
    /// Optional JSON payload passed to the function.
    pub payload: Option<serde_json::Value>,
    /// Invocation type: "RequestResponse" (default), "Event", or "DryRun".
    pub invocation_type: Option<String>,
    /// Optional version or alias to invoke.
    pub qualifier: Option<String>,
}

impl ConfigExt for Processor {}
