//! DynamoDB PutItem task configuration.

use blockflow_core::config::ConfigExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Configuration for the DynamoDB PutItem task.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize, Default)]
pub struct Processor {
    /// The unique name / identifier of the task.
    pub name: String,
    /// AWS region the table lives in.
    pub region: String,
    /// Optional IAM role to assume before the call.
    pub assume_role_arn: Option<String>,
    /// Path to the AWS credentials file.
    pub credentials_path: PathBuf,
    /// Name of the table to write to.
    pub table_name: String,
    /// Item to store as plain JSON. Must include the table's primary key.
    pub item: Map<String, Value>,
    /// Return values option, e.g. "ALL_OLD".
    pub return_values: Option<String>,
}

impl ConfigExt for Processor {}
