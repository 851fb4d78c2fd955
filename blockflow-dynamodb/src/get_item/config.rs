//! DynamoDB GetItem task configuration.

use blockflow_core::config::ConfigExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Configuration for the DynamoDB GetItem task.
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
    /// Name of the table to read from.
    pub table_name: String,
    /// Primary key of the item as plain JSON, e.g. {"id": "a1"}.
    pub key: Map<String, Value>,
    /// Whether to use a strongly consistent read.
    pub consistent_read: Option<bool>,
}

impl ConfigExt for Processor {}
