//! Configuration structures for the blockflow application and flows.
//!
//! Provides configuration structures for the main application and individual
//! flows. Flow files are discovered on disk and deserialized from YAML or
//! JSON through the `config` crate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Top-level configuration for an individual flow.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct FlowConfig {
    /// Flow definition containing name and tasks.
    pub flow: Flow,
}

/// Flow definition with name and task list.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct Flow {
    /// Unique name for this flow.
    pub name: String,
    /// Optional labels for logging.
    pub labels: Option<Map<String, Value>>,
    /// List of tasks to execute in this flow.
    pub tasks: Vec<TaskType>,
}

/// Available task types in the blockflow ecosystem.
///
/// Each variant corresponds to a specific processor from one of the
/// blockflow worker crates. Task configurations are embedded within
/// each variant.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize)]
#[allow(non_camel_case_types)]
pub enum TaskType {
    /// Data generation task.
    generate(blockflow_core::task::generate::config::Subscriber),
    /// Log output task.
    log(blockflow_core::task::log::config::Processor),
    /// SQS SendMessage task.
    sqs_send_message(blockflow_sqs::send_message::config::Processor),
    /// SQS ReceiveMessage task.
    sqs_receive_message(blockflow_sqs::receive_message::config::Processor),
    /// S3 ListBuckets task.
    s3_list_buckets(blockflow_s3::list_buckets::config::Processor),
    /// S3 GetObject task.
    s3_get_object(blockflow_s3::get_object::config::Processor),
    /// S3 PutObject task.
    s3_put_object(blockflow_s3::put_object::config::Processor),
    /// Lambda Invoke task.
    lambda_invoke(blockflow_lambda::invoke::config::Processor),
    /// Lambda AddPermission task.
    lambda_add_permission(blockflow_lambda::add_permission::config::Processor),
    /// DynamoDB GetItem task.
    dynamodb_get_item(blockflow_dynamodb::get_item::config::Processor),
    /// DynamoDB PutItem task.
    dynamodb_put_item(blockflow_dynamodb::put_item::config::Processor),
}

impl TaskType {
    /// Returns the task type name used for event categorization and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::generate(_) => "generate",
            TaskType::log(_) => "log",
            TaskType::sqs_send_message(_) => "sqs_send_message",
            TaskType::sqs_receive_message(_) => "sqs_receive_message",
            TaskType::s3_list_buckets(_) => "s3_list_buckets",
            TaskType::s3_get_object(_) => "s3_get_object",
            TaskType::s3_put_object(_) => "s3_put_object",
            TaskType::lambda_invoke(_) => "lambda_invoke",
            TaskType::lambda_add_permission(_) => "lambda_add_permission",
            TaskType::dynamodb_get_item(_) => "dynamodb_get_item",
            TaskType::dynamodb_put_item(_) => "dynamodb_put_item",
        }
    }
}

/// Main application configuration.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct AppConfig {
    /// Flow discovery options.
    pub flows: FlowOptions,
    /// Event channel buffer size for all flows (defaults to 10000 if not specified).
    pub event_buffer_size: Option<usize>,
}

/// Flow loading configuration.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct FlowOptions {
    /// Directory pattern for discovering flow configuration files.
    pub dir: Option<PathBuf>,
}
