//! Task execution context providing metadata shared across tasks.
//!
//! Contains flow identification and labels that tasks need for proper
//! execution and logging.

use serde_json::{Map, Value};

/// Errors that can occur during TaskContext operations.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Missing required builder attribute: {}", _0)]
    MissingRequiredAttribute(String),
}

/// Flow identification and metadata.
#[derive(Clone, Debug)]
pub struct FlowOptions {
    /// Flow name.
    pub name: String,
    /// Optional labels for flow metadata.
    pub labels: Option<Map<String, Value>>,
}

/// Context information for task execution shared across all tasks.
#[derive(Clone, Debug)]
pub struct TaskContext {
    /// Flow identification and metadata.
    pub flow: FlowOptions,
}

/// Builder for constructing TaskContext instances.
#[derive(Default)]
pub struct TaskContextBuilder {
    /// Unique flow name.
    flow_name: Option<String>,
    /// Optional labels for flow metadata.
    flow_labels: Option<Map<String, Value>>,
}

impl TaskContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unique flow name.
    pub fn flow_name(mut self, name: String) -> Self {
        self.flow_name = Some(name);
        self
    }

    /// Sets the optional flow labels for metadata.
    pub fn flow_labels(mut self, labels: Option<Map<String, Value>>) -> Self {
        self.flow_labels = labels;
        self
    }

    /// Builds the TaskContext instance.
    ///
    /// # Errors
    /// Returns `Error::MissingRequiredAttribute` if required fields are not set.
    pub fn build(self) -> Result<TaskContext, Error> {
        Ok(TaskContext {
            flow: FlowOptions {
                name: self
                    .flow_name
                    .ok_or_else(|| Error::MissingRequiredAttribute("flow_name".to_string()))?,
                labels: self.flow_labels,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_context_builder_success() {
        let mut labels = Map::new();
        labels.insert("env".to_string(), Value::String("test".to_string()));

        let context = TaskContextBuilder::new()
            .flow_name("test-flow".to_string())
            .flow_labels(Some(labels.clone()))
            .build()
            .unwrap();

        assert_eq!(context.flow.name, "test-flow");
        assert_eq!(context.flow.labels, Some(labels));
    }

    #[test]
    fn test_task_context_builder_missing_flow_name() {
        let result = TaskContextBuilder::new().build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Missing required builder attribute: flow_name"));
    }
}
