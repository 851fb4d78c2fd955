//! Flow execution and task orchestration.
//!
//! Manages the execution of individual flows by creating and orchestrating
//! tasks from the different processor crates. Handles task lifecycle, error
//! propagation, and the shared event channel between tasks.

use crate::config::{FlowConfig, TaskType};
use blockflow_core::{event::Event, task::runner::Runner};
use std::sync::Arc;
use tokio::{
    sync::broadcast::{self, Sender},
    task::JoinHandle,
};
use tracing::{error, info, Instrument};

const DEFAULT_EVENT_BUFFER_SIZE: usize = 10000;

/// Errors that can occur during flow execution.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error in generate subscriber task.
    #[error(transparent)]
    GenerateSubscriber(#[from] blockflow_core::task::generate::subscriber::Error),
    /// Error in log processor task.
    #[error(transparent)]
    LogProcessor(#[from] blockflow_core::task::log::processor::Error),
    /// Error in SQS SendMessage task.
    #[error(transparent)]
    SqsSendMessage(#[from] blockflow_sqs::send_message::processor::Error),
    /// Error in SQS ReceiveMessage task.
    #[error(transparent)]
    SqsReceiveMessage(#[from] blockflow_sqs::receive_message::processor::Error),
    /// Error in S3 ListBuckets task.
    #[error(transparent)]
    S3ListBuckets(#[from] blockflow_s3::list_buckets::processor::Error),
    /// Error in S3 GetObject task.
    #[error(transparent)]
    S3GetObject(#[from] blockflow_s3::get_object::processor::Error),
    /// Error in S3 PutObject task.
    #[error(transparent)]
    S3PutObject(#[from] blockflow_s3::put_object::processor::Error),
    /// Error in Lambda Invoke task.
    #[error(transparent)]
    LambdaInvoke(#[from] blockflow_lambda::invoke::processor::Error),
    /// Error in Lambda AddPermission task.
    #[error(transparent)]
    LambdaAddPermission(#[from] blockflow_lambda::add_permission::processor::Error),
    /// Error in DynamoDB GetItem task.
    #[error(transparent)]
    DynamodbGetItem(#[from] blockflow_dynamodb::get_item::processor::Error),
    /// Error in DynamoDB PutItem task.
    #[error(transparent)]
    DynamodbPutItem(#[from] blockflow_dynamodb::put_item::processor::Error),
    /// Missing required configuration attribute.
    #[error("Missing required attribute: {0}")]
    MissingRequiredAttribute(String),
}

pub struct Flow {
    /// The flow's static configuration, loaded from a file.
    pub config: Arc<FlowConfig>,
    /// Event channel buffer size for this flow (from app config or DEFAULT).
    event_buffer_size: Option<usize>,
    /// The shared context for all tasks in this flow. Initialized by `init()`.
    task_context: Option<Arc<blockflow_core::task::context::TaskContext>>,
    /// The broadcast channel sender for events within this flow. Initialized by `init()`.
    tx: Option<Sender<Event>>,
}

impl Flow {
    /// Returns the name of the flow.
    pub fn name(&self) -> &str {
        &self.config.flow.name
    }

    /// Initializes shared resources for the flow, such as the TaskContext and
    /// the event channel. This must be called before `run()`.
    #[tracing::instrument(skip(self), name = "flow.init", fields(flow = %self.config.flow.name))]
    pub fn init(&mut self) -> Result<(), Error> {
        if self.task_context.is_some() {
            return Ok(()); // Already initialized
        }

        let task_context = Arc::new(
            blockflow_core::task::context::TaskContextBuilder::new()
                .flow_name(self.config.flow.name.clone())
                .flow_labels(self.config.flow.labels.clone())
                .build()
                .map_err(|e| Error::MissingRequiredAttribute(e.to_string()))?,
        );

        let buffer_size = self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        let (tx, _) = broadcast::channel(buffer_size);

        self.task_context = Some(task_context);
        self.tx = Some(tx);

        Ok(())
    }

    /// Starts the main, long-running execution of the flow.
    ///
    /// This spawns a single master task that spawns and supervises all of the
    /// flow's tasks until they complete.
    #[tracing::instrument(skip(self), name = "flow.run", fields(flow = %self.config.flow.name))]
    pub fn run(self) -> JoinHandle<()> {
        let flow_name = self.config.flow.name.clone();
        tokio::spawn(
            async move {
                if let Err(e) = self.run_background_tasks().await {
                    error!("Flow {} terminated with an error: {}", flow_name, e);
                }
            }
            .instrument(tracing::Span::current()),
        )
    }

    /// The main internal run loop for the flow.
    async fn run_background_tasks(self) -> Result<(), Error> {
        let task_context = self.task_context.ok_or_else(|| {
            Error::MissingRequiredAttribute("task_context: init() must be called first".to_string())
        })?;
        let tx = self.tx.ok_or_else(|| {
            Error::MissingRequiredAttribute("tx: init() must be called first".to_string())
        })?;

        let task_configs: Vec<(usize, TaskType)> = self
            .config
            .flow
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| (i, task.clone()))
            .collect();

        if task_configs.is_empty() {
            info!("Flow {} has no tasks to run.", self.config.flow.name);
            return Ok(());
        }

        let background_tasks = spawn_tasks(&task_configs, &tx, &task_context);

        futures_util::future::join_all(background_tasks).await;
        info!("All tasks completed for flow {}", self.config.flow.name);

        Ok(())
    }
}

/// Spawns all tasks for the flow and returns their join handles.
fn spawn_tasks(
    tasks: &[(usize, TaskType)],
    tx: &Sender<Event>,
    task_context: &Arc<blockflow_core::task::context::TaskContext>,
) -> Vec<JoinHandle<Result<(), Error>>> {
    let mut background_tasks = Vec::new();

    for (i, task) in tasks.iter() {
        let i = *i; // Copy the index value so it can be moved into async blocks

        match task {
            TaskType::generate(config) => {
                let config = Arc::new(config.to_owned());
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_core::task::generate::subscriber::SubscriberBuilder::new()
                            .config(config)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::log(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_core::task::log::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::sqs_send_message(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_sqs::send_message::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::sqs_receive_message(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_sqs::receive_message::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::s3_list_buckets(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_s3::list_buckets::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::s3_get_object(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_s3::get_object::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::s3_put_object(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_s3::put_object::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::lambda_invoke(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_lambda::invoke::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::lambda_add_permission(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_lambda::add_permission::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::dynamodb_get_item(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_dynamodb::get_item::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
            TaskType::dynamodb_put_item(config) => {
                let config = Arc::new(config.to_owned());
                let rx = tx.subscribe();
                let tx = tx.clone();
                let task_context = Arc::clone(task_context);
                let task_type = task.as_str();
                let span = tracing::Span::current();
                let task: JoinHandle<Result<(), Error>> = tokio::spawn(
                    async move {
                        blockflow_dynamodb::put_item::processor::ProcessorBuilder::new()
                            .config(config)
                            .receiver(rx)
                            .sender(tx)
                            .task_id(i)
                            .task_type(task_type)
                            .task_context(task_context)
                            .build()
                            .await?
                            .run()
                            .await?;
                        Ok(())
                    }
                    .instrument(span),
                );
                background_tasks.push(task);
            }
        }
    }

    background_tasks
}

/// Builder for creating Flow instances.
#[derive(Default)]
pub struct FlowBuilder {
    /// Optional flow configuration.
    config: Option<Arc<FlowConfig>>,
    /// Optional event channel buffer size.
    event_buffer_size: Option<usize>,
}

impl FlowBuilder {
    /// Creates a new FlowBuilder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flow configuration.
    pub fn config(mut self, config: Arc<FlowConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the event channel buffer size.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds a Flow instance from the configured options.
    ///
    /// # Errors
    /// Returns `Error::MissingRequiredAttribute` if required fields are not set.
    pub fn build(self) -> Result<Flow, Error> {
        Ok(Flow {
            config: self
                .config
                .ok_or_else(|| Error::MissingRequiredAttribute("config".to_string()))?,
            event_buffer_size: self.event_buffer_size,
            task_context: None,
            tx: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Flow as FlowDefinition, FlowConfig};

    fn create_flow_config(name: &str, tasks: Vec<TaskType>) -> Arc<FlowConfig> {
        Arc::new(FlowConfig {
            flow: FlowDefinition {
                name: name.to_string(),
                labels: None,
                tasks,
            },
        })
    }

    #[test]
    fn test_flow_builder_new() {
        let builder = FlowBuilder::new();
        assert!(builder.config.is_none());
        assert!(builder.event_buffer_size.is_none());
    }

    #[test]
    fn test_flow_builder_build_missing_config() {
        let result = FlowBuilder::new().build();

        assert!(result.is_err());
        match result {
            Err(Error::MissingRequiredAttribute(attr)) => assert_eq!(attr, "config"),
            _ => panic!("Expected MissingRequiredAttribute error"),
        }
    }

    #[test]
    fn test_flow_builder_build_success() {
        let flow_config = create_flow_config("success_flow", vec![]);

        let result = FlowBuilder::new().config(flow_config.clone()).build();

        assert!(result.is_ok());
        let flow = result.unwrap();
        assert_eq!(flow.config, flow_config);
        assert_eq!(flow.name(), "success_flow");
        assert!(flow.task_context.is_none());
        assert!(flow.tx.is_none());
    }

    #[test]
    fn test_flow_init() {
        let flow_config = create_flow_config("init_flow", vec![]);
        let mut flow = FlowBuilder::new().config(flow_config).build().unwrap();

        flow.init().unwrap();
        assert!(flow.task_context.is_some());
        assert!(flow.tx.is_some());

        // Second init is a no-op.
        flow.init().unwrap();
    }

    #[tokio::test]
    async fn test_flow_run_empty() {
        let flow_config = create_flow_config("empty_flow", vec![]);
        let mut flow = FlowBuilder::new()
            .config(flow_config)
            .event_buffer_size(16)
            .build()
            .unwrap();

        flow.init().unwrap();
        flow.run().await.unwrap();
    }

    #[tokio::test]
    async fn test_flow_run_generate_with_count() {
        let generate_config = blockflow_core::task::generate::config::Subscriber {
            name: "gen".to_string(),
            message: Some(serde_json::json!({"hello": "world"})),
            interval: Some(std::time::Duration::from_millis(1)),
            count: Some(1),
        };
        let flow_config = create_flow_config(
            "generate_flow",
            vec![TaskType::generate(generate_config)],
        );
        let mut flow = FlowBuilder::new().config(flow_config).build().unwrap();

        flow.init().unwrap();
        let mut rx = flow.tx.as_ref().unwrap().subscribe();
        flow.run().await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.task_id, 0);
        assert_eq!(event.task_type, "generate");
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_EVENT_BUFFER_SIZE, 10_000);
    }
}
