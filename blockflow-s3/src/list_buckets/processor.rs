//! S3 ListBuckets processor.
//!
//! Lists the account's buckets once per incoming event and emits them as a
//! new event.

use blockflow_core::client::Client;
use blockflow_core::config::ConfigExt;
use blockflow_core::event::{
    generate_subject, Event, EventBuilder, EventData, SenderExt, SubjectSuffix,
};
use blockflow_aws::response::MapExt;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::broadcast::{Receiver, Sender};
use tracing::{error, Instrument};

/// Default subject prefix for emitted events.
const DEFAULT_MESSAGE_SUBJECT: &str = "s3.list_buckets.out";

/// Errors that can occur during ListBuckets processing.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to render the task configuration against event data.
    #[error("Failed to render task configuration: {source}")]
    Render {
        #[source]
        source: blockflow_core::config::Error,
    },
    /// Failed to resolve AWS credentials.
    #[error("Failed to resolve AWS credentials: {source}")]
    AwsClient {
        #[source]
        source: blockflow_aws::client::Error,
    },
    /// The ListBuckets API call failed.
    #[error("ListBuckets failed: {source}")]
    ListBuckets {
        #[source]
        source: Box<
            aws_sdk_s3::error::SdkError<aws_sdk_s3::operation::list_buckets::ListBucketsError>,
        >,
    },
    /// Failed to build an event.
    #[error("Failed to build event: {source}")]
    Event {
        #[source]
        source: blockflow_core::event::Error,
    },
    /// Failed to send event through channel.
    #[error("Failed to send event message: {source}")]
    SendEvent {
        #[source]
        source: Box<tokio::sync::broadcast::error::SendError<Event>>,
    },
    /// Client was not connected before use.
    #[error("AWS client is not connected")]
    NoSdkConfig(),
    /// Required builder attribute was not provided.
    #[error("Missing required attribute: {}", _0)]
    MissingRequiredAttribute(String),
}

/// Handles individual ListBuckets operations.
pub struct EventHandler {
    /// Processor configuration settings.
    config: Arc<super::config::Processor>,
    /// Current task identifier for event filtering.
    task_id: usize,
    /// Event sender for emitting responses.
    tx: Sender<Event>,
    /// Task type for event categorization and logging.
    task_type: &'static str,
    /// Task context (unused but kept for consistency).
    _task_context: Arc<blockflow_core::task::context::TaskContext>,
}

impl EventHandler {
    /// Resolves credentials, lists buckets, and emits the response.
    async fn handle(&self, event: Event) -> Result<(), Error> {
        if Some(event.task_id) != self.task_id.checked_sub(1) {
            return Ok(());
        }

        // Resolve configuration placeholders against the triggering event.
        let data = Value::from(&event.data);
        let config = self
            .config
            .render(&data)
            .map_err(|source| Error::Render { source })?;

        // Credentials and client are resolved fresh for every invocation.
        let aws_client = blockflow_aws::client::Builder::new()
            .credentials_path(config.credentials_path.clone())
            .region(config.region.clone())
            .assume_role_arn(config.assume_role_arn.clone())
            .build()
            .map_err(|source| Error::AwsClient { source })?
            .connect()
            .await
            .map_err(|source| Error::AwsClient { source })?;
        let sdk_config = aws_client.sdk_config.as_ref().ok_or_else(Error::NoSdkConfig)?;
        let client = aws_sdk_s3::Client::new(sdk_config);

        let output = client
            .list_buckets()
            .send()
            .await
            .map_err(|source| Error::ListBuckets {
                source: Box::new(source),
            })?;

        let buckets: Vec<Value> = output
            .buckets()
            .iter()
            .map(|bucket| {
                let mut entry = Map::new();
                entry.insert_some("Name", bucket.name());
                entry.insert_some("CreationDate", bucket.creation_date().map(|d| d.secs()));
                Value::Object(entry)
            })
            .collect();

        let mut response = Map::new();
        if !buckets.is_empty() {
            response.insert("Buckets".to_string(), Value::Array(buckets));
        }
        if let Some(owner) = output.owner() {
            let mut entry = Map::new();
            entry.insert_some("DisplayName", owner.display_name());
            entry.insert_some("ID", owner.id());
            response.insert("Owner".to_string(), Value::Object(entry));
        }

        let subject = generate_subject(
            Some(&config.name),
            DEFAULT_MESSAGE_SUBJECT,
            SubjectSuffix::Timestamp,
        );
        let e = EventBuilder::new()
            .data(EventData::Json(Value::Object(response)))
            .subject(subject)
            .task_id(self.task_id)
            .task_type(self.task_type)
            .build()
            .map_err(|source| Error::Event { source })?;

        self.tx
            .send_with_logging(e)
            .map_err(|source| Error::SendEvent {
                source: Box::new(source),
            })?;

        Ok(())
    }
}

/// ListBuckets processor consuming trigger events.
pub struct Processor {
    /// ListBuckets task configuration.
    config: Arc<super::config::Processor>,
    /// Channel sender for emitting response events.
    tx: Sender<Event>,
    /// Channel receiver for incoming trigger events.
    rx: Receiver<Event>,
    /// Current task identifier for event filtering.
    task_id: usize,
    /// Task execution context providing metadata and runtime configuration.
    _task_context: Arc<blockflow_core::task::context::TaskContext>,
    /// Task type for event categorization and logging.
    task_type: &'static str,
}

#[async_trait::async_trait]
impl blockflow_core::task::runner::Runner for Processor {
    type Error = Error;
    type EventHandler = EventHandler;

    /// Initializes the processor.
    async fn init(&self) -> Result<Self::EventHandler, Self::Error> {
        let event_handler = EventHandler {
            config: Arc::clone(&self.config),
            task_id: self.task_id,
            tx: self.tx.clone(),
            task_type: self.task_type,
            _task_context: Arc::clone(&self._task_context),
        };

        Ok(event_handler)
    }

    #[tracing::instrument(skip(self), name = DEFAULT_MESSAGE_SUBJECT, fields(task = %self.config.name, task_id = self.task_id))]
    async fn run(mut self) -> Result<(), Error> {
        let event_handler = match self.init().await {
            Ok(handler) => Arc::new(handler),
            Err(e) => {
                error!("{}", e);
                return Ok(());
            }
        };

        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    let event_handler = Arc::clone(&event_handler);
                    tokio::spawn(
                        async move {
                            if let Err(err) = event_handler.handle(event).await {
                                error!("{}", err);
                            }
                        }
                        .instrument(tracing::Span::current()),
                    );
                }
                Err(_) => return Ok(()),
            }
        }
    }
}

/// Builder for constructing Processor instances with validation.
#[derive(Default)]
pub struct ProcessorBuilder {
    /// Processor configuration (required for build).
    config: Option<Arc<super::config::Processor>>,
    /// Event broadcast sender (required for build).
    tx: Option<Sender<Event>>,
    /// Event broadcast receiver (required for build).
    rx: Option<Receiver<Event>>,
    /// Current task identifier for event filtering.
    task_id: usize,
    /// Task execution context providing metadata and runtime configuration.
    task_context: Option<Arc<blockflow_core::task::context::TaskContext>>,
    /// Task type for event categorization and logging.
    task_type: Option<&'static str>,
}

impl ProcessorBuilder {
    pub fn new() -> ProcessorBuilder {
        ProcessorBuilder {
            ..Default::default()
        }
    }

    pub fn config(mut self, config: Arc<super::config::Processor>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn receiver(mut self, receiver: Receiver<Event>) -> Self {
        self.rx = Some(receiver);
        self
    }

    pub fn sender(mut self, sender: Sender<Event>) -> Self {
        self.tx = Some(sender);
        self
    }

    pub fn task_id(mut self, task_id: usize) -> Self {
        self.task_id = task_id;
        self
    }

    pub fn task_context(
        mut self,
        task_context: Arc<blockflow_core::task::context::TaskContext>,
    ) -> Self {
        self.task_context = Some(task_context);
        self
    }

    pub fn task_type(mut self, task_type: &'static str) -> Self {
        self.task_type = Some(task_type);
        self
    }

    pub async fn build(self) -> Result<Processor, Error> {
        Ok(Processor {
            config: self
                .config
                .ok_or_else(|| Error::MissingRequiredAttribute("config".to_string()))?,
            rx: self
                .rx
                .ok_or_else(|| Error::MissingRequiredAttribute("receiver".to_string()))?,
            tx: self
                .tx
                .ok_or_else(|| Error::MissingRequiredAttribute("sender".to_string()))?,
            task_id: self.task_id,
            _task_context: self
                .task_context
                .ok_or_else(|| Error::MissingRequiredAttribute("task_context".to_string()))?,
            task_type: self
                .task_type
                .ok_or_else(|| Error::MissingRequiredAttribute("task_type".to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tokio::sync::broadcast;

    fn create_mock_task_context() -> Arc<blockflow_core::task::context::TaskContext> {
        Arc::new(
            blockflow_core::task::context::TaskContextBuilder::new()
                .flow_name("test-flow".to_string())
                .build()
                .unwrap(),
        )
    }

    fn create_test_config() -> Arc<super::super::config::Processor> {
        Arc::new(super::super::config::Processor {
            name: "inventory".to_string(),
            region: "us-east-1".to_string(),
            credentials_path: PathBuf::from("/nonexistent/creds.json"),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_processor_builder_build_success() {
        let (tx, _rx) = broadcast::channel(100);
        let rx2 = tx.subscribe();

        let processor = ProcessorBuilder::new()
            .config(create_test_config())
            .sender(tx)
            .receiver(rx2)
            .task_id(1)
            .task_type("s3_list_buckets")
            .task_context(create_mock_task_context())
            .build()
            .await
            .unwrap();

        assert_eq!(processor.task_id, 1);
    }

    #[tokio::test]
    async fn test_event_handler_filters_wrong_task_id() {
        let (tx, mut rx) = broadcast::channel(100);

        let event_handler = EventHandler {
            config: create_test_config(),
            task_id: 1,
            tx,
            task_type: "s3_list_buckets",
            _task_context: create_mock_task_context(),
        };

        let input_event = EventBuilder::new()
            .data(EventData::Json(json!({})))
            .subject("test.subject".to_string())
            .task_id(7)
            .task_type("test")
            .build()
            .unwrap();

        let result = event_handler.handle(input_event).await;
        assert!(result.is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_event_handler_propagates_credential_errors() {
        let (tx, _rx) = broadcast::channel(100);

        let event_handler = EventHandler {
            config: create_test_config(),
            task_id: 1,
            tx,
            task_type: "s3_list_buckets",
            _task_context: create_mock_task_context(),
        };

        let input_event = EventBuilder::new()
            .data(EventData::Json(json!({})))
            .subject("test.subject".to_string())
            .task_id(0)
            .task_type("test")
            .build()
            .unwrap();

        let result = event_handler.handle(input_event).await;
        assert!(matches!(result, Err(Error::AwsClient { .. })));
    }
}
