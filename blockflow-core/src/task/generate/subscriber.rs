//! Generate subscriber producing scheduled trigger events.

use crate::event::{
    generate_subject, Event, EventBuilder, EventData, SenderExt, SubjectSuffix,
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::{sync::broadcast::Sender, time};
use tracing::error;

/// Default subject prefix for generated events.
const DEFAULT_MESSAGE_SUBJECT: &str = "generate";

/// Interval used when the configuration does not specify one.
const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Errors that can occur during event generation.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Required builder attribute was not provided.
    #[error("Missing required attribute: {}", _0)]
    MissingRequiredAttribute(String),
    /// Failed to build an event.
    #[error("Failed to build event: {source}")]
    Event {
        #[source]
        source: crate::event::Error,
    },
    /// Failed to send event through channel.
    #[error("Failed to send event message: {source}")]
    SendMessage {
        #[source]
        source: Box<tokio::sync::broadcast::error::SendError<Event>>,
    },
}

/// Emits a single generated event per tick.
pub struct EventHandler {
    /// Subscriber configuration settings.
    config: Arc<super::config::Subscriber>,
    /// Event sender for emitting generated events.
    tx: Sender<Event>,
    /// Identifier carried on emitted events for downstream filtering.
    task_id: usize,
    /// Task type for event categorization and logging.
    task_type: &'static str,
}

impl EventHandler {
    /// Builds and emits one event from the configured message payload.
    async fn handle(&self) -> Result<(), Error> {
        let data = self.config.message.clone().unwrap_or(Value::Null);
        let subject = generate_subject(
            Some(&self.config.name),
            DEFAULT_MESSAGE_SUBJECT,
            SubjectSuffix::Timestamp,
        );

        let e = EventBuilder::new()
            .data(EventData::Json(data))
            .subject(subject)
            .task_id(self.task_id)
            .task_type(self.task_type)
            .build()
            .map_err(|source| Error::Event { source })?;

        self.tx
            .send_with_logging(e)
            .map_err(|source| Error::SendMessage {
                source: Box::new(source),
            })?;

        Ok(())
    }
}

/// Generate subscriber that emits events on a fixed interval.
#[derive(Debug)]
pub struct Subscriber {
    /// Generate task configuration.
    config: Arc<super::config::Subscriber>,
    /// Channel sender for emitting events.
    tx: Sender<Event>,
    /// Current task identifier.
    task_id: usize,
    /// Task execution context providing metadata and runtime configuration.
    _task_context: Arc<crate::task::context::TaskContext>,
    /// Task type for event categorization and logging.
    task_type: &'static str,
}

#[async_trait::async_trait]
impl crate::task::runner::Runner for Subscriber {
    type Error = Error;
    type EventHandler = EventHandler;

    /// Initializes the subscriber.
    async fn init(&self) -> Result<Self::EventHandler, Self::Error> {
        let event_handler = EventHandler {
            config: Arc::clone(&self.config),
            tx: self.tx.clone(),
            task_id: self.task_id,
            task_type: self.task_type,
        };

        Ok(event_handler)
    }

    #[tracing::instrument(skip(self), name = DEFAULT_MESSAGE_SUBJECT, fields(task = %self.config.name, task_id = self.task_id))]
    async fn run(mut self) -> Result<(), Error> {
        let event_handler = match self.init().await {
            Ok(handler) => handler,
            Err(e) => {
                error!("{}", e);
                return Ok(());
            }
        };

        let interval = self.config.interval.unwrap_or(DEFAULT_INTERVAL);
        let mut counter = 0;
        loop {
            time::sleep(interval).await;
            counter += 1;

            if let Err(err) = event_handler.handle().await {
                error!("{}", err);
            }

            match self.config.count {
                Some(count) if count == counter => break,
                Some(_) | None => continue,
            }
        }
        Ok(())
    }
}

/// Builder for constructing Subscriber instances with validation.
#[derive(Default)]
pub struct SubscriberBuilder {
    /// Subscriber configuration (required for build).
    config: Option<Arc<super::config::Subscriber>>,
    /// Event broadcast sender (required for build).
    tx: Option<Sender<Event>>,
    /// Current task identifier.
    task_id: usize,
    /// Task execution context providing metadata and runtime configuration.
    task_context: Option<Arc<crate::task::context::TaskContext>>,
    /// Task type for event categorization and logging.
    task_type: Option<&'static str>,
}

impl SubscriberBuilder {
    pub fn new() -> SubscriberBuilder {
        SubscriberBuilder {
            ..Default::default()
        }
    }

    pub fn config(mut self, config: Arc<super::config::Subscriber>) -> Self {
        self.config = Some(config);
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

    pub fn task_context(mut self, task_context: Arc<crate::task::context::TaskContext>) -> Self {
        self.task_context = Some(task_context);
        self
    }

    pub fn task_type(mut self, task_type: &'static str) -> Self {
        self.task_type = Some(task_type);
        self
    }

    pub async fn build(self) -> Result<Subscriber, Error> {
        Ok(Subscriber {
            config: self
                .config
                .ok_or_else(|| Error::MissingRequiredAttribute("config".to_string()))?,
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
