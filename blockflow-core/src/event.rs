//! Event system for routing data through flow pipelines.
//!
//! Provides the event structure, subject generation utilities, and logging
//! helpers shared by every task in a flow.

use chrono::Utc;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::info;

/// Default log message format for event processing.
pub const DEFAULT_LOG_MESSAGE: &str = "Event processed";

/// Subject suffix options for event subjects.
pub enum SubjectSuffix<'a> {
    /// Use current timestamp as suffix.
    Timestamp,
    /// Use custom ID as suffix.
    Id(&'a str),
}

/// Extension trait for broadcast sender with automatic event logging.
pub trait SenderExt {
    /// Sends an event and automatically logs it.
    fn send_with_logging(
        &self,
        event: Event,
    ) -> Result<usize, tokio::sync::broadcast::error::SendError<Event>>;
}

impl SenderExt for tokio::sync::broadcast::Sender<Event> {
    fn send_with_logging(
        &self,
        event: Event,
    ) -> Result<usize, tokio::sync::broadcast::error::SendError<Event>> {
        let subject = event.subject.clone();
        let result = self.send(event)?;
        info!("{}: {}", DEFAULT_LOG_MESSAGE, subject);
        Ok(result)
    }
}

/// Generates a structured subject string from a base subject, an optional task name, and a suffix.
///
/// The resulting subject is formatted as: `<base_subject>.<task_name>.<suffix_value>`.
/// The `task_name` is always converted to lowercase.
pub fn generate_subject(
    task_name: Option<&str>,
    base_subject: &str,
    suffix: SubjectSuffix,
) -> String {
    let suffix_str = match suffix {
        SubjectSuffix::Timestamp => Utc::now().timestamp_micros().to_string(),
        SubjectSuffix::Id(id) => id.to_string(),
    };
    match task_name {
        Some(name) => format!("{}.{}.{}", base_subject, name.to_lowercase(), suffix_str),
        None => format!("{base_subject}.{suffix_str}"),
    }
}

/// Errors that can occur during event construction.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Required builder attribute was not provided.
    #[error("Missing required attribute: {}", _0)]
    MissingRequiredAttribute(String),
}

/// Core event structure containing data and metadata for flow processing.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event payload.
    pub data: EventData,
    /// Subject identifier for event routing and filtering.
    pub subject: String,
    /// Identifier of the task that produced the event.
    pub task_id: usize,
    /// Task type for event categorization and logging.
    pub task_type: &'static str,
    /// Optional unique identifier for the event.
    pub id: Option<String>,
    /// Event creation timestamp in microseconds since Unix epoch.
    pub timestamp: i64,
}

/// Event data payload.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum EventData {
    /// JSON format for flexible structured data.
    Json(serde_json::Value),
}

impl From<&EventData> for Value {
    fn from(event_data: &EventData) -> Self {
        match event_data {
            EventData::Json(data) => data.clone(),
        }
    }
}

impl Serialize for EventData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let json_value = Value::from(self);
        json_value.serialize(serializer)
    }
}

/// Builder for constructing Event instances with validation.
#[derive(Default, Debug)]
pub struct EventBuilder {
    /// Event data payload (required for build).
    pub data: Option<EventData>,
    /// Event subject for routing (required for build).
    pub subject: Option<String>,
    /// Identifier of the task producing the event.
    pub task_id: usize,
    /// Task type for event categorization and logging.
    pub task_type: Option<&'static str>,
    /// Optional unique event identifier.
    pub id: Option<String>,
    /// Event timestamp, defaults to current time.
    pub timestamp: i64,
}

impl EventBuilder {
    pub fn new() -> Self {
        EventBuilder {
            timestamp: Utc::now().timestamp_micros(),
            ..Default::default()
        }
    }
    pub fn data(mut self, data: EventData) -> Self {
        self.data = Some(data);
        self
    }
    pub fn subject(mut self, subject: String) -> Self {
        self.subject = Some(subject);
        self
    }
    pub fn task_id(mut self, task_id: usize) -> Self {
        self.task_id = task_id;
        self
    }
    pub fn task_type(mut self, task_type: &'static str) -> Self {
        self.task_type = Some(task_type);
        self
    }
    pub fn id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }
    pub fn time(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn build(self) -> Result<Event, Error> {
        Ok(Event {
            data: self
                .data
                .ok_or_else(|| Error::MissingRequiredAttribute("data".to_string()))?,
            subject: self
                .subject
                .ok_or_else(|| Error::MissingRequiredAttribute("subject".to_string()))?,
            task_id: self.task_id,
            task_type: self.task_type.unwrap_or_default(),
            id: self.id,
            timestamp: self.timestamp,
        })
    }
}
