//! Task execution lifecycle shared by subscribers and processors.

/// Drives a task: `init` prepares the per-event handler, `run` consumes the
/// event stream until the channel closes.
#[async_trait::async_trait]
pub trait Runner {
    type Error;
    type EventHandler;

    /// Prepares the handler invoked for each incoming event.
    async fn init(&self) -> Result<Self::EventHandler, Self::Error>;

    /// Runs the task to completion.
    async fn run(self) -> Result<(), Self::Error>;
}
