//! The seam between the session and an MQTT client.

use super::error::TransportError;
use super::message_manager::FeedbackMessage;

/// What the receive task reports to the surface's loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Broker handshake finished with this return code; 0 is success.
    ConnAck(u8),
    Message(FeedbackMessage),
    /// The connection dropped or could not be opened.
    Lost(String),
    /// The receive loop ended after a requested shutdown.
    Closed,
}

/// Outbound half of a broker connection.
///
/// Calls must return promptly; anything that would block is buffered by the
/// implementation or reported as an error.
pub trait Transport {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), TransportError>;

    fn subscribe(&self, pattern: &str) -> Result<(), TransportError>;

    /// Stops the receive loop and closes the connection. Called at most once.
    fn disconnect(&mut self) -> Result<(), TransportError>;
}
