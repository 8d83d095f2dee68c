//! Transport and session error types.

use thiserror::Error;

/// Code recorded in `ConnectionState::Failed` when an established or
/// pending connection drops without a broker return code.
pub const TRANSPORT_LOST_CODE: u8 = u8::MAX;

/// A request the MQTT client could not accept.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Publish to {topic} failed: {reason}")]
    Publish { topic: String, reason: String },

    #[error("Subscribe to {pattern} failed: {reason}")]
    Subscribe { pattern: String, reason: String },

    #[error("Disconnect failed: {0}")]
    Disconnect(String),
}

/// Connection-level faults. Never fatal; reported through the session's
/// connection state and the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionFault {
    #[error("Broker refused the connection with code {0}")]
    ConnectFailure(u8),

    #[error("Connection to broker lost: {0}")]
    TransportLost(String),
}

impl SessionFault {
    pub fn code(&self) -> u8 {
        match self {
            SessionFault::ConnectFailure(code) => *code,
            SessionFault::TransportLost(_) => TRANSPORT_LOST_CODE,
        }
    }
}
