use chrono::NaiveDateTime;
use std::fmt;

/// An inbound message as handed from the receive task to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub topic: String,
    pub payload: String,
    pub received_at: NaiveDateTime,
}

impl fmt::Display for FeedbackMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} → {}", self.topic, self.payload)
    }
}

impl FeedbackMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        FeedbackMessage {
            topic: topic.into(),
            payload: payload.into(),
            received_at: chrono::Local::now().naive_local(),
        }
    }

    /// Builds a message from raw bytes, replacing invalid UTF-8.
    pub fn from_bytes(topic: impl Into<String>, payload: &[u8]) -> Self {
        Self::new(topic, String::from_utf8_lossy(payload).into_owned())
    }

    pub fn render(&self) -> String {
        format!(
            "{}  [{}] {}",
            self.received_at.format("%H:%M:%S"),
            self.topic,
            self.payload
        )
    }
}
