//! Display updates and the sink that receives them.

use std::collections::VecDeque;

use crate::mqtt::message_manager::FeedbackMessage;

/// A single change to what the operator sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    /// Speed readout, either the slider level or tank feedback.
    ActualSpeed(i32),
    /// Signed per-track readouts.
    WheelSpeeds { left: i32, right: i32 },
    /// Last move direction sent.
    MoveStatus(String),
    /// Connection status line.
    Status(String),
}

/// Surface the session reports to.
///
/// Implementations are only ever called from the surface's own loop; the
/// transport's receive task never reaches them.
pub trait DisplaySink {
    fn apply(&mut self, update: DisplayUpdate);

    /// Called for every inbound message before decoding.
    fn feedback_received(&mut self, _message: &FeedbackMessage) {}
}

/// Values shown on the tank panel.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub actual_speed: i32,
    pub left_speed: i32,
    pub right_speed: i32,
    pub status_text: String,
    pub move_status_text: String,
    feedback_log: VecDeque<FeedbackMessage>,
    feedback_log_len: usize,
}

impl DisplayState {
    pub fn new(status_text: impl Into<String>, feedback_log_len: usize) -> Self {
        Self {
            actual_speed: 0,
            left_speed: 0,
            right_speed: 0,
            status_text: status_text.into(),
            move_status_text: String::new(),
            feedback_log: VecDeque::with_capacity(feedback_log_len),
            feedback_log_len,
        }
    }

    /// Most recent feedback, oldest first.
    pub fn feedback_log(&self) -> impl Iterator<Item = &FeedbackMessage> {
        self.feedback_log.iter()
    }
}

impl DisplaySink for DisplayState {
    fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::ActualSpeed(speed) => self.actual_speed = speed,
            DisplayUpdate::WheelSpeeds { left, right } => {
                self.left_speed = left;
                self.right_speed = right;
            }
            DisplayUpdate::MoveStatus(text) => self.move_status_text = text,
            DisplayUpdate::Status(text) => self.status_text = text,
        }
    }

    fn feedback_received(&mut self, message: &FeedbackMessage) {
        if self.feedback_log_len == 0 {
            return;
        }
        while self.feedback_log.len() >= self.feedback_log_len {
            self.feedback_log.pop_front();
        }
        self.feedback_log.push_back(message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_land_in_their_fields() {
        let mut state = DisplayState::new("Connecting", 4);
        state.apply(DisplayUpdate::ActualSpeed(12));
        state.apply(DisplayUpdate::WheelSpeeds { left: 5, right: -5 });
        state.apply(DisplayUpdate::MoveStatus("LEFT".into()));
        state.apply(DisplayUpdate::Status("up".into()));

        assert_eq!(state.actual_speed, 12);
        assert_eq!((state.left_speed, state.right_speed), (5, -5));
        assert_eq!(state.move_status_text, "LEFT");
        assert_eq!(state.status_text, "up");
    }

    #[test]
    fn feedback_log_keeps_the_newest_entries() {
        let mut state = DisplayState::new("", 2);
        for i in 0..5 {
            state.feedback_received(&FeedbackMessage::new(
                "Tanks/Tank_1/feedback/speed",
                i.to_string(),
            ));
        }
        let payloads: Vec<_> = state.feedback_log().map(|m| m.payload.as_str()).collect();
        assert_eq!(payloads, ["3", "4"]);
    }

    #[test]
    fn zero_length_log_records_nothing() {
        let mut state = DisplayState::new("", 0);
        state.feedback_received(&FeedbackMessage::new("t", "p"));
        assert_eq!(state.feedback_log().count(), 0);
    }
}
