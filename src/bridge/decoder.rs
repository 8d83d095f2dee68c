//! Feedback message to display update mapping.

use super::display::DisplayUpdate;

/// Turns a feedback message into a display update.
///
/// Only topics mentioning "speed" (any case) with an integer payload are
/// acted upon. Everything else, including unparsable speed payloads, is
/// ignored without an error.
pub fn decode(topic: &str, payload: &str) -> Option<DisplayUpdate> {
    if !topic.to_lowercase().contains("speed") {
        return None;
    }
    payload.trim().parse::<i32>().ok().map(DisplayUpdate::ActualSpeed)
}
