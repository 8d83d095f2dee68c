//! Intent to command message mapping.

use std::fmt;

use super::intent::{Direction, Intent};
use super::topics::{command_topic, CommandKind};

/// A command ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMessage {
    pub kind: CommandKind,
    pub topic: String,
    pub payload: String,
}

impl fmt::Display for CommandMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.payload)
    }
}

/// Encodes `intent` for `robot`, using `wire_speed` for move commands.
///
/// `Stop` always carries speed 0. Mode and light values are forwarded
/// uppercased without checking them against any vocabulary. `SetSpeed`
/// produces no command; the speed travels with the next move.
pub fn encode(intent: &Intent, robot: &str, wire_speed: u8) -> Option<CommandMessage> {
    let (kind, payload) = match intent {
        Intent::SetSpeed(_) => return None,
        Intent::SetMode(mode) => (CommandKind::Mode, mode.to_uppercase()),
        Intent::SetLights(state) => (CommandKind::Lights, state.to_uppercase()),
        Intent::Stop => (CommandKind::Move, move_payload(Direction::Stop, 0)),
        Intent::MoveLeft | Intent::MoveRight | Intent::MoveForward | Intent::MoveBackward => {
            let direction = intent.direction()?;
            (CommandKind::Move, move_payload(direction, wire_speed))
        }
    };

    Some(CommandMessage {
        kind,
        topic: command_topic(robot, kind),
        payload,
    })
}

fn move_payload(direction: Direction, wire_speed: u8) -> String {
    format!("{} {}", direction.as_wire(), wire_speed)
}
