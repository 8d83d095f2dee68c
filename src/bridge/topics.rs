//! Topic layout under `Tanks/<robot>/`.

use std::fmt;

const ROOT: &str = "Tanks";

/// Command channels the tank listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Move,
    Mode,
    Lights,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Move => "move",
            CommandKind::Mode => "mode",
            CommandKind::Lights => "lights",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// How much of the robot's topic tree a session listens to.
///
/// The panel only needs feedback; the test client watches everything under
/// the robot, including the commands echoed back by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionScope {
    Feedback,
    All,
}

/// `Tanks/<robot>/cmd/<kind>`
pub fn command_topic(robot: &str, kind: CommandKind) -> String {
    format!("{ROOT}/{robot}/cmd/{}", kind.as_str())
}

pub fn subscription_pattern(robot: &str, scope: SubscriptionScope) -> String {
    match scope {
        SubscriptionScope::Feedback => format!("{ROOT}/{robot}/feedback/#"),
        SubscriptionScope::All => format!("{ROOT}/{robot}/#"),
    }
}
