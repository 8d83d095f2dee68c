//! Text menu surface for the scripted test client.
//!
//! Reads one choice per line and turns it into an intent. While waiting for
//! input the loop keeps draining transport events, so feedback shows up
//! between prompts without a second thread touching the console.

use std::io::Write;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::bridge::{DisplaySink, DisplayUpdate, Intent, Session};
use crate::mqtt::message_manager::FeedbackMessage;
use crate::mqtt::transport::{Transport, TransportEvent};

/// Pause between handling a choice and printing the next prompt.
pub const LOOP_PAUSE: Duration = Duration::from_millis(200);

pub const MENU_TEXT: &str = "\nCommands:
1 - Move FORWARD
2 - Move BACKWARD
3 - Turn LEFT
4 - Turn RIGHT
5 - STOP
6 - Toggle LIGHTS ON/OFF
7 - Change MODE (MANUAL/AUTONOMOUS)
q - Quit";

const STRAIGHT_SPEED: u8 = 100;
const TURN_SPEED: u8 = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    /// Publish `intent` with moves at a fixed wire speed.
    Send { intent: Intent, wire_speed: u8 },
    PromptLights,
    PromptMode,
    Quit,
    Invalid,
}

pub fn parse_choice(input: &str) -> MenuChoice {
    let send = |intent, wire_speed| MenuChoice::Send { intent, wire_speed };
    match input.trim().to_lowercase().as_str() {
        "1" => send(Intent::MoveForward, STRAIGHT_SPEED),
        "2" => send(Intent::MoveBackward, STRAIGHT_SPEED),
        "3" => send(Intent::MoveLeft, TURN_SPEED),
        "4" => send(Intent::MoveRight, TURN_SPEED),
        "5" => send(Intent::Stop, 0),
        "6" => MenuChoice::PromptLights,
        "7" => MenuChoice::PromptMode,
        "q" => MenuChoice::Quit,
        _ => MenuChoice::Invalid,
    }
}

/// Console output for the test client.
pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            warn!("Console write failed: {}", e);
        }
    }

    fn prompt(&mut self, text: &str) {
        let result = write!(self.out, "{text}").and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Console write failed: {}", e);
        }
    }
}

impl<W: Write> DisplaySink for Console<W> {
    fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::Status(text) => self.say(&format!(" {text}")),
            DisplayUpdate::ActualSpeed(_)
            | DisplayUpdate::WheelSpeeds { .. }
            | DisplayUpdate::MoveStatus(_) => {}
        }
    }

    fn feedback_received(&mut self, message: &FeedbackMessage) {
        self.say(&format!(" Received [{}] → {}", message.topic, message.payload));
    }
}

/// Reads stdin on a dedicated thread, one line per message.
///
/// The thread is detached so a blocked read never holds up shutdown; the
/// channel closes at end of input.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if line_tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Reading stdin failed: {}", e);
                    break;
                }
            }
        }
        debug!("Stdin reader finished");
    });
    line_rx
}

/// Runs the menu until `q` or end of input.
///
/// Does not stop the session; the caller owns shutdown.
pub async fn run<T, W>(
    session: &mut Session<T>,
    events: &mut mpsc::Receiver<TransportEvent>,
    input: &mut mpsc::Receiver<String>,
    console: &mut Console<W>,
    pause: Duration,
) where
    T: Transport,
    W: Write,
{
    loop {
        console.say(MENU_TEXT);
        console.prompt("Select: ");
        let Some(line) = next_line(input, session, events, console).await else {
            break;
        };

        match parse_choice(&line) {
            MenuChoice::Send { intent, wire_speed } => {
                send(session, intent, Some(wire_speed), console);
            }
            MenuChoice::PromptLights => {
                console.prompt("Enter ON/OFF: ");
                let Some(state) = next_line(input, session, events, console).await else {
                    break;
                };
                send(session, Intent::SetLights(state), None, console);
            }
            MenuChoice::PromptMode => {
                console.prompt("Enter MANUAL or AUTONOMOUS: ");
                let Some(mode) = next_line(input, session, events, console).await else {
                    break;
                };
                send(session, Intent::SetMode(mode), None, console);
            }
            MenuChoice::Quit => break,
            MenuChoice::Invalid => console.say("Invalid option"),
        }

        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
}

fn send<T: Transport, W: Write>(
    session: &mut Session<T>,
    intent: Intent,
    wire_speed: Option<u8>,
    console: &mut Console<W>,
) {
    let command = match wire_speed {
        Some(speed) => session.raise_at(intent, speed, console),
        None => session.raise(intent, console),
    };
    if let Some(command) = command {
        console.say(&format!(" Sent {} command: {}", command.kind, command.payload));
    }
}

/// Waits for the next input line, applying transport events meanwhile.
async fn next_line<T, W>(
    input: &mut mpsc::Receiver<String>,
    session: &mut Session<T>,
    events: &mut mpsc::Receiver<TransportEvent>,
    console: &mut Console<W>,
) -> Option<String>
where
    T: Transport,
    W: Write,
{
    loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => session.handle_event(event, console),
            line = input.recv() => return line,
        }
    }
}
