//! The command/feedback session.
//!
//! Owns the transport, encodes outbound intents, decodes inbound feedback
//! and tracks the connection state. All methods run on the presentation
//! loop; transport events reach the session only through
//! [`Session::handle_event`].

use tracing::{debug, info, warn};

use super::decoder::decode;
use super::display::{DisplaySink, DisplayUpdate};
use super::encoder::{encode, CommandMessage};
use super::intent::{Intent, SpeedSetting};
use super::topics::{subscription_pattern, SubscriptionScope};
use crate::mqtt::error::{SessionFault, TRANSPORT_LOST_CODE};
use crate::mqtt::mqtt_handler::ConnectionState;
use crate::mqtt::transport::{Transport, TransportEvent};

pub struct Session<T: Transport> {
    transport: T,
    robot_name: String,
    broker_host: String,
    subscription: String,
    state: ConnectionState,
    speed: SpeedSetting,
    stopped: bool,
}

impl<T: Transport> Session<T> {
    /// Wraps a transport whose connection attempt is already under way.
    pub fn new(
        transport: T,
        robot_name: impl Into<String>,
        broker_host: impl Into<String>,
        scope: SubscriptionScope,
    ) -> Self {
        let robot_name = robot_name.into();
        let subscription = subscription_pattern(&robot_name, scope);
        Session {
            transport,
            robot_name,
            broker_host: broker_host.into(),
            subscription,
            state: ConnectionState::Disconnected,
            speed: SpeedSetting::default(),
            stopped: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn speed(&self) -> SpeedSetting {
        self.speed
    }

    pub fn robot_name(&self) -> &str {
        &self.robot_name
    }

    pub fn subscription(&self) -> &str {
        &self.subscription
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Status line for the current connection state.
    pub fn status_text(&self) -> String {
        match self.state {
            ConnectionState::Connected => format!("✓ MQTT connected IP: {}", self.broker_host),
            ConnectionState::Failed(TRANSPORT_LOST_CODE) => {
                format!("✗ MQTT connection to {} lost", self.broker_host)
            }
            ConnectionState::Failed(code) => format!("✗ MQTT connection failed (code {code})"),
            ConnectionState::Disconnected => "MQTT disconnected".to_string(),
        }
    }

    /// Handles an operator intent using the slider's wire speed.
    pub fn raise(&mut self, intent: Intent, sink: &mut impl DisplaySink) -> Option<CommandMessage> {
        let wire_speed = self.speed.wire();
        self.raise_at(intent, wire_speed, sink)
    }

    /// Handles an operator intent, sending moves at `wire_speed`.
    ///
    /// `SetSpeed` only updates the speed setting and the speed readout.
    /// Every other intent is published whatever the connection state; a
    /// publish failure is logged and otherwise ignored.
    pub fn raise_at(
        &mut self,
        intent: Intent,
        wire_speed: u8,
        sink: &mut impl DisplaySink,
    ) -> Option<CommandMessage> {
        if let Intent::SetSpeed(level) = intent {
            self.speed = SpeedSetting::from_displayed(level);
            debug!(
                "Speed set to {} (wire {})",
                self.speed.displayed(),
                self.speed.wire()
            );
            sink.apply(DisplayUpdate::ActualSpeed(i32::from(self.speed.displayed())));
            return None;
        }

        let command = encode(&intent, &self.robot_name, wire_speed)?;

        if let Some(direction) = intent.direction() {
            let (left, right) = direction.wheel_speeds(self.speed.displayed());
            sink.apply(DisplayUpdate::MoveStatus(direction.to_string()));
            sink.apply(DisplayUpdate::WheelSpeeds { left, right });
        }

        if self.state != ConnectionState::Connected {
            debug!("Publishing while {}", self.state);
        }
        match self.transport.publish(&command.topic, &command.payload) {
            Ok(()) => info!("{}", command),
            Err(e) => warn!("{}", e),
        }
        Some(command)
    }

    /// Applies one event from the transport's receive task.
    pub fn handle_event(&mut self, event: TransportEvent, sink: &mut impl DisplaySink) {
        if self.stopped {
            debug!("Session stopped, ignoring {:?}", event);
            return;
        }

        match event {
            TransportEvent::ConnAck(0) => {
                self.transition(ConnectionState::Connected, sink);
                match self.transport.subscribe(&self.subscription) {
                    Ok(()) => info!("Subscribed to {}", self.subscription),
                    Err(e) => warn!("{}", e),
                }
            }
            TransportEvent::ConnAck(code) => {
                warn!("{}", SessionFault::ConnectFailure(code));
                self.transition(ConnectionState::Failed(code), sink);
            }
            TransportEvent::Lost(reason) => {
                let fault = SessionFault::TransportLost(reason);
                if self.state == ConnectionState::Failed(fault.code()) {
                    debug!("{}", fault);
                } else {
                    warn!("{}", fault);
                }
                self.transition(ConnectionState::Failed(fault.code()), sink);
            }
            TransportEvent::Closed => {
                self.transition(ConnectionState::Disconnected, sink);
            }
            TransportEvent::Message(message) => {
                if self.state != ConnectionState::Connected {
                    debug!("Dropping {} while {}", message, self.state);
                    return;
                }
                debug!("{}", message);
                sink.feedback_received(&message);
                match decode(&message.topic, &message.payload) {
                    Some(update) => sink.apply(update),
                    None => debug!("No display update for {}", message.topic),
                }
            }
        }
    }

    /// Stops the receive loop and disconnects. Safe to call repeatedly and
    /// before the broker ever answered.
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            if let Err(e) = self.transport.disconnect() {
                warn!("{}", e);
            }
            info!("Session for {} stopped", self.robot_name);
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Moves to `next`, notifying the sink only when the state changes.
    fn transition(&mut self, next: ConnectionState, sink: &mut impl DisplaySink) {
        if self.state == next {
            return;
        }
        info!("MQTT connection {} -> {}", self.state, next);
        self.state = next;
        sink.apply(DisplayUpdate::Status(self.status_text()));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::mqtt::error::TransportError;
    use crate::mqtt::message_manager::FeedbackMessage;

    #[derive(Default)]
    struct FakeTransport {
        published: RefCell<Vec<(String, String)>>,
        subscriptions: RefCell<Vec<String>>,
        disconnects: usize,
        fail_publish: bool,
    }

    impl Transport for FakeTransport {
        fn publish(&self, topic: &str, payload: &str) -> Result<(), TransportError> {
            if self.fail_publish {
                return Err(TransportError::Publish {
                    topic: topic.to_string(),
                    reason: "buffer full".to_string(),
                });
            }
            self.published
                .borrow_mut()
                .push((topic.to_string(), payload.to_string()));
            Ok(())
        }

        fn subscribe(&self, pattern: &str) -> Result<(), TransportError> {
            self.subscriptions.borrow_mut().push(pattern.to_string());
            Ok(())
        }

        fn disconnect(&mut self) -> Result<(), TransportError> {
            self.disconnects += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        updates: Vec<DisplayUpdate>,
        feedback: Vec<FeedbackMessage>,
    }

    impl DisplaySink for RecordingSink {
        fn apply(&mut self, update: DisplayUpdate) {
            self.updates.push(update);
        }

        fn feedback_received(&mut self, message: &FeedbackMessage) {
            self.feedback.push(message.clone());
        }
    }

    fn session() -> Session<FakeTransport> {
        Session::new(
            FakeTransport::default(),
            "Tank_1",
            "192.168.4.1",
            SubscriptionScope::Feedback,
        )
    }

    #[test]
    fn starts_disconnected_with_feedback_subscription() {
        let session = session();
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert_eq!(session.subscription(), "Tanks/Tank_1/feedback/#");
        assert_eq!(session.speed(), SpeedSetting::default());
    }

    #[test]
    fn set_speed_then_forward_publishes_rescaled_speed() {
        let mut session = session();
        let mut sink = RecordingSink::default();

        assert_eq!(session.raise(Intent::SetSpeed(50), &mut sink), None);
        assert!(session.transport().published.borrow().is_empty());
        assert_eq!(sink.updates, [DisplayUpdate::ActualSpeed(50)]);

        session.raise(Intent::MoveForward, &mut sink);
        assert_eq!(
            *session.transport().published.borrow(),
            [("Tanks/Tank_1/cmd/move".to_string(), "FORWARD 129".to_string())]
        );
        assert!(sink
            .updates
            .contains(&DisplayUpdate::WheelSpeeds { left: 50, right: 50 }));
        assert!(sink
            .updates
            .contains(&DisplayUpdate::MoveStatus("FORWARD".to_string())));
    }

    #[test]
    fn lights_are_published_uppercased() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.raise(Intent::SetLights("on".into()), &mut sink);
        assert_eq!(
            *session.transport().published.borrow(),
            [("Tanks/Tank_1/cmd/lights".to_string(), "ON".to_string())]
        );
        assert!(sink.updates.is_empty());
    }

    #[test]
    fn stop_sends_zero_speed_and_clears_wheels() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.raise(Intent::SetSpeed(99), &mut sink);
        let command = session.raise(Intent::Stop, &mut sink).expect("command");
        assert_eq!(command.payload, "STOP 0");
        assert_eq!(
            sink.updates.last(),
            Some(&DisplayUpdate::WheelSpeeds { left: 0, right: 0 })
        );
    }

    #[test]
    fn raise_at_overrides_slider_speed() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.raise(Intent::SetSpeed(10), &mut sink);
        let command = session
            .raise_at(Intent::MoveLeft, 70, &mut sink)
            .expect("command");
        assert_eq!(command.payload, "LEFT 70");
    }

    #[test]
    fn successful_handshake_connects_and_subscribes_once() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.handle_event(TransportEvent::ConnAck(0), &mut sink);

        assert_eq!(session.state(), ConnectionState::Connected);
        assert_eq!(
            *session.transport().subscriptions.borrow(),
            ["Tanks/Tank_1/feedback/#".to_string()]
        );
        assert_eq!(
            sink.updates,
            [DisplayUpdate::Status(
                "✓ MQTT connected IP: 192.168.4.1".to_string()
            )]
        );
    }

    #[test]
    fn refused_handshake_fails_without_subscribing() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.handle_event(TransportEvent::ConnAck(5), &mut sink);

        assert_eq!(session.state(), ConnectionState::Failed(5));
        assert!(session.transport().subscriptions.borrow().is_empty());
        assert_eq!(
            sink.updates,
            [DisplayUpdate::Status(
                "✗ MQTT connection failed (code 5)".to_string()
            )]
        );
    }

    #[test]
    fn lost_connection_fails_and_reconnect_resubscribes() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.handle_event(TransportEvent::ConnAck(0), &mut sink);
        session.handle_event(TransportEvent::Lost("reset".into()), &mut sink);
        assert_eq!(
            session.state(),
            ConnectionState::Failed(TRANSPORT_LOST_CODE)
        );

        session.handle_event(TransportEvent::ConnAck(0), &mut sink);
        assert_eq!(session.state(), ConnectionState::Connected);
        assert_eq!(session.transport().subscriptions.borrow().len(), 2);
    }

    #[test]
    fn repeated_loss_reports_status_once() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        for _ in 0..3 {
            session.handle_event(TransportEvent::Lost("connection refused".into()), &mut sink);
        }
        assert_eq!(
            sink.updates,
            [DisplayUpdate::Status(
                "✗ MQTT connection to 192.168.4.1 lost".to_string()
            )]
        );
    }

    #[test]
    fn closed_connection_reports_disconnected() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.handle_event(TransportEvent::ConnAck(0), &mut sink);
        sink.updates.clear();

        session.handle_event(TransportEvent::Closed, &mut sink);
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert_eq!(
            sink.updates,
            [DisplayUpdate::Status("MQTT disconnected".to_string())]
        );
    }

    #[test]
    fn speed_feedback_reaches_the_display() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.handle_event(TransportEvent::ConnAck(0), &mut sink);
        sink.updates.clear();

        session.handle_event(
            TransportEvent::Message(FeedbackMessage::new("Tanks/Tank_1/feedback/speed", "42")),
            &mut sink,
        );
        assert_eq!(sink.updates, [DisplayUpdate::ActualSpeed(42)]);
        assert_eq!(sink.feedback.len(), 1);
    }

    #[test]
    fn unrecognised_feedback_is_ignored() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.handle_event(TransportEvent::ConnAck(0), &mut sink);
        sink.updates.clear();

        session.handle_event(
            TransportEvent::Message(FeedbackMessage::new("Tanks/Tank_1/feedback/status", "OK")),
            &mut sink,
        );
        session.handle_event(
            TransportEvent::Message(FeedbackMessage::new("Tanks/Tank_1/feedback/speed", "abc")),
            &mut sink,
        );
        assert!(sink.updates.is_empty());
        assert_eq!(session.state(), ConnectionState::Connected);
    }

    #[test]
    fn publishing_while_disconnected_is_best_effort() {
        let mut session = Session::new(
            FakeTransport {
                fail_publish: true,
                ..FakeTransport::default()
            },
            "Tank_1",
            "192.168.4.1",
            SubscriptionScope::Feedback,
        );
        let mut sink = RecordingSink::default();
        let command = session.raise(Intent::MoveBackward, &mut sink);
        assert!(command.is_some());
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        session.handle_event(TransportEvent::ConnAck(0), &mut sink);

        session.stop();
        session.stop();
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert_eq!(session.transport().disconnects, 1);

        session.handle_event(TransportEvent::ConnAck(0), &mut sink);
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn stop_without_connection_does_not_fail() {
        let mut session = session();
        session.stop();
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }
}
