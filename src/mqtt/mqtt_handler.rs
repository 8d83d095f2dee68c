use std::fmt;
use std::time::Duration;

use rumqttc::{
    AsyncClient, ConnectReturnCode, ConnectionError, Event, EventLoop, MqttOptions, Outgoing,
    Packet, QoS,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::MqttConfig;
use super::error::TransportError;
use super::message_manager::FeedbackMessage;
use super::transport::{Transport, TransportEvent};

/// Pause between polls after a connection error, before rumqttc retries.
const RECONNECT_PAUSE: Duration = Duration::from_secs(1);

/// How long a requested disconnect may take before the receive loop is
/// cancelled outright.
const DISCONNECT_GRACE: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    Failed(u8),
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Failed(code) => write!(f, "failed ({code})"),
        }
    }
}

/// rumqttc-backed transport.
///
/// Owns the client half of the connection; the event loop half runs in a
/// spawned task that only talks to the outside through the event channel.
pub struct MqttHandler {
    client: AsyncClient,
    shutdown: CancellationToken,
    disconnecting: bool,
}

impl MqttHandler {
    /// Starts connecting to the configured broker without waiting for it.
    ///
    /// Must be called from within a tokio runtime. Returns the handler and
    /// the receiving end of the hand-off queue.
    pub fn connect(
        config: &MqttConfig,
        client_prefix: &str,
    ) -> (Self, mpsc::Receiver<TransportEvent>) {
        let client_id = config.client_id(client_prefix);
        let mut mqtt_options =
            MqttOptions::new(client_id.clone(), config.host.clone(), config.port);
        mqtt_options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        let (client, eventloop) = AsyncClient::new(mqtt_options, config.request_capacity.max(1));
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));
        let shutdown = CancellationToken::new();

        info!(
            "Connecting to MQTT broker {} as {}",
            config.address(),
            client_id
        );
        tokio::spawn(receive_loop(eventloop, event_tx, shutdown.clone()));

        (
            MqttHandler {
                client,
                shutdown,
                disconnecting: false,
            },
            event_rx,
        )
    }
}

impl Transport for MqttHandler {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), TransportError> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())
            .map_err(|e| TransportError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }

    fn subscribe(&self, pattern: &str) -> Result<(), TransportError> {
        self.client
            .try_subscribe(pattern, QoS::AtMostOnce)
            .map_err(|e| TransportError::Subscribe {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Queues a DISCONNECT for the receive loop to send. The loop stops once
    /// the packet is written, or after [`DISCONNECT_GRACE`] if it never is.
    fn disconnect(&mut self) -> Result<(), TransportError> {
        let result = self
            .client
            .try_disconnect()
            .map_err(|e| TransportError::Disconnect(e.to_string()));

        match (&result, tokio::runtime::Handle::try_current()) {
            (Ok(()), Ok(runtime)) => {
                self.disconnecting = true;
                let shutdown = self.shutdown.clone();
                runtime.spawn(async move {
                    tokio::time::sleep(DISCONNECT_GRACE).await;
                    if !shutdown.is_cancelled() {
                        debug!("Disconnect not sent in time, cancelling receive loop");
                        shutdown.cancel();
                    }
                });
            }
            _ => self.shutdown.cancel(),
        }
        result
    }
}

impl Drop for MqttHandler {
    fn drop(&mut self) {
        if !self.disconnecting {
            self.shutdown.cancel();
        }
    }
}

/// What the receive loop does with one poll result.
#[derive(Debug, PartialEq, Eq)]
enum LoopStep {
    Report(TransportEvent),
    /// Report, then wait before polling again so rumqttc does not spin on
    /// a dead connection.
    ReportAndPause(TransportEvent),
    Continue,
    /// Our DISCONNECT has been written; the session is over.
    Finish,
}

fn loop_step(polled: Result<Event, ConnectionError>) -> LoopStep {
    match polled {
        Ok(Event::Incoming(Packet::ConnAck(ack))) => {
            LoopStep::Report(TransportEvent::ConnAck(return_code(ack.code)))
        }
        Ok(Event::Incoming(Packet::Publish(publish))) => LoopStep::Report(
            TransportEvent::Message(FeedbackMessage::from_bytes(publish.topic, &publish.payload)),
        ),
        Ok(Event::Incoming(Packet::Disconnect)) => LoopStep::Report(TransportEvent::Lost(
            "broker closed the session".to_string(),
        )),
        Ok(Event::Outgoing(Outgoing::Disconnect)) => LoopStep::Finish,
        Ok(_) => LoopStep::Continue,
        Err(ConnectionError::ConnectionRefused(code)) => {
            LoopStep::ReportAndPause(TransportEvent::ConnAck(return_code(code)))
        }
        Err(e) => LoopStep::ReportAndPause(TransportEvent::Lost(e.to_string())),
    }
}

async fn receive_loop(
    mut eventloop: EventLoop,
    events: mpsc::Sender<TransportEvent>,
    shutdown: CancellationToken,
) {
    loop {
        let polled = tokio::select! {
            _ = shutdown.cancelled() => break,
            polled = eventloop.poll() => polled,
        };

        let (event, pause) = match loop_step(polled) {
            LoopStep::Report(event) => (Some(event), false),
            LoopStep::ReportAndPause(event) => (Some(event), true),
            LoopStep::Continue => (None, false),
            LoopStep::Finish => {
                debug!("DISCONNECT sent to broker");
                break;
            }
        };

        if let Some(event) = event {
            if events.send(event).await.is_err() {
                debug!("Event receiver dropped, stopping MQTT receive loop");
                return;
            }
        }

        if pause {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(RECONNECT_PAUSE) => {}
            }
        }
    }

    info!("MQTT receive loop stopped");
    if events.try_send(TransportEvent::Closed).is_err() {
        warn!("Could not report closed MQTT connection");
    }
}

fn return_code(code: ConnectReturnCode) -> u8 {
    match code {
        ConnectReturnCode::Success => 0,
        ConnectReturnCode::RefusedProtocolVersion => 1,
        ConnectReturnCode::BadClientId => 2,
        ConnectReturnCode::ServiceUnavailable => 3,
        ConnectReturnCode::BadUserNamePassword => 4,
        ConnectReturnCode::NotAuthorized => 5,
    }
}
