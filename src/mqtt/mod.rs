//! # MQTT Transport
//!
//! Broker connectivity for the tank tools. The session in [`crate::bridge`]
//! only sees the [`transport::Transport`] trait and a stream of
//! [`transport::TransportEvent`]s; everything rumqttc-specific lives here.
//!
//! ```text
//! mqtt/
//! ├── config.rs           - Broker address, client id and buffer sizes
//! ├── error.rs            - TransportError and SessionFault
//! ├── message_manager.rs  - Inbound feedback message representation
//! ├── mqtt_handler.rs     - rumqttc client, receive task, ConnectionState
//! └── transport.rs        - Transport trait and hand-off events
//! ```
//!
//! ## Threading
//!
//! The rumqttc event loop is polled by a tokio task spawned in
//! [`mqtt_handler::MqttHandler::connect`]. That task never touches session
//! or display state. It posts [`transport::TransportEvent`]s into a bounded
//! channel which the UI frame loop (or the test client's select loop)
//! drains on its own context.

pub mod config;
pub mod error;
pub mod message_manager;
pub mod mqtt_handler;
pub mod transport;
