#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tankcontrol::mqtt::error::TransportError;
use tankcontrol::mqtt::transport::Transport;

/// What a [`FakeTransport`] was asked to do.
#[derive(Debug, Default)]
pub struct Recorded {
    pub published: Vec<(String, String)>,
    pub subscriptions: Vec<String>,
    pub disconnects: usize,
}

/// In-memory transport; clones share one record so tests can inspect it
/// after handing the transport to a session.
#[derive(Clone, Default)]
pub struct FakeTransport {
    pub record: Arc<Mutex<Recorded>>,
}

impl FakeTransport {
    pub fn published(&self) -> Vec<(String, String)> {
        self.record.lock().expect("record lock").published.clone()
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.record.lock().expect("record lock").subscriptions.clone()
    }

    pub fn disconnects(&self) -> usize {
        self.record.lock().expect("record lock").disconnects
    }
}

impl Transport for FakeTransport {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), TransportError> {
        self.record
            .lock()
            .expect("record lock")
            .published
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }

    fn subscribe(&self, pattern: &str) -> Result<(), TransportError> {
        self.record
            .lock()
            .expect("record lock")
            .subscriptions
            .push(pattern.to_string());
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        self.record.lock().expect("record lock").disconnects += 1;
        Ok(())
    }
}

pub fn pair(topic: &str, payload: &str) -> (String, String) {
    (topic.to_string(), payload.to_string())
}
