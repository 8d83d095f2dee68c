use serde::{Deserialize, Serialize};

pub const DEFAULT_BROKER_HOST: &str = "192.168.4.1";
pub const DEFAULT_BROKER_PORT: u16 = 1883;

/// Broker connection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    /// Empty means "derive one from the process id".
    pub client_id: String,
    pub keep_alive_secs: u64,
    /// Capacity of the client's outgoing request buffer.
    pub request_capacity: usize,
    /// Capacity of the receive task to surface hand-off queue.
    pub event_capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BROKER_HOST.to_string(),
            port: DEFAULT_BROKER_PORT,
            client_id: String::new(),
            keep_alive_secs: 60,
            request_capacity: 64,
            event_capacity: 128,
        }
    }
}

impl MqttConfig {
    pub fn client_id(&self, prefix: &str) -> String {
        if self.client_id.is_empty() {
            format!("{}-{}", prefix, std::process::id())
        } else {
            self.client_id.clone()
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
