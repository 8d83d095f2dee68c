use std::time::Duration;

use color_eyre::Result;
use tracing::{debug, info, Level};

use tankcontrol::bridge::{Session, SubscriptionScope};
use tankcontrol::config::TankConfig;
use tankcontrol::console::{self, Console, LOOP_PAUSE};
use tankcontrol::mqtt::mqtt_handler::MqttHandler;
use tankcontrol::mqtt::transport::TransportEvent;

/// Upper bound on waiting for the receive loop after disconnecting.
const SHUTDOWN_WAIT: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    tankcontrol::setup(Level::WARN)?;

    let config = TankConfig::load();
    println!("Connecting to MQTT broker {}...", config.mqtt.address());
    let (mqtt_handler, mut transport_events) =
        MqttHandler::connect(&config.mqtt, "tank-test-client");
    let mut session = Session::new(
        mqtt_handler,
        config.robot_name.clone(),
        config.mqtt.host.clone(),
        SubscriptionScope::All,
    );

    let mut console = Console::new(std::io::stdout());
    let mut input = console::spawn_stdin_reader();

    tokio::select! {
        _ = console::run(&mut session, &mut transport_events, &mut input, &mut console, LOOP_PAUSE) => {}
        _ = tokio::signal::ctrl_c() => println!("\n Exiting..."),
    }

    session.stop();
    let closed = tokio::time::timeout(SHUTDOWN_WAIT, async {
        while let Some(event) = transport_events.recv().await {
            if event == TransportEvent::Closed {
                break;
            }
        }
    })
    .await;
    if closed.is_err() {
        debug!("Receive loop still running at exit");
    }
    info!("Test client finished");
    Ok(())
}
