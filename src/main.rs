use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tracing::{info, Level};

use tankcontrol::bridge::{DisplayState, Session, SubscriptionScope};
use tankcontrol::config::TankConfig;
use tankcontrol::mqtt::mqtt_handler::MqttHandler;
use tankcontrol::ui::TankUI;

#[tokio::main]
async fn main() -> Result<()> {
    tankcontrol::setup(Level::INFO)?;

    let config = TankConfig::load();
    info!(
        "Starting tank panel for {} via {}",
        config.robot_name,
        config.mqtt.address()
    );

    let (mqtt_handler, transport_events) = MqttHandler::connect(&config.mqtt, "tankcontrol");
    let session = Session::new(
        mqtt_handler,
        config.robot_name.clone(),
        config.mqtt.host.clone(),
        SubscriptionScope::Feedback,
    );
    let display = DisplayState::new(
        format!("Connecting to {}...", config.mqtt.address()),
        config.ui.feedback_log_len,
    );

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title(format!("Tank Control - {}", config.robot_name))
        .with_fullscreen(config.ui.fullscreen);

    eframe::run_native(
        "Tank Control",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(TankUI::new(
                cc,
                session,
                transport_events,
                display,
            )))
        }),
    )
    .map_err(|e| eyre!("Tank panel failed: {}", e))?;

    info!("Tank panel closed");
    Ok(())
}
