//! Operator tools for the MQTT-controlled tank: an egui control panel and a
//! scripted test client sharing one command/feedback bridge.

pub mod bridge;
pub mod config;
pub mod console;
pub mod mqtt;
pub mod ui;

use color_eyre::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs color-eyre and the tracing subscriber.
///
/// `RUST_LOG` may name a level (`debug`, `info`, ...); `default_level`
/// applies otherwise. Logs go to stderr so they never mix with the test
/// client's menu on stdout.
pub fn setup(default_level: Level) -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;

    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<Level>().ok())
        .unwrap_or(default_level);

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .pretty()
        .init();
    Ok(())
}
