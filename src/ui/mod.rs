//! # Tank Control Panel
//!
//! egui front end for the interactive variant. Implements the presentation
//! surface: it owns the [`DisplayState`], turns widget presses into
//! [`crate::bridge::Intent`]s and drains the transport's hand-off queue once
//! per frame, so every display mutation happens on the UI thread.
//!
//! ## Layout
//! - **Top Panel**: connection indicator and status line
//! - **Central Panel**: drive pad, speed slider, readouts, lights and mode
//! - **Bottom Panel**: recent feedback messages

pub mod common;
pub mod control_panel;

use eframe::egui;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::bridge::{DisplayState, Session};
use crate::mqtt::mqtt_handler::MqttHandler;
use crate::mqtt::transport::TransportEvent;

/// Frame interval; also bounds how long feedback waits in the queue.
const REPAINT_INTERVAL: Duration = Duration::from_millis(33);

pub struct TankUI {
    session: Session<MqttHandler>,
    transport_events: mpsc::Receiver<TransportEvent>,
    display: DisplayState,
    slider_level: u8,
}

impl TankUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        session: Session<MqttHandler>,
        transport_events: mpsc::Receiver<TransportEvent>,
        display: DisplayState,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        info!("Tank panel ready for {}", session.robot_name());
        TankUI {
            slider_level: session.speed().displayed(),
            session,
            transport_events,
            display,
        }
    }

    /// Applies everything the receive task queued since the last frame.
    fn drain_transport_events(&mut self) {
        while let Ok(event) = self.transport_events.try_recv() {
            self.session.handle_event(event, &mut self.display);
        }
    }
}

impl eframe::App for TankUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_transport_events();
        ctx.request_repaint_after(REPAINT_INTERVAL);

        egui::TopBottomPanel::top("status_panel").show(ctx, |ui| {
            control_panel::status_bar(ui, self.session.state(), &self.display);
        });

        egui::TopBottomPanel::bottom("feedback_panel").show(ctx, |ui| {
            control_panel::feedback_log(ui, &self.display);
        });

        let intents = egui::CentralPanel::default()
            .show(ctx, |ui| {
                control_panel::render(ui, &self.display, &mut self.slider_level)
            })
            .inner;

        for intent in intents {
            debug!("Operator intent {:?}", intent);
            self.session.raise(intent, &mut self.display);
        }
    }
}

impl Drop for TankUI {
    fn drop(&mut self) {
        self.session.stop();
    }
}
