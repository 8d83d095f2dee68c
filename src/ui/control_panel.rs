//! Drive controls and readouts.
//!
//! Widgets only report what the operator did; every press becomes an
//! [`Intent`] returned to the caller, which hands it to the session.

use eframe::egui::{self, Button, RichText, Slider, Ui};

use super::common::{create_frame, UiColors, DRIVE_BUTTON_SIZE, TOGGLE_BUTTON_SIZE};
use crate::bridge::intent::MAX_DISPLAYED_SPEED;
use crate::bridge::{DisplayState, Intent};
use crate::mqtt::mqtt_handler::ConnectionState;

/// Top bar with the connection indicator and status text.
pub fn status_bar(ui: &mut Ui, state: ConnectionState, display: &DisplayState) {
    ui.horizontal(|ui| {
        let status_color = if state == ConnectionState::Connected {
            UiColors::ACTIVE
        } else {
            UiColors::INACTIVE
        };
        ui.colored_label(status_color, "\u{2B24}");
        ui.label(display.status_text.as_str());
    });
}

/// Renders the drive pad, speed slider and readouts.
pub fn render(ui: &mut Ui, display: &DisplayState, slider_level: &mut u8) -> Vec<Intent> {
    let mut intents = Vec::new();

    ui.columns(2, |columns| {
        create_frame(UiColors::MAIN_BG, UiColors::BORDER).show(&mut columns[0], |ui| {
            drive_pad(ui, &mut intents);
            ui.add_space(12.0);
            let slider = Slider::new(&mut *slider_level, 0..=MAX_DISPLAYED_SPEED).text("Speed");
            if ui.add(slider).changed() {
                intents.push(Intent::SetSpeed(*slider_level));
            }
        });

        create_frame(UiColors::MAIN_BG, UiColors::BORDER).show(&mut columns[1], |ui| {
            readouts(ui, display);
            ui.separator();
            toggles(ui, &mut intents);
        });
    });

    intents
}

/// Bottom log of the most recent feedback messages.
pub fn feedback_log(ui: &mut Ui, display: &DisplayState) {
    create_frame(UiColors::INNER_BG, UiColors::BORDER).show(ui, |ui| {
        ui.label(RichText::new("Feedback").strong());
        egui::ScrollArea::vertical()
            .max_height(120.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in display.feedback_log() {
                    ui.monospace(message.render());
                }
            });
    });
}

fn drive_pad(ui: &mut Ui, intents: &mut Vec<Intent>) {
    let drive_button = |ui: &mut Ui, label: &str| {
        ui.add(Button::new(RichText::new(label).heading()).min_size(DRIVE_BUTTON_SIZE))
            .clicked()
    };

    ui.vertical_centered(|ui| {
        if drive_button(ui, "▲ FORWARD") {
            intents.push(Intent::MoveForward);
        }
    });
    ui.horizontal(|ui| {
        if drive_button(ui, "◀ LEFT") {
            intents.push(Intent::MoveLeft);
        }
        if drive_button(ui, "■ STOP") {
            intents.push(Intent::Stop);
        }
        if drive_button(ui, "RIGHT ▶") {
            intents.push(Intent::MoveRight);
        }
    });
    ui.vertical_centered(|ui| {
        if drive_button(ui, "▼ BACKWARD") {
            intents.push(Intent::MoveBackward);
        }
    });
}

fn readouts(ui: &mut Ui, display: &DisplayState) {
    egui::Grid::new("readouts").num_columns(2).show(ui, |ui| {
        ui.label("Move");
        ui.label(RichText::new(&display.move_status_text).heading());
        ui.end_row();

        ui.label("Speed");
        ui.label(RichText::new(display.actual_speed.to_string()).heading().monospace());
        ui.end_row();

        ui.label("Left track");
        ui.label(RichText::new(display.left_speed.to_string()).heading().monospace());
        ui.end_row();

        ui.label("Right track");
        ui.label(RichText::new(display.right_speed.to_string()).heading().monospace());
        ui.end_row();
    });
}

fn toggles(ui: &mut Ui, intents: &mut Vec<Intent>) {
    let toggle = |ui: &mut Ui, label: &str| {
        ui.add(Button::new(label).min_size(TOGGLE_BUTTON_SIZE)).clicked()
    };

    ui.horizontal(|ui| {
        ui.label("Lights");
        if toggle(ui, "ON") {
            intents.push(Intent::SetLights("on".to_string()));
        }
        if toggle(ui, "OFF") {
            intents.push(Intent::SetLights("off".to_string()));
        }
    });
    ui.horizontal(|ui| {
        ui.label("Mode");
        if toggle(ui, "MANUAL") {
            intents.push(Intent::SetMode("manual".to_string()));
        }
        if toggle(ui, "AUTONOMOUS") {
            intents.push(Intent::SetMode("autonomous".to_string()));
        }
    });
}
