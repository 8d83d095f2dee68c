//! # UI Common Components
//!
//! Shared palette and frame styling for the tank panel.

use eframe::egui::{Color32, Frame, Stroke, Vec2};

/// Minimum size of the drive buttons, sized for a touch screen.
pub const DRIVE_BUTTON_SIZE: Vec2 = Vec2::new(140.0, 64.0);

/// Minimum size of the mode and light buttons.
pub const TOGGLE_BUTTON_SIZE: Vec2 = Vec2::new(110.0, 36.0);

/// Creates a styled frame with the panel's border and margins.
pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(6)
        .outer_margin(2)
}

/// Dark theme palette.
///
/// INNER_BG is darker than MAIN_BG. ACTIVE and INACTIVE mark connection
/// health.
pub struct UiColors;

impl UiColors {
    /// Primary background color for main content areas (RGB: 30, 30, 30)
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Secondary background color for nested components (RGB: 25, 25, 25)
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Border color for component separation (RGB: 60, 60, 60)
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Connected status color (RGB: 50, 200, 20)
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Disconnected or failed status color (RGB: 200, 50, 20)
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);
}
