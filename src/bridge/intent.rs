//! Operator intents and the speed setting they act on.

use std::fmt;

/// Highest level the operator can select on the speed slider.
pub const MAX_DISPLAYED_SPEED: u8 = 99;

/// Highest speed value carried in a move command.
pub const MAX_WIRE_SPEED: u8 = 255;

/// Drive direction as transmitted in move commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl Direction {
    /// Uppercased token used in the move payload.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Direction::Forward => "FORWARD",
            Direction::Backward => "BACKWARD",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Stop => "STOP",
        }
    }

    /// Signed left/right wheel readouts for a move at `speed`.
    ///
    /// Turning left drives the left track forward and the right track
    /// backward, matching the readout the tank panel has always shown.
    pub fn wheel_speeds(&self, speed: u8) -> (i32, i32) {
        let s = i32::from(speed);
        match self {
            Direction::Forward => (s, s),
            Direction::Backward => (-s, -s),
            Direction::Left => (s, -s),
            Direction::Right => (-s, s),
            Direction::Stop => (0, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A discrete operator action, independent of the surface that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBackward,
    Stop,
    /// Slider level in `0..=99`; larger values are clamped.
    SetSpeed(u8),
    /// Free-form mode, conventionally MANUAL or AUTONOMOUS.
    SetMode(String),
    /// Free-form light state, conventionally ON or OFF.
    SetLights(String),
}

impl Intent {
    /// Direction for move intents, `None` for everything else.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Intent::MoveLeft => Some(Direction::Left),
            Intent::MoveRight => Some(Direction::Right),
            Intent::MoveForward => Some(Direction::Forward),
            Intent::MoveBackward => Some(Direction::Backward),
            Intent::Stop => Some(Direction::Stop),
            Intent::SetSpeed(_) | Intent::SetMode(_) | Intent::SetLights(_) => None,
        }
    }
}

/// Slider level and the wire speed derived from it.
///
/// The two values are only ever set together through
/// [`SpeedSetting::from_displayed`], so `wire` always equals
/// `rescale(displayed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeedSetting {
    displayed: u8,
    wire: u8,
}

impl SpeedSetting {
    pub fn from_displayed(level: u8) -> Self {
        let displayed = level.min(MAX_DISPLAYED_SPEED);
        Self {
            displayed,
            wire: rescale(displayed),
        }
    }

    pub fn displayed(&self) -> u8 {
        self.displayed
    }

    pub fn wire(&self) -> u8 {
        self.wire
    }
}

/// Maps a slider level `0..=99` onto `0..=255`, rounding to nearest.
pub fn rescale(displayed: u8) -> u8 {
    let level = u32::from(displayed.min(MAX_DISPLAYED_SPEED));
    let max_level = u32::from(MAX_DISPLAYED_SPEED);
    // 255 * level is never an odd multiple of 99 / 2, so adding half the
    // divisor rounds without ties.
    ((level * u32::from(MAX_WIRE_SPEED) + max_level / 2) / max_level) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_hits_both_ends() {
        assert_eq!(rescale(0), 0);
        assert_eq!(rescale(99), 255);
    }

    #[test]
    fn rescale_rounds_to_nearest() {
        for level in 0..=MAX_DISPLAYED_SPEED {
            let exact = f64::from(level) * 255.0 / 99.0;
            assert_eq!(rescale(level), exact.round() as u8, "level {level}");
        }
        assert_eq!(rescale(50), 129);
    }

    #[test]
    fn speed_setting_clamps_out_of_range_levels() {
        let setting = SpeedSetting::from_displayed(150);
        assert_eq!(setting.displayed(), 99);
        assert_eq!(setting.wire(), 255);
    }

    #[test]
    fn default_speed_is_standstill() {
        let setting = SpeedSetting::default();
        assert_eq!((setting.displayed(), setting.wire()), (0, 0));
    }

    #[test]
    fn wheel_speeds_follow_direction() {
        assert_eq!(Direction::Forward.wheel_speeds(40), (40, 40));
        assert_eq!(Direction::Backward.wheel_speeds(40), (-40, -40));
        assert_eq!(Direction::Left.wheel_speeds(40), (40, -40));
        assert_eq!(Direction::Right.wheel_speeds(40), (-40, 40));
        assert_eq!(Direction::Stop.wheel_speeds(40), (0, 0));
    }

    #[test]
    fn only_moves_have_a_direction() {
        assert_eq!(Intent::Stop.direction(), Some(Direction::Stop));
        assert_eq!(Intent::SetSpeed(3).direction(), None);
        assert_eq!(Intent::SetLights("on".into()).direction(), None);
    }
}
