//! Controller state value object and the changes applied to it

use serde::{Deserialize, Serialize};
use std::fmt;

use super::buttons::ButtonFlags;

/// Full trigger deflection
pub const TRIGGER_MAX: u8 = 255;

/// Stick identifier
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickId {
    Left,
    Right,
}

impl StickId {
    /// The (x, y) axis pair owned by this stick
    pub fn axes(self) -> (StickAxis, StickAxis) {
        match self {
            StickId::Left => (StickAxis::LeftX, StickAxis::LeftY),
            StickId::Right => (StickAxis::RightX, StickAxis::RightY),
        }
    }
}

/// One of the four analog stick axes
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

impl StickAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            StickAxis::LeftX => "lx",
            StickAxis::LeftY => "ly",
            StickAxis::RightX => "rx",
            StickAxis::RightY => "ry",
        }
    }
}

/// Trigger side
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerSide {
    Left,
    Right,
}

/// Aggregate controller state pushed to the input sink
///
/// Sticks are in `[-1.0, 1.0]`, triggers in `[0, 255]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerState {
    pub button_flags: ButtonFlags,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_stick_x: f32,
    pub left_stick_y: f32,
    pub right_stick_x: f32,
    pub right_stick_y: f32,
}

impl ControllerState {
    /// Zero state (nothing pressed, sticks centered)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(&self, axis: StickAxis) -> f32 {
        match axis {
            StickAxis::LeftX => self.left_stick_x,
            StickAxis::LeftY => self.left_stick_y,
            StickAxis::RightX => self.right_stick_x,
            StickAxis::RightY => self.right_stick_y,
        }
    }

    pub fn axis_mut(&mut self, axis: StickAxis) -> &mut f32 {
        match axis {
            StickAxis::LeftX => &mut self.left_stick_x,
            StickAxis::LeftY => &mut self.left_stick_y,
            StickAxis::RightX => &mut self.right_stick_x,
            StickAxis::RightY => &mut self.right_stick_y,
        }
    }

    pub fn stick(&self, stick: StickId) -> (f32, f32) {
        let (x, y) = stick.axes();
        (self.axis(x), self.axis(y))
    }

    pub fn trigger(&self, side: TriggerSide) -> u8 {
        match side {
            TriggerSide::Left => self.left_trigger,
            TriggerSide::Right => self.right_trigger,
        }
    }

    pub fn trigger_mut(&mut self, side: TriggerSide) -> &mut u8 {
        match side {
            TriggerSide::Left => &mut self.left_trigger,
            TriggerSide::Right => &mut self.right_trigger,
        }
    }

    /// True when nothing is pressed and both sticks are centered
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Combine two partial contributions
    ///
    /// Flags are OR-ed, triggers saturate at 255 and axes are summed then
    /// clamped to `[-1, 1]`. Contributions from distinct controls touch
    /// disjoint fields, so in practice this is a plain union.
    pub fn merge(&self, other: &ControllerState) -> ControllerState {
        let axis = |a: f32, b: f32| (a + b).clamp(-1.0, 1.0);
        ControllerState {
            button_flags: self.button_flags | other.button_flags,
            left_trigger: self.left_trigger.saturating_add(other.left_trigger),
            right_trigger: self.right_trigger.saturating_add(other.right_trigger),
            left_stick_x: axis(self.left_stick_x, other.left_stick_x),
            left_stick_y: axis(self.left_stick_y, other.left_stick_y),
            right_stick_x: axis(self.right_stick_x, other.right_stick_x),
            right_stick_y: axis(self.right_stick_y, other.right_stick_y),
        }
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buttons={} lt={} rt={} ls=({:.3}, {:.3}) rs=({:.3}, {:.3})",
            self.button_flags,
            self.left_trigger,
            self.right_trigger,
            self.left_stick_x,
            self.left_stick_y,
            self.right_stick_x,
            self.right_stick_y
        )
    }
}

/// A single mutation produced by one control in response to one input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateChange {
    /// Set or clear one button flag
    Digital { flag: ButtonFlags, pressed: bool },
    /// Overwrite one trigger
    Trigger { side: TriggerSide, value: u8 },
    /// Overwrite both axes of one stick
    Stick { stick: StickId, x: f32, y: f32 },
}
