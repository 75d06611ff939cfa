//! Joystick gesture recognition
//!
//! A recognizer is an injected capability: the joystick control asks it for
//! a zone at mount time, feeds the zone its pointer events, and reacts to
//! the start/move/end gestures it reports. The overlay never depends on how
//! the vector is computed, so tests substitute a scripted recognizer.

pub mod radial;

use crate::geometry::{Rect, Vector2};
use crate::input::PointerEvent;

pub use radial::RadialGestureRecognizer;

/// Zone configuration handed to the recognizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneConfig {
    /// Diameter of the knob's travel area, in pixels
    pub knob_size: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self { knob_size: 80.0 }
    }
}

/// Gesture reported by a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start,
    /// Deflection inside the unit circle, screen orientation (down is +y)
    Move { vector: Vector2 },
    End,
}

/// Creates gesture zones
pub trait GestureRecognizer {
    fn create_zone(&self, config: &ZoneConfig) -> Box<dyn GestureZone>;
}

/// One live gesture zone bound to a joystick element
pub trait GestureZone {
    /// Feed a pointer event; `zone` is the element's current rectangle
    fn handle_pointer(&mut self, event: &PointerEvent, zone: Rect) -> Vec<GestureEvent>;

    /// Drop any in-progress gesture without reporting it
    fn cancel(&mut self);

    /// Release the zone's resources; further events are ignored
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}
