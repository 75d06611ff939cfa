//! Pointer events delivered by the host UI
//!
//! Mouse and touch input share one event shape. `Cancel` is delivered when
//! the host loses a pointer (capture loss, system gesture) and is treated as
//! a gesture end everywhere.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Host-assigned pointer identifier (touch identifier, or 0 for the mouse)
pub type PointerId = u32;

/// Input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Pointer lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One pointer event in overlay viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub kind: PointerKind,
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(
        pointer_id: PointerId,
        kind: PointerKind,
        phase: PointerPhase,
        position: Point,
    ) -> Self {
        Self {
            pointer_id,
            kind,
            phase,
            position,
        }
    }

    pub fn touch(pointer_id: PointerId, phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::new(pointer_id, PointerKind::Touch, phase, Point::new(x, y))
    }

    pub fn mouse(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::new(0, PointerKind::Mouse, phase, Point::new(x, y))
    }

    pub fn is_touch(&self) -> bool {
        self.kind == PointerKind::Touch
    }
}

/// What the host should do with the native event after dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// A control consumed the event
    pub handled: bool,
    /// Suppress the native default (synthetic click, scrolling)
    pub prevent_default: bool,
    /// Stop the event reaching other listeners on the same element
    pub stop_propagation: bool,
}

impl EventOutcome {
    pub const IGNORED: Self = Self {
        handled: false,
        prevent_default: false,
        stop_propagation: false,
    };

    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::IGNORED
        }
    }

    /// Handled; for touch input the native default is suppressed
    pub fn handled_for(event: &PointerEvent) -> Self {
        Self {
            handled: true,
            prevent_default: event.is_touch(),
            stop_propagation: false,
        }
    }
}
