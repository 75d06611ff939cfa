//! Press/release tracking shared by buttons and triggers

use crate::input::{EventOutcome, PointerEvent, PointerId, PointerPhase};

/// Edge produced by a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressEdge {
    Pressed,
    Released,
}

/// Which pointer, if any, is holding the control down
///
/// Mouse and touch are equivalent. A second press while held and a release
/// while not held produce no edge.
#[derive(Debug, Clone, Default)]
pub struct PressTracker {
    pointer: Option<PointerId>,
}

impl PressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn holds_pointer(&self, pointer: PointerId) -> bool {
        self.pointer == Some(pointer)
    }

    pub fn handle(&mut self, event: &PointerEvent) -> (Option<PressEdge>, EventOutcome) {
        let outcome = EventOutcome::handled_for(event);
        let edge = match event.phase {
            PointerPhase::Down if self.pointer.is_none() => {
                self.pointer = Some(event.pointer_id);
                Some(PressEdge::Pressed)
            }
            PointerPhase::Up | PointerPhase::Cancel if self.holds_pointer(event.pointer_id) => {
                self.pointer = None;
                Some(PressEdge::Released)
            }
            _ => None,
        };
        (edge, outcome)
    }

    /// Forced release; true if something was held
    pub fn release(&mut self) -> bool {
        self.pointer.take().is_some()
    }
}
