//! Edit-mode repositioning of a control
//!
//! A drag starts with a touch down on the element, follows that one touch,
//! and ends when it lifts or is cancelled. On start the layout is pinned to
//! the element's rendered top-left (relative to the overlay root), with the
//! opposite edges released and the transform cleared, so later moves only
//! touch `left`/`top`. Persisting the result is the caller's job.

use tracing::{debug, trace};

use crate::geometry::{Point, Rect};
use crate::input::{EventOutcome, PointerEvent, PointerId, PointerPhase};
use crate::layout::ControlLayoutEntry;

/// Active drag
#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    pointer: PointerId,
    /// Where the touch went down
    start_touch: Point,
    /// Element top-left relative to the overlay when the drag began
    start_position: Point,
    /// Layout before the drag pinned it
    original: ControlLayoutEntry,
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Dragging(DragSession),
}

/// Result of feeding one event to the drag controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Ignored,
    /// Layout was pinned; apply it
    Started,
    /// Layout moved; apply it
    Moved,
    /// Session over; apply and persist the layout
    Finished,
}

/// Owns a control's layout record and its drag session
#[derive(Debug, Clone)]
pub struct DragController {
    layout: ControlLayoutEntry,
    state: DragState,
}

impl DragController {
    pub fn new(layout: ControlLayoutEntry) -> Self {
        Self {
            layout,
            state: DragState::Idle,
        }
    }

    pub fn layout(&self) -> &ControlLayoutEntry {
        &self.layout
    }

    /// Replace the layout, dropping any session
    pub fn set_layout(&mut self, layout: ControlLayoutEntry) {
        self.state = DragState::Idle;
        self.layout = layout;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn holds_pointer(&self, pointer: PointerId) -> bool {
        matches!(&self.state, DragState::Dragging(s) if s.pointer == pointer)
    }

    /// Feed one pointer event
    ///
    /// `element_rect` and `overlay_rect` are the current rendered rectangles
    /// in viewport coordinates; they are only read when a drag starts.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        element_rect: Rect,
        overlay_rect: Rect,
    ) -> (DragOutcome, EventOutcome) {
        if !event.is_touch() {
            return (DragOutcome::Ignored, EventOutcome::IGNORED);
        }

        match (&self.state, event.phase) {
            (DragState::Idle, PointerPhase::Down) => {
                let relative = element_rect.relative_to(&overlay_rect);
                let start_position = Point::new(relative.x, relative.y);
                let original = std::mem::replace(
                    &mut self.layout,
                    ControlLayoutEntry::pinned(start_position),
                );

                debug!(
                    "Drag start (pointer {}) at {:?}",
                    event.pointer_id, start_position
                );
                self.state = DragState::Dragging(DragSession {
                    pointer: event.pointer_id,
                    start_touch: event.position,
                    start_position,
                    original,
                });

                (
                    DragOutcome::Started,
                    EventOutcome {
                        handled: true,
                        prevent_default: true,
                        stop_propagation: true,
                    },
                )
            }
            (DragState::Dragging(session), PointerPhase::Move)
                if session.pointer == event.pointer_id =>
            {
                let delta = event.position.delta_from(session.start_touch);
                let position = Point::new(
                    session.start_position.x + delta.x,
                    session.start_position.y + delta.y,
                );
                trace!("Drag move to {:?}", position);
                self.layout.set_top_left(position);

                (
                    DragOutcome::Moved,
                    EventOutcome {
                        handled: true,
                        prevent_default: true,
                        stop_propagation: false,
                    },
                )
            }
            (DragState::Dragging(session), PointerPhase::Up | PointerPhase::Cancel)
                if session.pointer == event.pointer_id =>
            {
                debug!("Drag end (pointer {})", event.pointer_id);
                self.state = DragState::Idle;
                (DragOutcome::Finished, EventOutcome::handled_for(event))
            }
            _ => (DragOutcome::Ignored, EventOutcome::IGNORED),
        }
    }

    /// End the session, keeping the dragged position
    ///
    /// Returns whether a session was active (the caller persists it).
    pub fn finish(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }

    /// End the session and restore the layout from before it
    pub fn cancel(&mut self) -> bool {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging(session) => {
                self.layout = session.original;
                true
            }
            DragState::Idle => false,
        }
    }
}
