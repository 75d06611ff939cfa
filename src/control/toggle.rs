//! Edit mode toggle
//!
//! Always on top and never draggable. A click or touch that starts and ends
//! on the toggle flips the overlay between play and edit mode.

use super::drag::DragController;
use super::spec::ControlSpec;
use super::{Control, ControlAction, ControlResponse};
use crate::gamepad::{ControllerState, StateChange};
use crate::gesture::GestureRecognizer;
use crate::input::{EventOutcome, PointerEvent, PointerId, PointerPhase};
use crate::layout::ControlLayoutEntry;
use crate::surface::Surface;

pub struct EditToggle {
    spec: ControlSpec,
    layout: ControlLayoutEntry,
    pointer: Option<PointerId>,
}

impl EditToggle {
    pub fn new(spec: ControlSpec, layout: ControlLayoutEntry) -> Self {
        Self {
            spec,
            layout,
            pointer: None,
        }
    }
}

impl Control for EditToggle {
    fn spec(&self) -> &ControlSpec {
        &self.spec
    }

    fn layout(&self) -> &ControlLayoutEntry {
        &self.layout
    }

    fn set_layout(&mut self, layout: ControlLayoutEntry) {
        self.layout = layout;
    }

    fn drag(&self) -> Option<&DragController> {
        None
    }

    fn drag_mut(&mut self) -> Option<&mut DragController> {
        None
    }

    fn mount(&mut self, surface: &mut dyn Surface, _gestures: &dyn GestureRecognizer) {
        surface.create_element(&self.spec.element(), &self.layout);
    }

    fn destroy(&mut self, surface: &mut dyn Surface) {
        self.pointer = None;
        surface.remove_element(&self.spec.id);
    }

    fn contribution(&self) -> ControllerState {
        ControllerState::new()
    }

    fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        _surface: &mut dyn Surface,
    ) -> ControlResponse {
        match event.phase {
            PointerPhase::Down => {
                self.pointer.get_or_insert(event.pointer_id);
                ControlResponse::handled(EventOutcome::handled())
            }
            PointerPhase::Up if self.pointer == Some(event.pointer_id) => {
                self.pointer = None;
                ControlResponse {
                    outcome: EventOutcome::handled_for(event),
                    action: Some(ControlAction::ToggleEditMode),
                }
            }
            PointerPhase::Cancel if self.pointer == Some(event.pointer_id) => {
                self.pointer = None;
                ControlResponse::handled(EventOutcome::handled())
            }
            _ => ControlResponse::IGNORED,
        }
    }

    fn release(&mut self, _surface: &mut dyn Surface) -> Option<StateChange> {
        self.pointer = None;
        None
    }

    fn holds_pointer(&self, pointer: PointerId) -> bool {
        self.pointer == Some(pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::default_controls;
    use crate::surface::HeadlessSurface;

    fn toggle() -> EditToggle {
        let spec = default_controls()
            .unwrap()
            .into_iter()
            .find(|s| s.id == "edit-toggle")
            .unwrap();
        let layout = spec.default_layout.clone();
        EditToggle::new(spec, layout)
    }

    #[test]
    fn test_click_toggles() {
        let mut toggle = toggle();
        let mut surface = HeadlessSurface::new(800.0, 600.0);

        let down =
            toggle.handle_pointer(&PointerEvent::mouse(PointerPhase::Down, 0.0, 0.0), &mut surface);
        assert_eq!(down.action, None);

        let up =
            toggle.handle_pointer(&PointerEvent::mouse(PointerPhase::Up, 0.0, 0.0), &mut surface);
        assert_eq!(up.action, Some(ControlAction::ToggleEditMode));
        assert!(!up.outcome.prevent_default);
    }

    #[test]
    fn test_touch_end_toggles_and_prevents_default() {
        let mut toggle = toggle();
        let mut surface = HeadlessSurface::new(800.0, 600.0);

        toggle.handle_pointer(&PointerEvent::touch(2, PointerPhase::Down, 0.0, 0.0), &mut surface);
        let up = toggle.handle_pointer(
            &PointerEvent::touch(2, PointerPhase::Up, 0.0, 0.0),
            &mut surface,
        );
        assert_eq!(up.action, Some(ControlAction::ToggleEditMode));
        assert!(up.outcome.prevent_default);
    }

    #[test]
    fn test_up_without_down_or_cancel_does_nothing() {
        let mut toggle = toggle();
        let mut surface = HeadlessSurface::new(800.0, 600.0);

        let up = toggle.handle_pointer(
            &PointerEvent::touch(2, PointerPhase::Up, 0.0, 0.0),
            &mut surface,
        );
        assert_eq!(up.action, None);

        toggle.handle_pointer(&PointerEvent::touch(2, PointerPhase::Down, 0.0, 0.0), &mut surface);
        toggle.handle_pointer(
            &PointerEvent::touch(2, PointerPhase::Cancel, 0.0, 0.0),
            &mut surface,
        );
        let up = toggle.handle_pointer(
            &PointerEvent::touch(2, PointerPhase::Up, 0.0, 0.0),
            &mut surface,
        );
        assert_eq!(up.action, None);
        assert!(!toggle.spec().is_draggable());
    }
}
