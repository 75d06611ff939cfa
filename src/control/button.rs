//! Digital button control

use tracing::trace;

use super::drag::DragController;
use super::press::{PressEdge, PressTracker};
use super::spec::ControlSpec;
use super::{Control, ControlResponse};
use crate::config::VisualConfig;
use crate::gamepad::{ButtonFlags, ControllerState, StateChange};
use crate::gesture::GestureRecognizer;
use crate::input::{PointerEvent, PointerId};
use crate::layout::ControlLayoutEntry;
use crate::surface::Surface;

/// Button mapped to one flag of the button bitfield
pub struct DigitalButton {
    spec: ControlSpec,
    flag: ButtonFlags,
    drag: DragController,
    press: PressTracker,
    idle_opacity: f32,
    active_opacity: f32,
}

impl DigitalButton {
    pub fn new(
        spec: ControlSpec,
        flag: ButtonFlags,
        layout: ControlLayoutEntry,
        visuals: &VisualConfig,
    ) -> Self {
        Self {
            spec,
            flag,
            drag: DragController::new(layout),
            press: PressTracker::new(),
            idle_opacity: visuals.idle_opacity,
            active_opacity: visuals.active_opacity,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_pressed()
    }

    fn change(&self, pressed: bool) -> StateChange {
        StateChange::Digital {
            flag: self.flag,
            pressed,
        }
    }
}

impl Control for DigitalButton {
    fn spec(&self) -> &ControlSpec {
        &self.spec
    }

    fn layout(&self) -> &ControlLayoutEntry {
        self.drag.layout()
    }

    fn set_layout(&mut self, layout: ControlLayoutEntry) {
        self.drag.set_layout(layout);
    }

    fn drag(&self) -> Option<&DragController> {
        Some(&self.drag)
    }

    fn drag_mut(&mut self) -> Option<&mut DragController> {
        Some(&mut self.drag)
    }

    fn mount(&mut self, surface: &mut dyn Surface, _gestures: &dyn GestureRecognizer) {
        surface.create_element(&self.spec.element(), self.drag.layout());
        surface.set_opacity(&self.spec.id, self.idle_opacity);
    }

    fn destroy(&mut self, surface: &mut dyn Surface) {
        self.press.release();
        surface.remove_element(&self.spec.id);
    }

    fn contribution(&self) -> ControllerState {
        let mut state = ControllerState::new();
        state.button_flags.set(self.flag, self.press.is_pressed());
        state
    }

    fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        surface: &mut dyn Surface,
    ) -> ControlResponse {
        let (edge, outcome) = self.press.handle(event);
        let change = edge.map(|edge| {
            let pressed = edge == PressEdge::Pressed;
            trace!("{} {}", self.spec.id, if pressed { "pressed" } else { "released" });
            let opacity = if pressed { self.active_opacity } else { self.idle_opacity };
            surface.set_opacity(&self.spec.id, opacity);
            self.change(pressed)
        });
        ControlResponse::with_change(outcome, change)
    }

    fn release(&mut self, surface: &mut dyn Surface) -> Option<StateChange> {
        if !self.press.release() {
            return None;
        }
        surface.set_opacity(&self.spec.id, self.idle_opacity);
        Some(self.change(false))
    }

    fn holds_pointer(&self, pointer: PointerId) -> bool {
        self.press.holds_pointer(pointer)
    }
}
