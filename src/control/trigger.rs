//! Analog trigger control
//!
//! A touch surface has no pressure, so a trigger is all-or-nothing: pressed
//! means full deflection on its side, released means zero.

use tracing::trace;

use super::drag::DragController;
use super::press::{PressEdge, PressTracker};
use super::spec::ControlSpec;
use super::{Control, ControlResponse};
use crate::config::VisualConfig;
use crate::gamepad::normalize::trigger_value;
use crate::gamepad::{ControllerState, StateChange, TriggerSide};
use crate::gesture::GestureRecognizer;
use crate::input::{PointerEvent, PointerId};
use crate::layout::ControlLayoutEntry;
use crate::surface::Surface;

pub struct AnalogTrigger {
    spec: ControlSpec,
    side: TriggerSide,
    drag: DragController,
    press: PressTracker,
    idle_opacity: f32,
    active_opacity: f32,
}

impl AnalogTrigger {
    pub fn new(
        spec: ControlSpec,
        side: TriggerSide,
        layout: ControlLayoutEntry,
        visuals: &VisualConfig,
    ) -> Self {
        Self {
            spec,
            side,
            drag: DragController::new(layout),
            press: PressTracker::new(),
            idle_opacity: visuals.idle_opacity,
            active_opacity: visuals.active_opacity,
        }
    }

    fn change(&self, pressed: bool) -> StateChange {
        StateChange::Trigger {
            side: self.side,
            value: trigger_value(pressed),
        }
    }
}

impl Control for AnalogTrigger {
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
        *state.trigger_mut(self.side) = trigger_value(self.press.is_pressed());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{default_controls, ControlAction};
    use crate::gamepad::TRIGGER_MAX;
    use crate::gesture::RadialGestureRecognizer;
    use crate::input::PointerPhase;
    use crate::surface::HeadlessSurface;

    fn right_trigger() -> (AnalogTrigger, HeadlessSurface) {
        let spec = default_controls()
            .unwrap()
            .into_iter()
            .find(|s| s.id == "btn-r2")
            .unwrap();
        let layout = spec.default_layout.clone();
        let mut trigger =
            AnalogTrigger::new(spec, TriggerSide::Right, layout, &VisualConfig::default());
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        trigger.mount(&mut surface, &RadialGestureRecognizer::new());
        (trigger, surface)
    }

    #[test]
    fn test_press_is_full_deflection() {
        let (mut trigger, mut surface) = right_trigger();
        let response = trigger.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Down, 0.0, 0.0),
            &mut surface,
        );
        assert_eq!(
            response.action,
            Some(ControlAction::State(StateChange::Trigger {
                side: TriggerSide::Right,
                value: TRIGGER_MAX
            }))
        );
        assert_eq!(trigger.contribution().right_trigger, TRIGGER_MAX);
        assert_eq!(trigger.contribution().left_trigger, 0);
        assert_eq!(surface.opacity("btn-r2"), Some(0.9));
    }

    #[test]
    fn test_release_zeroes_its_side() {
        let (mut trigger, mut surface) = right_trigger();
        trigger.handle_pointer(&PointerEvent::touch(1, PointerPhase::Down, 0.0, 0.0), &mut surface);
        let response = trigger.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Up, 0.0, 0.0),
            &mut surface,
        );
        assert_eq!(
            response.action,
            Some(ControlAction::State(StateChange::Trigger {
                side: TriggerSide::Right,
                value: 0
            }))
        );
        assert!(trigger.contribution().is_neutral());

        // Second release does nothing
        let response = trigger.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Up, 0.0, 0.0),
            &mut surface,
        );
        assert_eq!(response.action, None);
    }
}
