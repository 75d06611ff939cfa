//! Analog stick control
//!
//! The joystick owns one gesture zone, created from the injected recognizer
//! when it is mounted and destroyed with it. The zone reports a deflection
//! vector in screen orientation; the stick stores it with Y inverted so that
//! pushing up on screen is positive stick Y.

use tracing::{debug, trace};

use super::drag::DragController;
use super::spec::ControlSpec;
use super::{Control, ControlResponse};
use crate::config::{JoystickConfig, VisualConfig};
use crate::gamepad::normalize::gesture_to_stick;
use crate::gamepad::{ControllerState, StateChange, StickId};
use crate::gesture::{GestureEvent, GestureRecognizer, GestureZone, ZoneConfig};
use crate::input::{EventOutcome, PointerEvent, PointerId};
use crate::layout::ControlLayoutEntry;
use crate::surface::Surface;

pub struct Joystick {
    spec: ControlSpec,
    stick: StickId,
    drag: DragController,
    zone_config: ZoneConfig,
    deadzone: f32,
    zone: Option<Box<dyn GestureZone>>,
    /// Pointer driving the current gesture
    pointer: Option<PointerId>,
    engaged: bool,
    /// Last (x, y) handed to the aggregator
    current: (f32, f32),
    idle_opacity: f32,
    active_opacity: f32,
}

impl Joystick {
    pub fn new(
        spec: ControlSpec,
        stick: StickId,
        layout: ControlLayoutEntry,
        visuals: &VisualConfig,
        joystick: &JoystickConfig,
    ) -> Self {
        Self {
            spec,
            stick,
            drag: DragController::new(layout),
            zone_config: ZoneConfig {
                knob_size: joystick.knob_size,
            },
            deadzone: joystick.deadzone,
            zone: None,
            pointer: None,
            engaged: false,
            current: (0.0, 0.0),
            idle_opacity: visuals.idle_opacity,
            active_opacity: visuals.active_opacity,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Whether a live gesture zone is attached
    pub fn has_zone(&self) -> bool {
        self.zone.as_ref().is_some_and(|z| !z.is_destroyed())
    }

    fn centered(&mut self) -> StateChange {
        self.current = (0.0, 0.0);
        StateChange::Stick {
            stick: self.stick,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl Control for Joystick {
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

    fn mount(&mut self, surface: &mut dyn Surface, gestures: &dyn GestureRecognizer) {
        surface.create_element(&self.spec.element(), self.drag.layout());
        surface.set_opacity(&self.spec.id, self.idle_opacity);

        if let Some(mut old) = self.zone.take() {
            old.destroy();
        }
        self.zone = Some(gestures.create_zone(&self.zone_config));
        debug!("Gesture zone created for {}", self.spec.id);
    }

    fn destroy(&mut self, surface: &mut dyn Surface) {
        if let Some(mut zone) = self.zone.take() {
            zone.destroy();
            debug!("Gesture zone destroyed for {}", self.spec.id);
        }
        self.pointer = None;
        self.engaged = false;
        self.current = (0.0, 0.0);
        surface.remove_element(&self.spec.id);
    }

    fn contribution(&self) -> ControllerState {
        let mut state = ControllerState::new();
        let (axis_x, axis_y) = self.stick.axes();
        *state.axis_mut(axis_x) = self.current.0;
        *state.axis_mut(axis_y) = self.current.1;
        state
    }

    fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        surface: &mut dyn Surface,
    ) -> ControlResponse {
        let Some(rect) = surface.element_rect(&self.spec.id) else {
            return ControlResponse::IGNORED;
        };
        let Some(zone) = self.zone.as_mut() else {
            return ControlResponse::IGNORED;
        };

        let gestures = zone.handle_pointer(event, rect);
        if gestures.is_empty() {
            return ControlResponse::IGNORED;
        }

        let mut change = None;
        for gesture in gestures {
            match gesture {
                GestureEvent::Start => {
                    trace!("{} engaged", self.spec.id);
                    self.engaged = true;
                    self.pointer = Some(event.pointer_id);
                    surface.set_opacity(&self.spec.id, self.active_opacity);
                }
                GestureEvent::Move { vector } => {
                    let (x, y) = gesture_to_stick(vector, self.deadzone);
                    self.current = (x, y);
                    change = Some(StateChange::Stick {
                        stick: self.stick,
                        x,
                        y,
                    });
                }
                GestureEvent::End => {
                    trace!("{} released", self.spec.id);
                    self.engaged = false;
                    self.pointer = None;
                    surface.set_opacity(&self.spec.id, self.idle_opacity);
                    change = Some(self.centered());
                }
            }
        }

        ControlResponse::with_change(EventOutcome::handled_for(event), change)
    }

    fn release(&mut self, surface: &mut dyn Surface) -> Option<StateChange> {
        if !self.engaged && self.current == (0.0, 0.0) {
            return None;
        }
        if let Some(zone) = self.zone.as_mut() {
            zone.cancel();
        }
        self.engaged = false;
        self.pointer = None;
        surface.set_opacity(&self.spec.id, self.idle_opacity);
        Some(self.centered())
    }

    fn holds_pointer(&self, pointer: PointerId) -> bool {
        self.pointer == Some(pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{default_controls, ControlAction};
    use crate::gesture::RadialGestureRecognizer;
    use crate::input::PointerPhase;
    use crate::surface::HeadlessSurface;

    /// Left stick placed at (100, 100) with a 120x120 zone
    fn left_stick() -> (Joystick, HeadlessSurface) {
        let spec = default_controls()
            .unwrap()
            .into_iter()
            .find(|s| s.id == "stick-left")
            .unwrap();
        let layout = ControlLayoutEntry::pinned(crate::geometry::Point::new(100.0, 100.0));
        let mut stick = Joystick::new(
            spec,
            StickId::Left,
            layout,
            &VisualConfig::default(),
            &JoystickConfig::default(),
        );
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        stick.mount(&mut surface, &RadialGestureRecognizer::new());
        (stick, surface)
    }

    fn stick_change(response: ControlResponse) -> (f32, f32) {
        match response.action {
            Some(ControlAction::State(StateChange::Stick { x, y, .. })) => (x, y),
            other => panic!("expected a stick change, got {:?}", other),
        }
    }

    #[test]
    fn test_drag_up_right_is_positive_y() {
        let (mut stick, mut surface) = left_stick();
        assert!(stick.has_zone());

        let response = stick.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Down, 160.0, 160.0),
            &mut surface,
        );
        assert_eq!(stick_change(response), (0.0, 0.0));
        assert!(stick.is_engaged());
        assert_eq!(surface.opacity("stick-left"), Some(0.9));

        // 20px right, 20px up with a 40px knob radius
        let response = stick.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Move, 180.0, 140.0),
            &mut surface,
        );
        assert_eq!(stick_change(response), (0.5, 0.5));
        assert_eq!(stick.contribution().stick(StickId::Left), (0.5, 0.5));
        assert!(stick.holds_pointer(1));
    }

    #[test]
    fn test_end_returns_to_center() {
        let (mut stick, mut surface) = left_stick();
        stick.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Down, 160.0, 160.0),
            &mut surface,
        );
        stick.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Move, 200.0, 200.0),
            &mut surface,
        );

        let response = stick.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Up, 200.0, 200.0),
            &mut surface,
        );
        assert_eq!(stick_change(response), (0.0, 0.0));
        assert!(stick.contribution().is_neutral());
        assert_eq!(surface.opacity("stick-left"), Some(0.5));
        assert!(!stick.holds_pointer(1));
    }

    #[test]
    fn test_forced_release_centers_once() {
        let (mut stick, mut surface) = left_stick();
        assert_eq!(stick.release(&mut surface), None);

        stick.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Down, 160.0, 160.0),
            &mut surface,
        );
        stick.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Move, 170.0, 160.0),
            &mut surface,
        );
        assert_eq!(
            stick.release(&mut surface),
            Some(StateChange::Stick {
                stick: StickId::Left,
                x: 0.0,
                y: 0.0
            })
        );
        assert_eq!(stick.release(&mut surface), None);

        // The cancelled gesture does not resume
        let response = stick.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Move, 200.0, 160.0),
            &mut surface,
        );
        assert_eq!(response.action, None);
    }

    #[test]
    fn test_destroy_drops_zone() {
        let (mut stick, mut surface) = left_stick();
        stick.destroy(&mut surface);
        assert!(!stick.has_zone());
        assert_eq!(surface.element_count(), 0);

        let response = stick.handle_pointer(
            &PointerEvent::touch(1, PointerPhase::Down, 160.0, 160.0),
            &mut surface,
        );
        assert_eq!(response, ControlResponse::IGNORED);
    }
}
