//! Built-in static-mode joystick recognizer
//!
//! The knob rests at the center of the zone. A pointer going down inside the
//! zone starts a gesture; the deflection is the offset from the center
//! divided by the knob radius, clamped to the unit circle. Only one pointer
//! drives a zone at a time.

use tracing::trace;

use super::{GestureEvent, GestureRecognizer, GestureZone, ZoneConfig};
use crate::gamepad::normalize::radial_clamp;
use crate::geometry::{Rect, Vector2};
use crate::input::{PointerEvent, PointerId, PointerPhase};

/// Recognizer producing [`RadialZone`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialGestureRecognizer;

impl RadialGestureRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl GestureRecognizer for RadialGestureRecognizer {
    fn create_zone(&self, config: &ZoneConfig) -> Box<dyn GestureZone> {
        Box::new(RadialZone::new(*config))
    }
}

/// Zone state for the radial recognizer
#[derive(Debug)]
pub struct RadialZone {
    config: ZoneConfig,
    active: Option<PointerId>,
    destroyed: bool,
}

impl RadialZone {
    pub fn new(config: ZoneConfig) -> Self {
        Self {
            config,
            active: None,
            destroyed: false,
        }
    }

    fn vector(&self, event: &PointerEvent, zone: Rect) -> Vector2 {
        let radius = (self.config.knob_size / 2.0).max(1.0);
        let delta = event.position.delta_from(zone.center());
        let (x, y) = radial_clamp(delta.x / radius, delta.y / radius);
        Vector2::new(x, y)
    }
}

impl GestureZone for RadialZone {
    fn handle_pointer(&mut self, event: &PointerEvent, zone: Rect) -> Vec<GestureEvent> {
        if self.destroyed {
            return Vec::new();
        }

        match (event.phase, self.active) {
            (PointerPhase::Down, None) if zone.contains(event.position) => {
                self.active = Some(event.pointer_id);
                trace!("Gesture start (pointer {})", event.pointer_id);
                vec![
                    GestureEvent::Start,
                    GestureEvent::Move {
                        vector: self.vector(event, zone),
                    },
                ]
            }
            (PointerPhase::Move, Some(id)) if id == event.pointer_id => {
                vec![GestureEvent::Move {
                    vector: self.vector(event, zone),
                }]
            }
            (PointerPhase::Up | PointerPhase::Cancel, Some(id)) if id == event.pointer_id => {
                self.active = None;
                trace!("Gesture end (pointer {})", event.pointer_id);
                vec![GestureEvent::End]
            }
            _ => Vec::new(),
        }
    }

    fn cancel(&mut self) {
        self.active = None;
    }

    fn destroy(&mut self) {
        self.active = None;
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE: Rect = Rect::new(100.0, 100.0, 120.0, 120.0);

    fn zone() -> Box<dyn GestureZone> {
        RadialGestureRecognizer::new().create_zone(&ZoneConfig { knob_size: 80.0 })
    }

    #[test]
    fn test_down_at_center_starts_with_zero_vector() {
        let mut z = zone();
        let events =
            z.handle_pointer(&PointerEvent::touch(1, PointerPhase::Down, 160.0, 160.0), ZONE);
        assert_eq!(
            events,
            vec![GestureEvent::Start, GestureEvent::Move { vector: Vector2::ZERO }]
        );
    }

    #[test]
    fn test_move_reports_screen_oriented_vector() {
        let mut z = zone();
        z.handle_pointer(&PointerEvent::touch(1, PointerPhase::Down, 160.0, 160.0), ZONE);

        // 20px right, 20px down, knob radius 40
        let events =
            z.handle_pointer(&PointerEvent::touch(1, PointerPhase::Move, 180.0, 180.0), ZONE);
        assert_eq!(events, vec![GestureEvent::Move { vector: Vector2::new(0.5, 0.5) }]);
    }

    #[test]
    fn test_vector_is_clamped_to_unit_circle() {
        let mut z = zone();
        z.handle_pointer(&PointerEvent::touch(1, PointerPhase::Down, 160.0, 160.0), ZONE);
        let events =
            z.handle_pointer(&PointerEvent::touch(1, PointerPhase::Move, 400.0, 160.0), ZONE);
        assert_eq!(events, vec![GestureEvent::Move { vector: Vector2::new(1.0, 0.0) }]);
    }

    #[test]
    fn test_other_pointers_are_ignored() {
        let mut z = zone();
        z.handle_pointer(&PointerEvent::touch(1, PointerPhase::Down, 160.0, 160.0), ZONE);

        assert!(z
            .handle_pointer(&PointerEvent::touch(2, PointerPhase::Down, 170.0, 170.0), ZONE)
            .is_empty());
        assert!(z
            .handle_pointer(&PointerEvent::touch(2, PointerPhase::Up, 170.0, 170.0), ZONE)
            .is_empty());

        let events =
            z.handle_pointer(&PointerEvent::touch(1, PointerPhase::Cancel, 0.0, 0.0), ZONE);
        assert_eq!(events, vec![GestureEvent::End]);
    }

    #[test]
    fn test_down_outside_zone_is_ignored() {
        let mut z = zone();
        assert!(z
            .handle_pointer(&PointerEvent::touch(1, PointerPhase::Down, 10.0, 10.0), ZONE)
            .is_empty());
    }

    #[test]
    fn test_destroyed_zone_is_inert() {
        let mut z = zone();
        z.destroy();
        assert!(z.is_destroyed());
        assert!(z
            .handle_pointer(&PointerEvent::touch(1, PointerPhase::Down, 160.0, 160.0), ZONE)
            .is_empty());
    }
}
