//! Normalization of touch-derived analog values
//!
//! Gesture recognizers report a stick deflection as a vector in screen
//! orientation (y grows downward). The streamed controller expects values in
//! `[-1.0, 1.0]` with the vertical axis flipped, and a magnitude no larger
//! than 1.0 so diagonals behave like a physical stick.
//!
//! # Key Functions
//!
//! - [`radial_clamp`]: keep a vector inside the unit circle
//! - [`apply_radial_deadzone`]: circular deadzone with rescaling
//! - [`gesture_to_stick`]: recognizer vector to stored stick axes

use crate::geometry::Vector2;

use super::state::TRIGGER_MAX;

/// Clamp a vector to the unit circle.
///
/// Interior positions are preserved exactly; positions outside the circle
/// are scaled back onto its edge.
///
/// - At (0.5, 0.5): magnitude 0.707, output unchanged
/// - At (1, 1): magnitude 1.414, output (0.707, 0.707)
pub fn radial_clamp(x: f32, y: f32) -> (f32, f32) {
    let magnitude = (x * x + y * y).sqrt();

    if magnitude <= 1.0 {
        (x, y)
    } else {
        (x / magnitude, y / magnitude)
    }
}

/// Apply a circular deadzone and rescale the remaining range.
///
/// Maps magnitudes `[deadzone, 1.0]` onto `[0.0, 1.0]` while keeping the
/// direction. A deadzone of 0 is a pass-through (after clamping).
///
/// # Arguments
/// * `x`, `y` - Stick values, expected inside the unit circle
/// * `deadzone` - Radius in `[0.0, 1.0)`
pub fn apply_radial_deadzone(x: f32, y: f32, deadzone: f32) -> (f32, f32) {
    let (x, y) = radial_clamp(x, y);
    if deadzone <= 0.0 {
        return (x, y);
    }
    if deadzone >= 1.0 {
        return (0.0, 0.0);
    }

    let magnitude = (x * x + y * y).sqrt();
    if magnitude <= deadzone {
        return (0.0, 0.0);
    }

    let rescaled = ((magnitude - deadzone) / (1.0 - deadzone)).min(1.0);
    let scale = rescaled / magnitude;
    (x * scale, y * scale)
}

/// Clamp a single axis value to `[-1.0, 1.0]`, mapping NaN to 0.
pub fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Convert a recognizer vector into stored stick axes.
///
/// The vertical component is sign-inverted: a recognizer reporting
/// `(0.5, -0.5)` yields `(0.5, 0.5)`.
pub fn gesture_to_stick(vector: Vector2, deadzone: f32) -> (f32, f32) {
    let (x, y) = apply_radial_deadzone(vector.x, vector.y, deadzone);
    // +0.0 turns a negated zero back into a plain zero
    (clamp_axis(x), clamp_axis(-y) + 0.0)
}

/// Analog value produced by a binary trigger press
pub fn trigger_value(pressed: bool) -> u8 {
    if pressed {
        TRIGGER_MAX
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_clamp_inside_unchanged() {
        assert_eq!(radial_clamp(0.5, 0.5), (0.5, 0.5));
    }

    #[test]
    fn test_radial_clamp_diagonal_corner() {
        let (x, y) = radial_clamp(1.0, 1.0);
        let mag = (x * x + y * y).sqrt();
        assert!((mag - 1.0).abs() < 0.001, "Diagonal magnitude was {}", mag);
    }

    #[test]
    fn test_deadzone_filters_small_values() {
        assert_eq!(apply_radial_deadzone(0.05, 0.0, 0.1), (0.0, 0.0));
        let (x, _) = apply_radial_deadzone(0.55, 0.0, 0.1);
        assert!((x - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_zero_deadzone_is_passthrough() {
        assert_eq!(apply_radial_deadzone(0.3, -0.2, 0.0), (0.3, -0.2));
    }

    #[test]
    fn test_gesture_to_stick_inverts_vertical() {
        assert_eq!(gesture_to_stick(Vector2::new(0.5, -0.5), 0.0), (0.5, 0.5));
        assert_eq!(gesture_to_stick(Vector2::new(-1.0, 0.0), 0.0), (-1.0, 0.0));
    }

    #[test]
    fn test_gesture_to_stick_never_returns_negative_zero() {
        let (_, y) = gesture_to_stick(Vector2::new(1.0, 0.0), 0.0);
        assert!(y.is_sign_positive());
    }

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(1.5), 1.0);
        assert_eq!(clamp_axis(-3.0), -1.0);
        assert_eq!(clamp_axis(f32::NAN), 0.0);
    }

    #[test]
    fn test_trigger_value() {
        assert_eq!(trigger_value(true), 255);
        assert_eq!(trigger_value(false), 0);
    }
}
