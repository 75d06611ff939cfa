//! Virtual gamepad overlay core
//!
//! A touch-driven, repositionable on-screen game controller for a
//! game-streaming client. Pointer input on the overlay's controls is turned
//! into a single aggregate controller state that is streamed to a remote
//! input sink on every change. Controls can be dragged to new positions in
//! edit mode; positions persist across sessions.
//!
//! The rendering surface, the joystick gesture recognizer, the input sink
//! and the layout store are all injected, so the whole core runs headless.

pub mod config;
pub mod control;
pub mod gamepad;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod layout;
pub mod overlay;
pub mod paths;
pub mod script;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use config::OverlayConfig;
pub use gamepad::{ButtonFlags, ControllerState, InputSink, VirtualGamepadHandle};
pub use overlay::{InputMode, Overlay};
