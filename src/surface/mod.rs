//! Rendering surface abstraction
//!
//! The overlay never touches a real UI toolkit. Everything it needs from the
//! screen goes through [`Surface`]: creating and removing control elements,
//! placing them from a [`ControlLayoutEntry`], visual feedback, and the
//! geometry queries that dragging and hit testing need. [`HeadlessSurface`]
//! implements it without a display.

pub mod css;
pub mod headless;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::layout::ControlLayoutEntry;

pub use headless::HeadlessSurface;

/// Visual outline of a control element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Circle
    Round,
    /// Rounded rectangle
    Rounded,
    /// Capsule
    Pill,
    /// Invisible touch zone (joystick base is drawn by the recognizer)
    Zone,
}

/// Everything a surface needs to create one element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub id: String,
    pub label: String,
    pub width: f32,
    pub height: f32,
    pub shape: Shape,
    /// Tint color (`#rrggbb`), if any
    pub accent: Option<String>,
    /// Stacking order, higher is on top
    pub z_index: i32,
}

/// Host rendering adapter
pub trait Surface {
    /// Attach the overlay root to the host container
    fn attach_root(&mut self);

    /// Detach the overlay root from the host container
    fn detach_root(&mut self);

    fn set_visible(&mut self, visible: bool);

    /// Edit mode feedback (border highlight, toggle recolor)
    fn set_edit_highlight(&mut self, active: bool);

    fn create_element(&mut self, spec: &ElementSpec, layout: &ControlLayoutEntry);

    fn apply_layout(&mut self, id: &str, layout: &ControlLayoutEntry);

    fn set_opacity(&mut self, id: &str, opacity: f32);

    fn remove_element(&mut self, id: &str);

    /// Rendered rectangle of an element, in viewport coordinates
    fn element_rect(&self, id: &str) -> Option<Rect>;

    /// Rendered rectangle of the overlay root, in viewport coordinates
    fn overlay_rect(&self) -> Rect;

    /// Topmost element under `point`
    fn hit_test(&self, point: Point) -> Option<String>;
}
