//! Static description of a control

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gamepad::{ButtonFlags, StickId, TriggerSide};
use crate::layout::ControlLayoutEntry;
use crate::surface::{ElementSpec, Shape};

/// Stacking order of the edit toggle, above every other control
pub const TOGGLE_Z_INDEX: i32 = 2000;

/// Kind of control element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Button,
    Trigger,
    Joystick,
    Toggle,
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ControlKind::Button => "button",
            ControlKind::Trigger => "trigger",
            ControlKind::Joystick => "joystick",
            ControlKind::Toggle => "toggle",
        };
        write!(f, "{}", s)
    }
}

/// What a control drives in the controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Button(ButtonFlags),
    Trigger(TriggerSide),
    Stick(StickId),
    EditToggle,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Button(flag) => write!(f, "{}", flag.name().unwrap_or("?")),
            Binding::Trigger(TriggerSide::Left) => write!(f, "left trigger"),
            Binding::Trigger(TriggerSide::Right) => write!(f, "right trigger"),
            Binding::Stick(StickId::Left) => write!(f, "left stick"),
            Binding::Stick(StickId::Right) => write!(f, "right stick"),
            Binding::EditToggle => write!(f, "edit mode"),
        }
    }
}

/// Everything needed to build one control
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSpec {
    /// Stable id, also the layout persistence key
    pub id: String,
    pub kind: ControlKind,
    pub label: String,
    pub binding: Binding,
    pub width: f32,
    pub height: f32,
    pub shape: Shape,
    pub accent: Option<String>,
    /// Compiled-in position, used when nothing is persisted
    pub default_layout: ControlLayoutEntry,
}

impl ControlSpec {
    /// Element description for the surface
    pub fn element(&self) -> ElementSpec {
        ElementSpec {
            id: self.id.clone(),
            label: self.label.clone(),
            width: self.width,
            height: self.height,
            shape: self.shape,
            accent: self.accent.clone(),
            z_index: if self.kind == ControlKind::Toggle { TOGGLE_Z_INDEX } else { 0 },
        }
    }

    /// Whether the control can be repositioned in edit mode
    pub fn is_draggable(&self) -> bool {
        self.kind != ControlKind::Toggle
    }
}
