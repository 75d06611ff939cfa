//! Scripted replay of host input
//!
//! A replay script is a YAML list of steps driven against an overlay:
//!
//! ```yaml
//! steps:
//!   - enable
//!   - touch: { control: btn-a, phase: down, pointer: 1 }
//!   - pointer: { id: 1, phase: move, x: 600, y: 400 }
//!   - touch: { control: btn-a, phase: up, pointer: 1 }
//!   - toggle_edit
//!   - lose_pointer: 2
//!   - remount
//!   - disable
//! ```
//!
//! `pointer` delivers a raw event at viewport coordinates; `touch` aims at
//! the center of a control's current rectangle.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::gamepad::ControllerState;
use crate::geometry::Point;
use crate::input::{PointerEvent, PointerId, PointerKind, PointerPhase};
use crate::overlay::{InputMode, Overlay};
use crate::surface::Surface;

/// Replay errors
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Script has no steps")]
    Empty,

    #[error("Step {step}: unknown control {id:?}")]
    UnknownControl { step: usize, id: String },

    #[error("Step {step}: overlay is not mounted")]
    NotMounted { step: usize },
}

/// Raw pointer event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerStep {
    pub id: PointerId,
    #[serde(default = "default_kind")]
    pub kind: PointerKind,
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
}

/// Pointer event aimed at a control's center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchStep {
    pub control: String,
    pub phase: PointerPhase,
    #[serde(default)]
    pub pointer: PointerId,
    #[serde(default = "default_kind")]
    pub kind: PointerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStep {
    Enable,
    Disable,
    ToggleEdit,
    Remount,
    ResetLayout,
    Pointer(PointerStep),
    Touch(TouchStep),
    LosePointer(PointerId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<ReplayStep>,
}

/// Summary of a finished replay
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub steps: usize,
    /// Pointer steps some control consumed
    pub handled: usize,
    pub final_state: ControllerState,
    pub final_mode: InputMode,
}

impl ReplayScript {
    pub fn parse(yaml: &str) -> Result<Self, ScriptError> {
        let script: ReplayScript = serde_yaml::from_str(yaml)?;
        if script.steps.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(script)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ScriptError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&yaml)
    }

    /// Drive `overlay` through every step
    pub fn run<S: Surface>(&self, overlay: &mut Overlay<S>) -> Result<ReplayReport, ScriptError> {
        let mut handled = 0;

        for (idx, step) in self.steps.iter().enumerate() {
            let step_no = idx + 1;
            debug!("Step {}: {:?}", step_no, step);

            match step {
                ReplayStep::Enable => overlay.enable(),
                ReplayStep::Disable => overlay.disable(),
                ReplayStep::ToggleEdit => {
                    overlay.toggle_edit_mode();
                }
                ReplayStep::ResetLayout => overlay.reset_layout(),
                ReplayStep::Remount => {
                    let surface = overlay
                        .unmount()
                        .ok_or(ScriptError::NotMounted { step: step_no })?;
                    overlay.mount(surface);
                }
                ReplayStep::Pointer(p) => {
                    let event = PointerEvent::new(p.id, p.kind, p.phase, Point::new(p.x, p.y));
                    if overlay.dispatch(&event).handled {
                        handled += 1;
                    }
                }
                ReplayStep::Touch(t) => {
                    let surface = overlay
                        .surface()
                        .ok_or(ScriptError::NotMounted { step: step_no })?;
                    let rect = surface
                        .element_rect(&t.control)
                        .ok_or_else(|| ScriptError::UnknownControl {
                            step: step_no,
                            id: t.control.clone(),
                        })?;
                    let event = PointerEvent::new(t.pointer, t.kind, t.phase, rect.center());
                    if overlay.dispatch(&event).handled {
                        handled += 1;
                    }
                }
                ReplayStep::LosePointer(id) => {
                    if overlay.release_pointer(*id).handled {
                        handled += 1;
                    }
                }
            }
        }

        info!("Replayed {} steps ({} handled events)", self.steps.len(), handled);
        Ok(ReplayReport {
            steps: self.steps.len(),
            handled,
            final_state: *overlay.state(),
            final_mode: overlay.mode(),
        })
    }
}

fn default_kind() -> PointerKind {
    PointerKind::Touch
}
