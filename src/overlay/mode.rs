//! Overlay input mode

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which logic pointer input drives
///
/// In `Play` controls press and release; in `Edit` every draggable control
/// only moves. The two never run at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Play,
    Edit,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Play => InputMode::Edit,
            InputMode::Edit => InputMode::Play,
        }
    }

    pub fn is_edit(self) -> bool {
        self == InputMode::Edit
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Play => write!(f, "play"),
            InputMode::Edit => write!(f, "edit"),
        }
    }
}
