//! Control elements of the overlay
//!
//! Every on-screen control (buttons, triggers, joysticks and the edit
//! toggle) implements [`Control`]. A control knows how to put itself on a
//! [`Surface`], how to turn play-mode pointer input into a [`StateChange`]
//! and what it currently contributes to the controller state. Edit-mode
//! dragging goes through the control's [`DragController`]; the overlay
//! decides which of the two paths an event takes.

pub mod button;
pub mod defaults;
pub mod drag;
pub mod joystick;
pub mod press;
pub mod spec;
pub mod toggle;
pub mod trigger;

use crate::config::OverlayConfig;
use crate::gamepad::{ControllerState, StateChange};
use crate::gesture::GestureRecognizer;
use crate::input::{EventOutcome, PointerEvent, PointerId};
use crate::layout::ControlLayoutEntry;
use crate::surface::Surface;

pub use button::DigitalButton;
pub use defaults::default_controls;
pub use drag::{DragController, DragOutcome};
pub use joystick::Joystick;
pub use spec::{Binding, ControlKind, ControlSpec};
pub use toggle::EditToggle;
pub use trigger::AnalogTrigger;

/// Side effect requested by a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Apply to the aggregate state and transmit
    State(StateChange),
    /// Flip between play and edit mode
    ToggleEditMode,
}

/// Result of a play-mode pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlResponse {
    pub outcome: EventOutcome,
    pub action: Option<ControlAction>,
}

impl ControlResponse {
    pub const IGNORED: Self = Self {
        outcome: EventOutcome::IGNORED,
        action: None,
    };

    pub fn handled(outcome: EventOutcome) -> Self {
        Self {
            outcome,
            action: None,
        }
    }

    pub fn with_change(outcome: EventOutcome, change: Option<StateChange>) -> Self {
        Self {
            outcome,
            action: change.map(ControlAction::State),
        }
    }
}

/// A control element
pub trait Control {
    fn spec(&self) -> &ControlSpec;

    fn id(&self) -> &str {
        &self.spec().id
    }

    fn kind(&self) -> ControlKind {
        self.spec().kind
    }

    fn layout(&self) -> &ControlLayoutEntry;

    /// Replace the layout record (drops any drag in progress)
    fn set_layout(&mut self, layout: ControlLayoutEntry);

    /// Drag controller, for controls that can be repositioned
    fn drag(&self) -> Option<&DragController>;

    fn drag_mut(&mut self) -> Option<&mut DragController>;

    /// Create the element (and any gesture zone) on the surface
    fn mount(&mut self, surface: &mut dyn Surface, gestures: &dyn GestureRecognizer);

    /// Remove the element and release every resource taken at mount
    fn destroy(&mut self, surface: &mut dyn Surface);

    /// What this control currently adds to the controller state
    fn contribution(&self) -> ControllerState;

    /// Play-mode input
    fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        surface: &mut dyn Surface,
    ) -> ControlResponse;

    /// Forced release; the change to apply if the control was active
    fn release(&mut self, surface: &mut dyn Surface) -> Option<StateChange>;

    /// Whether play-mode input from `pointer` is being tracked
    fn holds_pointer(&self, pointer: PointerId) -> bool;
}

/// Build the control described by `spec`, placed at `layout`
pub fn build_control(
    spec: ControlSpec,
    layout: ControlLayoutEntry,
    config: &OverlayConfig,
) -> Box<dyn Control> {
    match spec.binding {
        Binding::Button(flag) => Box::new(DigitalButton::new(spec, flag, layout, &config.visuals)),
        Binding::Trigger(side) => Box::new(AnalogTrigger::new(spec, side, layout, &config.visuals)),
        Binding::Stick(stick) => Box::new(Joystick::new(
            spec,
            stick,
            layout,
            &config.visuals,
            &config.joystick,
        )),
        Binding::EditToggle => Box::new(EditToggle::new(spec, layout)),
    }
}
