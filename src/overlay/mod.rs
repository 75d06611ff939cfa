//! Overlay controller
//!
//! Composes every control on one surface and owns the pieces they share:
//! the gamepad aggregator, the layout repository, the gesture recognizer and
//! the input mode. Pointer events from the host enter through
//! [`Overlay::dispatch`]; a pointer that went down on a control stays routed
//! to it until it lifts, even after leaving the element.
//!
//! Lifecycle: `new` -> `mount(surface)` -> `enable()` ... `disable()` ->
//! `unmount()`. Registration with the sink happens on the first `enable()`,
//! so an overlay that is never enabled never talks to the sink.

pub mod mode;


use tracing::{debug, info, trace, warn};

use crate::config::OverlayConfig;
use crate::control::{build_control, default_controls, Control, ControlAction, DragOutcome};
use crate::gamepad::{ControllerState, GamepadAggregator, InputSink, VirtualGamepadHandle};
use crate::gesture::{GestureRecognizer, RadialGestureRecognizer};
use crate::input::{EventOutcome, PointerEvent, PointerId, PointerPhase};
use crate::layout::{ControlLayoutEntry, LayoutRepository, LayoutStore};
use crate::surface::Surface;

pub use mode::InputMode;

/// The virtual gamepad overlay
pub struct Overlay<S: Surface> {
    config: OverlayConfig,
    aggregator: GamepadAggregator,
    layouts: LayoutRepository,
    gestures: Box<dyn GestureRecognizer>,
    controls: Vec<Box<dyn Control>>,
    mode: InputMode,
    visible: bool,
    surface: Option<S>,
}

impl<S: Surface> Overlay<S> {
    /// Hidden, unmounted overlay in play mode with a zeroed state
    pub fn new(
        sink: Box<dyn InputSink>,
        store: Box<dyn LayoutStore>,
        gestures: Box<dyn GestureRecognizer>,
        config: &OverlayConfig,
    ) -> Self {
        Self {
            config: config.clone(),
            aggregator: GamepadAggregator::new(sink),
            layouts: LayoutRepository::new(store, config.layout.storage_key.clone()),
            gestures,
            controls: Vec::new(),
            mode: InputMode::Play,
            visible: false,
            surface: None,
        }
    }

    /// Overlay using the built-in radial joystick recognizer
    pub fn with_radial_gestures(
        sink: Box<dyn InputSink>,
        store: Box<dyn LayoutStore>,
        config: &OverlayConfig,
    ) -> Self {
        Self::new(sink, store, Box::new(RadialGestureRecognizer::new()), config)
    }

    // ===== Lifecycle =====

    /// Show the overlay, registering the virtual controller on first use
    pub fn enable(&mut self) {
        self.aggregator.register_if_needed();
        if !self.visible {
            info!("Virtual gamepad overlay enabled");
        }
        self.visible = true;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_visible(true);
        }
    }

    /// Hide the overlay, releasing anything still held
    pub fn disable(&mut self) {
        self.release_all();
        self.finish_drags();
        if self.visible {
            info!("Virtual gamepad overlay disabled");
        }
        self.visible = false;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_visible(false);
        }
    }

    /// Attach to `surface` and build every control on it
    ///
    /// Each control starts from its persisted layout entry, or its default
    /// when none is stored. An overlay that is already mounted is unmounted
    /// from its previous surface first.
    pub fn mount(&mut self, mut surface: S) {
        if self.surface.is_some() {
            info!("Overlay already mounted, moving to a new surface");
            self.unmount();
        }

        surface.attach_root();
        surface.set_visible(self.visible);
        surface.set_edit_highlight(self.mode.is_edit());

        let specs = match default_controls() {
            Ok(specs) => specs,
            Err(e) => {
                warn!("Failed to load default controls: {:#}", e);
                Vec::new()
            }
        };

        let mut overrides = self.layouts.load_all();
        let config = &self.config;
        self.controls = specs
            .into_iter()
            .map(|spec| {
                let layout = overrides
                    .remove(&spec.id)
                    .unwrap_or_else(|| spec.default_layout.clone());
                build_control(spec, layout, config)
            })
            .collect();

        for id in overrides.keys() {
            debug!("Ignoring stored layout for unknown control {:?}", id);
        }

        for control in self.controls.iter_mut() {
            control.mount(&mut surface, self.gestures.as_ref());
        }

        info!("Overlay mounted with {} controls", self.controls.len());
        self.surface = Some(surface);
    }

    /// Destroy every control and detach, handing the surface back
    pub fn unmount(&mut self) -> Option<S> {
        if self.surface.is_none() {
            return None;
        }

        self.release_all();
        self.finish_drags();

        let mut surface = self.surface.take()?;
        for mut control in self.controls.drain(..) {
            control.destroy(&mut surface);
        }
        surface.set_edit_highlight(false);
        surface.detach_root();

        info!("Overlay unmounted");
        Some(surface)
    }

    // ===== Mode =====

    pub fn toggle_edit_mode(&mut self) -> InputMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Switch mode
    ///
    /// Entering edit mode releases every held control; leaving it ends any
    /// drag in progress and stores its position.
    pub fn set_mode(&mut self, mode: InputMode) {
        if mode == self.mode {
            return;
        }

        match mode {
            InputMode::Edit => self.release_all(),
            InputMode::Play => self.finish_drags(),
        }

        self.mode = mode;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_edit_highlight(mode.is_edit());
        }
        info!("Overlay mode: {}", mode);
    }

    // ===== Input =====

    /// Route one host pointer event
    pub fn dispatch(&mut self, event: &PointerEvent) -> EventOutcome {
        if !self.visible {
            trace!("Overlay hidden, ignoring {:?}", event.phase);
            return EventOutcome::IGNORED;
        }

        let (target, stale) = {
            let Some(surface) = self.surface.as_ref() else {
                return EventOutcome::IGNORED;
            };

            let holder = self.pointer_holder(event.pointer_id);
            let hit = || {
                surface
                    .hit_test(event.position)
                    .and_then(|id| self.index_of(&id))
            };
            match event.phase {
                // A pointer going down again never lifted from its last control
                PointerPhase::Down => {
                    let target = hit();
                    (target, holder.filter(|&idx| Some(idx) != target))
                }
                _ => (holder.or_else(hit), None),
            }
        };

        if let Some(idx) = stale {
            debug!("Pointer {} down again without lifting", event.pointer_id);
            self.end_pointer(idx, event.pointer_id);
        }

        match target {
            Some(idx) => self.dispatch_index(idx, event),
            None => EventOutcome::IGNORED,
        }
    }

    /// Route one pointer event to a known control
    pub fn dispatch_to(&mut self, id: &str, event: &PointerEvent) -> EventOutcome {
        if !self.visible {
            return EventOutcome::IGNORED;
        }

        match self.index_of(id) {
            Some(idx) => self.dispatch_index(idx, event),
            None => {
                debug!("No control {:?}", id);
                EventOutcome::IGNORED
            }
        }
    }

    /// The host lost `pointer`; end whatever it was driving
    ///
    /// A press or joystick gesture ends as if the pointer lifted. A drag is
    /// abandoned and the control goes back to where it was.
    pub fn release_pointer(&mut self, pointer: PointerId) -> EventOutcome {
        match self.pointer_holder(pointer) {
            Some(idx) => {
                debug!("Pointer {} lost", pointer);
                self.end_pointer(idx, pointer)
            }
            None => EventOutcome::IGNORED,
        }
    }

    fn end_pointer(&mut self, idx: usize, pointer: PointerId) -> EventOutcome {
        let cancel = PointerEvent::touch(pointer, PointerPhase::Cancel, 0.0, 0.0);

        if let Some(control) = self.controls.get_mut(idx) {
            let id = control.id().to_string();
            if let Some(drag) = control.drag_mut().filter(|d| d.holds_pointer(pointer)) {
                drag.cancel();
                debug!("Drag of {} abandoned", id);
                if let Some(surface) = self.surface.as_mut() {
                    surface.apply_layout(&id, drag.layout());
                }
                return EventOutcome::handled_for(&cancel);
            }
        }

        self.dispatch_index(idx, &cancel)
    }

    fn dispatch_index(&mut self, idx: usize, event: &PointerEvent) -> EventOutcome {
        let Some(surface) = self.surface.as_mut() else {
            return EventOutcome::IGNORED;
        };
        let Some(control) = self.controls.get_mut(idx) else {
            return EventOutcome::IGNORED;
        };

        if self.mode.is_edit() && control.spec().is_draggable() {
            let id = control.id().to_string();
            let Some(element_rect) = surface.element_rect(&id) else {
                return EventOutcome::IGNORED;
            };
            let overlay_rect = surface.overlay_rect();
            let Some(drag) = control.drag_mut() else {
                return EventOutcome::IGNORED;
            };

            let (result, outcome) = drag.handle(event, element_rect, overlay_rect);
            match result {
                DragOutcome::Ignored => {}
                DragOutcome::Started | DragOutcome::Moved => {
                    surface.apply_layout(&id, drag.layout());
                }
                DragOutcome::Finished => {
                    surface.apply_layout(&id, drag.layout());
                    self.layouts.save(&id, drag.layout());
                }
            }
            return outcome;
        }

        let response = control.handle_pointer(event, surface);
        match response.action {
            Some(ControlAction::State(change)) => self.aggregator.apply(change),
            Some(ControlAction::ToggleEditMode) => {
                self.toggle_edit_mode();
            }
            None => {}
        }
        response.outcome
    }

    // ===== Layout =====

    /// Forget every stored position and put each control back at its default
    pub fn reset_layout(&mut self) {
        self.layouts.clear();
        for control in self.controls.iter_mut() {
            let layout = control.spec().default_layout.clone();
            control.set_layout(layout);
            if let Some(surface) = self.surface.as_mut() {
                surface.apply_layout(control.id(), control.layout());
            }
        }
        info!("Overlay layout reset to defaults");
    }

    // ===== Queries =====

    /// Aggregate state as last applied
    pub fn state(&self) -> &ControllerState {
        self.aggregator.state()
    }

    /// Union of what every control currently contributes
    pub fn contributions(&self) -> ControllerState {
        self.controls
            .iter()
            .fold(ControllerState::new(), |acc, c| acc.merge(&c.contribution()))
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn handle(&self) -> VirtualGamepadHandle {
        self.aggregator.handle()
    }

    /// Snapshots handed to the sink so far
    pub fn transmissions(&self) -> u64 {
        self.aggregator.transmissions()
    }

    pub fn control_ids(&self) -> impl Iterator<Item = &str> {
        self.controls.iter().map(|c| c.id())
    }

    pub fn control_layout(&self, id: &str) -> Option<&ControlLayoutEntry> {
        self.controls.iter().find(|c| c.id() == id).map(|c| c.layout())
    }

    pub fn layouts(&self) -> &LayoutRepository {
        &self.layouts
    }

    // ===== Internals =====

    fn index_of(&self, id: &str) -> Option<usize> {
        self.controls.iter().position(|c| c.id() == id)
    }

    /// Control tracking `pointer`, by press, gesture or drag
    fn pointer_holder(&self, pointer: PointerId) -> Option<usize> {
        self.controls.iter().position(|c| {
            c.holds_pointer(pointer) || c.drag().is_some_and(|d| d.holds_pointer(pointer))
        })
    }

    fn release_all(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        for control in self.controls.iter_mut() {
            if let Some(change) = control.release(&mut *surface) {
                debug!("Released {}", control.id());
                self.aggregator.apply(change);
            }
        }
    }

    fn finish_drags(&mut self) {
        for control in self.controls.iter_mut() {
            let id = control.id().to_string();
            let Some(drag) = control.drag_mut() else {
                continue;
            };
            if !drag.finish() {
                continue;
            }

            if let Some(surface) = self.surface.as_mut() {
                surface.apply_layout(&id, drag.layout());
            }
            self.layouts.save(&id, drag.layout());
        }
    }
}
