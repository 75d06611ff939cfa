//! Test doubles shared by the unit tests

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::gamepad::{ControllerState, InputSink, SinkError, VirtualGamepadHandle};
use crate::geometry::Rect;
use crate::gesture::{GestureEvent, GestureRecognizer, GestureZone, ZoneConfig};
use crate::input::PointerEvent;
use crate::layout::{LayoutStore, LayoutStoreError, MemoryLayoutStore};

#[derive(Default)]
struct Recording {
    registrations: usize,
    states: Vec<ControllerState>,
    fail_sends: bool,
    fail_registration: bool,
}

/// Sink that records every call; clones share the record
#[derive(Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registrations(&self) -> usize {
        self.inner.lock().registrations
    }

    pub fn states(&self) -> Vec<ControllerState> {
        self.inner.lock().states.clone()
    }

    pub fn last_state(&self) -> Option<ControllerState> {
        self.inner.lock().states.last().copied()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.inner.lock().fail_sends = fail;
    }

    pub fn fail_registration(&self, fail: bool) {
        self.inner.lock().fail_registration = fail;
    }
}

impl InputSink for RecordingSink {
    fn register_virtual_controller(&mut self) -> Result<VirtualGamepadHandle, SinkError> {
        let mut inner = self.inner.lock();
        if inner.fail_registration {
            return Err(SinkError::Unavailable("registration refused".to_string()));
        }
        inner.registrations += 1;
        Ok(VirtualGamepadHandle::new(7))
    }

    fn send_state(
        &mut self,
        _handle: VirtualGamepadHandle,
        state: &ControllerState,
    ) -> Result<(), SinkError> {
        let mut inner = self.inner.lock();
        if inner.fail_sends {
            return Err(SinkError::Transmission("link down".to_string()));
        }
        inner.states.push(*state);
        Ok(())
    }
}

/// Memory store that can be switched to fail every call
#[derive(Clone, Default)]
pub struct FlakyStore {
    store: MemoryLayoutStore,
    failing: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), LayoutStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LayoutStoreError::Io {
                path: PathBuf::from("flaky"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
            });
        }
        Ok(())
    }
}

impl LayoutStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, LayoutStoreError> {
        self.check()?;
        self.store.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LayoutStoreError> {
        self.check()?;
        self.store.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), LayoutStoreError> {
        self.check()?;
        self.store.remove(key)
    }
}

#[derive(Default)]
struct Script {
    created: usize,
    destroyed: usize,
    queued: VecDeque<Vec<GestureEvent>>,
}

/// Recognizer whose zones replay queued gestures, one batch per event
///
/// Counts zone creation and destruction so tests can check that nothing
/// outlives an unmount.
#[derive(Clone, Default)]
pub struct ScriptedGestures {
    inner: Arc<Mutex<Script>>,
}

impl ScriptedGestures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gestures reported for the next pointer event any zone receives
    pub fn push(&self, gestures: Vec<GestureEvent>) {
        self.inner.lock().queued.push_back(gestures);
    }

    pub fn created(&self) -> usize {
        self.inner.lock().created
    }

    pub fn live(&self) -> usize {
        let inner = self.inner.lock();
        inner.created - inner.destroyed
    }
}

impl GestureRecognizer for ScriptedGestures {
    fn create_zone(&self, _config: &ZoneConfig) -> Box<dyn GestureZone> {
        self.inner.lock().created += 1;
        Box::new(ScriptedZone {
            script: self.inner.clone(),
            destroyed: false,
        })
    }
}

struct ScriptedZone {
    script: Arc<Mutex<Script>>,
    destroyed: bool,
}

impl GestureZone for ScriptedZone {
    fn handle_pointer(&mut self, _event: &PointerEvent, _zone: Rect) -> Vec<GestureEvent> {
        if self.destroyed {
            return Vec::new();
        }
        self.script.lock().queued.pop_front().unwrap_or_default()
    }

    fn cancel(&mut self) {}

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.script.lock().destroyed += 1;
        }
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
