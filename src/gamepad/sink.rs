//! Streaming input sink contract and built-in sinks
//!
//! The sink is the remote side of the overlay: it hands out a handle for a
//! virtual controller and accepts full state snapshots for that handle. Calls
//! are fire-and-forget; there is no acknowledgement.

use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::state::ControllerState;

/// Opaque identifier of a virtual controller registered with a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualGamepadHandle(i32);

impl VirtualGamepadHandle {
    /// Sentinel for "not yet registered"
    pub const UNREGISTERED: Self = Self(-1);

    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> i32 {
        self.0
    }

    pub const fn is_registered(self) -> bool {
        self.0 >= 0
    }
}

impl Default for VirtualGamepadHandle {
    fn default() -> Self {
        Self::UNREGISTERED
    }
}

impl fmt::Display for VirtualGamepadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vpad#{}", self.0)
    }
}

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown virtual controller handle: {0}")]
    UnknownHandle(VirtualGamepadHandle),

    #[error("Transmission failed: {0}")]
    Transmission(String),
}

/// Remote input sink for virtual controller state
pub trait InputSink {
    /// Allocate a virtual controller on the remote side
    fn register_virtual_controller(&mut self) -> Result<VirtualGamepadHandle, SinkError>;

    /// Transmit a full state snapshot for `handle`
    fn send_state(
        &mut self,
        handle: VirtualGamepadHandle,
        state: &ControllerState,
    ) -> Result<(), SinkError>;
}

/// Messages emitted by [`ChannelSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkMessage {
    /// A virtual controller was allocated
    Registered(VirtualGamepadHandle),
    /// A state snapshot for a registered controller
    State {
        handle: VirtualGamepadHandle,
        state: ControllerState,
    },
}

/// Sink that forwards every call into a tokio channel
///
/// The receiving task owns the actual transport (websocket, data channel...)
/// and can run on any runtime thread.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkMessage>,
    next_id: i32,
}

impl ChannelSink {
    /// Create a sink and the receiver that drains it
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, next_id: 0 }, rx)
    }
}

impl InputSink for ChannelSink {
    fn register_virtual_controller(&mut self) -> Result<VirtualGamepadHandle, SinkError> {
        let handle = VirtualGamepadHandle::new(self.next_id);
        self.tx
            .send(SinkMessage::Registered(handle))
            .map_err(|_| SinkError::Unavailable("receiver dropped".to_string()))?;
        self.next_id += 1;
        info!("Registered virtual controller {}", handle);
        Ok(handle)
    }

    fn send_state(
        &mut self,
        handle: VirtualGamepadHandle,
        state: &ControllerState,
    ) -> Result<(), SinkError> {
        if !handle.is_registered() || handle.id() >= self.next_id {
            return Err(SinkError::UnknownHandle(handle));
        }
        self.tx
            .send(SinkMessage::State {
                handle,
                state: *state,
            })
            .map_err(|e| SinkError::Transmission(e.to_string()))
    }
}

/// Sink that only logs, for running the overlay without a stream
#[derive(Debug, Default)]
pub struct LoggingSink {
    registered: bool,
    sent: u64,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots accepted so far
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl InputSink for LoggingSink {
    fn register_virtual_controller(&mut self) -> Result<VirtualGamepadHandle, SinkError> {
        self.registered = true;
        info!("LoggingSink: virtual controller registered");
        Ok(VirtualGamepadHandle::new(0))
    }

    fn send_state(
        &mut self,
        handle: VirtualGamepadHandle,
        state: &ControllerState,
    ) -> Result<(), SinkError> {
        if !self.registered {
            return Err(SinkError::UnknownHandle(handle));
        }
        self.sent += 1;
        debug!("LoggingSink: {} <- {}", handle, state);
        Ok(())
    }
}
