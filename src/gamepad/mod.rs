//! Virtual controller state and its streaming
//!
//! Provides the button enumeration, the aggregate controller state, analog
//! normalization and the aggregator that pushes every change to the remote
//! input sink.

pub mod aggregator;
pub mod buttons;
pub mod normalize;
pub mod sink;
pub mod state;

pub use aggregator::GamepadAggregator;
pub use buttons::ButtonFlags;
pub use sink::{ChannelSink, InputSink, LoggingSink, SinkError, SinkMessage, VirtualGamepadHandle};
pub use state::{ControllerState, StateChange, StickAxis, StickId, TriggerSide, TRIGGER_MAX};
