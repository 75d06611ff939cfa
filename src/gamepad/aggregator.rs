//! Gamepad state aggregator
//!
//! Holds the single shared [`ControllerState`] of the overlay and forwards it
//! to the input sink on every change. There is no batching: one input event
//! produces one transmission, so the remote side observes every change.

use tracing::{debug, info, warn};

use super::buttons::ButtonFlags;
use super::normalize::clamp_axis;
use super::sink::{InputSink, VirtualGamepadHandle};
use super::state::{ControllerState, StateChange, StickAxis, TriggerSide};

/// Owns the aggregate controller state and the sink it is streamed to
pub struct GamepadAggregator {
    sink: Box<dyn InputSink>,
    handle: VirtualGamepadHandle,
    state: ControllerState,
    transmissions: u64,
}

impl GamepadAggregator {
    pub fn new(sink: Box<dyn InputSink>) -> Self {
        Self {
            sink,
            handle: VirtualGamepadHandle::UNREGISTERED,
            state: ControllerState::new(),
            transmissions: 0,
        }
    }

    /// Register with the sink unless already registered
    ///
    /// A failed registration leaves the handle unregistered; the next call
    /// tries again.
    pub fn register_if_needed(&mut self) {
        if self.handle.is_registered() {
            return;
        }

        match self.sink.register_virtual_controller() {
            Ok(handle) => {
                info!("Virtual gamepad registered as {}", handle);
                self.handle = handle;
            }
            Err(e) => {
                warn!("Failed to register virtual gamepad: {}", e);
            }
        }
    }

    pub fn handle(&self) -> VirtualGamepadHandle {
        self.handle
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Number of snapshots handed to the sink successfully
    pub fn transmissions(&self) -> u64 {
        self.transmissions
    }

    /// Set or clear exactly `flag`
    pub fn apply_digital(&mut self, flag: ButtonFlags, pressed: bool) {
        self.state.button_flags.set(flag, pressed);
    }

    /// Overwrite exactly one stick axis
    pub fn apply_axis(&mut self, axis: StickAxis, value: f32) {
        *self.state.axis_mut(axis) = clamp_axis(value);
    }

    /// Overwrite exactly one trigger
    pub fn apply_trigger(&mut self, side: TriggerSide, value: u8) {
        *self.state.trigger_mut(side) = value;
    }

    /// Apply one control's change and transmit once
    pub fn apply(&mut self, change: StateChange) {
        match change {
            StateChange::Digital { flag, pressed } => self.apply_digital(flag, pressed),
            StateChange::Trigger { side, value } => self.apply_trigger(side, value),
            StateChange::Stick { stick, x, y } => {
                let (axis_x, axis_y) = stick.axes();
                self.apply_axis(axis_x, x);
                self.apply_axis(axis_y, y);
            }
        }
        self.flush();
    }

    /// Transmit the current snapshot
    ///
    /// No-op while unregistered. Failures are logged and dropped; the next
    /// input event carries the latest state anyway.
    pub fn flush(&mut self) {
        if !self.handle.is_registered() {
            return;
        }

        match self.sink.send_state(self.handle, &self.state) {
            Ok(()) => {
                self.transmissions += 1;
                debug!("Sent {} <- {}", self.handle, self.state);
            }
            Err(e) => {
                warn!("Failed to send virtual gamepad state: {}", e);
            }
        }
    }

    /// Zero the state and transmit it
    pub fn reset(&mut self) {
        self.state = ControllerState::new();
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::StickId;
    use crate::testing::RecordingSink;

    fn registered() -> (GamepadAggregator, RecordingSink) {
        let sink = RecordingSink::new();
        let mut agg = GamepadAggregator::new(Box::new(sink.clone()));
        agg.register_if_needed();
        (agg, sink)
    }

    #[test]
    fn test_register_is_idempotent() {
        let (mut agg, sink) = registered();
        agg.register_if_needed();
        agg.register_if_needed();
        assert_eq!(sink.registrations(), 1);
        assert!(agg.handle().is_registered());
    }

    #[test]
    fn test_flush_without_registration_is_noop() {
        let sink = RecordingSink::new();
        let mut agg = GamepadAggregator::new(Box::new(sink.clone()));

        agg.apply(StateChange::Digital {
            flag: ButtonFlags::A,
            pressed: true,
        });
        agg.flush();

        assert_eq!(sink.registrations(), 0);
        assert!(sink.states().is_empty());
        // State is still tracked locally
        assert_eq!(agg.state().button_flags, ButtonFlags::A);
    }

    #[test]
    fn test_press_a_press_b_release_a() {
        let (mut agg, sink) = registered();

        agg.apply(StateChange::Digital {
            flag: ButtonFlags::from_bits(0x0001),
            pressed: true,
        });
        agg.apply(StateChange::Digital {
            flag: ButtonFlags::from_bits(0x0002),
            pressed: true,
        });
        agg.apply(StateChange::Digital {
            flag: ButtonFlags::from_bits(0x0001),
            pressed: false,
        });

        assert_eq!(agg.state().button_flags.bits(), 0x0002);
        assert_eq!(sink.states().len(), 3);
    }

    #[test]
    fn test_stick_change_writes_both_axes_with_one_transmission() {
        let (mut agg, sink) = registered();
        agg.apply(StateChange::Stick {
            stick: StickId::Right,
            x: 0.25,
            y: -0.75,
        });

        assert_eq!(agg.state().stick(StickId::Right), (0.25, -0.75));
        assert_eq!(agg.state().stick(StickId::Left), (0.0, 0.0));
        assert_eq!(sink.states().len(), 1);
    }

    #[test]
    fn test_axis_is_clamped() {
        let (mut agg, _sink) = registered();
        agg.apply_axis(StickAxis::LeftX, 4.0);
        assert_eq!(agg.state().left_stick_x, 1.0);
    }

    #[test]
    fn test_trigger_overwrites_one_side() {
        let (mut agg, _sink) = registered();
        agg.apply_trigger(TriggerSide::Left, 255);
        agg.apply_trigger(TriggerSide::Right, 10);
        agg.apply_trigger(TriggerSide::Left, 0);
        assert_eq!(agg.state().left_trigger, 0);
        assert_eq!(agg.state().right_trigger, 10);
    }

    #[test]
    fn test_send_failure_is_swallowed() {
        let (mut agg, sink) = registered();
        sink.fail_sends(true);
        agg.apply(StateChange::Trigger {
            side: TriggerSide::Right,
            value: 255,
        });
        assert_eq!(agg.transmissions(), 0);

        sink.fail_sends(false);
        agg.flush();
        assert_eq!(agg.transmissions(), 1);
        assert_eq!(sink.states()[0].right_trigger, 255);
    }

    #[test]
    fn test_failed_registration_retries() {
        let sink = RecordingSink::new();
        sink.fail_registration(true);
        let mut agg = GamepadAggregator::new(Box::new(sink.clone()));

        agg.register_if_needed();
        assert!(!agg.handle().is_registered());

        sink.fail_registration(false);
        agg.register_if_needed();
        assert!(agg.handle().is_registered());
    }
}
