//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port whenever a state
//! machine asks for a callback.  Adapters on the other side decide what to
//! do with them: log to serial, drive a status LED, count reconnects.

use crate::door::DoorState;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The door machine moved between states.
    DoorStateChanged { from: DoorState, to: DoorState },

    /// A relay pulse was requested but the relay could not be driven.
    RelayFault,

    WifiConnected,

    /// Association lost; `retry_count` immediate retries used so far.
    WifiDisconnected { retry_count: u32 },

    /// Immediate retries exhausted; long-interval retry armed.
    WifiFailed { retry_count: u32 },

    MqttConnected,

    /// Broker link lost; lifetime disconnect counter.
    MqttDisconnected { disconnect_count: u32 },
}
