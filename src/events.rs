//! Typed control events and the serializing event queue.
//!
//! Events are produced by:
//! - the reed switch interrupt (level change)
//! - the MQTT message callback (OPEN / CLOSE commands)
//! - the periodic tick timer
//! - WiFi / MQTT driver callbacks and the WiFi long-interval retry timer
//!
//! and consumed one at a time by the control task that owns the state
//! machines.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌────────────────┐
//! │ Reed ISR     │────▶│              │     │                │
//! │ MQTT cb      │────▶│  EventQueue  │────▶│ ControlService │
//! │ Tick timer   │────▶│  (bounded)   │     │  (consumer)    │
//! │ WiFi / MQTT  │────▶│              │     │                │
//! └──────────────┘     └──────────────┘     └────────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::commands::DoorCommand;
use crate::door::DoorEvent;

/// Pending-event depth used by the firmware's control queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 8;

// ── Event types ───────────────────────────────────────────────

/// Raw reed switch level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorLevel {
    /// Switch pulled to ground: door closed.
    Low,
    High,
}

impl SensorLevel {
    pub fn from_is_low(is_low: bool) -> Self {
        if is_low { Self::Low } else { Self::High }
    }

    pub fn to_door_event(self) -> DoorEvent {
        match self {
            Self::Low => DoorEvent::SensorClosed,
            Self::High => DoorEvent::SensorOpen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiSignal {
    /// Station interface is up; first association attempt may begin.
    StaStarted,
    Disconnected,
    GotIp,
    /// The long-interval retry timer fired.
    RetryTimerExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MqttSignal {
    Connected,
    Disconnected,
}

/// Everything the control task reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Sensor(SensorLevel),
    Command(DoorCommand),
    Tick { delta_ms: u32 },
    Wifi(WifiSignal),
    Mqtt(MqttSignal),
    /// Re-read the reed switch and feed the result to the door machine.
    SensorResync,
}

impl ControlEvent {
    /// Door machine input carried by this event, if any.
    pub fn door_event(self) -> Option<DoorEvent> {
        match self {
            Self::Sensor(level) => Some(level.to_door_event()),
            Self::Command(cmd) => Some(cmd.to_door_event()),
            _ => None,
        }
    }
}

// ── Queue ─────────────────────────────────────────────────────

/// Bounded multi-producer / single-consumer hand-off.
///
/// Producers may run in interrupt or callback context; `push` never
/// blocks.  Only the control task should call `pop` / `drain`, which keeps
/// the state machines single-writer.
pub struct EventQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, ControlEvent, N>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue an event.  Returns `false` if the queue is full (event
    /// dropped).
    pub fn push(&self, event: ControlEvent) -> bool {
        self.channel.try_send(event).is_ok()
    }

    /// Dequeue the oldest event.
    pub fn pop(&self) -> Option<ControlEvent> {
        self.channel.try_receive().ok()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(ControlEvent)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
