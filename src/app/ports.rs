//! Port traits: the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (relay, reed switch, MQTT client, WiFi driver, retry
//! timer, event sink) implement these traits.  The
//! [`ControlService`](super::service::ControlService) consumes them via
//! generics, so the control core never touches hardware or a network
//! stack directly.
//!
//! Every fallible call returns the crate [`Result`]; the service logs
//! failures and carries on, since no collaborator error is fatal to the
//! door logic.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::SensorLevel;

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Relay port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Emulates a press of the opener's wall button.
pub trait RelayPort {
    /// Close the relay for the configured pulse width, then release it.
    fn pulse(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Reed switch on the closed-limit of the door.
pub trait SensorPort {
    /// Current switch level.
    fn level(&mut self) -> Result<SensorLevel>;
}

// ───────────────────────────────────────────────────────────────
// MQTT port (domain ↔ broker)
// ───────────────────────────────────────────────────────────────

/// MQTT delivery guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum QoS {
    #[default]
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

/// Message the broker publishes on the controller's behalf if the link
/// drops without a clean disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastWill<'a> {
    pub topic: &'a str,
    pub payload: &'a str,
    pub qos: QoS,
    pub retain: bool,
}

/// Everything the client needs to (re)open a broker session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MqttSession<'a> {
    pub host: &'a str,
    pub port: u16,
    pub will: LastWill<'a>,
}

/// The MQTT client.  Connection events flow back in as
/// [`MqttSignal`](crate::events::MqttSignal)s and inbound messages as
/// [`DoorCommand`](super::commands::DoorCommand)s.
pub trait MqttPort {
    /// Start (or restart) the client; connecting is asynchronous.
    fn start(&mut self, session: &MqttSession<'_>) -> Result<()>;

    fn publish(&mut self, topic: &str, payload: &str, qos: QoS, retain: bool) -> Result<()>;

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// WiFi port (domain → station driver)
// ───────────────────────────────────────────────────────────────

pub trait WifiPort {
    /// Begin one association attempt.  The outcome arrives later as a
    /// [`WifiSignal`](crate::events::WifiSignal).
    fn connect(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Retry timer port (domain → timer facility)
// ───────────────────────────────────────────────────────────────

/// The WiFi long-interval retry timer.
///
/// Periodic.  Each expiry is reported as
/// [`WifiSignal::RetryTimerExpired`](crate::events::WifiSignal::RetryTimerExpired).
pub trait RetryTimerPort {
    /// Arm the timer with `period_ms`; restarts it if already running.
    fn start_timer(&mut self, period_ms: u32) -> Result<()>;

    fn stop_timer(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

/// Fan out to two sinks, e.g. a logger and a status LED.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Combined I/O bundle
// ───────────────────────────────────────────────────────────────

/// Every driven port the service needs, as one bound.
///
/// Passing a single `&mut impl ControllerIo` avoids juggling five mutable
/// borrows at each call site.  Implemented automatically.
pub trait ControllerIo: RelayPort + SensorPort + MqttPort + WifiPort + RetryTimerPort {}

impl<T> ControllerIo for T where T: RelayPort + SensorPort + MqttPort + WifiPort + RetryTimerPort {}
