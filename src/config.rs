//! Controller configuration parameters
//!
//! All tunable parameters for the garage door controller.  Values can be
//! overridden by loading a JSON document; any field left out keeps its
//! default.

use anyhow::{Context, anyhow};
use heapless::String;
use serde::{Deserialize, Serialize};

use crate::adapters::relay::DEFAULT_PULSE_MS;
use crate::app::ports::QoS;
use crate::door::{DEFAULT_TIMEOUT_MS, DoorConfig};
use crate::error::{Error, Result};
use crate::retry::wifi::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL_MS};

/// Fixed capacity of every topic string.
pub const TOPIC_CAPACITY: usize = 64;

/// Fixed capacity of availability payload strings.
pub const PAYLOAD_CAPACITY: usize = 16;

pub type Topic = String<TOPIC_CAPACITY>;
pub type Payload = String<PAYLOAD_CAPACITY>;

/// MQTT topics and availability payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Retained door state (`"closed"`, `"opening"`, ...).
    pub status: Topic,
    /// Retained online/offline marker; also the last-will topic.
    pub availability: Topic,
    /// Inbound `OPEN` / `CLOSE` commands.
    pub command: Topic,
    pub available_payload: Payload,
    /// Last-will payload the broker publishes if the controller drops.
    pub unavailable_payload: Payload,
    /// Delivery guarantee for every publish, subscription and the last will.
    pub qos: QoS,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            status: bounded("garage_door/status"),
            availability: bounded("garage_door/availability"),
            command: bounded("garage_door/buttonpress"),
            available_payload: bounded("available"),
            unavailable_payload: bounded("unavailable"),
            qos: QoS::AtMostOnce,
        }
    }
}

impl TopicConfig {
    /// Topics used on a bench unit so it never drives the real door's
    /// subscribers.
    pub fn test_mode() -> Self {
        Self {
            status: bounded("garage_door/status_TEST"),
            availability: bounded("garage_door/availability_TEST"),
            command: bounded("garage_door/buttonpress_TEST"),
            ..Self::default()
        }
    }
}

/// Broker connection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String<TOPIC_CAPACITY>,
    pub port: u16,
    /// Restart the client after every disconnect.
    pub auto_reconnect: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            auto_reconnect: true,
        }
    }
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Door ---
    /// Opening/closing timeout (milliseconds)
    pub door_timeout_ms: u32,
    /// Period of the tick that drives the door timer (milliseconds)
    pub tick_period_ms: u32,
    /// How long the relay holds the button closed (milliseconds)
    pub relay_pulse_ms: u32,

    // --- WiFi ---
    /// Immediate reconnect attempts before backing off
    pub wifi_max_retries: u32,
    /// Long-interval retry period once immediate retries are spent (milliseconds)
    pub wifi_retry_interval_ms: u32,

    // --- MQTT ---
    pub broker: BrokerConfig,
    pub topics: TopicConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            door_timeout_ms: DEFAULT_TIMEOUT_MS,
            tick_period_ms: 100, // 10 Hz
            relay_pulse_ms: DEFAULT_PULSE_MS,

            wifi_max_retries: DEFAULT_MAX_RETRIES,
            wifi_retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS, // 30 min

            broker: BrokerConfig::default(),
            topics: TopicConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Reject values the control loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be non-zero"));
        }
        if self.relay_pulse_ms == 0 {
            return Err(Error::Config("relay_pulse_ms must be non-zero"));
        }
        if self.tick_period_ms >= self.door_config().timeout_ms {
            return Err(Error::Config("tick_period_ms must be shorter than door_timeout_ms"));
        }
        let t = &self.topics;
        if t.status.is_empty() || t.availability.is_empty() || t.command.is_empty() {
            return Err(Error::Config("MQTT topics must not be empty"));
        }
        Ok(())
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| anyhow!("malformed controller config: {e}"))?;
        config
            .validate()
            .context("controller config rejected")?;
        Ok(config)
    }

    /// Door machine settings.  A zero timeout selects the default.
    pub fn door_config(&self) -> DoorConfig {
        DoorConfig {
            timeout_ms: if self.door_timeout_ms > 0 {
                self.door_timeout_ms
            } else {
                DEFAULT_TIMEOUT_MS
            },
        }
    }
}

/// Copy a literal into a bounded string, yielding an empty string if it
/// does not fit.
fn bounded<const N: usize>(s: &str) -> String<N> {
    String::try_from(s).unwrap_or_default()
}
