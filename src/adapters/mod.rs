//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements  | Connects to                     |
//! |---------------|-------------|---------------------------------|
//! | `log_sink`    | EventSink   | `log` facade                    |
//! | `relay`       | RelayPort   | `embedded-hal` output + delay   |
//! | `reed_switch` | SensorPort  | `embedded-hal` input            |
//! | `status_led`  | EventSink   | `embedded-hal` output           |
//!
//! The MQTT client, WiFi driver and retry timer are platform services;
//! hosts implement [`MqttPort`](crate::app::ports::MqttPort),
//! [`WifiPort`](crate::app::ports::WifiPort) and
//! [`RetryTimerPort`](crate::app::ports::RetryTimerPort) over them.

pub mod log_sink;
pub mod relay;
pub mod reed_switch;
pub mod status_led;
