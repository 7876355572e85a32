//! Connectivity reconnection policies.
//!
//! Both policies follow the door machine's shape: the caller reports what
//! happened (`on_disconnect`, `on_connected`, ...) and gets back a result
//! record naming the action to take and which callbacks are due.  Neither
//! policy touches the network or a timer itself.

pub mod mqtt;
pub mod wifi;

pub use mqtt::{MqttRetryAction, MqttRetryResult, MqttRetryState};
pub use wifi::{WifiRetryAction, WifiRetryResult, WifiRetryState};
