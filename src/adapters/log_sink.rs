//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every application event through the
//! `log` facade.  Whatever logger the host installs (UART, syslog,
//! env_logger) decides where the lines end up.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::DoorStateChanged { from, to } => {
                info!("DOOR  | {} -> {}", from, to);
            }
            AppEvent::RelayFault => {
                warn!("DOOR  | relay pulse failed");
            }
            AppEvent::WifiConnected => {
                info!("WIFI  | connected");
            }
            AppEvent::WifiDisconnected { retry_count } => {
                info!("WIFI  | disconnected, retry={}", retry_count);
            }
            AppEvent::WifiFailed { retry_count } => {
                warn!("WIFI  | gave up after {} retries, long-interval retry armed", retry_count);
            }
            AppEvent::MqttConnected => {
                info!("MQTT  | connected");
            }
            AppEvent::MqttDisconnected { disconnect_count } => {
                info!("MQTT  | disconnected (#{})", disconnect_count);
            }
        }
    }
}
