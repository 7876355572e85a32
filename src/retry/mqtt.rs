//! MQTT broker reconnection policy.
//!
//! Tracks broker connectivity and a lifetime disconnect counter.  The
//! policy only decides *whether* a reconnect attempt should follow a
//! disconnect; the transport layer establishes the link.

/// What the caller should do after a connectivity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MqttRetryAction {
    #[default]
    None,
    /// Restart the MQTT client.
    Reconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MqttRetryResult {
    pub action: MqttRetryAction,
    pub should_callback_connected: bool,
    pub should_callback_disconnected: bool,
}

/// Broker connectivity tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttRetryState {
    is_connected: bool,
    /// Lifetime counter; reconnecting never resets it.
    disconnect_count: u32,
    should_reconnect: bool,
}

impl MqttRetryState {
    pub fn new(auto_reconnect: bool) -> Self {
        Self {
            is_connected: false,
            disconnect_count: 0,
            should_reconnect: auto_reconnect,
        }
    }

    pub fn on_disconnect(&mut self) -> MqttRetryResult {
        self.is_connected = false;
        self.disconnect_count = self.disconnect_count.saturating_add(1);

        MqttRetryResult {
            action: if self.should_reconnect {
                MqttRetryAction::Reconnect
            } else {
                MqttRetryAction::None
            },
            should_callback_connected: false,
            should_callback_disconnected: true,
        }
    }

    pub fn on_connected(&mut self) -> MqttRetryResult {
        self.is_connected = true;

        MqttRetryResult {
            action: MqttRetryAction::None,
            should_callback_connected: true,
            should_callback_disconnected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn disconnect_count(&self) -> u32 {
        self.disconnect_count
    }

    pub fn auto_reconnect(&self) -> bool {
        self.should_reconnect
    }
}

impl Default for MqttRetryState {
    fn default() -> Self {
        Self::new(true)
    }
}

// ── Handle-optional entry points ──────────────────────────────

pub fn on_disconnect(state: Option<&mut MqttRetryState>) -> MqttRetryResult {
    state.map_or_else(MqttRetryResult::default, MqttRetryState::on_disconnect)
}

pub fn on_connected(state: Option<&mut MqttRetryState>) -> MqttRetryResult {
    state.map_or_else(MqttRetryResult::default, MqttRetryState::on_connected)
}

pub fn disconnect_count(state: Option<&MqttRetryState>) -> u32 {
    state.map_or(0, MqttRetryState::disconnect_count)
}

pub fn is_connected(state: Option<&MqttRetryState>) -> bool {
    state.is_some_and(MqttRetryState::is_connected)
}
