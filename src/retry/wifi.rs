//! WiFi access-point reconnection policy.
//!
//! Two tiers:
//!
//! ```text
//!   disconnect ──▶ retry_count < max ──▶ Connect (immediate retry)
//!              └─▶ budget exhausted ───▶ Fail    (arm long-interval timer)
//!
//!   timer fired ─▶ retry_count = 0 ─────▶ Connect (fresh cycle)
//!   got IP ──────▶ retry_count = 0 ─────▶ StopTimer if it was running
//! ```
//!
//! With `max_retries = N` the policy allows exactly N immediate retries;
//! the (N + 1)-th consecutive disconnect is the one that returns `Fail`.

/// Default number of immediate retries before backing off.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Default long-interval retry period (30 minutes).
pub const DEFAULT_RETRY_INTERVAL_MS: u32 = 30 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WifiRetryAction {
    #[default]
    None,
    /// Attempt to associate with the access point now.
    Connect,
    /// Stop the long-interval retry timer.
    StopTimer,
    /// Immediate retries exhausted; arm the long-interval timer.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WifiRetryResult {
    pub action: WifiRetryAction,
    pub should_callback_connected: bool,
    pub should_callback_disconnected: bool,
    pub should_callback_failed: bool,
    /// Retry count to report alongside the disconnected/failed callback.
    pub callback_retry_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiRetryState {
    retry_count: u32,
    max_retries: u32,
    retry_interval_ms: u32,
    is_connected: bool,
    timer_should_be_running: bool,
}

impl WifiRetryState {
    pub fn new(max_retries: u32, retry_interval_ms: u32) -> Self {
        Self {
            retry_count: 0,
            max_retries,
            retry_interval_ms,
            is_connected: false,
            timer_should_be_running: false,
        }
    }

    pub fn on_disconnect(&mut self) -> WifiRetryResult {
        self.is_connected = false;

        if self.retry_count < self.max_retries {
            self.retry_count += 1;
            WifiRetryResult {
                action: WifiRetryAction::Connect,
                should_callback_disconnected: true,
                callback_retry_count: self.retry_count,
                ..WifiRetryResult::default()
            }
        } else {
            self.timer_should_be_running = true;
            WifiRetryResult {
                action: WifiRetryAction::Fail,
                should_callback_disconnected: true,
                should_callback_failed: true,
                callback_retry_count: self.retry_count,
                ..WifiRetryResult::default()
            }
        }
    }

    pub fn on_connected(&mut self) -> WifiRetryResult {
        self.is_connected = true;
        self.retry_count = 0;

        let action = if self.timer_should_be_running {
            self.timer_should_be_running = false;
            WifiRetryAction::StopTimer
        } else {
            WifiRetryAction::None
        };

        WifiRetryResult {
            action,
            should_callback_connected: true,
            ..WifiRetryResult::default()
        }
    }

    /// The long-interval timer fired: start a fresh retry cycle.
    ///
    /// The timer is periodic, so `timer_should_be_running` stays set until
    /// a connect stops it.
    pub fn on_timer_expired(&mut self) -> WifiRetryResult {
        self.retry_count = 0;
        WifiRetryResult {
            action: WifiRetryAction::Connect,
            ..WifiRetryResult::default()
        }
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn retry_interval_ms(&self) -> u32 {
        self.retry_interval_ms
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn timer_should_be_running(&self) -> bool {
        self.timer_should_be_running
    }
}

impl Default for WifiRetryState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL_MS)
    }
}

// ── Handle-optional entry points ──────────────────────────────

pub fn on_disconnect(state: Option<&mut WifiRetryState>) -> WifiRetryResult {
    state.map_or_else(WifiRetryResult::default, WifiRetryState::on_disconnect)
}

pub fn on_connected(state: Option<&mut WifiRetryState>) -> WifiRetryResult {
    state.map_or_else(WifiRetryResult::default, WifiRetryState::on_connected)
}

pub fn on_timer_expired(state: Option<&mut WifiRetryState>) -> WifiRetryResult {
    state.map_or_else(WifiRetryResult::default, WifiRetryState::on_timer_expired)
}

pub fn retry_count(state: Option<&WifiRetryState>) -> u32 {
    state.map_or(0, WifiRetryState::retry_count)
}

pub fn is_connected(state: Option<&WifiRetryState>) -> bool {
    state.is_some_and(WifiRetryState::is_connected)
}

pub fn timer_should_run(state: Option<&WifiRetryState>) -> bool {
    state.is_some_and(WifiRetryState::timer_should_be_running)
}
