//! Garage door state machine: pure logic, no hardware.
//!
//! ```text
//!   sensor / command / tick ──▶ DoorMachine ──▶ DoorTransitionResult
//!                                   │              (publish, relay, timer)
//!                                   └─ table lookup (transitions.rs)
//! ```
//!
//! The machine never performs I/O.  Every call returns a
//! [`DoorTransitionResult`] describing what the caller should do next;
//! the caller owns the relay, the MQTT client and the tick source.
//!
//! Sensor events are ground truth.  Commands are intents: they pulse the
//! relay and arm a timeout guard, because the door's real motion is not
//! observed until the reed switch or the timeout resolves it.  Opening
//! and Closing are the only states with a running timer; landing on
//! Closed or Open always stops and zeroes it.

pub mod transitions;

use core::fmt;

use transitions::{StateDescriptor, build_transition_table};

/// Default opening/closing timeout.
pub const DEFAULT_TIMEOUT_MS: u32 = 15_000;

static TRANSITION_TABLE: [StateDescriptor; DoorState::COUNT] = build_transition_table();

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Believed physical position of the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DoorState {
    Closed = 0,
    Open = 1,
    Closing = 2,
    Opening = 3,
    /// Safe startup default and the outcome of an unresolved close.
    #[default]
    Unknown = 4,
}

impl DoorState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 5;

    /// Every state, in discriminant order.
    pub const ALL: [DoorState; Self::COUNT] = [
        Self::Closed,
        Self::Open,
        Self::Closing,
        Self::Opening,
        Self::Unknown,
    ];

    /// Convert an index back to `DoorState`.  Out-of-range indices map to
    /// `Unknown`.
    pub fn from_index(idx: usize) -> Self {
        Self::ALL.get(idx).copied().unwrap_or(Self::Unknown)
    }

    /// Lowercase wire form published as the status payload.
    ///
    /// Downstream subscribers match these literals exactly.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Opening => "opening",
            Self::Unknown => "unknown",
        }
    }

    /// Parse the lowercase wire form.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_str() == s)
    }

    /// Closed and Open are settled; the timeout timer never runs there.
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Closed | Self::Open)
    }
}

/// Uppercase display form for logs.
impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(TRANSITION_TABLE[*self as usize].name)
    }
}

// ---------------------------------------------------------------------------
// Events and results
// ---------------------------------------------------------------------------

/// Inputs to the door machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DoorEvent {
    /// Ignored in every state.
    #[default]
    None,
    /// Reed switch reports the door closed.
    SensorClosed,
    /// Reed switch reports the door not closed.
    SensorOpen,
    CommandOpen,
    CommandClose,
    /// The opening/closing timeout elapsed.
    TimerExpired,
}

/// Side effects the caller should perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoorActions {
    /// Publish the new state string (retained).
    pub publish_state: bool,
    /// Pulse the relay to emulate a button press.
    pub trigger_button_press: bool,
    /// A timeout guard was armed for this move.
    pub start_timeout_timer: bool,
}

impl DoorActions {
    pub const NONE: Self = Self {
        publish_state: false,
        trigger_button_press: false,
        start_timeout_timer: false,
    };

    pub fn any(&self) -> bool {
        self.publish_state || self.trigger_button_press || self.start_timeout_timer
    }
}

/// Complete output of one event application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorTransitionResult {
    pub new_state: DoorState,
    pub state_changed: bool,
    pub actions: DoorActions,
}

impl DoorTransitionResult {
    /// Result returned when there is no machine to act on.
    pub const fn inert() -> Self {
        Self::unchanged(DoorState::Unknown)
    }

    /// No-op result that reports `state` as current.
    pub const fn unchanged(state: DoorState) -> Self {
        Self {
            new_state: state,
            state_changed: false,
            actions: DoorActions::NONE,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorConfig {
    /// How long Opening/Closing may last before the timer resolves it.
    /// Zero selects [`DEFAULT_TIMEOUT_MS`].
    pub timeout_ms: u32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Door state machine instance.
///
/// Owned by exactly one consumer; mutated only through
/// [`process_event`](Self::process_event) and
/// [`update_timer`](Self::update_timer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorMachine {
    current_state: DoorState,
    timeout_ms: u32,
    timer_elapsed_ms: u32,
    timer_active: bool,
}

impl Default for DoorMachine {
    fn default() -> Self {
        Self::with_default_timeout(DoorState::Unknown)
    }
}

impl DoorMachine {
    pub fn new(initial_state: DoorState, config: DoorConfig) -> Self {
        let timeout_ms = if config.timeout_ms > 0 {
            config.timeout_ms
        } else {
            DEFAULT_TIMEOUT_MS
        };
        Self {
            current_state: initial_state,
            timeout_ms,
            timer_elapsed_ms: 0,
            timer_active: false,
        }
    }

    pub fn with_default_timeout(initial_state: DoorState) -> Self {
        Self::new(initial_state, DoorConfig::default())
    }

    /// Apply one event and report what the caller must do.
    pub fn process_event(&mut self, event: DoorEvent) -> DoorTransitionResult {
        let current = self.current_state;
        let transition = (TRANSITION_TABLE[current as usize].on_event)(event);

        let (new_state, press, arm) = match transition {
            Some(t) => (t.to, t.press_button, t.start_timer),
            None => (current, false, false),
        };
        let changed = new_state != current;

        self.current_state = new_state;

        if arm {
            self.timer_active = true;
            self.timer_elapsed_ms = 0;
        }
        // Settled states never keep a running timer.
        if new_state.is_settled() {
            self.timer_active = false;
            self.timer_elapsed_ms = 0;
        }

        DoorTransitionResult {
            new_state,
            state_changed: changed,
            actions: DoorActions {
                publish_state: changed,
                trigger_button_press: press,
                start_timeout_timer: arm,
            },
        }
    }

    /// Advance the timeout timer by `delta_ms`.
    ///
    /// Has no effect unless a timer is running.  Once the accumulated time
    /// reaches the timeout, the timer is cleared and a synthetic
    /// [`DoorEvent::TimerExpired`] is dispatched in the same call.
    pub fn update_timer(&mut self, delta_ms: u32) -> DoorTransitionResult {
        if !self.timer_active {
            return DoorTransitionResult::unchanged(self.current_state);
        }

        self.timer_elapsed_ms = self.timer_elapsed_ms.saturating_add(delta_ms);

        if self.timer_elapsed_ms >= self.timeout_ms {
            self.timer_active = false;
            self.timer_elapsed_ms = 0;
            return self.process_event(DoorEvent::TimerExpired);
        }

        DoorTransitionResult::unchanged(self.current_state)
    }

    pub fn state(&self) -> DoorState {
        self.current_state
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn timer_elapsed_ms(&self) -> u32 {
        self.timer_elapsed_ms
    }

    pub fn is_timer_active(&self) -> bool {
        self.timer_active
    }
}

// ---------------------------------------------------------------------------
// Handle-optional entry points
// ---------------------------------------------------------------------------
//
// For call sites that may not have a machine yet (e.g. a timer firing
// before boot finished).  A missing machine yields an inert result.

pub fn process_event(machine: Option<&mut DoorMachine>, event: DoorEvent) -> DoorTransitionResult {
    machine.map_or(DoorTransitionResult::inert(), |m| m.process_event(event))
}

pub fn update_timer(machine: Option<&mut DoorMachine>, delta_ms: u32) -> DoorTransitionResult {
    machine.map_or(DoorTransitionResult::inert(), |m| m.update_timer(delta_ms))
}

pub fn current_state(machine: Option<&DoorMachine>) -> DoorState {
    machine.map_or(DoorState::Unknown, DoorMachine::state)
}

pub fn is_timer_active(machine: Option<&DoorMachine>) -> bool {
    machine.is_some_and(DoorMachine::is_timer_active)
}

pub fn timer_elapsed_ms(machine: Option<&DoorMachine>) -> u32 {
    machine.map_or(0, DoorMachine::timer_elapsed_ms)
}
