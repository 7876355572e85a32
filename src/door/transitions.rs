//! Door transition table.
//!
//! One descriptor per [`DoorState`], indexed by `state as usize`.  Each
//! descriptor's `on_event` returns the destination state and whether the
//! transition is a commanded move (relay pulse + timeout guard).  `None`
//! means the event is irrelevant in that state and is absorbed.
//!
//! ```text
//!  From     │ Event          │ To      │ button │ timer
//! ──────────┼────────────────┼─────────┼────────┼──────
//!  Closed   │ SensorOpen     │ Opening │        │  ✓
//!  Closed   │ CommandOpen    │ Opening │   ✓    │  ✓
//!  Open     │ SensorClosed   │ Closed  │        │
//!  Open     │ CommandClose   │ Closing │   ✓    │  ✓
//!  Closing  │ SensorClosed   │ Closed  │        │
//!  Closing  │ TimerExpired   │ Unknown │        │
//!  Opening  │ SensorClosed   │ Closed  │        │
//!  Opening  │ TimerExpired   │ Open    │        │
//!  Unknown  │ SensorClosed   │ Closed  │        │
//!  Unknown  │ SensorOpen     │ Open    │        │
//!  Unknown  │ CommandOpen    │ Opening │   ✓    │  ✓
//!  Unknown  │ CommandClose   │ Closing │   ✓    │  ✓
//! ```

use super::{DoorEvent, DoorState};

/// Destination of one table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: DoorState,
    /// Pulse the relay to emulate a wall-button press.
    pub press_button: bool,
    /// Arm the opening/closing timeout guard.
    pub start_timer: bool,
}

impl Transition {
    /// Sensor-observed move: no relay, no timer.
    const fn observed(to: DoorState) -> Self {
        Self {
            to,
            press_button: false,
            start_timer: false,
        }
    }

    /// Sensor-observed move that leaves the door in motion.
    const fn observed_moving(to: DoorState) -> Self {
        Self {
            to,
            press_button: false,
            start_timer: true,
        }
    }

    /// Commanded move: pulse the relay and guard it with the timer.
    const fn commanded(to: DoorState) -> Self {
        Self {
            to,
            press_button: true,
            start_timer: true,
        }
    }
}

/// Per-state event handler.
pub type EventHandlerFn = fn(DoorEvent) -> Option<Transition>;

/// Static descriptor for a single door state.
pub struct StateDescriptor {
    pub id: DoorState,
    pub name: &'static str,
    pub on_event: EventHandlerFn,
}

/// Build the complete table.  Row order must match `DoorState`'s
/// discriminants.
pub const fn build_transition_table() -> [StateDescriptor; DoorState::COUNT] {
    [
        StateDescriptor {
            id: DoorState::Closed,
            name: "CLOSED",
            on_event: closed_on_event,
        },
        StateDescriptor {
            id: DoorState::Open,
            name: "OPEN",
            on_event: open_on_event,
        },
        StateDescriptor {
            id: DoorState::Closing,
            name: "CLOSING",
            on_event: closing_on_event,
        },
        StateDescriptor {
            id: DoorState::Opening,
            name: "OPENING",
            on_event: opening_on_event,
        },
        StateDescriptor {
            id: DoorState::Unknown,
            name: "UNKNOWN",
            on_event: unknown_on_event,
        },
    ]
}

// ── Closed ────────────────────────────────────────────────────

fn closed_on_event(event: DoorEvent) -> Option<Transition> {
    match event {
        // Someone used the wall button or the remote.
        DoorEvent::SensorOpen => Some(Transition::observed_moving(DoorState::Opening)),
        DoorEvent::CommandOpen => Some(Transition::commanded(DoorState::Opening)),
        _ => None,
    }
}

// ── Open ──────────────────────────────────────────────────────

fn open_on_event(event: DoorEvent) -> Option<Transition> {
    match event {
        DoorEvent::SensorClosed => Some(Transition::observed(DoorState::Closed)),
        DoorEvent::CommandClose => Some(Transition::commanded(DoorState::Closing)),
        _ => None,
    }
}

// ── Closing ───────────────────────────────────────────────────

fn closing_on_event(event: DoorEvent) -> Option<Transition> {
    match event {
        DoorEvent::SensorClosed => Some(Transition::observed(DoorState::Closed)),
        // The reed switch never confirmed closure.
        DoorEvent::TimerExpired => Some(Transition::observed(DoorState::Unknown)),
        _ => None,
    }
}

// ── Opening ───────────────────────────────────────────────────

fn opening_on_event(event: DoorEvent) -> Option<Transition> {
    match event {
        // Door reversed mid-travel.
        DoorEvent::SensorClosed => Some(Transition::observed(DoorState::Closed)),
        // No open-limit sensor: travel time elapsed means fully open.
        DoorEvent::TimerExpired => Some(Transition::observed(DoorState::Open)),
        _ => None,
    }
}

// ── Unknown ───────────────────────────────────────────────────

fn unknown_on_event(event: DoorEvent) -> Option<Transition> {
    match event {
        DoorEvent::SensorClosed => Some(Transition::observed(DoorState::Closed)),
        DoorEvent::SensorOpen => Some(Transition::observed(DoorState::Open)),
        DoorEvent::CommandOpen => Some(Transition::commanded(DoorState::Opening)),
        DoorEvent::CommandClose => Some(Transition::commanded(DoorState::Closing)),
        _ => None,
    }
}
