//! Fuzz target: `DoorMachine` event/tick sequences
//!
//! Each input byte selects an event (low 3 bits) or a tick whose delta is
//! derived from the remaining bits.  After every step the timer invariants
//! must hold and `publish_state` must equal `state_changed`.
//!
//! cargo fuzz run fuzz_door_events

#![no_main]

use garagedoor::door::{DoorEvent, DoorMachine, DoorState};
use libfuzzer_sys::fuzz_target;

const EVENTS: [DoorEvent; 6] = [
    DoorEvent::None,
    DoorEvent::SensorClosed,
    DoorEvent::SensorOpen,
    DoorEvent::CommandOpen,
    DoorEvent::CommandClose,
    DoorEvent::TimerExpired,
];

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let mut sm = DoorMachine::with_default_timeout(DoorState::from_index(usize::from(first % 5)));

    for &b in rest {
        let selector = usize::from(b & 0x07);
        let r = if selector < EVENTS.len() {
            sm.process_event(EVENTS[selector])
        } else {
            sm.update_timer(u32::from(b >> 3) * 1_000)
        };

        assert_eq!(r.state_changed, r.actions.publish_state);
        assert_eq!(r.new_state, sm.state());
        if sm.state().is_settled() {
            assert!(!sm.is_timer_active());
            assert_eq!(sm.timer_elapsed_ms(), 0);
        }
        if sm.is_timer_active() {
            assert!(sm.timer_elapsed_ms() < sm.timeout_ms());
        }
    }
});
