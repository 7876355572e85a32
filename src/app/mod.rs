//! Application core: orchestration of the pure state machines.
//!
//! This module wires the door machine and the two reconnection policies
//! to the outside world.  All interaction with hardware and the network
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
