//! Garage door controller library.
//!
//! The control core of a networked garage door opener: a door position
//! state machine plus WiFi and MQTT reconnection policies, all pure and
//! host-testable, wired to the outside world through port traits.
//!
//! ```text
//!   reed ISR / MQTT cb / tick ──▶ EventQueue ──▶ ControlService ──▶ ports
//!                                                 door · wifi · mqtt
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod door;
pub mod error;
pub mod events;
pub mod retry;

pub use app::service::ControlService;
pub use config::ControllerConfig;
pub use door::{DoorEvent, DoorMachine, DoorState, DoorTransitionResult};
pub use error::{Error, Result};
pub use events::{ControlEvent, EventQueue};
