//! Opener button relay.
//!
//! The relay is wired across the opener's wall-button terminals, so a
//! short closure looks exactly like someone pressing the button.  Any
//! `embedded-hal` output pin and delay provider will do.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::RelayPort;
use crate::config::ControllerConfig;
use crate::error::{ActuatorError, Result};

/// Default relay closure.
pub const DEFAULT_PULSE_MS: u32 = 500;

pub struct RelayPulser<P, D> {
    pin: P,
    delay: D,
    pulse_ms: u32,
}

impl<P, D> RelayPulser<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D, pulse_ms: u32) -> Self {
        Self { pin, delay, pulse_ms }
    }

    /// Pulse width taken from `relay_pulse_ms`.
    pub fn from_config(pin: P, delay: D, config: &ControllerConfig) -> Self {
        Self::new(pin, delay, config.relay_pulse_ms)
    }

    pub fn pulse_ms(&self) -> u32 {
        self.pulse_ms
    }

    /// Give back the pin and delay provider.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P, D> RelayPort for RelayPulser<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Blocks for the pulse width.
    fn pulse(&mut self) -> Result<()> {
        self.pin.set_high().map_err(|e| {
            warn!("relay set_high: {:?}", e);
            ActuatorError::GpioWriteFailed
        })?;
        self.delay.delay_ms(self.pulse_ms);
        self.pin.set_low().map_err(|e| {
            warn!("relay set_low: {:?}", e);
            ActuatorError::GpioWriteFailed
        })?;
        Ok(())
    }
}
