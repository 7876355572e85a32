//! Reed switch on the door's closed limit.
//!
//! Wired to ground with a pull-up: the magnet closes the switch (pin low)
//! when the door is fully down.  Anything else reads high.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::SensorPort;
use crate::error::{Result, SensorError};
use crate::events::SensorLevel;

pub struct ReedSwitch<P> {
    pin: P,
}

impl<P: InputPin> ReedSwitch<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> SensorPort for ReedSwitch<P> {
    fn level(&mut self) -> Result<SensorLevel> {
        let low = self.pin.is_low().map_err(|e| {
            warn!("reed switch read: {:?}", e);
            SensorError::GpioReadFailed
        })?;
        Ok(SensorLevel::from_is_low(low))
    }
}
