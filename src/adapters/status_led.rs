//! On-board WiFi status LED.
//!
//! Lit while the station has no link, dark once it is associated.  Most
//! dev boards wire the LED active-low, so the polarity is configurable.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct StatusLed<P> {
    pin: P,
    active_low: bool,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Takes the pin in whatever state it is in; the first WiFi event
    /// drives it.
    pub fn new(pin: P, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            lit: false,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn into_inner(self) -> P {
        self.pin
    }

    fn set(&mut self, lit: bool) {
        let high = lit != self.active_low;
        let res = if high { self.pin.set_high() } else { self.pin.set_low() };
        match res {
            Ok(()) => self.lit = lit,
            Err(e) => warn!("status LED write: {:?}", e),
        }
    }
}

impl<P: OutputPin> EventSink for StatusLed<P> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::WifiConnected => self.set(false),
            AppEvent::WifiDisconnected { .. } | AppEvent::WifiFailed { .. } => self.set(true),
            _ => {}
        }
    }
}
