//! Pin definitions of the three-phase power stage and the Hall sensor inputs.
use hal::gpio::{Pin, PinMode, Port};

pub mod driver;
pub mod hall;

/// Represents the definition of a GPIO pin.
pub struct PinDef {
    /// The port to which the pin belongs (e.g., Port::A, Port::B).
    port: Port,
    /// The pin number within the port.
    pin: u8,
    /// The mode of the pin (e.g., Output, Input, Alternate function).
    mode: PinMode,
}

impl PinDef {
    pub const fn new(port: Port, pin: u8, mode: PinMode) -> PinDef {
        PinDef { port, pin, mode }
    }

    /// Pin number, also the EXTI line it triggers
    pub const fn line(&self) -> u8 {
        self.pin
    }

    /// Converts the PinDef struct to a Pin struct. Useful for predefined pin configurations.
    /// # Example
    /// ```ignore
    /// let mut gate_enable = ENABLE.init();
    /// gate_enable.set_high();
    /// ```
    pub fn init(&self) -> Pin {
        Pin::new(self.port, self.pin, self.mode)
    }
}
