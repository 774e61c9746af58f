use hal::gpio::{self, Edge, Pin, Pull};

use super::pinout;

/// Three Hall sensors with an interrupt on every edge.
pub struct HallSensor {
    pins: [Pin; 3],
}

impl HallSensor {
    const LINES: [u8; 3] = [
        pinout::hall::HALL_1.line(),
        pinout::hall::HALL_2.line(),
        pinout::hall::HALL_3.line(),
    ];

    pub fn new() -> Self {
        let mut pins = [
            pinout::hall::HALL_1.init(),
            pinout::hall::HALL_2.init(),
            pinout::hall::HALL_3.init(),
        ];
        // Open-collector sensors
        for pin in pins.iter_mut() {
            pin.pull(Pull::Up);
            pin.enable_interrupt(Edge::Either);
        }
        HallSensor { pins }
    }

    /// Raw code, bit0 = HALL_1 .. bit2 = HALL_3
    pub fn read_raw(&self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .fold(0, |code, (bit, pin)| code | ((pin.is_high() as u8) << bit))
    }

    /// Clears the pending EXTI flags of the three sensor lines
    pub fn clear_interrupts(&mut self) {
        for line in Self::LINES {
            gpio::clear_exti_interrupt(line);
        }
    }
}
