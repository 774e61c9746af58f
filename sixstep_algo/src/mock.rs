// Recording PwmPeripheral used by the unit tests.

use crate::motor_driver::{LegMask, Phase, PwmPeripheral};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmWrite {
    Period { period: u16, dead_time: u16 },
    Duty { phase: Phase, high: u16, low: u16 },
    Outputs(LegMask),
}

/// Mirrors the registers and keeps every write in order
#[derive(Debug, Default)]
pub struct RecordingPwm {
    pub period: u16,
    pub dead_time: u16,
    pub duty: [(u16, u16); 3],
    pub outputs: LegMask,
    pub writes: Vec<PwmWrite>,
}

impl RecordingPwm {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PwmPeripheral for RecordingPwm {
    fn set_period(&mut self, period: u16, dead_time: u16) {
        self.period = period;
        self.dead_time = dead_time;
        self.writes.push(PwmWrite::Period { period, dead_time });
    }

    fn set_duty(&mut self, phase: Phase, high: u16, low: u16) {
        self.duty[phase.index()] = (high, low);
        self.writes.push(PwmWrite::Duty { phase, high, low });
    }

    fn set_outputs(&mut self, legs: LegMask) {
        self.outputs = legs;
        self.writes.push(PwmWrite::Outputs(legs));
    }
}
