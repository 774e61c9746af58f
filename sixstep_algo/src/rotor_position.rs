// Maps rotor position samples to commutation steps.

// Key Features:
// - Validates a step index coming from an encoder or an external decoder
// - Decodes 3-bit Hall codes following the 1-3-2-6-4-5 sequence

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use crate::motor_driver::CommutationStep::{self, Step0, Step1, Step2, Step3, Step4, Step5};
use crate::{DriverError, Result};

// Raw Hall code (bit0 = H1, bit1 = H2, bit2 = H3) to step.
// Codes 0 and 7 mean a broken wire or sensor supply.
const HALL_STEP_TABLE: [Option<CommutationStep>; 8] = [
    None,        // 0b000
    Some(Step0), // 0b001
    Some(Step2), // 0b010
    Some(Step1), // 0b011
    Some(Step4), // 0b100
    Some(Step5), // 0b101
    Some(Step3), // 0b110
    None,        // 0b111
];

/// Rotor sector sample, always a valid step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotorPosition(CommutationStep);

impl RotorPosition {
    pub fn new(index: u8) -> Result<RotorPosition> {
        CommutationStep::from_index(index).map(RotorPosition)
    }

    pub fn from_hall(raw: u8) -> Result<RotorPosition> {
        match HALL_STEP_TABLE.get(raw as usize).copied().flatten() {
            Some(step) => Ok(RotorPosition(step)),
            None => {
                warn!("HALL: invalid state {}", raw);
                Err(DriverError::InvalidHall(raw))
            }
        }
    }

    pub fn step(&self) -> CommutationStep {
        self.0
    }

    pub fn index(&self) -> u8 {
        self.0.index()
    }
}

impl From<CommutationStep> for RotorPosition {
    fn from(step: CommutationStep) -> Self {
        RotorPosition(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hall_sequence() {
        // One electrical revolution in forward direction
        let sequence = [0b001, 0b011, 0b010, 0b110, 0b100, 0b101];
        for (expected, raw) in sequence.into_iter().enumerate() {
            assert_eq!(RotorPosition::from_hall(raw).unwrap().index(), expected as u8);
        }
    }

    #[test]
    fn test_hall_invalid() {
        for raw in [0u8, 7, 8, 0xFF] {
            assert_eq!(RotorPosition::from_hall(raw), Err(DriverError::InvalidHall(raw)));
        }
    }

    #[test]
    fn test_index_range() {
        assert_eq!(RotorPosition::new(5).unwrap().step(), Step5);
        assert_eq!(RotorPosition::new(6), Err(DriverError::InvalidStep(6)));
    }
}
