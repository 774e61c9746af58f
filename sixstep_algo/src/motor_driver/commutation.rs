// Implements the six-step commutation table for brushless DC motors.

// Key Features:
// - CommutationStep: the six ordered rotor sectors with cyclic next/prev
// - StepRecord: source, sink and floating phase of each step
// - LegMask: one bit per bridge leg (bit0=U+, bit1=U-, bit2=V+, bit3=V-, bit4=W+, bit5=W-)

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use super::Phase;
use crate::{DriverError, Result};

/// Set of enabled bridge legs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LegMask(u8);

impl LegMask {
    /// All legs off, every phase floating
    pub const NONE: LegMask = LegMask(0);
    /// All six legs on
    pub const ALL: LegMask = LegMask(0b0011_1111);

    /// Keeps only the six leg bits
    pub const fn from_bits(bits: u8) -> LegMask {
        LegMask(bits & Self::ALL.0)
    }

    /// High-side (+) leg of a phase
    pub const fn high(phase: Phase) -> LegMask {
        LegMask(1 << (phase as u8 * 2))
    }

    /// Low-side (-) leg of a phase
    pub const fn low(phase: Phase) -> LegMask {
        LegMask(1 << (phase as u8 * 2 + 1))
    }

    /// Both legs of a phase
    pub const fn pair(phase: Phase) -> LegMask {
        Self::high(phase).union(Self::low(phase))
    }

    pub const fn union(self, other: LegMask) -> LegMask {
        LegMask(self.0 | other.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: LegMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn active_count(self) -> u32 {
        self.0.count_ones()
    }

    /// True when neither leg of the phase conducts (high impedance)
    pub const fn is_floating(self, phase: Phase) -> bool {
        self.0 & Self::pair(phase).0 == 0
    }
}

/// Energized pair of one commutation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepRecord {
    /// Phase connected to the positive rail (high side on)
    pub source: Phase,
    /// Phase connected to the negative rail (low side on)
    pub sink: Phase,
    /// Phase left open
    pub floating: Phase,
}

impl StepRecord {
    const fn new(source: Phase, sink: Phase) -> StepRecord {
        // Phase indices sum to 3
        let floating = Phase::ALL[3 - source as usize - sink as usize];
        StepRecord {
            source,
            sink,
            floating,
        }
    }

    pub const fn legs(&self) -> LegMask {
        LegMask::high(self.source).union(LegMask::low(self.sink))
    }
}

/// Six-step table, indexed by `CommutationStep`
pub const COMMUTATION_TABLE: [StepRecord; 6] = [
    StepRecord::new(Phase::U, Phase::V), // U+ V-
    StepRecord::new(Phase::U, Phase::W), // U+ W-
    StepRecord::new(Phase::V, Phase::W), // V+ W-
    StepRecord::new(Phase::V, Phase::U), // V+ U-
    StepRecord::new(Phase::W, Phase::U), // W+ U-
    StepRecord::new(Phase::W, Phase::V), // W+ V-
];

/// Rotor sector, 60 electrical degrees each
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommutationStep {
    Step0 = 0,
    Step1 = 1,
    Step2 = 2,
    Step3 = 3,
    Step4 = 4,
    Step5 = 5,
}

impl CommutationStep {
    pub const ALL: [CommutationStep; 6] = [
        CommutationStep::Step0,
        CommutationStep::Step1,
        CommutationStep::Step2,
        CommutationStep::Step3,
        CommutationStep::Step4,
        CommutationStep::Step5,
    ];

    /// Rejects anything outside 0..6 instead of wrapping
    pub const fn from_index(index: u8) -> Result<CommutationStep> {
        if index as usize >= Self::ALL.len() {
            return Err(DriverError::InvalidStep(index));
        }
        Ok(Self::ALL[index as usize])
    }

    #[inline(always)]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Next step of the cycle, 5 wraps to 0
    pub const fn next(self) -> CommutationStep {
        Self::ALL[(self as usize + 1) % 6]
    }

    /// Previous step of the cycle, 0 wraps to 5
    pub const fn prev(self) -> CommutationStep {
        Self::ALL[(self as usize + 5) % 6]
    }

    #[inline(always)]
    pub const fn record(self) -> StepRecord {
        COMMUTATION_TABLE[self as usize]
    }

    pub const fn source(self) -> Phase {
        self.record().source
    }

    pub const fn sink(self) -> Phase {
        self.record().sink
    }

    pub const fn floating(self) -> Phase {
        self.record().floating
    }

    pub const fn legs(self) -> LegMask {
        self.record().legs()
    }
}
