// Implements the six-step motor driver: phase and leg definitions, the
// peripheral boundary and the commutation driver state machine.

// Key Features:
// - Defines Phase (U, V, W) and the PwmPeripheral trait the hardware layer implements
// - Defines the DriverState lifecycle
// - Re-exports the commutation table, channel pairs and the driver itself

// Detailed Operation:
// The driver never touches registers directly. A board crate implements
// PwmPeripheral on top of its advanced timer and hands the handle to
// CommutationDriver, which keeps the period/duty state of the three
// half-bridges and decides which legs conduct for the current rotor step.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

mod channel_pair;
mod commutation;
mod driver_sixstep;

pub use channel_pair::ChannelPair;
pub use commutation::{CommutationStep, LegMask, StepRecord, COMMUTATION_TABLE};
pub use driver_sixstep::CommutationDriver;

/// Motor phase, one half-bridge each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    U = 0,
    V = 1,
    W = 2,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::U, Phase::V, Phase::W];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Lifecycle of the commutation driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// No timing programmed yet, only `disable` is accepted
    Uninitialized,
    /// Period, dead time and 50% duty programmed, outputs off
    Configured,
    /// Outputs driven
    Enabled,
    /// Outputs forced off after having been configured
    Disabled,
}

/// Register-level boundary of the PWM timer driving the three half-bridges.
///
/// Every method is a bounded sequence of register writes and is called from
/// interrupt context, so implementations must not block or allocate.
pub trait PwmPeripheral {
    /// Program the counter period and the dead-time generator for all channels.
    fn set_period(&mut self, period: u16, dead_time: u16);

    /// Program both comparators of one phase. High and low side are written
    /// together so they take effect on the same update event.
    fn set_duty(&mut self, phase: Phase, high: u16, low: u16);

    /// Enable exactly the legs set in `legs` and disable the rest, in one write.
    fn set_outputs(&mut self, legs: LegMask);
}
