#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod config;
pub mod dead_time;
pub mod motor_driver;
pub mod rotor_position;

#[cfg(test)]
mod mock;

pub use config::{DriverConfig, DutyLimits, PwmTiming};
pub use motor_driver::{
    ChannelPair, CommutationDriver, CommutationStep, DriverState, LegMask, Phase, PwmPeripheral,
    StepRecord, COMMUTATION_TABLE,
};
pub use rotor_position::RotorPosition;

/// Errors reported by the commutation driver and its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Dead time leaves no usable duty range (`dead_time >= period / 2`)
    DeadTimeTooLarge { dead_time: u16, period: u16 },
    /// Commutation index outside 0..6
    InvalidStep(u8),
    /// Hall code that does not belong to the six-state sequence (0, 7 or wider than 3 bits)
    InvalidHall(u8),
    /// Operation requires `initialize` first
    NotInitialized,
    /// Duty clamp band with `min > max` or `max > 1000`
    InvalidDutyLimits { min_permille: u16, max_permille: u16 },
    /// Timer clock and PWM frequency do not give a 16-bit period
    InvalidTiming,
}

pub type Result<T> = core::result::Result<T, DriverError>;
