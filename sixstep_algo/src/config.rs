// Implements the driver configuration: PWM timing derived from the timer clock
// and the duty clamp policy.

// Key Features:
// - Derives period and dead-time ticks from clock, PWM frequency and dead time in ns
// - Keeps the 10%..90% duty clamp as a configurable band
// - Provides defaults matching a 40 MHz timer, 20 kHz PWM and 100 ns dead time

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use crate::{DriverError, Result};

// Timing below describes the 40 MHz reference board and backs `PwmTiming::DEFAULT`.
// Boards with another timer clock or gate driver derive their own `PwmTiming`.

/// Timer input clock of the reference board
pub const F_OSC_HZ: u32 = 40_000_000;
/// Target PWM frequency
pub const PWM_FREQ_HZ: u32 = 20_000;
/// Dead time of the reference board in nanoseconds (depends on the gate driver and switches)
pub const DEAD_TIME_NS: u32 = 100;
/// Duty applied to every phase right after start-up
pub const STARTUP_DUTY_PERMILLE: u16 = 150;

const NS_PER_S: u64 = 1_000_000_000;

/// Lower/upper duty bound in permille. Requests outside are clamped, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutyLimits {
    min_permille: u16,
    max_permille: u16,
}

impl DutyLimits {
    /// 10%..90%, leaves room for the dead time on both edges
    pub const DEFAULT: DutyLimits = DutyLimits {
        min_permille: 100,
        max_permille: 900,
    };

    pub const fn new(min_permille: u16, max_permille: u16) -> Result<DutyLimits> {
        if min_permille > max_permille || max_permille > 1000 {
            return Err(DriverError::InvalidDutyLimits {
                min_permille,
                max_permille,
            });
        }
        Ok(DutyLimits {
            min_permille,
            max_permille,
        })
    }

    #[inline(always)]
    pub fn clamp(&self, duty_permille: u16) -> u16 {
        duty_permille.clamp(self.min_permille, self.max_permille)
    }

    pub fn min_permille(&self) -> u16 {
        self.min_permille
    }

    pub fn max_permille(&self) -> u16 {
        self.max_permille
    }
}

impl Default for DutyLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// PWM period and dead time, both in timer ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    pub period: u16,
    pub dead_time: u16,
}

impl PwmTiming {
    pub const DEFAULT: PwmTiming = PwmTiming {
        period: (F_OSC_HZ / PWM_FREQ_HZ) as u16,
        dead_time: (DEAD_TIME_NS as u64 * F_OSC_HZ as u64 / NS_PER_S) as u16,
    };

    pub const fn new(period: u16, dead_time: u16) -> PwmTiming {
        PwmTiming { period, dead_time }
    }

    /// Period as one tick per clock cycle of the PWM period (edge counting).
    pub const fn from_clock(clock_hz: u32, pwm_freq_hz: u32, dead_time_ns: u32) -> Result<PwmTiming> {
        if pwm_freq_hz == 0 {
            return Err(DriverError::InvalidTiming);
        }
        Self::from_ticks(clock_hz / pwm_freq_hz, clock_hz, dead_time_ns)
    }

    /// Center-aligned counters go up and down once per PWM period, so the
    /// period register holds half the clock cycles of one PWM period.
    pub const fn center_aligned(clock_hz: u32, pwm_freq_hz: u32, dead_time_ns: u32) -> Result<PwmTiming> {
        if pwm_freq_hz == 0 {
            return Err(DriverError::InvalidTiming);
        }
        Self::from_ticks(clock_hz / pwm_freq_hz / 2, clock_hz, dead_time_ns)
    }

    const fn from_ticks(period: u32, clock_hz: u32, dead_time_ns: u32) -> Result<PwmTiming> {
        let dead_time = dead_time_ns as u64 * clock_hz as u64 / NS_PER_S;
        if period == 0 || period > u16::MAX as u32 || dead_time > u16::MAX as u64 {
            return Err(DriverError::InvalidTiming);
        }
        Ok(PwmTiming {
            period: period as u16,
            dead_time: dead_time as u16,
        })
    }

    /// Dead time must leave an effective duty range on both sides of the bridge.
    pub const fn validate(&self) -> Result<()> {
        if self.dead_time >= self.period / 2 {
            return Err(DriverError::DeadTimeTooLarge {
                dead_time: self.dead_time,
                period: self.period,
            });
        }
        Ok(())
    }
}

impl Default for PwmTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything `CommutationDriver::initialize_with` needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    pub timing: PwmTiming,
    pub limits: DutyLimits,
}

impl DriverConfig {
    pub const DEFAULT: DriverConfig = DriverConfig {
        timing: PwmTiming::DEFAULT,
        limits: DutyLimits::DEFAULT,
    };

    pub const fn new(timing: PwmTiming, limits: DutyLimits) -> DriverConfig {
        DriverConfig { timing, limits }
    }

    pub const fn validate(&self) -> Result<()> {
        self.timing.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_timing() {
        let timing = PwmTiming::from_clock(F_OSC_HZ, PWM_FREQ_HZ, DEAD_TIME_NS).unwrap();
        assert_eq!(timing, PwmTiming::new(2000, 4));
        assert_eq!(timing, PwmTiming::DEFAULT);
    }

    #[test]
    fn test_center_aligned_halves_period() {
        let timing = PwmTiming::center_aligned(170_000_000, 20_000, 500).unwrap();
        assert_eq!(timing.period, 4250);
        assert_eq!(timing.dead_time, 85);
    }

    #[test]
    fn test_invalid_timing() {
        assert_eq!(PwmTiming::from_clock(40_000_000, 0, 100), Err(DriverError::InvalidTiming));
        // 40 MHz / 100 Hz does not fit the 16-bit period register
        assert_eq!(PwmTiming::from_clock(40_000_000, 100, 100), Err(DriverError::InvalidTiming));
        assert_eq!(PwmTiming::from_clock(1_000, 20_000, 100), Err(DriverError::InvalidTiming));
    }

    #[test]
    fn test_dead_time_bound() {
        assert!(PwmTiming::new(2000, 999).validate().is_ok());
        assert_eq!(
            PwmTiming::new(2000, 1000).validate(),
            Err(DriverError::DeadTimeTooLarge {
                dead_time: 1000,
                period: 2000
            })
        );
        assert!(PwmTiming::new(0, 0).validate().is_err());
    }

    #[test]
    fn test_duty_limits() {
        let limits = DutyLimits::default();
        assert_eq!(limits.clamp(0), 100);
        assert_eq!(limits.clamp(500), 500);
        assert_eq!(limits.clamp(u16::MAX), 900);

        let wide = DutyLimits::new(0, 1000).unwrap();
        assert_eq!(wide.clamp(1000), 1000);

        assert!(DutyLimits::new(600, 400).is_err());
        assert!(DutyLimits::new(0, 1001).is_err());
    }
}
