// Implements the six-step commutation driver for a three-phase bridge with
// center-aligned complementary PWM and hardware dead time.

// Key Features:
// - Owns the PWM peripheral handle and the duty state of the three half-bridges
// - Programs period and dead time, starts at 50% duty with outputs off
// - Clamps duty requests to the configured band instead of rejecting them
// - Selects the energized pair and the floating phase per rotor step

// Detailed Operation:
// The driver moves Uninitialized -> Configured -> Enabled <-> Disabled.
// `commutate` is expected to run from the position interrupt and
// `set_duty_cycle` from the control loop, so every update of a phase or of the
// output enables is a single peripheral call. Callers sharing the driver
// between contexts must hold a lock around each call.
// An invalid step index is reported and the previous pattern is kept; only
// `advance`/`retreat` wrap around the cycle.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use super::{ChannelPair, CommutationStep, DriverState, LegMask, Phase, PwmPeripheral};
use crate::config::{DriverConfig, DutyLimits, PwmTiming};
use crate::rotor_position::RotorPosition;
use crate::{DriverError, Result};

pub struct CommutationDriver<P: PwmPeripheral> {
    /// Peripheral handle, the only path to the hardware
    pwm: P,
    state: DriverState,

    /// Counter period in timer ticks
    period: u16,
    /// Dead time inserted on every switching edge
    dead_time: u16,
    /// Duty clamp band
    limits: DutyLimits,

    /// Comparator state of U, V, W
    channels: [ChannelPair; 3],
    /// Last step selected by the rotor position
    step: Option<CommutationStep>,
    /// Last leg mask written to the peripheral
    legs: LegMask,
}

impl<P: PwmPeripheral> CommutationDriver<P> {
    /// Wraps the peripheral. Nothing is written until `initialize`.
    pub fn new(pwm: P) -> Self {
        CommutationDriver {
            pwm,
            state: DriverState::Uninitialized,
            period: 0,
            dead_time: 0,
            limits: DutyLimits::DEFAULT,
            channels: [ChannelPair::default(); 3],
            step: None,
            legs: LegMask::NONE,
        }
    }

    /// Programs period and dead time with the current duty band.
    ///
    /// Fails if `dead_time >= period / 2`; the driver is then left untouched.
    pub fn initialize(&mut self, period: u16, dead_time: u16) -> Result<()> {
        let config = DriverConfig::new(PwmTiming::new(period, dead_time), self.limits);
        self.initialize_with(config)
    }

    /// Programs timing and duty band, sets 50% duty on every phase and leaves
    /// the outputs off until `enable`.
    pub fn initialize_with(&mut self, config: DriverConfig) -> Result<()> {
        if let Err(err) = config.validate() {
            error!(
                "DRIVER: dead time {} too large for period {}",
                config.timing.dead_time,
                config.timing.period
            );
            return Err(err);
        }
        if self.state != DriverState::Uninitialized {
            debug!("DRIVER: re-initializing from {}", self.state);
        }

        let PwmTiming { period, dead_time } = config.timing;

        // Outputs off before the counter is reprogrammed
        self.write_legs(LegMask::NONE);
        self.pwm.set_period(period, dead_time);
        for phase in Phase::ALL {
            let pair = ChannelPair::centered(period, dead_time);
            self.pwm.set_duty(phase, pair.high(), pair.low());
            self.channels[phase.index()] = pair;
        }

        self.period = period;
        self.dead_time = dead_time;
        self.limits = config.limits;
        self.step = None;
        self.state = DriverState::Configured;
        info!("DRIVER: period {} ticks, dead time {} ticks", period, dead_time);
        Ok(())
    }

    /// Sets the duty of one phase in permille, clamped to the duty band.
    ///
    /// High side gets `period * duty / 1000` ticks, low side the remainder.
    /// Only the requested phase is written.
    pub fn set_duty_cycle(&mut self, phase: Phase, duty_permille: u16) -> Result<ChannelPair> {
        self.ensure_initialized()?;

        let duty = self.limits.clamp(duty_permille);
        if duty != duty_permille {
            trace!("DRIVER: duty {} clamped to {}", duty_permille, duty);
        }

        let high = (self.period as u32 * duty as u32 / 1000) as u16;
        let pair = ChannelPair::new(self.period, high, self.dead_time);
        self.pwm.set_duty(phase, pair.high(), pair.low());
        self.channels[phase.index()] = pair;
        Ok(pair)
    }

    /// Same duty on U, V and W
    pub fn set_duty_all(&mut self, duty_permille: u16) -> Result<()> {
        for phase in Phase::ALL {
            self.set_duty_cycle(phase, duty_permille)?;
        }
        Ok(())
    }

    /// Selects the step for a rotor position index in 0..6.
    ///
    /// Out-of-range indices are rejected and the previous step is kept.
    pub fn commutate(&mut self, step_index: u8) -> Result<CommutationStep> {
        self.ensure_initialized()?;
        let step = CommutationStep::from_index(step_index).map_err(|err| {
            warn!("DRIVER: invalid commutation step {}", step_index);
            err
        })?;
        self.apply_step(step);
        Ok(step)
    }

    /// Selects an already validated step
    pub fn commutate_step(&mut self, step: CommutationStep) -> Result<()> {
        self.ensure_initialized()?;
        self.apply_step(step);
        Ok(())
    }

    /// Follows a decoded rotor position.
    ///
    /// The first valid position after `initialize` enables the bridge. A
    /// `Disabled` driver stays off and only remembers the step until `enable`
    /// is called explicitly.
    pub fn follow_rotor(&mut self, position: RotorPosition) -> Result<CommutationStep> {
        self.ensure_initialized()?;
        if self.state == DriverState::Configured {
            self.enable()?;
        }
        let step = position.step();
        self.apply_step(step);
        Ok(step)
    }

    /// Moves one step forward, 5 wraps to 0. Starts at step 0.
    pub fn advance(&mut self) -> Result<CommutationStep> {
        self.ensure_initialized()?;
        let step = self.step.map_or(CommutationStep::Step0, CommutationStep::next);
        self.apply_step(step);
        Ok(step)
    }

    /// Moves one step backward, 0 wraps to 5. Starts at step 5.
    pub fn retreat(&mut self) -> Result<CommutationStep> {
        self.ensure_initialized()?;
        let step = self.step.map_or(CommutationStep::Step5, CommutationStep::prev);
        self.apply_step(step);
        Ok(step)
    }

    /// Turns all six legs on in one write.
    ///
    /// A step remembered while not enabled is only applied by the next
    /// commutation, until then `legs()` is `ALL` whatever `current_step()` says.
    pub fn enable(&mut self) -> Result<()> {
        if self.state == DriverState::Uninitialized {
            warn!("DRIVER: enable requested before initialize");
            return Err(DriverError::NotInitialized);
        }
        self.write_legs(LegMask::ALL);
        self.state = DriverState::Enabled;
        info!("DRIVER: outputs enabled");
        Ok(())
    }

    /// Safe state: all legs off. Accepted from any state.
    pub fn disable(&mut self) {
        self.write_legs(LegMask::NONE);
        if self.state != DriverState::Uninitialized {
            self.state = DriverState::Disabled;
        }
        info!("DRIVER: outputs disabled");
    }

    /// Disables the outputs and hands the peripheral back
    pub fn release(mut self) -> P {
        self.disable();
        self.pwm
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn period(&self) -> u16 {
        self.period
    }

    pub fn dead_time(&self) -> u16 {
        self.dead_time
    }

    pub fn limits(&self) -> DutyLimits {
        self.limits
    }

    pub fn channel(&self, phase: Phase) -> ChannelPair {
        self.channels[phase.index()]
    }

    pub fn current_step(&self) -> Option<CommutationStep> {
        self.step
    }

    /// Leg mask currently applied to the hardware
    pub fn legs(&self) -> LegMask {
        self.legs
    }

    pub fn peripheral(&self) -> &P {
        &self.pwm
    }

    #[inline(always)]
    fn ensure_initialized(&self) -> Result<()> {
        match self.state {
            DriverState::Uninitialized => Err(DriverError::NotInitialized),
            _ => Ok(()),
        }
    }

    /// Outputs follow the step only while enabled
    fn apply_step(&mut self, step: CommutationStep) {
        self.step = Some(step);
        if self.state == DriverState::Enabled {
            self.write_legs(step.legs());
        }
        trace!("DRIVER: step {}", step.index());
    }

    #[inline(always)]
    fn write_legs(&mut self, legs: LegMask) {
        self.pwm.set_outputs(legs);
        self.legs = legs;
    }
}
