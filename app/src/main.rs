#![no_main]
#![no_std]

use defmt_rtt as _;
use panic_probe as _;

use hal::{
    self,
    clocks::Clocks,
    pac,
    timer::{Timer, TimerInterrupt},
};

use sixstep_algo::{
    config::{PWM_FREQ_HZ, STARTUP_DUTY_PERMILLE},
    CommutationDriver, DriverConfig, DutyLimits, PwmTiming, RotorPosition,
};

use cortex_m;

// Gate driver of this board needs more margin than the 100 ns default
const BOARD_DEAD_TIME_NS: u32 = 500;
const CONTROL_FREQ: f32 = 1000.;

// Duty the control loop ramps to, permille per control tick
const TARGET_DUTY_PERMILLE: u16 = 400;
const RAMP_STEP_PERMILLE: u16 = 1;

#[rtic::app(device = pac, peripherals = true)]
mod app {
    use super::*;

    use sixstep_drivers::*;

    #[shared]
    struct Shared {
        driver: CommutationDriver<pwm::TimPWM>,
    }

    #[local]
    struct Local {
        hall: hall::HallSensor,
        control_timer: Timer<pac::TIM6>,
        duty: u16,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local) {
        let dp = ctx.device;
        let clock_cfg = Clocks::default();
        clock_cfg.setup().unwrap();

        let sysclk_freq = clock_cfg.sysclk(); // System clock frequency in Hz
        defmt::debug!("SYSTEM: Clock frequency is {} MHz", sysclk_freq / 1000000);

        let mut gate_enable = pinout::driver::ENABLE.init();
        gate_enable.set_high();

        let mut timer_pwm = pwm::TimPWM::new(dp.TIM1, &clock_cfg, PWM_FREQ_HZ as u16);
        timer_pwm.begin();

        let timing =
            PwmTiming::center_aligned(clock_cfg.apb2_timer(), PWM_FREQ_HZ, BOARD_DEAD_TIME_NS)
                .unwrap();
        let config = DriverConfig::new(timing, DutyLimits::DEFAULT);

        let mut driver = CommutationDriver::new(timer_pwm);
        if let Err(err) = driver.initialize_with(config) {
            defmt::panic!("DRIVER: configuration rejected: {}", err);
        }
        driver.set_duty_all(STARTUP_DUTY_PERMILLE).unwrap();

        // Without a valid sector the bridge stays off until the first good edge
        let hall = hall::HallSensor::new();
        if let Ok(position) = RotorPosition::from_hall(hall.read_raw()) {
            driver.follow_rotor(position).unwrap();
        }

        let mut control_timer = Timer::new_tim6(dp.TIM6, CONTROL_FREQ, Default::default(), &clock_cfg);
        control_timer.enable_interrupt(TimerInterrupt::Update);
        control_timer.enable();

        (
            Shared { driver },
            Local {
                hall,
                control_timer,
                duty: STARTUP_DUTY_PERMILLE,
            },
        )
    }

    #[task(binds = EXTI9_5, shared = [driver], local = [hall], priority = 2)]
    fn hall_changed(mut cx: hall_changed::Context) {
        cx.local.hall.clear_interrupts();

        // Invalid codes are logged by the decoder, the bridge keeps its last step.
        // A disabled bridge stays off until enabled explicitly.
        if let Ok(position) = RotorPosition::from_hall(cx.local.hall.read_raw()) {
            cx.shared.driver.lock(|driver| {
                if let Err(err) = driver.follow_rotor(position) {
                    defmt::warn!("DRIVER: commutation failed: {}", err);
                }
            });
        }
    }

    #[task(binds = TIM6_DACUNDER, shared = [driver], local = [control_timer, duty], priority = 1)]
    fn control_tick(mut cx: control_tick::Context) {
        cx.local
            .control_timer
            .clear_interrupt(TimerInterrupt::Update);

        if *cx.local.duty < TARGET_DUTY_PERMILLE {
            *cx.local.duty += RAMP_STEP_PERMILLE;
            let duty = *cx.local.duty;
            // Locked so a commutation never lands between two phase updates
            cx.shared.driver.lock(|driver| {
                if let Err(err) = driver.set_duty_all(duty) {
                    defmt::error!("DRIVER: duty update failed: {}", err);
                }
            });
        }
    }
}

#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
