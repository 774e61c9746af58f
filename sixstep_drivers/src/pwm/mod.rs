use hal::{
    clocks::Clocks,
    pac::TIM1,
    timer::{
        Alignment, CaptureCompareDma, CountDir, OutputCompare, TimChannel, Timer, TimerConfig,
        UpdateReqSrc,
    },
};

use sixstep_algo::{dead_time, LegMask, Phase, PwmPeripheral};

use super::pinout;

// TIM1_BDTR
const BDTR_DTG_MASK: u32 = 0xFF;
const BDTR_MOE: u32 = 1 << 15;

// TIM1_CCER: CCxE at bit 4*(x-1), CCxNE two bits above
const CCER_LEGS: u32 = 0b0101_0101_0101;

/// Center-aligned complementary PWM on TIM1 with hardware dead time.
pub struct TimPWM {
    tim: Timer<TIM1>,
}

impl TimPWM {
    pub fn new(tim1: TIM1, clock_cfg: &Clocks, freq: u16) -> Self {
        // Center-aligned counting, compare values preloaded and latched on update
        let mut timer = Timer::new_tim1(
            tim1,
            freq as f32,
            TimerConfig {
                one_pulse_mode: false,
                update_request_source: UpdateReqSrc::Any,
                auto_reload_preload: true,
                alignment: Alignment::Center1,
                capture_compare_dma: CaptureCompareDma::Update,
                direction: CountDir::Up,
            },
            clock_cfg,
        );
        timer.enable();

        TimPWM { tim: timer }
    }

    pub fn begin(&mut self) {
        // PWM mode 1 with preload on the three bridge channels
        self.tim
            .enable_pwm_output(TimChannel::C1, OutputCompare::Pwm1, 0.5);
        self.tim
            .enable_pwm_output(TimChannel::C2, OutputCompare::Pwm1, 0.5);
        self.tim
            .enable_pwm_output(TimChannel::C3, OutputCompare::Pwm1, 0.5);

        // Legs stay off until the driver enables them
        self.write_ccer(0);

        pinout::driver::PWM_UH.init();
        pinout::driver::PWM_VH.init();
        pinout::driver::PWM_WH.init();
        pinout::driver::PWM_UL.init();
        pinout::driver::PWM_VL.init();
        pinout::driver::PWM_WL.init();
    }

    fn channel(phase: Phase) -> TimChannel {
        match phase {
            Phase::U => TimChannel::C1,
            Phase::V => TimChannel::C2,
            Phase::W => TimChannel::C3,
        }
    }

    fn legs2ccer(legs: LegMask) -> u32 {
        let mut ccer = 0;
        for phase in Phase::ALL {
            let shift = 4 * phase.index() as u32;
            if legs.contains(LegMask::high(phase)) {
                ccer |= 1 << shift;
            }
            if legs.contains(LegMask::low(phase)) {
                ccer |= 1 << (shift + 2);
            }
        }
        ccer
    }

    fn write_ccer(&mut self, bits: u32) {
        // Single read-modify-write so the six enables switch together
        self.tim
            .regs
            .ccer
            .modify(|r, w| unsafe { w.bits((r.bits() & !CCER_LEGS) | bits) });
    }
}

impl PwmPeripheral for TimPWM {
    fn set_period(&mut self, period: u16, dead_ticks: u16) {
        self.tim.set_auto_reload(period as u32);

        // tDTS = tCK_INT, long dead times lose resolution
        let dtg = dead_time::encode(dead_ticks);
        let inserted = dead_time::decode(dtg);
        if inserted != dead_ticks {
            defmt::debug!("PWM: dead time {} ticks inserted as {} ticks", dead_ticks, inserted);
        }
        let dtg = dtg as u32;
        self.tim
            .regs
            .bdtr
            .modify(|r, w| unsafe { w.bits((r.bits() & !BDTR_DTG_MASK) | dtg | BDTR_MOE) });
    }

    fn set_duty(&mut self, phase: Phase, high: u16, _low: u16) {
        // CHxN is the hardware complement of CHx, so one compare register
        // carries both sides of the pair
        self.tim.set_duty(Self::channel(phase), high as u32);
    }

    fn set_outputs(&mut self, legs: LegMask) {
        self.write_ccer(Self::legs2ccer(legs));
    }
}
