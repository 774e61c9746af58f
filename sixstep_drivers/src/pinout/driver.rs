//! Gate driver pins. TIM1 drives the three half-bridges, CHx on the high side
//! and CHxN on the low side.
use super::PinDef;
use super::{PinMode, Port};

/// Gate driver enable
pub const ENABLE: PinDef = PinDef::new(Port::A, 4, PinMode::Output);

/// Phase U high side, TIM1_CH1
pub const PWM_UH: PinDef = PinDef::new(Port::A, 8, PinMode::Alt(6));

/// Phase V high side, TIM1_CH2
pub const PWM_VH: PinDef = PinDef::new(Port::A, 9, PinMode::Alt(6));

/// Phase W high side, TIM1_CH3
pub const PWM_WH: PinDef = PinDef::new(Port::A, 10, PinMode::Alt(6));

/// Phase U low side, TIM1_CH1N
pub const PWM_UL: PinDef = PinDef::new(Port::B, 13, PinMode::Alt(6));

/// Phase V low side, TIM1_CH2N
pub const PWM_VL: PinDef = PinDef::new(Port::B, 14, PinMode::Alt(6));

/// Phase W low side, TIM1_CH3N
pub const PWM_WL: PinDef = PinDef::new(Port::B, 15, PinMode::Alt(4));
