use super::PinDef;
use super::{PinMode, Port};

// All three on EXTI9_5

pub const HALL_1: PinDef = PinDef::new(Port::B, 6, PinMode::Input);

pub const HALL_2: PinDef = PinDef::new(Port::B, 7, PinMode::Input);

pub const HALL_3: PinDef = PinDef::new(Port::B, 8, PinMode::Input);
