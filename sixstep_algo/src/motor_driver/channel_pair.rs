// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

/// Complementary comparator values of one half-bridge.
///
/// `high + low` always equals the period. The dead-time generator removes
/// `dead_time` ticks from each side, so the switches never conduct together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelPair {
    high: u16,
    low: u16,
    dead_time: u16,
}

impl ChannelPair {
    /// `high` is capped at the period
    pub const fn new(period: u16, high: u16, dead_time: u16) -> ChannelPair {
        let high = if high > period { period } else { high };
        ChannelPair {
            high,
            low: period - high,
            dead_time,
        }
    }

    /// 50% duty
    pub const fn centered(period: u16, dead_time: u16) -> ChannelPair {
        Self::new(period, period / 2, dead_time)
    }

    /// Comparator ticks of the high-side switch
    pub fn high(&self) -> u16 {
        self.high
    }

    /// Comparator ticks of the low-side switch
    pub fn low(&self) -> u16 {
        self.low
    }

    pub fn dead_time(&self) -> u16 {
        self.dead_time
    }

    pub fn period(&self) -> u16 {
        self.high + self.low
    }

    /// Ticks each switch actually conducts once dead time is inserted
    pub fn conduction(&self) -> (u16, u16) {
        (
            self.high.saturating_sub(self.dead_time),
            self.low.saturating_sub(self.dead_time),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complementary() {
        for high in [0u16, 1, 200, 1000, 1999, 2000, 5000] {
            let pair = ChannelPair::new(2000, high, 4);
            assert_eq!(pair.high() as u32 + pair.low() as u32, 2000);
        }
        let odd = ChannelPair::centered(2001, 4);
        assert_eq!((odd.high(), odd.low()), (1000, 1001));
    }

    #[test]
    fn test_conduction_leaves_dead_band() {
        for high in [0u16, 3, 200, 1000, 1800, 2000] {
            let pair = ChannelPair::new(2000, high, 4);
            let (on_high, on_low) = pair.conduction();
            assert!(on_high + on_low <= pair.period() - pair.dead_time());
        }
    }
}
