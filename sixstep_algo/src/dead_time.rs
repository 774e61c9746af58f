// Dead-time generator code used by advanced-control timers (BDTR.DTG layout).

// Key Features:
// - Encodes a dead time in timer ticks into the 8-bit stepped code
// - Decodes a code back to ticks, so callers can see what the hardware inserts

// Detailed Operation:
// Below 128 ticks the code is the tick count. Above that the resolution drops
// to 2, 8 and 16 ticks per step, requests are rounded down to the step and
// anything past 1008 ticks saturates at the longest code.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

/// Longest dead time the 8-bit code can express
pub const MAX_TICKS: u16 = 1008;

pub const fn encode(ticks: u16) -> u8 {
    match ticks {
        0..=127 => ticks as u8,
        128..=255 => 0b1000_0000 | (ticks / 2 - 64) as u8,
        256..=511 => 0b1100_0000 | (ticks / 8 - 32) as u8,
        512..=1023 => 0b1110_0000 | (ticks / 16 - 32) as u8,
        _ => 0xFF,
    }
}

pub const fn decode(code: u8) -> u16 {
    let code = code as u16;
    if code & 0x80 == 0 {
        code
    } else if code & 0xC0 == 0x80 {
        (64 + (code & 0x3F)) * 2
    } else if code & 0xE0 == 0xC0 {
        (32 + (code & 0x1F)) * 8
    } else {
        (32 + (code & 0x1F)) * 16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_in_every_range() {
        for ticks in [0, 4, 127, 128, 254, 256, 504, 512, 1008] {
            assert_eq!(decode(encode(ticks)), ticks, "ticks {}", ticks);
        }
        assert_eq!(encode(128), 0x80);
        assert_eq!(encode(256), 0xC0);
        assert_eq!(encode(512), 0xE0);
    }

    #[test]
    fn test_rounds_down_to_step() {
        assert_eq!(decode(encode(129)), 128);
        assert_eq!(decode(encode(300)), 296);
        assert_eq!(decode(encode(1000)), 992);
    }

    #[test]
    fn test_saturates() {
        assert_eq!(encode(1023), 0xFF);
        assert_eq!(encode(u16::MAX), 0xFF);
        assert_eq!(decode(0xFF), MAX_TICKS);
    }

    #[test]
    fn test_never_longer_than_requested() {
        for ticks in 0..=MAX_TICKS {
            let actual = decode(encode(ticks));
            assert!(actual <= ticks && ticks - actual < 16, "ticks {}", ticks);
        }
    }
}
