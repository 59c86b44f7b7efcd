//! Amplification ramp
//!
//! Amp moves linearly from `amp` to `target_amp` over `[ramp_start, ramp_end]`.
//! The effective value depends on the current time, so callers recompute it
//! for every operation instead of caching it.

use crate::checks::check_amp;
use crate::RAMP_MIN_DURATION;

/// Effective amplification coefficient at time `now`.
///
/// - `now >= ramp_end`, or a zero-length window: `target_amp`
/// - `now <= ramp_start`: `amp`
/// - otherwise: `amp ± |target_amp - amp| · elapsed / duration`
pub fn get_current_amp(
    amp: u64,
    target_amp: u64,
    ramp_start: i64,
    ramp_end: i64,
    now: i64,
) -> u64 {
    if now >= ramp_end || ramp_end == ramp_start {
        return target_amp;
    }
    if now <= ramp_start {
        return amp;
    }

    // ramp_start < now < ramp_end
    let elapsed = (now as i128 - ramp_start as i128) as u128;
    let duration = (ramp_end as i128 - ramp_start as i128) as u128;

    if target_amp > amp {
        let step = (target_amp - amp) as u128 * elapsed / duration;
        amp + step as u64
    } else {
        let step = (amp - target_amp) as u128 * elapsed / duration;
        amp - step as u64
    }
}

/// Whether a ramp to `target_amp` over `duration` seconds is allowed.
pub fn check_ramp(target_amp: u64, duration: i64) -> bool {
    check_amp(target_amp) && duration >= RAMP_MIN_DURATION
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_700_000_000;
    const END: i64 = START + 86_400;

    #[test]
    fn test_ramp_boundaries() {
        assert_eq!(get_current_amp(100, 200, START, END, START), 100);
        assert_eq!(get_current_amp(100, 200, START, END, END), 200);
        assert_eq!(get_current_amp(100, 200, START, END, START - 1), 100);
        assert_eq!(get_current_amp(100, 200, START, END, END + 1_000), 200);
    }

    #[test]
    fn test_ramp_up_linear() {
        assert_eq!(get_current_amp(100, 200, START, END, START + 43_200), 150);
        assert_eq!(get_current_amp(100, 200, START, END, START + 21_600), 125);
    }

    #[test]
    fn test_ramp_down_linear() {
        assert_eq!(get_current_amp(200, 100, START, END, START + 43_200), 150);
        assert_eq!(get_current_amp(200, 100, START, END, START + 64_800), 125);
    }

    #[test]
    fn test_zero_length_window_uses_target() {
        assert_eq!(get_current_amp(100, 300, START, START, START - 10), 300);
    }

    #[test]
    fn test_no_ramp_configured() {
        // Stopped ramps store the current amp as both values
        assert_eq!(get_current_amp(1000, 1000, 0, 0, START), 1000);
    }

    #[test]
    fn test_extreme_timestamps() {
        let amp = get_current_amp(1, 100_000, i64::MIN, i64::MAX, 0);
        assert!((1..=100_000).contains(&amp));
        assert_eq!(amp, 50_000);
    }

    #[test]
    fn test_check_ramp() {
        assert!(check_ramp(2000, RAMP_MIN_DURATION));
        assert!(!check_ramp(2000, RAMP_MIN_DURATION - 1));
        assert!(!check_ramp(0, RAMP_MIN_DURATION));
        assert!(!check_ramp(100_001, RAMP_MIN_DURATION));
    }
}
