use std::time::Duration;

use crate::config::INTERVAL_PER_SEGMENT_MS;

/// Slowest-allowed floor above the base interval, by level.
///
/// Later levels are capped slower so that longer snakes stay steerable
/// through denser mazes.
#[must_use]
pub fn level_floor_bonus_ms(level: u32) -> f64 {
    match level {
        20.. => 80.0,
        15..=19 => 60.0,
        10..=14 => 40.0,
        5..=9 => 20.0,
        _ => 0.0,
    }
}

/// Tick interval in milliseconds.
///
/// The length-based value `base + 2 * len` and the level floor are both
/// scaled by `multiplier` (the active speed effects), and the larger wins.
#[must_use]
pub fn interval_ms(base_speed_ms: u64, snake_len: usize, level: u32, multiplier: f64) -> f64 {
    let base = base_speed_ms as f64;
    let by_length = base + INTERVAL_PER_SEGMENT_MS * snake_len as f64;
    let floor = base + level_floor_bonus_ms(level);

    (by_length * multiplier).max(floor * multiplier)
}

/// [`interval_ms`] as a `Duration`.
#[must_use]
pub fn tick_interval(
    base_speed_ms: u64,
    snake_len: usize,
    level: u32,
    multiplier: f64,
) -> Duration {
    let millis = interval_ms(base_speed_ms, snake_len, level, multiplier).max(1.0);
    Duration::from_micros((millis * 1000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{interval_ms, level_floor_bonus_ms, tick_interval};

    #[test]
    fn interval_grows_two_ms_per_segment() {
        assert_eq!(interval_ms(100, 1, 1, 1.0), 102.0);
        assert_eq!(interval_ms(100, 10, 1, 1.0), 120.0);
    }

    #[test]
    fn level_floor_wins_for_short_snakes() {
        assert_eq!(interval_ms(100, 1, 5, 1.0), 120.0);
        assert_eq!(interval_ms(100, 1, 12, 1.0), 140.0);
        assert_eq!(interval_ms(100, 1, 17, 1.0), 160.0);
        assert_eq!(interval_ms(100, 1, 25, 1.0), 180.0);
        assert_eq!(interval_ms(100, 50, 25, 1.0), 200.0);
    }

    #[test]
    fn floor_steps_up_at_level_thresholds() {
        assert_eq!(level_floor_bonus_ms(4), 0.0);
        assert_eq!(level_floor_bonus_ms(5), 20.0);
        assert_eq!(level_floor_bonus_ms(10), 40.0);
        assert_eq!(level_floor_bonus_ms(15), 60.0);
        assert_eq!(level_floor_bonus_ms(20), 80.0);
    }

    #[test]
    fn multiplier_scales_both_value_and_floor() {
        assert_eq!(interval_ms(100, 10, 1, 0.75), 90.0);
        assert_eq!(interval_ms(100, 1, 20, 0.75), 135.0);
        assert_eq!(interval_ms(100, 10, 1, 1.25), 150.0);
    }

    #[test]
    fn duration_conversion_keeps_millisecond_value() {
        assert_eq!(tick_interval(100, 10, 1, 1.0), Duration::from_millis(120));
    }
}
