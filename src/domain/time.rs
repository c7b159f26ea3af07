// SPDX-License-Identifier: MPL-2.0
//! Rational media time.
//!
//! Playback positions and durations are kept as `value / timescale` instead of
//! floating-point seconds so that repeated arithmetic does not drift. Two
//! times with different timescales compare by their rational value, so
//! `1/2` equals `300/600`.

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

/// Timescale used when no better one is known (divisible by common frame rates).
pub const DEFAULT_TIMESCALE: u32 = 600;

/// A point or span on the media timeline, expressed as a rational number of seconds.
#[derive(Debug, Clone, Copy)]
pub struct MediaTime {
    value: i64,
    timescale: u32,
}

impl MediaTime {
    /// Zero seconds.
    pub const ZERO: Self = Self {
        value: 0,
        timescale: DEFAULT_TIMESCALE,
    };

    /// Creates a time of `value / timescale` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `timescale` is zero.
    #[must_use]
    pub fn new(value: i64, timescale: u32) -> Self {
        assert!(timescale > 0, "MediaTime timescale must be non-zero");
        Self { value, timescale }
    }

    /// Converts floating-point seconds into the given timescale, rounding to
    /// the nearest tick. Non-finite input maps to zero.
    ///
    /// # Panics
    ///
    /// Panics if `timescale` is zero.
    #[must_use]
    pub fn from_secs_f64(secs: f64, timescale: u32) -> Self {
        assert!(timescale > 0, "MediaTime timescale must be non-zero");
        if !secs.is_finite() {
            return Self::new(0, timescale);
        }
        let ticks = (secs * f64::from(timescale)).round();
        let value = ticks.clamp(i64::MIN as f64, i64::MAX as f64) as i64;
        Self { value, timescale }
    }

    /// Converts a non-negative [`Duration`] into the given timescale.
    #[must_use]
    pub fn from_duration(duration: Duration, timescale: u32) -> Self {
        Self::from_secs_f64(duration.as_secs_f64(), timescale)
    }

    /// Number of ticks.
    #[must_use]
    pub fn value(self) -> i64 {
        self.value
    }

    /// Ticks per second.
    #[must_use]
    pub fn timescale(self) -> u32 {
        self.timescale
    }

    /// Returns the time as floating-point seconds (for display and clocks).
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.value as f64 / f64::from(self.timescale)
    }

    /// Returns the time as a [`Duration`], or `None` if negative.
    #[must_use]
    pub fn to_duration(self) -> Option<Duration> {
        if self.value < 0 {
            return None;
        }
        Some(Duration::from_secs_f64(self.as_secs_f64()))
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.value < 0
    }

    /// Re-expresses the time in another timescale, rounding half away from zero.
    ///
    /// # Panics
    ///
    /// Panics if `timescale` is zero.
    #[must_use]
    pub fn convert_scale(self, timescale: u32) -> Self {
        assert!(timescale > 0, "MediaTime timescale must be non-zero");
        if timescale == self.timescale {
            return self;
        }
        let numerator = i128::from(self.value) * i128::from(timescale);
        let denominator = i128::from(self.timescale);
        let half = denominator / 2;
        let rounded = if numerator >= 0 {
            (numerator + half) / denominator
        } else {
            (numerator - half) / denominator
        };
        Self {
            value: rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64,
            timescale,
        }
    }

    /// Adds two times, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        let timescale = common_timescale(self.timescale, other.timescale);
        let a = self.convert_scale(timescale);
        let b = other.convert_scale(timescale);
        a.value
            .checked_add(b.value)
            .map(|value| Self { value, timescale })
    }

    /// Subtracts `other` from `self`, returning `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        let timescale = common_timescale(self.timescale, other.timescale);
        let a = self.convert_scale(timescale);
        let b = other.convert_scale(timescale);
        a.value
            .checked_sub(b.value)
            .map(|value| Self { value, timescale })
    }

    /// Offsets the time by floating-point seconds expressed in this time's
    /// own timescale.
    #[must_use]
    pub fn offset_by_secs(self, secs: f64) -> Option<Self> {
        self.checked_add(Self::from_secs_f64(secs, self.timescale))
    }

    /// Clamps the time into `[min, max]`.
    #[must_use]
    pub fn clamp_to(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Least common multiple when it fits, the larger timescale otherwise.
fn common_timescale(a: u32, b: u32) -> u32 {
    if a == b {
        return a;
    }
    let (a64, b64) = (u64::from(a), u64::from(b));
    let lcm = a64 / gcd(a64, b64) * b64;
    u32::try_from(lcm).unwrap_or(a.max(b))
}

impl Default for MediaTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for MediaTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MediaTime {}

impl PartialOrd for MediaTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MediaTime {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = i128::from(self.value) * i128::from(other.timescale);
        let rhs = i128::from(other.value) * i128::from(self.timescale);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for MediaTime {
    /// Formats as `m:ss.mmm`, or `h:mm:ss.mmm` past one hour.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.value < 0 { "-" } else { "" };
        let total_millis = (self.as_secs_f64().abs() * 1000.0).round() as u64;
        let millis = total_millis % 1000;
        let total_secs = total_millis / 1000;
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let secs = total_secs % 60;
        if hours > 0 {
            write!(f, "{sign}{hours}:{minutes:02}:{secs:02}.{millis:03}")
        } else {
            write!(f, "{sign}{minutes}:{secs:02}.{millis:03}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn equal_rationals_compare_equal() {
        assert_eq!(MediaTime::new(1, 2), MediaTime::new(300, 600));
        assert_eq!(MediaTime::ZERO, MediaTime::new(0, 1));
        assert!(MediaTime::new(1, 3) < MediaTime::new(1, 2));
        assert!(MediaTime::new(-1, 600) < MediaTime::ZERO);
    }

    #[test]
    fn from_secs_rounds_to_nearest_tick() {
        let t = MediaTime::from_secs_f64(1.2346, 1000);
        assert_eq!(t.value(), 1235);
        assert_eq!(t.timescale(), 1000);
        assert_eq!(MediaTime::from_secs_f64(f64::NAN, 600), MediaTime::ZERO);
    }

    #[test]
    fn add_uses_least_common_multiple() {
        let sum = MediaTime::new(1, 3)
            .checked_add(MediaTime::new(1, 2))
            .unwrap();
        assert_eq!(sum.timescale(), 6);
        assert_eq!(sum.value(), 5);
    }

    #[test]
    fn repeated_offsets_do_not_drift() {
        let mut t = MediaTime::ZERO;
        for _ in 0..1000 {
            t = t.offset_by_secs(0.1).unwrap();
        }
        assert_eq!(t, MediaTime::new(100, 1));
    }

    #[test]
    fn forward_then_backward_round_trips_exactly() {
        let start = MediaTime::new(7_531, 600);
        let there_and_back = start
            .offset_by_secs(12.5)
            .and_then(|t| t.offset_by_secs(-12.5))
            .unwrap();
        assert_eq!(there_and_back, start);
    }

    #[test]
    fn subtraction_may_go_negative() {
        let diff = MediaTime::new(1, 1).checked_sub(MediaTime::new(3, 1)).unwrap();
        assert!(diff.is_negative());
        assert_eq!(diff.to_duration(), None);
        assert_abs_diff_eq!(diff.as_secs_f64(), -2.0);
    }

    #[test]
    fn convert_scale_rounds_half_away_from_zero() {
        assert_eq!(MediaTime::new(1, 4).convert_scale(2).value(), 1);
        assert_eq!(MediaTime::new(-1, 4).convert_scale(2).value(), -1);
        assert_eq!(MediaTime::new(3, 600).convert_scale(600).value(), 3);
    }

    #[test]
    fn clamp_to_bounds() {
        let max = MediaTime::new(10, 1);
        assert_eq!(MediaTime::new(-5, 1).clamp_to(MediaTime::ZERO, max), MediaTime::ZERO);
        assert_eq!(MediaTime::new(50, 1).clamp_to(MediaTime::ZERO, max), max);
        assert_eq!(
            MediaTime::new(5, 1).clamp_to(MediaTime::ZERO, max),
            MediaTime::new(5, 1)
        );
    }

    #[test]
    fn display_formats_clock() {
        assert_eq!(MediaTime::new(0, 600).to_string(), "0:00.000");
        assert_eq!(MediaTime::new(754_500, 1000).to_string(), "12:34.500");
        assert_eq!(MediaTime::new(3_723, 1).to_string(), "1:02:03.000");
        assert_eq!(MediaTime::new(-1_500, 1000).to_string(), "-0:01.500");
    }

    #[test]
    fn duration_conversion() {
        let t = MediaTime::from_duration(Duration::from_millis(1500), 1000);
        assert_eq!(t.value(), 1500);
        assert_eq!(t.to_duration(), Some(Duration::from_millis(1500)));
    }

    #[test]
    #[should_panic(expected = "timescale must be non-zero")]
    fn zero_timescale_panics() {
        let _ = MediaTime::new(1, 0);
    }
}
