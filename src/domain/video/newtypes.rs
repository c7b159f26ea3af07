// SPDX-License-Identifier: MPL-2.0
//! Playback newtypes.
//!
//! This module provides type-safe wrappers for playback values,
//! ensuring they are always within valid ranges. Bounds come from
//! [`crate::config::defaults`].

use crate::config::{
    DEFAULT_PROGRESS_INTERVAL_MS, DEFAULT_SEEK_STEP_SECS, DEFAULT_VOLUME,
    MAX_PROGRESS_INTERVAL_MS, MAX_SEEK_STEP_SECS, MAX_VOLUME, MIN_PROGRESS_INTERVAL_MS,
    MIN_SEEK_STEP_SECS, MIN_VOLUME, VOLUME_STEP,
};
use std::time::Duration;

// =============================================================================
// Volume
// =============================================================================

/// Volume level, guaranteed to be within valid range (0.0–1.0).
///
/// This newtype enforces validity at the type level, making it impossible
/// to hand an engine an out-of-range volume.
///
/// # Example
///
/// ```
/// use lens_playback::domain::video::Volume;
///
/// let vol = Volume::new(0.5);
/// assert_eq!(vol.value(), 0.5);
///
/// // Values outside range are clamped
/// let too_loud = Volume::new(2.0);
/// assert_eq!(too_loud.value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Creates a new volume level, clamping to valid range.
    /// NaN is treated as silence.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        if volume.is_nan() {
            return Self(MIN_VOLUME);
        }
        Self(volume.clamp(MIN_VOLUME, MAX_VOLUME))
    }

    /// Returns the volume value as f32.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true if volume is effectively silent (below audible threshold).
    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 < 0.001
    }

    /// Increases volume by one step, clamping to maximum.
    #[must_use]
    pub fn increase(self) -> Self {
        Self::new(self.0 + VOLUME_STEP)
    }

    /// Decreases volume by one step, clamping to minimum.
    #[must_use]
    pub fn decrease(self) -> Self {
        Self::new(self.0 - VOLUME_STEP)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

// =============================================================================
// ProgressInterval
// =============================================================================

/// Interval between periodic progress events (10 ms – 60 s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressInterval(Duration);

impl ProgressInterval {
    /// Creates a new interval from milliseconds, clamping to valid range.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(
            millis.clamp(MIN_PROGRESS_INTERVAL_MS, MAX_PROGRESS_INTERVAL_MS),
        ))
    }

    /// Returns the interval as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl Default for ProgressInterval {
    fn default() -> Self {
        Self::from_millis(DEFAULT_PROGRESS_INTERVAL_MS)
    }
}

// =============================================================================
// SeekStep
// =============================================================================

/// Relative seek step in seconds, guaranteed to be within 0.5–30.0 seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekStep(f64);

impl SeekStep {
    /// Creates a new seek step, clamping to valid range.
    #[must_use]
    pub fn new(secs: f64) -> Self {
        if secs.is_nan() {
            return Self::default();
        }
        Self(secs.clamp(MIN_SEEK_STEP_SECS, MAX_SEEK_STEP_SECS))
    }

    /// Returns the value in seconds.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for SeekStep {
    fn default() -> Self {
        Self(DEFAULT_SEEK_STEP_SECS)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Volume tests
    // -------------------------------------------------------------------------

    #[test]
    fn volume_clamps_to_valid_range() {
        assert_abs_diff_eq!(Volume::new(-0.5).value(), MIN_VOLUME);
        assert_abs_diff_eq!(Volume::new(1.5).value(), MAX_VOLUME);
        assert_abs_diff_eq!(Volume::new(0.5).value(), 0.5);
        assert_abs_diff_eq!(Volume::new(f32::NAN).value(), MIN_VOLUME);
    }

    #[test]
    fn volume_default_is_expected() {
        assert_abs_diff_eq!(Volume::default().value(), DEFAULT_VOLUME);
    }

    #[test]
    fn volume_is_silent_detects_zero() {
        assert!(Volume::new(0.0).is_silent());
        assert!(Volume::new(0.0005).is_silent());
        assert!(!Volume::new(0.01).is_silent());
    }

    #[test]
    fn volume_increase_and_decrease() {
        let vol = Volume::new(0.5);
        assert_abs_diff_eq!(vol.increase().value(), 0.5 + VOLUME_STEP, epsilon = 0.001);
        assert_abs_diff_eq!(vol.decrease().value(), 0.5 - VOLUME_STEP, epsilon = 0.001);

        assert_abs_diff_eq!(Volume::new(MAX_VOLUME).increase().value(), MAX_VOLUME);
        assert_abs_diff_eq!(Volume::new(MIN_VOLUME).decrease().value(), MIN_VOLUME);
    }

    // -------------------------------------------------------------------------
    // ProgressInterval tests
    // -------------------------------------------------------------------------

    #[test]
    fn progress_interval_clamps() {
        assert_eq!(
            ProgressInterval::from_millis(0).as_duration(),
            Duration::from_millis(MIN_PROGRESS_INTERVAL_MS)
        );
        assert_eq!(
            ProgressInterval::from_millis(u64::MAX).as_duration(),
            Duration::from_millis(MAX_PROGRESS_INTERVAL_MS)
        );
        assert_eq!(
            ProgressInterval::default().as_duration(),
            Duration::from_secs(1)
        );
    }

    // -------------------------------------------------------------------------
    // SeekStep tests
    // -------------------------------------------------------------------------

    #[test]
    fn seek_step_clamps_to_valid_range() {
        assert_abs_diff_eq!(SeekStep::new(0.0).value(), MIN_SEEK_STEP_SECS);
        assert_abs_diff_eq!(SeekStep::new(100.0).value(), MAX_SEEK_STEP_SECS);
        assert_abs_diff_eq!(SeekStep::new(5.0).value(), 5.0);
        assert_abs_diff_eq!(SeekStep::new(f64::NAN).value(), DEFAULT_SEEK_STEP_SECS);
    }
}
