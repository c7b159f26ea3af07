// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Volume**: Audio playback volume settings
//! - **Progress**: Periodic progress tick interval
//! - **Seek**: Relative seek step used by front ends

// ==========================================================================
// Volume Defaults
// ==========================================================================

/// Default playback volume (0.0 to 1.0).
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f32 = 1.0;

/// Volume adjustment step per key press (5%).
pub const VOLUME_STEP: f32 = 0.05;

// ==========================================================================
// Progress Defaults
// ==========================================================================

/// Default interval between progress events while playing (in milliseconds).
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 1_000;

/// Minimum progress interval (in milliseconds).
pub const MIN_PROGRESS_INTERVAL_MS: u64 = 10;

/// Maximum progress interval (in milliseconds).
pub const MAX_PROGRESS_INTERVAL_MS: u64 = 60_000;

// ==========================================================================
// Seek Defaults
// ==========================================================================

/// Default relative seek step in seconds.
pub const DEFAULT_SEEK_STEP_SECS: f64 = 5.0;

/// Minimum relative seek step in seconds.
pub const MIN_SEEK_STEP_SECS: f64 = 0.5;

/// Maximum relative seek step in seconds.
pub const MAX_SEEK_STEP_SECS: f64 = 30.0;

// ==========================================================================
// Audio Route Defaults
// ==========================================================================

/// Whether `load` configures the shared audio output by default.
pub const DEFAULT_CONFIGURE_AUDIO_ROUTE: bool = true;
