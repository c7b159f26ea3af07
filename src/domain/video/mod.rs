// SPDX-License-Identifier: MPL-2.0
//! Video playback domain types.
//!
//! This module contains playback value objects that are independent of any
//! engine or presentation concerns.

pub mod newtypes;
pub mod playback;

// Re-export commonly used types
pub use newtypes::{ProgressInterval, SeekStep, Volume};
pub use playback::PlaybackState;
