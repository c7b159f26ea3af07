// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value objects and rules with no engine or platform coupling.
//!
//! # Modules
//!
//! - [`media`]: Media types ([`MediaSource`](media::MediaSource),
//!   [`Metadata`](media::Metadata))
//! - [`time`]: Rational timeline values ([`MediaTime`](time::MediaTime))
//! - [`video`]: Playback types ([`PlaybackState`](video::PlaybackState),
//!   [`Volume`](video::Volume), [`ProgressInterval`](video::ProgressInterval),
//!   [`SeekStep`](video::SeekStep))

pub mod media;
pub mod time;
pub mod video;
