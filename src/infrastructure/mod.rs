// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`timeline`]: Clock-driven engine and backend (implements [`MediaEngine`], [`EngineBackend`])
//! - [`static_probe`]: Table-driven probe (implements [`MediaProbe`])
//! - `ffmpeg`: Container probe via `FFmpeg` (feature `ffmpeg`)
//! - `audio_route`: Default output device setup via `cpal` (feature `audio`)
//!
//! [`MediaEngine`]: crate::application::port::MediaEngine
//! [`EngineBackend`]: crate::application::port::EngineBackend
//! [`MediaProbe`]: crate::application::port::MediaProbe

#[cfg(feature = "audio")]
pub mod audio_route;
#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;
pub mod static_probe;
pub mod timeline;

// Re-export main types for convenience
#[cfg(feature = "audio")]
pub use audio_route::{CpalAudioRoute, OutputFormat};
#[cfg(feature = "ffmpeg")]
pub use ffmpeg::FfmpegProbe;
pub use static_probe::StaticProbe;
pub use timeline::{TimelineBackend, TimelineEngine};
