// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the controller remains
//! independent of concrete engines and platforms.
//!
//! # Available Ports
//!
//! - [`audio`]: Shared audio output configuration
//! - [`engine`]: Media engines and the backends that open them
//! - [`probe`]: Source inspection (duration, tags)
//! - [`render`]: Render targets bound to an engine
//!
//! # Design Notes
//!
//! - All traits use domain types only (no `FFmpeg` or `cpal` types)
//! - Backends, probes, routes and targets are `Send` so they can live on worker threads
//! - Methods return `Result` with crate error types
//! - No `async fn` - the controller serializes calls on its own worker
//!
//! # Example
//!
//! ```
//! use lens_playback::application::port::{MediaInfo, MediaProbe};
//! use lens_playback::domain::media::MediaSource;
//! use lens_playback::error::EngineError;
//!
//! struct NoTagsProbe;
//!
//! impl MediaProbe for NoTagsProbe {
//!     fn probe(&self, _source: &MediaSource) -> Result<MediaInfo, EngineError> {
//!         Ok(MediaInfo::default())
//!     }
//! }
//!
//! let info = NoTagsProbe.probe(&MediaSource::from_path("clip.mp4")).unwrap();
//! assert!(info.tags.is_empty());
//! ```

pub mod audio;
pub mod engine;
pub mod probe;
pub mod render;

// Re-export main types for convenience
pub use audio::{AudioRoute, NullAudioRoute};
pub use engine::{CompletionHandler, EngineBackend, EngineHandle, EngineId, MediaEngine};
pub use probe::{MediaInfo, MediaProbe};
pub use render::{NullRenderTarget, RenderTarget};
