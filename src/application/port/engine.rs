// SPDX-License-Identifier: MPL-2.0
//! Media engine port definition.
//!
//! This module defines the [`MediaEngine`] trait (one playback engine bound to
//! one media item) and the [`EngineBackend`] trait that creates engines for
//! sources. Infrastructure adapters implement both.
//!
//! # Design Notes
//!
//! - The engine is **stateful** - it owns the media item, rate and clock
//! - Engines never leave the controller worker thread, so they need not be `Send`;
//!   backends are moved onto that thread and must be
//! - End of source is signalled through a completion handler registered at
//!   load time and cleared at teardown, never through a broadcast channel

use crate::domain::media::{MediaSource, RawTag};
use crate::domain::time::MediaTime;
use crate::domain::video::Volume;
use crate::error::EngineError;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked by an engine each time playback naturally reaches the end
/// of the media item. May be called from any thread.
pub type CompletionHandler = Arc<dyn Fn() + Send + Sync + 'static>;

// =============================================================================
// MediaEngine Trait
// =============================================================================

/// Port for a platform media engine bound to one media item.
///
/// # Lifecycle
///
/// 1. [`EngineBackend::open`] creates the engine for a source
/// 2. The controller applies volume/mute and registers a completion handler
/// 3. Transport calls (`play`, `pause`, `seek`) drive the engine
/// 4. At replacement or teardown the handler is cleared and the engine dropped
pub trait MediaEngine {
    /// Starts or resumes playback at the engine's natural rate.
    fn play(&mut self);

    /// Sets the rate to zero, keeping the current position.
    fn pause(&mut self);

    /// Current playback rate. Zero when paused, stopped or at the end.
    fn rate(&self) -> f32;

    /// Engine failure description, if the engine entered a failed state.
    fn error(&self) -> Option<String> {
        None
    }

    /// Playing means a non-zero rate and no engine error.
    fn is_playing(&self) -> bool {
        self.rate() != 0.0 && self.error().is_none()
    }

    /// Moves the playhead. Out-of-range targets are the engine's business.
    fn seek(&mut self, to: MediaTime);

    /// Current playhead position.
    fn current_time(&self) -> MediaTime;

    /// Duration of the media item, `None` when indefinite (live sources).
    fn duration(&self) -> Option<MediaTime>;

    fn set_volume(&mut self, volume: Volume);

    fn set_muted(&mut self, muted: bool);

    /// Raw descriptive tags of the media item; either side may be missing.
    fn descriptive_tags(&self) -> Vec<RawTag>;

    /// Registers (or clears, with `None`) the end-of-source handler.
    fn set_completion_handler(&mut self, handler: Option<CompletionHandler>);
}

// =============================================================================
// EngineBackend Trait
// =============================================================================

/// Factory for engines, moved onto the controller worker thread.
pub trait EngineBackend: Send {
    /// Prepares a media item for `source` and returns an engine bound to it.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the source cannot be read or is not
    /// supported.
    fn open(&mut self, source: &MediaSource) -> Result<Box<dyn MediaEngine>, EngineError>;
}

// =============================================================================
// EngineHandle
// =============================================================================

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(u64);

impl EngineId {
    fn next() -> Self {
        Self(NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine-{}", self.0)
    }
}

#[derive(Debug)]
struct EngineInfo {
    id: EngineId,
    source: MediaSource,
}

/// Cheap, cloneable reference to an engine instance.
///
/// The engine itself stays on the controller worker; the handle identifies it
/// so a [`PlaybackSurface`](crate::playback::PlaybackSurface) can bind a
/// render target to it. Two handles are equal when they name the same engine.
#[derive(Debug, Clone)]
pub struct EngineHandle(Arc<EngineInfo>);

impl EngineHandle {
    /// Allocates a handle with a fresh [`EngineId`].
    #[must_use]
    pub fn new(source: MediaSource) -> Self {
        Self(Arc::new(EngineInfo {
            id: EngineId::next(),
            source,
        }))
    }

    #[must_use]
    pub fn id(&self) -> EngineId {
        self.0.id
    }

    /// The source the engine was opened for.
    #[must_use]
    pub fn source(&self) -> &MediaSource {
        &self.0.source
    }
}

impl PartialEq for EngineHandle {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for EngineHandle {}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the traits are object-safe
    fn _assert_engine_object_safe(_: &dyn MediaEngine) {}
    fn _assert_backend_object_safe(_: &dyn EngineBackend) {}

    struct StillEngine {
        rate: f32,
        failed: bool,
    }

    impl MediaEngine for StillEngine {
        fn play(&mut self) {
            self.rate = 1.0;
        }
        fn pause(&mut self) {
            self.rate = 0.0;
        }
        fn rate(&self) -> f32 {
            self.rate
        }
        fn error(&self) -> Option<String> {
            self.failed.then(|| "decoder crashed".to_string())
        }
        fn seek(&mut self, _to: MediaTime) {}
        fn current_time(&self) -> MediaTime {
            MediaTime::ZERO
        }
        fn duration(&self) -> Option<MediaTime> {
            None
        }
        fn set_volume(&mut self, _volume: Volume) {}
        fn set_muted(&mut self, _muted: bool) {}
        fn descriptive_tags(&self) -> Vec<RawTag> {
            Vec::new()
        }
        fn set_completion_handler(&mut self, _handler: Option<CompletionHandler>) {}
    }

    #[test]
    fn is_playing_requires_rate_and_no_error() {
        let mut engine = StillEngine {
            rate: 0.0,
            failed: false,
        };
        assert!(!engine.is_playing());

        engine.play();
        assert!(engine.is_playing());

        engine.failed = true;
        assert!(!engine.is_playing());
    }

    #[test]
    fn handles_compare_by_engine_identity() {
        let source = MediaSource::from_path("a.mp4");
        let first = EngineHandle::new(source.clone());
        let second = EngineHandle::new(source);

        assert_eq!(first, first.clone());
        assert_ne!(first, second);
        assert!(second.id() > first.id());
        assert_eq!(first.source().id(), "a.mp4");
    }
}
