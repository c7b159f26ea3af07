// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and scripted playback engines.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.
//!
//! [`FakeEngine`] and [`FakeBackend`] let controller tests drive an engine
//! deterministically: the clock only moves when a test moves it, and natural
//! completion happens when a test calls [`finish`].

// Re-export approx macros for convenient use in tests
pub use approx::assert_abs_diff_eq;

use parking_lot::Mutex;
use std::sync::Arc;

use crate::application::port::{CompletionHandler, EngineBackend, MediaEngine};
use crate::domain::media::{MediaSource, RawTag};
use crate::domain::time::MediaTime;
use crate::domain::video::Volume;
use crate::error::EngineError;

// =============================================================================
// FakeEngine
// =============================================================================

/// Observable state of a [`FakeEngine`].
pub struct FakeEngineState {
    pub position: MediaTime,
    pub duration: Option<MediaTime>,
    pub rate: f32,
    pub volume: Volume,
    pub muted: bool,
    pub tags: Vec<RawTag>,
    pub error: Option<String>,
    pub handler: Option<CompletionHandler>,
    pub seeks: Vec<MediaTime>,
}

pub type SharedEngineState = Arc<Mutex<FakeEngineState>>;

/// Engine whose state lives behind a shared lock so tests can inspect and
/// script it while the controller owns the engine.
pub struct FakeEngine {
    state: SharedEngineState,
}

impl FakeEngine {
    pub fn new(duration: Option<MediaTime>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeEngineState {
                position: MediaTime::ZERO,
                duration,
                rate: 0.0,
                volume: Volume::default(),
                muted: false,
                tags: Vec::new(),
                error: None,
                handler: None,
                seeks: Vec::new(),
            })),
        }
    }

    pub fn state(&self) -> SharedEngineState {
        Arc::clone(&self.state)
    }
}

impl MediaEngine for FakeEngine {
    fn play(&mut self) {
        self.state.lock().rate = 1.0;
    }

    fn pause(&mut self) {
        self.state.lock().rate = 0.0;
    }

    fn rate(&self) -> f32 {
        self.state.lock().rate
    }

    fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    fn seek(&mut self, to: MediaTime) {
        let mut state = self.state.lock();
        state.position = to;
        state.seeks.push(to);
    }

    fn current_time(&self) -> MediaTime {
        self.state.lock().position
    }

    fn duration(&self) -> Option<MediaTime> {
        self.state.lock().duration
    }

    fn set_volume(&mut self, volume: Volume) {
        self.state.lock().volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.lock().muted = muted;
    }

    fn descriptive_tags(&self) -> Vec<RawTag> {
        self.state.lock().tags.clone()
    }

    fn set_completion_handler(&mut self, handler: Option<CompletionHandler>) {
        self.state.lock().handler = handler;
    }
}

/// Simulates a natural end of source: parks the clock at the end with a zero
/// rate and invokes the registered completion handler, if any.
///
/// Returns whether a handler was invoked.
pub fn finish(state: &SharedEngineState) -> bool {
    let handler = {
        let mut state = state.lock();
        state.rate = 0.0;
        if let Some(duration) = state.duration {
            state.position = duration;
        }
        state.handler.clone()
    };
    match handler {
        Some(handler) => {
            handler();
            true
        }
        None => false,
    }
}

// =============================================================================
// FakeBackend
// =============================================================================

#[derive(Default)]
struct FakeBackendInner {
    duration: Option<MediaTime>,
    tags: Vec<RawTag>,
    fail_next: Option<EngineError>,
    opened: Vec<(MediaSource, SharedEngineState)>,
}

/// Backend producing [`FakeEngine`]s. Clones share state, so a test keeps
/// one clone while the controller owns another.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<FakeBackendInner>>,
}

impl FakeBackend {
    pub fn new(duration: Option<MediaTime>) -> Self {
        let backend = Self::default();
        backend.inner.lock().duration = duration;
        backend
    }

    /// Tags reported by every engine opened from now on.
    #[must_use]
    pub fn with_tags(self, tags: Vec<RawTag>) -> Self {
        self.inner.lock().tags = tags;
        self
    }

    /// Makes the next `open` fail with `error`.
    pub fn fail_next_open(&self, error: EngineError) {
        self.inner.lock().fail_next = Some(error);
    }

    pub fn opened_count(&self) -> usize {
        self.inner.lock().opened.len()
    }

    pub fn engine(&self, index: usize) -> Option<SharedEngineState> {
        self.inner
            .lock()
            .opened
            .get(index)
            .map(|(_, state)| Arc::clone(state))
    }

    pub fn last_engine(&self) -> Option<SharedEngineState> {
        self.inner
            .lock()
            .opened
            .last()
            .map(|(_, state)| Arc::clone(state))
    }
}

impl EngineBackend for FakeBackend {
    fn open(&mut self, source: &MediaSource) -> Result<Box<dyn MediaEngine>, EngineError> {
        let mut inner = self.inner.lock();
        if let Some(error) = inner.fail_next.take() {
            return Err(error);
        }
        let engine = FakeEngine::new(inner.duration);
        engine.state.lock().tags = inner.tags.clone();
        inner.opened.push((source.clone(), engine.state()));
        Ok(Box::new(engine))
    }
}
