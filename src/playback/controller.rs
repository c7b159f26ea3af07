// SPDX-License-Identifier: MPL-2.0
//! Playback controller.
//!
//! [`PlaybackController`] is the caller-facing handle. It owns two threads:
//!
//! - `playback-worker` holds the engine and applies commands in order
//! - `playback-events` delivers events to registered observers
//!
//! Every transport call blocks until the worker has applied it, so callers on
//! different threads always observe a consistent engine state. Observer
//! callbacks never run on the caller's thread.
//!
//! # Example
//!
//! ```
//! use lens_playback::application::port::MediaInfo;
//! use lens_playback::domain::media::MediaSource;
//! use lens_playback::domain::time::MediaTime;
//! use lens_playback::infrastructure::{StaticProbe, TimelineBackend};
//! use lens_playback::playback::{EventForwarder, PlaybackController};
//!
//! let clip = MediaSource::from_path("clip.mp4");
//! let probe = StaticProbe::new().with(&clip, MediaInfo::with_duration(MediaTime::new(90, 1)));
//! let controller = PlaybackController::new(TimelineBackend::new(probe)).unwrap();
//!
//! let (forwarder, _events) = EventForwarder::new();
//! controller.register_observer(&forwarder);
//!
//! controller.load(clip).unwrap();
//! controller.seek(MediaTime::new(30, 1)).unwrap();
//! assert_eq!(controller.current_time().unwrap(), MediaTime::new(30, 1));
//! ```

use crossbeam_channel::{bounded, unbounded, Sender};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};

use super::dispatcher;
use super::observer::{ObserverId, ObserverRegistry, PlaybackObserver};
use super::worker::{Command, Worker, WorkerContext};
use crate::application::port::{AudioRoute, EngineBackend, EngineHandle, NullAudioRoute};
use crate::config::{self, Config};
use crate::domain::media::MediaSource;
use crate::domain::time::MediaTime;
use crate::domain::video::{PlaybackState, ProgressInterval, SeekStep, Volume};
use crate::error::{self, ControlError};

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a controller, passed to every observer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u64);

impl ControllerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "controller-{}", self.0)
    }
}

/// Construction-time settings of a controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerOptions {
    pub volume: Volume,
    pub muted: bool,
    pub progress_interval: ProgressInterval,
    /// Step used by front ends for forward/backward.
    pub seek_step: SeekStep,
    pub configure_audio_route: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            volume: Volume::default(),
            muted: false,
            progress_interval: ProgressInterval::default(),
            seek_step: SeekStep::default(),
            configure_audio_route: config::DEFAULT_CONFIGURE_AUDIO_ROUTE,
        }
    }
}

impl From<&Config> for ControllerOptions {
    fn from(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            volume: config.volume.map_or(defaults.volume, Volume::new),
            muted: config.muted.unwrap_or(defaults.muted),
            progress_interval: config
                .progress_interval_ms
                .map_or(defaults.progress_interval, ProgressInterval::from_millis),
            seek_step: config.seek_step_secs.map_or(defaults.seek_step, SeekStep::new),
            configure_audio_route: config
                .configure_audio_route
                .unwrap_or(defaults.configure_audio_route),
        }
    }
}

/// Audio settings mirrored on the caller side so queries never block.
#[derive(Debug, Clone, Copy)]
struct AudioSettings {
    volume: Volume,
    muted: bool,
}

/// Transport control for one media source at a time.
pub struct PlaybackController {
    id: ControllerId,
    inbox: Sender<Command>,
    registry: Arc<ObserverRegistry>,
    audio: Mutex<AudioSettings>,
    seek_step: SeekStep,
    worker: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
}

impl PlaybackController {
    /// Creates a controller with default options and no audio route setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker or dispatcher thread cannot be spawned.
    pub fn new<B>(backend: B) -> error::Result<Self>
    where
        B: EngineBackend + 'static,
    {
        Self::with_options(backend, NullAudioRoute, ControllerOptions::default())
    }

    /// Creates a controller over `backend`, configuring `audio_route` before
    /// each load when the options ask for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker or dispatcher thread cannot be spawned.
    pub fn with_options<B, R>(backend: B, audio_route: R, options: ControllerOptions) -> error::Result<Self>
    where
        B: EngineBackend + 'static,
        R: AudioRoute + 'static,
    {
        let id = ControllerId::next();
        let registry = Arc::new(ObserverRegistry::default());
        let generation = Arc::new(AtomicU64::new(0));
        let (inbox_tx, inbox_rx) = unbounded();
        let (events_tx, events_rx) = unbounded();

        let dispatcher =
            dispatcher::spawn(id, events_rx, Arc::clone(&registry), Arc::clone(&generation))?;

        let ctx = WorkerContext {
            controller: id,
            inbox: inbox_tx.clone(),
            events: events_tx,
            generation,
            audio_route: Box::new(audio_route),
            configure_audio_route: options.configure_audio_route,
            progress_interval: options.progress_interval.as_duration(),
            volume: options.volume,
            muted: options.muted,
        };
        // The engine is created on the worker and never leaves it.
        let worker = thread::Builder::new()
            .name("playback-worker".to_string())
            .spawn(move || Worker::new(backend, ctx).run(&inbox_rx))?;

        tracing::debug!(controller = %id, "playback controller created");
        Ok(Self {
            id,
            inbox: inbox_tx,
            registry,
            audio: Mutex::new(AudioSettings {
                volume: options.volume,
                muted: options.muted,
            }),
            seek_step: options.seek_step,
            worker: Some(worker),
            dispatcher: Some(dispatcher),
        })
    }

    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// Step configured for forward/backward in front ends.
    #[must_use]
    pub fn seek_step(&self) -> SeekStep {
        self.seek_step
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Registers `observer` without taking ownership of it. Register before
    /// [`load`](Self::load) to receive that load's events.
    pub fn register_observer<O>(&self, observer: &Arc<O>) -> ObserverId
    where
        O: PlaybackObserver + 'static,
    {
        let weak: Weak<O> = Arc::downgrade(observer);
        let id = self.registry.register(weak);
        tracing::debug!(controller = %self.id, observer = %id, "observer registered");
        id
    }

    /// Removes a registration. Safe to call from inside a callback; the
    /// observer receives nothing further. Returns whether `id` was registered.
    pub fn deregister_observer(&self, id: ObserverId) -> bool {
        let removed = self.registry.deregister(id);
        tracing::debug!(controller = %self.id, observer = %id, removed, "observer deregistered");
        removed
    }

    // =========================================================================
    // Source
    // =========================================================================

    /// Replaces the current source with `source`.
    ///
    /// Emits one metadata event and an initial progress event, preceded by an
    /// error event if the audio route could not be configured.
    ///
    /// # Errors
    ///
    /// [`ControlError::Open`] if the backend cannot open the source; the
    /// controller is then unloaded.
    pub fn load(&self, source: MediaSource) -> Result<EngineHandle, ControlError> {
        self.request(|reply| Command::Load { source, reply })?
    }

    /// Detaches the current source.
    ///
    /// # Errors
    ///
    /// [`ControlError::NotLoaded`] if nothing is loaded.
    pub fn unload(&self) -> Result<(), ControlError> {
        self.request(|reply| Command::Unload { reply })?
    }

    /// Engine instance of the current source, for binding a surface.
    #[must_use]
    pub fn engine(&self) -> Option<EngineHandle> {
        self.request(|reply| Command::Engine { reply })
            .ok()
            .flatten()
    }

    /// Snapshot of the derived playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.request(|reply| Command::State { reply })
            .unwrap_or_else(|_| PlaybackState::unloaded())
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// # Errors
    ///
    /// [`ControlError::NotLoaded`] if nothing is loaded.
    pub fn play(&self) -> Result<(), ControlError> {
        self.request(|reply| Command::Play { reply })?
    }

    /// Pauses playback. Records whether the engine was playing beforehand in
    /// [`PlaybackState::has_been_paused`].
    ///
    /// # Errors
    ///
    /// [`ControlError::NotLoaded`] if nothing is loaded.
    pub fn pause(&self) -> Result<(), ControlError> {
        self.request(|reply| Command::Pause { reply })?
    }

    /// Pauses and rewinds to zero.
    ///
    /// # Errors
    ///
    /// [`ControlError::NotLoaded`] if nothing is loaded.
    pub fn stop(&self) -> Result<(), ControlError> {
        self.request(|reply| Command::Stop { reply })?
    }

    /// Moves the playhead to `to`. Out-of-range targets are left to the engine.
    ///
    /// # Errors
    ///
    /// [`ControlError::NotLoaded`] if nothing is loaded.
    pub fn seek(&self, to: MediaTime) -> Result<(), ControlError> {
        self.request(|reply| Command::Seek { to, reply })?
    }

    /// Seeks `secs` seconds ahead of the current time.
    ///
    /// # Errors
    ///
    /// [`ControlError::NotLoaded`] if nothing is loaded.
    pub fn forward(&self, secs: f64) -> Result<(), ControlError> {
        self.request(|reply| Command::SeekBy { secs, reply })?
    }

    /// Seeks `secs` seconds behind the current time.
    ///
    /// # Errors
    ///
    /// [`ControlError::NotLoaded`] if nothing is loaded.
    pub fn backward(&self, secs: f64) -> Result<(), ControlError> {
        self.request(|reply| Command::SeekBy { secs: -secs, reply })?
    }

    /// # Errors
    ///
    /// [`ControlError::NotLoaded`] if nothing is loaded.
    pub fn current_time(&self) -> Result<MediaTime, ControlError> {
        self.request(|reply| Command::CurrentTime { reply })?
    }

    /// Duration of the loaded source, `None` when indefinite.
    ///
    /// # Errors
    ///
    /// [`ControlError::NotLoaded`] if nothing is loaded.
    pub fn duration(&self) -> Result<Option<MediaTime>, ControlError> {
        self.request(|reply| Command::Duration { reply })?
    }

    // =========================================================================
    // Audio
    // =========================================================================

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.audio.lock().volume
    }

    /// Sets the volume (clamped to `[0.0, 1.0]`) on the current and every
    /// future engine.
    pub fn set_volume(&self, volume: f32) {
        let volume = Volume::new(volume);
        let mut audio = self.audio.lock();
        audio.volume = volume;
        self.post(Command::SetVolume(volume));
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.audio.lock().muted
    }

    /// Mutes or unmutes the current and every future engine.
    pub fn set_muted(&self, muted: bool) {
        let mut audio = self.audio.lock();
        audio.muted = muted;
        self.post(Command::SetMuted(muted));
    }

    // =========================================================================
    // Worker plumbing
    // =========================================================================

    /// Sends a command and blocks for its reply.
    fn request<T>(
        &self,
        command: impl FnOnce(Sender<T>) -> Command,
    ) -> Result<T, ControlError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.inbox
            .send(command(reply_tx))
            .map_err(|_| ControlError::WorkerGone)?;
        reply_rx.recv().map_err(|_| ControlError::WorkerGone)
    }

    /// Sends a command without waiting.
    fn post(&self, command: Command) {
        if self.inbox.send(command).is_err() {
            tracing::error!(controller = %self.id, "playback worker is gone");
        }
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("id", &self.id)
            .field("observers", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        let _ = self.inbox.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!(controller = %self.id, "playback worker panicked");
            }
        }
        // The worker's exit closes the event channel, so the dispatcher
        // finishes once its queue is drained. Joining from inside a callback
        // would wait on ourselves.
        if let Some(dispatcher) = self.dispatcher.take() {
            if dispatcher.thread().id() == thread::current().id() {
                return;
            }
            if dispatcher.join().is_err() {
                tracing::error!(controller = %self.id, "event dispatcher panicked");
            }
        }
    }
}
