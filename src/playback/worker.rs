// SPDX-License-Identifier: MPL-2.0
//! Playback worker thread.
//!
//! The worker owns the engine, the retained audio settings and the
//! `has_been_paused` flag. Every controller call arrives as a [`Command`] on
//! one inbox and is answered over its own reply channel, so commands are
//! applied strictly in submission order. Periodic progress ticks and
//! end-of-source notifications are funneled through the same loop.

use crossbeam_channel::{never, select, tick, Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::controller::ControllerId;
use super::dispatcher::Envelope;
use super::observer::PlaybackEvent;
use crate::application::port::{
    AudioRoute, CompletionHandler, EngineBackend, EngineHandle, MediaEngine,
};
use crate::domain::media::{MediaSource, Metadata};
use crate::domain::time::MediaTime;
use crate::domain::video::{PlaybackState, Volume};
use crate::error::{ControlError, PlaybackError};

type Reply<T> = Sender<Result<T, ControlError>>;

/// Messages accepted by the worker.
pub(crate) enum Command {
    Load {
        source: MediaSource,
        reply: Reply<EngineHandle>,
    },
    Unload {
        reply: Reply<()>,
    },
    Play {
        reply: Reply<()>,
    },
    Pause {
        reply: Reply<()>,
    },
    Stop {
        reply: Reply<()>,
    },
    Seek {
        to: MediaTime,
        reply: Reply<()>,
    },
    SeekBy {
        secs: f64,
        reply: Reply<()>,
    },
    CurrentTime {
        reply: Reply<MediaTime>,
    },
    Duration {
        reply: Reply<Option<MediaTime>>,
    },
    State {
        reply: Sender<PlaybackState>,
    },
    Engine {
        reply: Sender<Option<EngineHandle>>,
    },
    SetVolume(Volume),
    SetMuted(bool),
    /// Posted by the engine's completion handler.
    EndOfSource {
        generation: u64,
    },
    Shutdown,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Load { .. } => "load",
            Self::Unload { .. } => "unload",
            Self::Play { .. } => "play",
            Self::Pause { .. } => "pause",
            Self::Stop { .. } => "stop",
            Self::Seek { .. } => "seek",
            Self::SeekBy { .. } => "seek-by",
            Self::CurrentTime { .. } => "current-time",
            Self::Duration { .. } => "duration",
            Self::State { .. } => "state",
            Self::Engine { .. } => "engine",
            Self::SetVolume(_) => "set-volume",
            Self::SetMuted(_) => "set-muted",
            Self::EndOfSource { .. } => "end-of-source",
            Self::Shutdown => "shutdown",
        }
    }
}

/// What woke the loop up.
enum Wake {
    Command(Command),
    Tick,
    Disconnected,
}

struct Loaded {
    engine: Box<dyn MediaEngine>,
    handle: EngineHandle,
}

/// Everything the worker needs besides the backend.
pub(crate) struct WorkerContext {
    pub controller: ControllerId,
    pub inbox: Sender<Command>,
    pub events: Sender<Envelope>,
    pub generation: Arc<AtomicU64>,
    pub audio_route: Box<dyn AudioRoute>,
    pub configure_audio_route: bool,
    pub progress_interval: Duration,
    pub volume: Volume,
    pub muted: bool,
}

pub(crate) struct Worker<B> {
    backend: B,
    ctx: WorkerContext,
    generation: u64,
    loaded: Option<Loaded>,
    ticker: Receiver<Instant>,
    has_been_paused: bool,
}

impl<B: EngineBackend> Worker<B> {
    pub(crate) fn new(backend: B, ctx: WorkerContext) -> Self {
        let generation = ctx.generation.load(Ordering::Acquire);
        Self {
            backend,
            ctx,
            generation,
            loaded: None,
            ticker: never(),
            has_been_paused: false,
        }
    }

    /// Runs until [`Command::Shutdown`] arrives or every sender is gone.
    pub(crate) fn run(mut self, inbox: &Receiver<Command>) {
        tracing::debug!(controller = %self.ctx.controller, "playback worker started");
        loop {
            let wake = select! {
                recv(inbox) -> msg => msg.map_or(Wake::Disconnected, Wake::Command),
                recv(self.ticker) -> _ => Wake::Tick,
            };
            match wake {
                Wake::Command(Command::Shutdown) | Wake::Disconnected => break,
                Wake::Command(command) => self.handle(command),
                Wake::Tick => self.on_tick(),
            }
        }
        self.teardown();
        tracing::debug!(controller = %self.ctx.controller, "playback worker stopped");
    }

    fn handle(&mut self, command: Command) {
        tracing::trace!(controller = %self.ctx.controller, command = command.name(), "command");
        // Reply send failures mean the caller gave up waiting; nothing to do.
        match command {
            Command::Load { source, reply } => {
                let _ = reply.send(self.load(source));
            }
            Command::Unload { reply } => {
                let _ = reply.send(self.unload());
            }
            Command::Play { reply } => {
                let _ = reply.send(self.play());
            }
            Command::Pause { reply } => {
                let _ = reply.send(self.pause());
            }
            Command::Stop { reply } => {
                let _ = reply.send(self.stop());
            }
            Command::Seek { to, reply } => {
                let _ = reply.send(self.seek(to));
            }
            Command::SeekBy { secs, reply } => {
                let _ = reply.send(self.seek_by(secs));
            }
            Command::CurrentTime { reply } => {
                let _ = reply.send(self.engine().map(|engine| engine.current_time()));
            }
            Command::Duration { reply } => {
                let _ = reply.send(self.engine().map(|engine| engine.duration()));
            }
            Command::State { reply } => {
                let _ = reply.send(self.state());
            }
            Command::Engine { reply } => {
                let _ = reply.send(self.loaded.as_ref().map(|loaded| loaded.handle.clone()));
            }
            Command::SetVolume(volume) => {
                self.ctx.volume = volume;
                if let Some(loaded) = self.loaded.as_mut() {
                    loaded.engine.set_volume(volume);
                }
            }
            Command::SetMuted(muted) => {
                self.ctx.muted = muted;
                if let Some(loaded) = self.loaded.as_mut() {
                    loaded.engine.set_muted(muted);
                }
            }
            Command::EndOfSource { generation } => self.on_end_of_source(generation),
            Command::Shutdown => {}
        }
    }

    // =========================================================================
    // Load / teardown
    // =========================================================================

    fn load(&mut self, source: MediaSource) -> Result<EngineHandle, ControlError> {
        self.teardown();

        let mut engine = self.backend.open(&source).map_err(|err| {
            tracing::warn!(controller = %self.ctx.controller, source = %source, "open failed: {err}");
            ControlError::Open(err)
        })?;

        engine.set_volume(self.ctx.volume);
        engine.set_muted(self.ctx.muted);

        if self.ctx.configure_audio_route {
            if let Err(err) = self.ctx.audio_route.configure_for_playback() {
                tracing::warn!(controller = %self.ctx.controller, "audio route: {err}");
                self.emit(PlaybackEvent::Error(PlaybackError::from(err)));
            }
        }

        let metadata = Metadata::from_tags(engine.descriptive_tags());
        self.emit(PlaybackEvent::MetadataReady(metadata));
        self.emit(progress_event(engine.as_ref()));

        let generation = self.generation;
        let inbox = self.ctx.inbox.clone();
        let handler: CompletionHandler = Arc::new(move || {
            let _ = inbox.send(Command::EndOfSource { generation });
        });
        engine.set_completion_handler(Some(handler));
        self.ticker = tick(self.ctx.progress_interval);

        let handle = EngineHandle::new(source);
        tracing::info!(
            controller = %self.ctx.controller,
            engine = %handle.id(),
            source = %handle.source(),
            generation,
            "media loaded"
        );
        self.loaded = Some(Loaded {
            engine,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    fn unload(&mut self) -> Result<(), ControlError> {
        if self.loaded.is_none() {
            return Err(ControlError::NotLoaded);
        }
        self.teardown();
        tracing::info!(controller = %self.ctx.controller, "media unloaded");
        Ok(())
    }

    /// Starts a new generation and drops the current engine, if any.
    fn teardown(&mut self) {
        self.generation += 1;
        self.ctx.generation.store(self.generation, Ordering::Release);
        self.ticker = never();
        self.has_been_paused = false;
        if let Some(mut loaded) = self.loaded.take() {
            loaded.engine.set_completion_handler(None);
            loaded.engine.pause();
            tracing::debug!(
                controller = %self.ctx.controller,
                engine = %loaded.handle.id(),
                "engine released"
            );
        }
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn engine(&self) -> Result<&dyn MediaEngine, ControlError> {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.engine.as_ref())
            .ok_or(ControlError::NotLoaded)
    }

    fn engine_mut(&mut self) -> Result<&mut Box<dyn MediaEngine>, ControlError> {
        self.loaded
            .as_mut()
            .map(|loaded| &mut loaded.engine)
            .ok_or(ControlError::NotLoaded)
    }

    fn play(&mut self) -> Result<(), ControlError> {
        self.engine_mut()?.play();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), ControlError> {
        let engine = self.engine_mut()?;
        let was_playing = engine.is_playing();
        engine.pause();
        self.has_been_paused = was_playing;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ControlError> {
        self.pause()?;
        self.seek(MediaTime::ZERO)
    }

    fn seek(&mut self, to: MediaTime) -> Result<(), ControlError> {
        let engine = self.engine_mut()?;
        engine.seek(to);
        let event = progress_event(engine.as_ref());
        self.emit(event);
        Ok(())
    }

    fn seek_by(&mut self, secs: f64) -> Result<(), ControlError> {
        let current = self.engine()?.current_time();
        let target = current.offset_by_secs(secs).unwrap_or(current);
        self.seek(target)
    }

    fn state(&self) -> PlaybackState {
        match self.loaded.as_ref() {
            Some(loaded) => PlaybackState {
                is_loaded: true,
                is_playing: loaded.engine.is_playing(),
                has_been_paused: self.has_been_paused,
            },
            None => PlaybackState::unloaded(),
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    fn on_tick(&mut self) {
        let Ok(engine) = self.engine() else {
            return;
        };
        if engine.is_playing() {
            let event = progress_event(engine);
            self.emit(event);
        }
    }

    fn on_end_of_source(&mut self, generation: u64) {
        if generation != self.generation || self.loaded.is_none() {
            tracing::debug!(
                controller = %self.ctx.controller,
                generation,
                current = self.generation,
                "ignoring stale end of source"
            );
            return;
        }
        tracing::info!(controller = %self.ctx.controller, "playback finished");
        self.emit(PlaybackEvent::Finished);
    }

    fn emit(&self, event: PlaybackEvent) {
        let envelope = Envelope {
            generation: self.generation,
            event,
        };
        if self.ctx.events.send(envelope).is_err() {
            tracing::error!(controller = %self.ctx.controller, "event dispatcher is gone");
        }
    }
}

/// Progress report for the engine's current position.
fn progress_event(engine: &dyn MediaEngine) -> PlaybackEvent {
    let current = engine.current_time();
    let remaining = engine
        .duration()
        .and_then(|duration| duration.checked_sub(current))
        .map(|remaining| remaining.max(MediaTime::ZERO));
    PlaybackEvent::Progress { current, remaining }
}
