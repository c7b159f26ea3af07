// SPDX-License-Identifier: MPL-2.0
//! Render-less timeline engine.
//!
//! [`TimelineEngine`] keeps a presentation clock for a probed source without
//! decoding anything: the playhead is an anchor position plus the monotonic
//! time elapsed since playback started, scaled by the rate. It is the engine
//! used for headless playback, and the reference behavior for boundary
//! handling:
//!
//! - seeks clamp to `[0, duration]`
//! - reaching the end behaves like a pause at the end (rate drops to zero)
//! - `play()` at the end restarts from the beginning
//!
//! End of source is detected by a one-shot timer thread armed whenever the
//! clock starts running. Pausing, seeking, clearing the completion handler or
//! dropping the engine cancels the pending timer.

use crossbeam_channel::{after, bounded, select, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::application::port::{
    CompletionHandler, EngineBackend, MediaEngine, MediaInfo, MediaProbe,
};
use crate::domain::media::{MediaSource, RawTag};
use crate::domain::time::MediaTime;
use crate::domain::video::Volume;
use crate::error::EngineError;

/// Rate reported while the clock is running.
const PLAY_RATE: f32 = 1.0;

/// Resolution of the running clock (microseconds).
const CLOCK_TIMESCALE: u32 = 1_000_000;

/// Pending end-of-source timer. Dropping it cancels the timer thread.
struct EndTimer {
    _cancel: Sender<()>,
    fired: Arc<AtomicBool>,
}

/// Clock-driven engine for one probed media item.
pub struct TimelineEngine {
    info: MediaInfo,
    /// Playhead position at `started_at` (or the frozen position when paused).
    anchor: MediaTime,
    /// Monotonic start of the current run, `None` while paused.
    started_at: Option<Instant>,
    volume: Volume,
    muted: bool,
    handler: Option<CompletionHandler>,
    end_timer: Option<EndTimer>,
}

impl TimelineEngine {
    /// Creates a paused engine positioned at zero.
    #[must_use]
    pub fn new(info: MediaInfo) -> Self {
        let timescale = info
            .duration
            .map_or(crate::domain::time::DEFAULT_TIMESCALE, MediaTime::timescale);
        Self {
            info,
            anchor: MediaTime::new(0, timescale),
            started_at: None,
            volume: Volume::default(),
            muted: false,
            handler: None,
            end_timer: None,
        }
    }

    /// Current volume as last set by the controller.
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn timer_fired(&self) -> bool {
        self.end_timer
            .as_ref()
            .is_some_and(|timer| timer.fired.load(Ordering::Acquire))
    }

    fn running_position(&self) -> MediaTime {
        let Some(started_at) = self.started_at else {
            return self.anchor;
        };
        let elapsed = started_at.elapsed().as_secs_f64() * f64::from(PLAY_RATE);
        let base = if self.anchor.timescale() >= CLOCK_TIMESCALE {
            self.anchor
        } else {
            self.anchor.convert_scale(CLOCK_TIMESCALE)
        };
        let position = base.offset_by_secs(elapsed).unwrap_or(base);
        match self.info.duration {
            Some(duration) => position.clamp_to(MediaTime::ZERO, duration),
            None => position,
        }
    }

    fn reached_end(&self) -> bool {
        match self.info.duration {
            Some(duration) => self.timer_fired() || self.running_position() >= duration,
            None => false,
        }
    }

    /// Takes the pending end timer away from its thread.
    ///
    /// Returns `Some(true)` when completion now belongs to the caller,
    /// `Some(false)` when the timer thread already claimed it, and `None` when
    /// no timer was armed.
    fn claim_end_timer(&mut self) -> Option<bool> {
        self.end_timer
            .take()
            .map(|timer| !timer.fired.swap(true, Ordering::AcqRel))
    }

    /// Stops the running clock's timer, and freezes the clock at the end once
    /// the end has been reached. A natural end the timer thread did not get to
    /// report is reported here, so the handler runs once per completion.
    fn settle(&mut self) {
        if self.started_at.is_none() {
            return;
        }
        let claim = self.claim_end_timer();
        let at_end = matches!(claim, Some(false))
            || self
                .info
                .duration
                .is_some_and(|duration| self.running_position() >= duration);
        if !at_end {
            return;
        }
        if let Some(duration) = self.info.duration {
            self.anchor = duration;
        }
        self.started_at = None;
        if claim != Some(false) {
            self.notify_completion();
        }
    }

    fn notify_completion(&self) {
        if let Some(handler) = &self.handler {
            handler();
        }
    }

    fn arm_end_timer(&mut self) {
        self.end_timer = None;
        let (Some(handler), Some(duration), Some(_)) =
            (self.handler.clone(), self.info.duration, self.started_at)
        else {
            return;
        };
        let Some(remaining) = duration
            .checked_sub(self.anchor)
            .and_then(MediaTime::to_duration)
        else {
            return;
        };
        let wait = Duration::from_secs_f64(remaining.as_secs_f64() / f64::from(PLAY_RATE));

        let (cancel_tx, cancel_rx) = bounded::<()>(0);
        let fired = Arc::new(AtomicBool::new(false));
        let fired_flag = Arc::clone(&fired);
        let deadline = after(wait);

        let spawned = thread::Builder::new()
            .name("timeline-end".to_string())
            .spawn(move || {
                select! {
                    recv(cancel_rx) -> _ => {}
                    recv(deadline) -> _ => {
                        if !fired_flag.swap(true, Ordering::AcqRel) {
                            handler();
                        }
                    }
                }
            });

        match spawned {
            Ok(_) => {
                self.end_timer = Some(EndTimer {
                    _cancel: cancel_tx,
                    fired,
                });
            }
            Err(err) => tracing::warn!("failed to arm end-of-source timer: {err}"),
        }
    }
}

impl MediaEngine for TimelineEngine {
    fn play(&mut self) {
        self.settle();
        if self.started_at.is_some() {
            self.arm_end_timer();
            return;
        }
        // Paused at the end: restart from the beginning.
        if self.info.duration.is_some_and(|d| self.anchor >= d) {
            self.anchor = MediaTime::new(0, self.anchor.timescale());
        }
        self.started_at = Some(Instant::now());
        self.arm_end_timer();
    }

    fn pause(&mut self) {
        self.settle();
        if self.started_at.is_none() {
            return;
        }
        // The timer is gone after settle(); an end reached since is ours to report.
        self.anchor = self.running_position();
        self.started_at = None;
        if self.info.duration.is_some_and(|duration| self.anchor >= duration) {
            self.notify_completion();
        }
    }

    fn rate(&self) -> f32 {
        if self.started_at.is_some() && !self.reached_end() {
            PLAY_RATE
        } else {
            0.0
        }
    }

    fn seek(&mut self, to: MediaTime) {
        self.settle();
        let upper = self.info.duration.unwrap_or_else(|| to.max(MediaTime::ZERO));
        self.anchor = to.clamp_to(MediaTime::ZERO, upper);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
            self.arm_end_timer();
        }
    }

    fn current_time(&self) -> MediaTime {
        if self.started_at.is_some() && self.timer_fired() {
            if let Some(duration) = self.info.duration {
                return duration;
            }
        }
        self.running_position()
    }

    fn duration(&self) -> Option<MediaTime> {
        self.info.duration
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn descriptive_tags(&self) -> Vec<RawTag> {
        self.info.tags.clone()
    }

    fn set_completion_handler(&mut self, handler: Option<CompletionHandler>) {
        self.settle();
        self.handler = handler;
        self.arm_end_timer();
    }
}

/// Backend that opens a [`TimelineEngine`] over whatever a probe reports.
pub struct TimelineBackend<P> {
    probe: P,
}

impl<P: MediaProbe> TimelineBackend<P> {
    #[must_use]
    pub fn new(probe: P) -> Self {
        Self { probe }
    }
}

impl<P: MediaProbe> EngineBackend for TimelineBackend<P> {
    fn open(&mut self, source: &MediaSource) -> Result<Box<dyn MediaEngine>, EngineError> {
        let info = self.probe.probe(source)?;
        tracing::debug!(
            source = %source,
            duration = ?info.duration.map(MediaTime::as_secs_f64),
            tags = info.tags.len(),
            has_audio = info.has_audio,
            "opened timeline engine"
        );
        Ok(Box::new(TimelineEngine::new(info)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn engine_with_duration_ms(millis: i64) -> TimelineEngine {
        TimelineEngine::new(MediaInfo::with_duration(MediaTime::new(millis, 1000)))
    }

    fn counting_handler() -> (CompletionHandler, crossbeam_channel::Receiver<()>) {
        let (tx, rx) = unbounded();
        let handler: CompletionHandler = Arc::new(move || {
            let _ = tx.send(());
        });
        (handler, rx)
    }

    #[test]
    fn new_engine_is_paused_at_zero() {
        let engine = engine_with_duration_ms(10_000);
        assert_eq!(engine.rate(), 0.0);
        assert_eq!(engine.current_time(), MediaTime::ZERO);
        assert_eq!(engine.duration(), Some(MediaTime::new(10, 1)));
    }

    #[test]
    fn clock_advances_only_while_playing() {
        let mut engine = engine_with_duration_ms(10_000);
        engine.play();
        assert!(engine.is_playing());
        thread::sleep(Duration::from_millis(60));
        engine.pause();

        let paused_at = engine.current_time();
        assert!(paused_at >= MediaTime::new(50, 1000));
        thread::sleep(Duration::from_millis(30));
        assert_eq!(engine.current_time(), paused_at);
        assert!(!engine.is_playing());
    }

    #[test]
    fn seek_clamps_to_bounds() {
        let mut engine = engine_with_duration_ms(10_000);

        engine.seek(MediaTime::new(-3, 1));
        assert_eq!(engine.current_time(), MediaTime::ZERO);

        engine.seek(MediaTime::new(60, 1));
        assert_eq!(engine.current_time(), MediaTime::new(10, 1));

        engine.seek(MediaTime::new(4, 1));
        assert_eq!(engine.current_time(), MediaTime::new(4, 1));
    }

    #[test]
    fn completion_fires_once_at_natural_end() {
        let mut engine = engine_with_duration_ms(80);
        let (handler, rx) = counting_handler();
        engine.set_completion_handler(Some(handler));

        engine.play();
        rx.recv_timeout(Duration::from_secs(2))
            .expect("completion should fire");
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

        assert_eq!(engine.rate(), 0.0);
        assert_eq!(engine.current_time(), MediaTime::new(80, 1000));
    }

    #[test]
    fn pause_cancels_pending_completion() {
        let mut engine = engine_with_duration_ms(100);
        let (handler, rx) = counting_handler();
        engine.set_completion_handler(Some(handler));

        engine.play();
        engine.pause();
        assert!(rx.recv_timeout(Duration::from_millis(250)).is_err());
    }

    #[test]
    fn clearing_handler_cancels_pending_completion() {
        let mut engine = engine_with_duration_ms(100);
        let (handler, rx) = counting_handler();
        engine.set_completion_handler(Some(handler));

        engine.play();
        engine.set_completion_handler(None);
        assert!(rx.recv_timeout(Duration::from_millis(250)).is_err());
    }

    /// Swaps in a timer whose thread never runs, standing in for a
    /// `timeline-end` thread that has not been scheduled yet.
    fn stall_end_timer(engine: &mut TimelineEngine) {
        let (cancel, _) = bounded::<()>(0);
        engine.end_timer = Some(EndTimer {
            _cancel: cancel,
            fired: Arc::new(AtomicBool::new(false)),
        });
    }

    #[test]
    fn pause_at_end_reports_completion_the_timer_missed() {
        let mut engine = engine_with_duration_ms(20);
        let (handler, rx) = counting_handler();
        engine.set_completion_handler(Some(handler));
        engine.play();
        stall_end_timer(&mut engine);
        thread::sleep(Duration::from_millis(50));

        engine.pause();

        assert!(rx.try_recv().is_ok());
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(engine.rate(), 0.0);
        assert_eq!(engine.current_time(), MediaTime::new(20, 1000));
    }

    #[test]
    fn seek_at_end_reports_completion_the_timer_missed() {
        let mut engine = engine_with_duration_ms(20);
        let (handler, rx) = counting_handler();
        engine.set_completion_handler(Some(handler));
        engine.play();
        stall_end_timer(&mut engine);
        thread::sleep(Duration::from_millis(50));

        engine.seek(MediaTime::ZERO);

        assert!(rx.try_recv().is_ok());
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(engine.rate(), 0.0);
    }

    #[test]
    fn completion_is_not_repeated_by_later_transport() {
        let mut engine = engine_with_duration_ms(30);
        let (handler, rx) = counting_handler();
        engine.set_completion_handler(Some(handler));
        engine.play();
        rx.recv_timeout(Duration::from_secs(2))
            .expect("completion should fire");

        engine.pause();
        engine.seek(MediaTime::new(30, 1000));
        engine.set_completion_handler(None);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn play_at_end_restarts_from_beginning() {
        let mut engine = engine_with_duration_ms(5_000);
        engine.seek(MediaTime::new(5, 1));
        engine.play();

        assert!(engine.is_playing());
        assert!(engine.current_time() < MediaTime::new(1, 1));
    }

    #[test]
    fn seek_after_end_does_not_resume() {
        let mut engine = engine_with_duration_ms(50);
        let (handler, rx) = counting_handler();
        engine.set_completion_handler(Some(handler));
        engine.play();
        rx.recv_timeout(Duration::from_secs(2))
            .expect("completion should fire");

        engine.seek(MediaTime::ZERO);
        assert_eq!(engine.rate(), 0.0);
        assert_eq!(engine.current_time(), MediaTime::ZERO);
    }

    #[test]
    fn indefinite_duration_never_ends() {
        let mut engine = TimelineEngine::new(MediaInfo::default());
        engine.seek(MediaTime::new(3_600, 1));
        assert_eq!(engine.current_time(), MediaTime::new(3_600, 1));
        engine.play();
        assert!(engine.is_playing());
        assert_eq!(engine.duration(), None);
    }

    #[test]
    fn volume_and_mute_are_stored() {
        let mut engine = engine_with_duration_ms(1_000);
        engine.set_volume(Volume::new(0.3));
        engine.set_muted(true);
        assert_eq!(engine.volume(), Volume::new(0.3));
        assert!(engine.is_muted());
    }
}
