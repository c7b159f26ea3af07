// SPDX-License-Identifier: MPL-2.0
//! Observer surface of the playback controller.
//!
//! Observers are held weakly: registering does not keep an observer alive,
//! and observers that have been dropped are pruned on the next delivery.
//! Deregistration is checked immediately before every callback, so an
//! observer removed from inside a callback receives nothing further.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

use super::controller::ControllerId;
use crate::domain::media::Metadata;
use crate::domain::time::MediaTime;
use crate::error::PlaybackError;

/// Receives playback events. All methods default to doing nothing.
///
/// Callbacks run on the controller's event dispatcher thread, never on the
/// caller's thread, so they may call back into the controller.
pub trait PlaybackObserver: Send + Sync {
    /// Playback reached the natural end of the loaded source.
    fn on_finished(&self, controller: ControllerId) {
        let _ = controller;
    }

    /// Periodic (or post-seek) position report. `remaining` is `None` for
    /// sources of indefinite duration.
    fn on_progress(
        &self,
        controller: ControllerId,
        current: MediaTime,
        remaining: Option<MediaTime>,
    ) {
        let _ = (controller, current, remaining);
    }

    /// Metadata of the freshly loaded source. Fired once per load.
    fn on_metadata_ready(&self, controller: ControllerId, metadata: &Metadata) {
        let _ = (controller, metadata);
    }

    /// A non-fatal failure during playback.
    fn on_error(&self, controller: ControllerId, error: &PlaybackError) {
        let _ = (controller, error);
    }
}

/// Owned form of an observer callback.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Finished,
    Progress {
        current: MediaTime,
        remaining: Option<MediaTime>,
    },
    MetadataReady(Metadata),
    Error(PlaybackError),
}

impl PlaybackEvent {
    /// Invokes the matching callback on `observer`.
    pub fn deliver(&self, controller: ControllerId, observer: &dyn PlaybackObserver) {
        match self {
            Self::Finished => observer.on_finished(controller),
            Self::Progress { current, remaining } => {
                observer.on_progress(controller, *current, *remaining);
            }
            Self::MetadataReady(metadata) => observer.on_metadata_ready(controller, metadata),
            Self::Error(error) => observer.on_error(controller, error),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Progress { .. } => "progress",
            Self::MetadataReady(_) => "metadata",
            Self::Error(_) => "error",
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Identifies one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

type Entry = (ObserverId, Weak<dyn PlaybackObserver>);

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Weak observer list shared by the controller and its dispatcher.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    inner: Mutex<RegistryInner>,
}

impl ObserverRegistry {
    pub(crate) fn register(&self, observer: Weak<dyn PlaybackObserver>) -> ObserverId {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = ObserverId(inner.next_id);
        inner.entries.push((id, observer));
        id
    }

    /// Returns whether `id` was registered.
    pub(crate) fn deregister(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|(entry_id, _)| *entry_id != id);
        inner.entries.len() != before
    }

    pub(crate) fn is_registered(&self, id: ObserverId) -> bool {
        self.inner
            .lock()
            .entries
            .iter()
            .any(|(entry_id, _)| *entry_id == id)
    }

    /// Copies the live registrations, pruning dropped observers.
    pub(crate) fn snapshot(&self) -> Vec<Entry> {
        let mut inner = self.inner.lock();
        inner.entries.retain(|(_, observer)| observer.strong_count() > 0);
        inner.entries.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}

// =============================================================================
// EventForwarder
// =============================================================================

/// Observer that forwards every callback into a channel.
///
/// Useful for callers that prefer pulling events over implementing
/// [`PlaybackObserver`].
///
/// ```
/// use lens_playback::playback::EventForwarder;
///
/// let (forwarder, events) = EventForwarder::new();
/// // controller.register_observer(&forwarder);
/// assert!(events.try_recv().is_err());
/// # drop(forwarder);
/// ```
pub struct EventForwarder {
    tx: Sender<(ControllerId, PlaybackEvent)>,
}

impl EventForwarder {
    /// Creates a forwarder and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Arc<Self>, Receiver<(ControllerId, PlaybackEvent)>) {
        let (tx, rx) = unbounded();
        (Arc::new(Self { tx }), rx)
    }

    fn forward(&self, controller: ControllerId, event: PlaybackEvent) {
        // Receiver gone: nobody is listening anymore.
        let _ = self.tx.send((controller, event));
    }
}

impl PlaybackObserver for EventForwarder {
    fn on_finished(&self, controller: ControllerId) {
        self.forward(controller, PlaybackEvent::Finished);
    }

    fn on_progress(
        &self,
        controller: ControllerId,
        current: MediaTime,
        remaining: Option<MediaTime>,
    ) {
        self.forward(controller, PlaybackEvent::Progress { current, remaining });
    }

    fn on_metadata_ready(&self, controller: ControllerId, metadata: &Metadata) {
        self.forward(controller, PlaybackEvent::MetadataReady(metadata.clone()));
    }

    fn on_error(&self, controller: ControllerId, error: &PlaybackError) {
        self.forward(controller, PlaybackEvent::Error(error.clone()));
    }
}
