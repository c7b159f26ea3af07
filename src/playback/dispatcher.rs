// SPDX-License-Identifier: MPL-2.0
//! Event dispatcher thread.
//!
//! The worker never calls observers directly. It pushes generation-tagged
//! events onto an unbounded channel, and this thread delivers them in order.
//! Events whose generation is older than the controller's current one are
//! dropped, so nothing from a replaced source reaches observers.

use crossbeam_channel::Receiver;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::controller::ControllerId;
use super::observer::{ObserverRegistry, PlaybackEvent};

/// An event together with the load generation it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct Envelope {
    pub generation: u64,
    pub event: PlaybackEvent,
}

pub(crate) fn spawn(
    controller: ControllerId,
    events: Receiver<Envelope>,
    registry: Arc<ObserverRegistry>,
    current_generation: Arc<AtomicU64>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("playback-events".to_string())
        .spawn(move || {
            for envelope in events.iter() {
                let current = current_generation.load(Ordering::Acquire);
                if envelope.generation < current {
                    tracing::warn!(
                        controller = %controller,
                        event = envelope.event.kind(),
                        generation = envelope.generation,
                        current,
                        "dropping stale playback event"
                    );
                    continue;
                }
                deliver(controller, &envelope.event, &registry);
            }
            tracing::debug!(controller = %controller, "event dispatcher stopped");
        })
}

fn deliver(controller: ControllerId, event: &PlaybackEvent, registry: &ObserverRegistry) {
    for (id, observer) in registry.snapshot() {
        // An earlier callback may have deregistered this one.
        if !registry.is_registered(id) {
            continue;
        }
        if let Some(observer) = observer.upgrade() {
            event.deliver(controller, observer.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::observer::{EventForwarder, PlaybackObserver};
    use crossbeam_channel::unbounded;
    use std::sync::Weak;
    use std::time::Duration;

    #[test]
    fn stale_generations_are_dropped() {
        let registry = Arc::new(ObserverRegistry::default());
        let (forwarder, received) = EventForwarder::new();
        let weak: Weak<dyn PlaybackObserver> = {
            let weak: Weak<EventForwarder> = Arc::downgrade(&forwarder);
            weak
        };
        registry.register(weak);

        let generation = Arc::new(AtomicU64::new(2));
        let (tx, rx) = unbounded();
        let controller = ControllerId::next();
        let handle = spawn(controller, rx, Arc::clone(&registry), generation)
            .expect("failed to spawn dispatcher");

        tx.send(Envelope {
            generation: 1,
            event: PlaybackEvent::Finished,
        })
        .expect("dispatcher alive");
        tx.send(Envelope {
            generation: 2,
            event: PlaybackEvent::Finished,
        })
        .expect("dispatcher alive");
        drop(tx);
        handle.join().expect("dispatcher panicked");

        let events: Vec<_> = received.try_iter().collect();
        assert_eq!(events, vec![(controller, PlaybackEvent::Finished)]);
        assert!(received.recv_timeout(Duration::from_millis(10)).is_err());
    }
}
