// SPDX-License-Identifier: MPL-2.0
//! Playback control surface.
//!
//! - [`PlaybackController`]: transport control over one engine, run on a worker thread
//! - [`PlaybackSurface`]: render target bound to an engine instance
//! - [`PlaybackObserver`]: callbacks for finished, progress, metadata and error events

mod controller;
mod dispatcher;
mod observer;
mod surface;
mod worker;

pub use controller::{ControllerId, ControllerOptions, PlaybackController};
pub use observer::{EventForwarder, ObserverId, PlaybackEvent, PlaybackObserver};
pub use surface::PlaybackSurface;
