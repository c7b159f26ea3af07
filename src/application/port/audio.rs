// SPDX-License-Identifier: MPL-2.0
//! Audio output route port.
//!
//! Before playback starts, the controller asks the platform to prepare the
//! shared audio output. Failure is reported to observers and never aborts a
//! load.

use crate::error::AudioRouteError;

/// Port for configuring the shared audio output for playback.
pub trait AudioRoute: Send {
    /// Prepares the audio output for playback.
    ///
    /// # Errors
    ///
    /// Returns an [`AudioRouteError`] when no output is available or the
    /// platform refuses the configuration.
    fn configure_for_playback(&mut self) -> Result<(), AudioRouteError>;
}

/// Route that never touches the platform (headless use).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudioRoute;

impl AudioRoute for NullAudioRoute {
    fn configure_for_playback(&mut self) -> Result<(), AudioRouteError> {
        Ok(())
    }
}

impl<F> AudioRoute for F
where
    F: FnMut() -> Result<(), AudioRouteError> + Send,
{
    fn configure_for_playback(&mut self) -> Result<(), AudioRouteError> {
        self()
    }
}
