// SPDX-License-Identifier: MPL-2.0
//! Shared audio output configuration via `cpal`.
//!
//! Before a new item starts, the default output device is located and its
//! default stream configuration negotiated. Failure here is reported to the
//! controller, which surfaces it as a playback error without aborting the
//! load.

use cpal::traits::{DeviceTrait, HostTrait};

use crate::application::port::AudioRoute;
use crate::error::AudioRouteError;

/// Output configuration negotiated with the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Audio route bound to the host's default output device.
#[derive(Debug, Default)]
pub struct CpalAudioRoute {
    negotiated: Option<OutputFormat>,
}

impl CpalAudioRoute {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format negotiated by the last successful configuration.
    #[must_use]
    pub fn negotiated(&self) -> Option<OutputFormat> {
        self.negotiated
    }
}

impl AudioRoute for CpalAudioRoute {
    fn configure_for_playback(&mut self) -> Result<(), AudioRouteError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioRouteError::NoOutputDevice)?;

        let supported_config = device.default_output_config().map_err(|e| match e {
            cpal::DefaultStreamConfigError::DeviceNotAvailable => {
                AudioRouteError::Denied(format!("output device unavailable: {e}"))
            }
            other => AudioRouteError::Configuration(other.to_string()),
        })?;

        let format = OutputFormat {
            sample_rate: supported_config.sample_rate(),
            channels: supported_config.channels(),
        };
        tracing::debug!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            "audio output configured"
        );
        self.negotiated = Some(format);
        Ok(())
    }
}
