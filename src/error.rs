// SPDX-License-Identifier: MPL-2.0
//! Error types for the playback control surface.
//!
//! Two families of errors exist:
//! - [`ControlError`] is returned synchronously to the caller of a controller
//!   operation (nothing loaded, engine could not open the source, worker gone).
//! - [`PlaybackError`] is reported asynchronously to observers. The only
//!   reported kind is an audio output configuration failure.
//!
//! [`Error`] covers the ambient concerns (settings file, I/O).

use thiserror::Error;

/// Crate-level error for configuration and I/O.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a media engine backend or probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The source could not be found or read.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The source exists but the engine cannot handle its format.
    #[error("unsupported source: {0}")]
    Unsupported(String),

    /// Any other engine-specific failure.
    #[error("engine failure: {0}")]
    Other(String),
}

/// Failure while preparing the shared audio output for playback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioRouteError {
    /// The host exposes no output device.
    #[error("no audio output device found")]
    NoOutputDevice,

    /// The output device refused to provide a usable configuration.
    #[error("audio output configuration unavailable: {0}")]
    Configuration(String),

    /// Access to audio output was denied (permissions, exclusive mode).
    #[error("audio output access denied: {0}")]
    Denied(String),
}

/// Errors delivered to observers through the error event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("audio output configuration failed: {0}")]
    AudioRoute(#[source] AudioRouteError),
}

impl From<AudioRouteError> for PlaybackError {
    fn from(err: AudioRouteError) -> Self {
        PlaybackError::AudioRoute(err)
    }
}

/// Errors returned by [`PlaybackController`](crate::playback::PlaybackController)
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// No source is attached; the operation did nothing and emitted nothing.
    #[error("no media source is loaded")]
    NotLoaded,

    /// The engine backend could not open the requested source.
    #[error("failed to open media source: {0}")]
    Open(#[source] EngineError),

    /// The controller worker is no longer running.
    #[error("playback worker is not running")]
    WorkerGone,
}

/// Errors raised while parsing a [`MediaSource`](crate::domain::media::MediaSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("media source identifier is empty")]
    Empty,

    #[error("malformed media URL: {0}")]
    MalformedUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn playback_error_carries_audio_route_cause() {
        let err: PlaybackError = AudioRouteError::Denied("sandbox".into()).into();
        let text = err.to_string();
        assert!(text.starts_with("audio output configuration failed"));
        assert!(text.contains("sandbox"));

        let source = std::error::Error::source(&err).expect("cause should be attached");
        assert_eq!(source.to_string(), "audio output access denied: sandbox");
    }

    #[test]
    fn control_error_wraps_engine_error() {
        let err = ControlError::Open(EngineError::SourceUnavailable("missing.mp4".into()));
        assert!(err.to_string().contains("missing.mp4"));
        assert_ne!(err, ControlError::NotLoaded);
    }
}
