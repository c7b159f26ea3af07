// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg`-based media probe.
//!
//! [`FfmpegProbe`] opens a source's container (local file or network URL),
//! reads its duration and container-level tags, and checks for an audio
//! stream. Nothing is decoded.
//!
//! # Design Notes
//!
//! - `FFmpeg` is initialized once per process, with library logging reduced to
//!   errors so warnings do not interleave with our own output
//! - Durations are kept in `AV_TIME_BASE` units (microseconds) so no precision
//!   is lost converting to [`MediaTime`]
//! - A container with neither a video nor an audio stream is rejected as
//!   unsupported
//!
//! # Example
//!
//! ```ignore
//! use lens_playback::infrastructure::{FfmpegProbe, TimelineBackend};
//!
//! let backend = TimelineBackend::new(FfmpegProbe::new());
//! ```

use std::sync::OnceLock;

use crate::application::port::{MediaInfo, MediaProbe};
use crate::domain::media::{Location, MediaSource};
use crate::domain::time::MediaTime;
use crate::error::EngineError;

/// Outcome of the one-time `FFmpeg` initialization, shared by every caller.
static FFMPEG_INIT: OnceLock<Result<(), EngineError>> = OnceLock::new();

/// `FFmpeg` time base (`AV_TIME_BASE`), in ticks per second.
const AV_TIME_BASE: u32 = 1_000_000;

/// Initializes `FFmpeg` once for the whole process.
///
/// # Errors
///
/// Returns an error if `FFmpeg` initialization failed. A failure is sticky:
/// every later call reports the same error.
pub fn init_ffmpeg() -> Result<(), EngineError> {
    init_once(&FFMPEG_INIT, || {
        ffmpeg_next::init()
            .map_err(|e| EngineError::Other(format!("FFmpeg initialization failed: {e}")))?;

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
        Ok(())
    })
}

fn init_once(
    cell: &OnceLock<Result<(), EngineError>>,
    init: impl FnOnce() -> Result<(), EngineError>,
) -> Result<(), EngineError> {
    cell.get_or_init(init).clone()
}

/// Probe backed by `FFmpeg`'s demuxers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegProbe;

impl FfmpegProbe {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MediaProbe for FfmpegProbe {
    fn probe(&self, source: &MediaSource) -> Result<MediaInfo, EngineError> {
        init_ffmpeg()?;

        if let Location::File(path) = source.location() {
            if !path.exists() {
                return Err(EngineError::SourceUnavailable(format!(
                    "{} does not exist",
                    path.display()
                )));
            }
        }

        let input_context = ffmpeg_next::format::input(&source.id())
            .map_err(|e| EngineError::SourceUnavailable(format!("Failed to open {source}: {e}")))?;

        let has_video = input_context
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .is_some();
        let has_audio = input_context
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .is_some();
        if !has_video && !has_audio {
            return Err(EngineError::Unsupported(format!(
                "{source} has no audio or video stream"
            )));
        }

        // Live streams report no (or a negative) duration.
        let duration = (input_context.duration() > 0)
            .then(|| MediaTime::new(input_context.duration(), AV_TIME_BASE));

        let tags = input_context
            .metadata()
            .iter()
            .map(|(key, value)| (Some(key.to_string()), Some(value.to_string())))
            .collect();

        Ok(MediaInfo {
            duration,
            tags,
            has_audio,
        })
    }
}
