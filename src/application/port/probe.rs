// SPDX-License-Identifier: MPL-2.0
//! Media probing port.
//!
//! A probe inspects a source without playing it and reports what an engine
//! needs up front: duration, descriptive tags and whether audio is present.

use crate::domain::media::{MediaSource, RawTag};
use crate::domain::time::MediaTime;
use crate::error::EngineError;

/// Static facts about a source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaInfo {
    /// Total duration, `None` when indefinite.
    pub duration: Option<MediaTime>,
    /// Raw descriptive tags.
    pub tags: Vec<RawTag>,
    /// Whether the source carries an audio track.
    pub has_audio: bool,
}

impl MediaInfo {
    /// Info for a source of known duration with no tags.
    #[must_use]
    pub fn with_duration(duration: MediaTime) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// Adds a complete key/value tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((Some(key.into()), Some(value.into())));
        self
    }
}

/// Port for inspecting sources.
pub trait MediaProbe: Send {
    /// Probes `source`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the source cannot be opened or parsed.
    fn probe(&self, source: &MediaSource) -> Result<MediaInfo, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_helpers_fill_fields() {
        let info = MediaInfo::with_duration(MediaTime::new(30, 1))
            .tag("title", "Intro")
            .tag("artist", "Someone");

        assert_eq!(info.duration, Some(MediaTime::new(30, 1)));
        assert_eq!(info.tags.len(), 2);
        assert!(!info.has_audio);
    }
}
