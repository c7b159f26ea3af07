// SPDX-License-Identifier: MPL-2.0
//! In-memory probe keyed by source identifier.

use std::collections::HashMap;

use crate::application::port::{MediaInfo, MediaProbe};
use crate::domain::media::MediaSource;
use crate::error::EngineError;

/// Probe answering from a fixed table, for headless use and tests.
///
/// Unknown sources fail with [`EngineError::SourceUnavailable`].
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    entries: HashMap<String, MediaInfo>,
}

impl StaticProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the info reported for `source`.
    pub fn insert(&mut self, source: &MediaSource, info: MediaInfo) {
        self.entries.insert(source.id(), info);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, source: &MediaSource, info: MediaInfo) -> Self {
        self.insert(source, info);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MediaProbe for StaticProbe {
    fn probe(&self, source: &MediaSource) -> Result<MediaInfo, EngineError> {
        self.entries
            .get(&source.id())
            .cloned()
            .ok_or_else(|| EngineError::SourceUnavailable(format!("unknown source {source}")))
    }
}
