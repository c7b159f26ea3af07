// SPDX-License-Identifier: MPL-2.0
//! URL-identified media sources.

use crate::error::SourceError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// Where a source lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Local file (plain path or `file://` URL).
    File(PathBuf),
    /// Any other URL with a scheme (`http`, `https`, `rtsp`, ...).
    Url(Url),
}

/// Opaque handle to an asset, identified by a URL or a filesystem path.
///
/// # Example
///
/// ```
/// use lens_playback::domain::media::{Location, MediaSource};
///
/// let local = MediaSource::parse("file:///videos/My%20Clip.mp4").unwrap();
/// assert_eq!(local.as_path().unwrap().to_str(), Some("/videos/My Clip.mp4"));
///
/// let remote: MediaSource = "https://example.org/stream.m3u8".parse().unwrap();
/// assert!(matches!(remote.location(), Location::Url(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaSource {
    location: Location,
}

impl MediaSource {
    /// Creates a source for a local file.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
        }
    }

    /// Parses a source identifier.
    ///
    /// Identifiers with a `scheme://` prefix are URLs; `file://` URLs become
    /// local paths (percent-escapes decoded, only an empty or `localhost` host
    /// accepted). Anything else is taken as a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Empty`] for blank input and
    /// [`SourceError::MalformedUrl`] for a URL that does not parse or a
    /// `file://` URL that does not name a local path.
    pub fn parse(identifier: &str) -> Result<Self, SourceError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(SourceError::Empty);
        }
        if !identifier.contains("://") {
            return Ok(Self::from_path(identifier));
        }

        let malformed = || SourceError::MalformedUrl(identifier.to_string());
        let url = Url::parse(identifier).map_err(|_| malformed())?;

        if url.scheme() == "file" {
            let path = url.to_file_path().map_err(|()| malformed())?;
            return Ok(Self::from_path(path));
        }
        if url.cannot_be_a_base() {
            return Err(malformed());
        }

        Ok(Self {
            location: Location::Url(url),
        })
    }

    /// Returns where the source lives.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the local path, if this is a file source.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Url(_) => None,
        }
    }

    /// Returns true for non-file URLs.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self.location, Location::Url(_))
    }

    /// Stable identifier used for lookups and logging.
    #[must_use]
    pub fn id(&self) -> String {
        match &self.location {
            Location::File(path) => path.to_string_lossy().into_owned(),
            Location::Url(url) => url.as_str().to_string(),
        }
    }
}

impl FromStr for MediaSource {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Url(url) => f.write_str(url.as_str()),
        }
    }
}
