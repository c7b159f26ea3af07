// SPDX-License-Identifier: MPL-2.0
//! Descriptive metadata extracted from a media source.

use std::collections::BTreeMap;

/// A raw descriptive tag as reported by an engine. Either side may be absent.
pub type RawTag = (Option<String>, Option<String>);

/// Immutable key/value metadata for one loaded source.
///
/// Built once per load from the engine's descriptive tags; only pairs where
/// both key and value are present survive. When a key repeats, the first
/// occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: BTreeMap<String, String>,
}

impl Metadata {
    /// Builds metadata from raw tags, dropping incomplete pairs.
    pub fn from_tags<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = RawTag>,
    {
        let mut entries = BTreeMap::new();
        for (key, value) in tags {
            if let (Some(key), Some(value)) = (key, value) {
                entries.entry(key).or_insert(value);
            }
        }
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consumes the metadata into its map.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(key: Option<&str>, value: Option<&str>) -> RawTag {
        (key.map(str::to_string), value.map(str::to_string))
    }

    #[test]
    fn keeps_only_complete_pairs() {
        let metadata = Metadata::from_tags(vec![
            tag(Some("title"), Some("Intro")),
            tag(Some("artist"), None),
            tag(None, Some("orphan value")),
            tag(Some("album"), Some("Demos")),
        ]);

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("title"), Some("Intro"));
        assert_eq!(metadata.get("album"), Some("Demos"));
        assert_eq!(metadata.get("artist"), None);
    }

    #[test]
    fn first_occurrence_wins() {
        let metadata = Metadata::from_tags(vec![
            tag(Some("title"), Some("First")),
            tag(Some("title"), Some("Second")),
        ]);
        assert_eq!(metadata.get("title"), Some("First"));
    }

    #[test]
    fn iterates_in_key_order() {
        let metadata = Metadata::from_tags(vec![
            tag(Some("b"), Some("2")),
            tag(Some("a"), Some("1")),
        ]);
        let keys: Vec<_> = metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn no_tags_yields_empty_metadata() {
        let metadata = Metadata::from_tags(Vec::new());
        assert!(metadata.is_empty());
        assert!(metadata.into_map().is_empty());
    }
}
