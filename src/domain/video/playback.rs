// SPDX-License-Identifier: MPL-2.0
//! Derived playback state.
//!
//! The controller only persists `{Unloaded, Loaded}` and the sticky
//! `has_been_paused` flag. Playing, paused and stopped are predicates read
//! from the engine at query time, so this type is a snapshot rather than a
//! state machine.

/// Snapshot of the controller's observable playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    /// A media source is attached.
    pub is_loaded: bool,
    /// Engine rate is non-zero and the engine reports no error.
    pub is_playing: bool,
    /// Set by an explicit pause issued while playing, cleared by a pause
    /// issued while not playing and by every load.
    pub has_been_paused: bool,
}

impl PlaybackState {
    /// State of a controller with nothing loaded.
    #[must_use]
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Returns true when loaded but not advancing.
    #[must_use]
    pub fn is_idle(self) -> bool {
        self.is_loaded && !self.is_playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unloaded_state_has_all_flags_cleared() {
        let state = PlaybackState::unloaded();
        assert!(!state.is_loaded);
        assert!(!state.is_playing);
        assert!(!state.has_been_paused);
        assert!(!state.is_idle());
    }

    #[test]
    fn idle_requires_loaded_and_not_playing() {
        let loaded = PlaybackState {
            is_loaded: true,
            ..PlaybackState::default()
        };
        assert!(loaded.is_idle());

        let playing = PlaybackState {
            is_loaded: true,
            is_playing: true,
            has_been_paused: false,
        };
        assert!(!playing.is_idle());
    }
}
