// SPDX-License-Identifier: MPL-2.0
//! Playback surface: the view side of playback.
//!
//! A surface owns one render target and records which engine instance the
//! target presents. It holds no playback logic.

use crate::application::port::{EngineHandle, NullRenderTarget, RenderTarget};

/// Render target bound to at most one engine instance.
pub struct PlaybackSurface<T = NullRenderTarget> {
    target: T,
    engine: Option<EngineHandle>,
}

impl PlaybackSurface<NullRenderTarget> {
    /// Surface that presents nothing, for headless use.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(NullRenderTarget)
    }
}

impl<T: RenderTarget> PlaybackSurface<T> {
    #[must_use]
    pub fn new(target: T) -> Self {
        Self {
            target,
            engine: None,
        }
    }

    /// Binds the render target to `engine`, or unbinds it with `None`.
    pub fn attach_engine(&mut self, engine: Option<EngineHandle>) {
        tracing::debug!(
            engine = ?engine.as_ref().map(EngineHandle::id),
            "rebinding playback surface"
        );
        self.target.bind(engine.as_ref());
        self.engine = engine;
    }

    #[must_use]
    pub fn current_engine(&self) -> Option<&EngineHandle> {
        self.engine.as_ref()
    }

    #[must_use]
    pub fn render_target(&self) -> &T {
        &self.target
    }

    /// Mutable access for an embedder that reconfigures its target in place.
    /// Rebinding still goes through [`attach_engine`](Self::attach_engine).
    pub fn render_target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}

impl Default for PlaybackSurface<NullRenderTarget> {
    fn default() -> Self {
        Self::detached()
    }
}
