// SPDX-License-Identifier: MPL-2.0
//! Render target port.
//!
//! A render target is the on-screen surface that presents an engine's decoded
//! frames. Compositing is the platform's job; this crate only tells the target
//! which engine to present.

use super::engine::EngineHandle;

/// Port for a surface that presents one engine's output.
pub trait RenderTarget: Send {
    /// Binds the target to `engine`, or unbinds it with `None`.
    fn bind(&mut self, engine: Option<&EngineHandle>);
}

/// Target that presents nothing (headless use).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderTarget;

impl RenderTarget for NullRenderTarget {
    fn bind(&mut self, _engine: Option<&EngineHandle>) {}
}
