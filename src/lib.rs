// SPDX-License-Identifier: MPL-2.0
//! `lens_playback` is a media playback control surface.
//!
//! It drives a platform media engine from a dedicated worker thread, reports
//! progress, metadata, completion and errors to weakly held observers, and
//! binds render targets to engine instances.

#![doc(html_root_url = "https://docs.rs/lens_playback/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod playback;

#[cfg(test)]
mod test_utils;
