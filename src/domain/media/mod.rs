// SPDX-License-Identifier: MPL-2.0
//! Media domain types: sources and their descriptive metadata.

pub mod metadata;
pub mod source;

pub use metadata::{Metadata, RawTag};
pub use source::{Location, MediaSource};
