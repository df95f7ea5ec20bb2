// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! None of these cross the measurement or query boundary: callers of
//! [`RichTextShadow`](crate::RichTextShadow) only ever observe zero sizes and
//! empty results. They exist so that the font and engine layers can report
//! what went wrong to the log.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced by the font registry, the engine seam and config decoding.
#[derive(Debug, Error)]
pub enum Error {
    /// A bundled or on-disk font file could not be read.
    #[error("failed to load font `{family}`: {source}")]
    FontLoad {
        /// The family name the font was requested under.
        family: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The engine rejected font data for a family.
    #[error("failed to register font `{family}`: {reason}")]
    FontRegistration {
        /// The family name the font was registered under.
        family: String,
        /// Engine supplied reason.
        reason: String,
    },

    /// No font adapter is known for the requested family.
    #[error("no font adapter for family `{0}`")]
    UnknownFontFamily(String),

    /// The engine could not create a layout from styled content.
    #[error("layout creation failed: {0}")]
    LayoutCreation(String),

    /// Configuration or property JSON could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
