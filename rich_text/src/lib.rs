// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich text measurement for a UI rendering bridge.
//!
//! A rendered text view is described by an ordered list of [`Span`]s: runs of
//! styled text and inline placeholders reserving room for embedded views.
//! This crate turns such a [`Paragraph`] into a shaped layout through a
//! [`TextEngine`], reports its size, and answers the spatial queries the
//! bridge needs afterwards: the box of a placeholder span and the text span
//! under a point.
//!
//! Layouts are produced on a context thread and painted on the UI thread. The
//! [`RichTextShadow`] owns that handoff: a layout is installed by a task
//! posted to the UI thread, and it is always dropped on the UI thread too.
//!
//! ## Two pass measurement
//!
//! Gradient fills are declared relative to the bounds of the text they cover,
//! and those bounds are what measurement produces. A paragraph containing a
//! gradient span is therefore laid out once to learn its size, then rebuilt
//! with the gradients resolved and laid out again. Paragraphs without
//! gradients are laid out once.
//!
//! ## Example
//!
//! ```no_run
//! use rich_text::{Paragraph, ParagraphStyle, Span, SpanStyle};
//!
//! let paragraph = Paragraph::new(
//!     vec![
//!         Span::text("Hello ", SpanStyle::default()),
//!         Span::placeholder(20.0, 20.0),
//!     ],
//!     ParagraphStyle::default(),
//! );
//! assert_eq!(paragraph.plain_text(), "Hello ");
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod builder;
pub mod config;
pub mod engine;
pub mod font;
pub mod gradient;
pub mod host;
pub mod measure;
pub mod props;
pub mod shadow;
pub mod span;
pub mod style;

mod error;

#[cfg(test)]
mod tests;

pub use peniko;

pub use builder::{BuildEnv, DrawOffsets, OffsetEntry, SpanTable};
pub use config::RenderConfig;
pub use engine::{
    FontCollection, Paint, PlaceholderBox, SpanPaint, StyledContent, TextAttributes, TextEngine,
    TextLayout,
};
pub use error::{Error, Result};
pub use font::{FontCollectionResource, FontRegistry, FontSource, ResourceManager};
pub use gradient::{ColorStop, GradientDirection, LinearGradient, LinearShader};
pub use host::{RootView, RootViewGuard, UiScheduler, UiTask};
pub use measure::{MeasuredLayout, Pass, UNBOUNDED_WIDTH, measure};
pub use props::SpanDecoder;
pub use shadow::{PaintState, RichTextShadow};
pub use span::{Fill, Paragraph, PlaceholderSpan, Shadow, Span, SpanStyle, Stroke, TextSpan};
pub use style::{
    Decoration, FontStyle, LineBreakMode, ParagraphStyle, TextAlign, TypographyStyle, WordBreak,
    quantize_weight,
};
