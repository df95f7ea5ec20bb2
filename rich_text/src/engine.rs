// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the span model and a shaping engine.
//!
//! Everything crossing these traits is in device units. Text ranges are
//! expressed in UTF-16 code units, which is how the bridge addresses text.

use std::ops::Range;
use std::sync::Arc;

use peniko::Color;
use peniko::kurbo::Rect;

use crate::Result;
use crate::gradient::LinearShader;
use crate::span::{Shadow, Stroke};
use crate::style::{Decoration, FontStyle, TypographyStyle};

/// A shaping engine able to turn styled content into a laid out paragraph.
pub trait TextEngine {
    /// Per-measurement custom font collection.
    type Fonts: FontCollection + Send;
    /// Styled content under construction.
    type Content: StyledContent;
    /// A shaped paragraph. Shared between the context and UI threads.
    type Layout: TextLayout + Send + Sync;

    /// Creates an empty font collection.
    fn create_font_collection(&mut self) -> Self::Fonts;

    /// Starts a new styled content object for a paragraph.
    fn create_content(&mut self, style: &TypographyStyle) -> Self::Content;

    /// Consumes styled content and produces an unlaid layout.
    fn create_layout(
        &mut self,
        content: Self::Content,
        fonts: &mut Self::Fonts,
    ) -> Result<Self::Layout>;
}

/// Engine-native styled content built span by span.
pub trait StyledContent {
    /// Opens a style scope.
    fn push_style(&mut self, attributes: &TextAttributes);
    /// Closes the innermost style scope.
    fn pop_style(&mut self);
    /// Appends text in the current scope.
    fn add_text(&mut self, text: &str);
    /// Appends an inline reservation, vertically centered on its row.
    fn add_placeholder(&mut self, placeholder: PlaceholderBox);
}

/// A paragraph produced by [`TextEngine::create_layout`].
pub trait TextLayout {
    /// Breaks lines and positions content at `max_width`.
    fn layout(&mut self, max_width: f32);
    /// Height of the visible lines.
    fn height(&self) -> f32;
    /// Advance of the longest visible line.
    fn longest_line(&self) -> f32;
    /// Boxes covering a UTF-16 code unit range.
    fn rects_for_range(&self, range: Range<usize>) -> Vec<Rect>;
    /// Boxes of every placeholder, indexed by slot.
    fn placeholder_rects(&self) -> Vec<Rect>;
}

/// A set of custom fonts available to a layout.
pub trait FontCollection {
    /// Registers `data` under `family`.
    fn register_font(&mut self, family: &str, data: Arc<Vec<u8>>) -> Result<()>;
}

/// The fill of glyphs as handed to the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Flat color.
    Solid(Color),
    /// Gradient resolved against the measured bounds.
    Gradient(LinearShader),
}

impl Default for Paint {
    fn default() -> Self {
        Self::Solid(Color::BLACK)
    }
}

/// Everything needed to paint a glyph run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanPaint {
    /// Glyph fill.
    pub fill: Paint,
    /// Outline, if any.
    pub stroke: Option<Stroke>,
    /// Drop shadow, if any.
    pub shadow: Option<Shadow>,
}

/// Resolved attributes of one style scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextAttributes {
    /// Custom family, `None` for the engine default.
    pub font_family: Option<String>,
    /// Font size in device units.
    pub font_size: f32,
    /// Quantized weight, one of 100 through 900.
    pub font_weight: u32,
    /// Slant.
    pub font_style: FontStyle,
    /// Paint of the glyphs.
    pub paint: SpanPaint,
    /// Decoration line.
    pub decoration: Decoration,
    /// Letter spacing in device units.
    pub letter_spacing: f32,
    /// Line height as a multiple of the font size.
    pub line_height: Option<f32>,
}

/// An inline reservation in device units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaceholderBox {
    /// Ordinal of this placeholder among the paragraph's placeholders.
    pub slot: usize,
    /// Width of the box.
    pub width: f32,
    /// Height of the box.
    pub height: f32,
}
