// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The span model: an ordered list of styled text runs and inline placeholders.

use std::borrow::Cow;

use peniko::Color;
use peniko::kurbo::Vec2;

use crate::gradient::LinearGradient;
use crate::style::{Decoration, FontStyle, ParagraphStyle, TextAlign};

/// Font size, in logical units, used when a span does not specify one.
pub const DEFAULT_FONT_SIZE: f32 = 15.0;

/// Fill of a text span.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    /// A single color.
    Solid(Color),
    /// A linear gradient across the paragraph bounds.
    Gradient(LinearGradient),
}

impl Default for Fill {
    fn default() -> Self {
        Self::Solid(Color::BLACK)
    }
}

/// A drop shadow behind the glyphs.
///
/// Lengths are logical units in the span model and device units once lowered
/// into a [`SpanPaint`](crate::engine::SpanPaint).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Offset of the shadow from the glyphs.
    pub offset: Vec2,
    /// Blur radius.
    pub blur_radius: f32,
    /// Shadow color.
    pub color: Color,
}

/// An outline drawn around the glyphs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke width.
    pub width: f32,
    /// Stroke color.
    pub color: Color,
}

/// The visual attributes of one span.
///
/// Zero values mean "unspecified" for the numeric fields, matching what the
/// bridge sends for absent properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanStyle {
    /// Custom font family, `None` for the system default.
    pub font_family: Option<String>,
    /// Font size in logical units, `0` for [`DEFAULT_FONT_SIZE`].
    pub font_size: f32,
    /// Requested weight (100..=900), `0` for regular.
    pub font_weight: u32,
    /// Slant.
    pub font_style: FontStyle,
    /// Glyph fill.
    pub fill: Fill,
    /// Decoration line.
    pub decoration: Decoration,
    /// Drop shadow.
    pub shadow: Option<Shadow>,
    /// Outline.
    pub stroke: Option<Stroke>,
    /// Extra spacing between letters, logical units.
    pub letter_spacing: f32,
    /// Line height in logical units, `0` for the engine default.
    pub line_height: f32,
    /// Extra spacing between lines in logical units.
    pub line_spacing: f32,
    /// Paragraph alignment requested by this span.
    pub text_align: Option<TextAlign>,
}

impl SpanStyle {
    /// The font size with the default applied, in logical units.
    pub fn font_size_or_default(&self) -> f32 {
        if self.font_size > 0.0 && self.font_size.is_finite() {
            self.font_size
        } else {
            DEFAULT_FONT_SIZE
        }
    }

    /// Whether the fill depends on the final paragraph bounds.
    pub fn has_gradient_fill(&self) -> bool {
        matches!(self.fill, Fill::Gradient(_))
    }
}

/// A run of text sharing one style.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextSpan {
    /// UTF-8 text content.
    pub text: String,
    /// Style of the run.
    pub style: SpanStyle,
}

/// An inline box reserved for an embedded view.
///
/// The box is vertically centered on the row it lands in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaceholderSpan {
    /// Width in logical units.
    pub width: f32,
    /// Height in logical units.
    pub height: f32,
    /// Style scope the box is placed in; it affects the line metrics around it.
    pub style: SpanStyle,
}

/// One element of a paragraph.
#[derive(Clone, Debug, PartialEq)]
pub enum Span {
    /// Styled text.
    Text(TextSpan),
    /// Inline reservation.
    Placeholder(PlaceholderSpan),
}

impl Span {
    /// Creates a text span with the given style.
    pub fn text(text: impl Into<String>, style: SpanStyle) -> Self {
        Self::Text(TextSpan {
            text: text.into(),
            style,
        })
    }

    /// Creates a placeholder span of `width` × `height` logical units.
    pub fn placeholder(width: f32, height: f32) -> Self {
        Self::Placeholder(PlaceholderSpan {
            width,
            height,
            style: SpanStyle::default(),
        })
    }

    /// The style scope of this span.
    pub fn style(&self) -> &SpanStyle {
        match self {
            Self::Text(span) => &span.style,
            Self::Placeholder(span) => &span.style,
        }
    }

    /// The text content, `None` for placeholders.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(span) => Some(&span.text),
            Self::Placeholder(_) => None,
        }
    }

    /// Whether this span needs the second, bounds dependent, layout pass.
    pub fn has_gradient_fill(&self) -> bool {
        match self {
            Self::Text(span) => span.style.has_gradient_fill(),
            Self::Placeholder(_) => false,
        }
    }
}

/// A full paragraph: spans in input order plus the shared paragraph style.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    /// Spans in input order.
    pub spans: Vec<Span>,
    /// Style shared by all spans.
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Creates a paragraph from spans and a paragraph style.
    pub fn new(spans: Vec<Span>, style: ParagraphStyle) -> Self {
        Self { spans, style }
    }

    /// The spans to build from. An empty paragraph builds as a single empty text span.
    pub fn spans_for_build(&self) -> Cow<'_, [Span]> {
        if self.spans.is_empty() {
            Cow::Owned(vec![Span::Text(TextSpan::default())])
        } else {
            Cow::Borrowed(&self.spans)
        }
    }

    /// Whether any span requests a gradient fill.
    pub fn has_gradient_fill(&self) -> bool {
        self.spans.iter().any(Span::has_gradient_fill)
    }

    /// Concatenated plain text of every text span, for diagnostics.
    pub fn plain_text(&self) -> String {
        self.spans.iter().filter_map(Span::as_text).collect()
    }
}
