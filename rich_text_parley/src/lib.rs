// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parley backend for [`rich_text`].
//!
//! This crate implements [`rich_text::TextEngine`] on top of Parley's tree
//! builder: every span becomes a style modification span, placeholders become
//! [`parley::InlineBox`]es, and custom fonts are registered into a per
//! measurement clone of a [`FontContext`].
//!
//! ## Scope
//!
//! It intentionally does not handle:
//! - painting (the [`SpanPaint`] brush carries fill, stroke and shadow for the renderer)
//! - ellipsis insertion (lines past the line budget are measured out, not replaced)
//!
//! ## Example
//!
//! ```no_run
//! use rich_text::{BuildEnv, FontRegistry, Paragraph, ParagraphStyle, RenderConfig, Span, SpanStyle};
//! use rich_text_parley::ParleyEngine;
//!
//! let mut engine = ParleyEngine::new();
//! let registry = FontRegistry::new();
//! let env = BuildEnv {
//!     config: RenderConfig::with_density(2.0),
//!     registry: &registry,
//!     resources: None,
//! };
//! let paragraph = Paragraph::new(
//!     vec![Span::text("Hello world!", SpanStyle::default())],
//!     ParagraphStyle::default(),
//! );
//! let measured = rich_text::measure(&mut engine, &paragraph, 320.0, &env).unwrap();
//! println!("{:?}", measured.size());
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

use std::ops::Range;
use std::sync::Arc;

use hashbrown::HashMap;
use parley::fontique::Blob;
use parley::{
    Affinity, AlignmentOptions, Cursor, FontContext, InlineBox, Layout, LayoutContext,
    OverflowWrap, PositionedLayoutItem, Selection, StyleProperty, TextStyle, WhiteSpaceCollapse,
};
use peniko::kurbo::Rect;
use rich_text::{
    Error, FontCollection, PlaceholderBox, Result, SpanPaint, StyledContent, TextAttributes,
    TextEngine, TextLayout, TypographyStyle,
};

mod convert;


use crate::convert::{Utf16Map, style_properties, to_parley_alignment, to_parley_word_break};

/// A [`TextEngine`] shaping with Parley.
pub struct ParleyEngine {
    layout_cx: LayoutContext<SpanPaint>,
    font_cx: FontContext,
    quantize: bool,
}

impl core::fmt::Debug for ParleyEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParleyEngine")
            .field("quantize", &self.quantize)
            .finish_non_exhaustive()
    }
}

impl Default for ParleyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyEngine {
    /// Creates an engine matching against the system fonts.
    pub fn new() -> Self {
        Self::with_font_context(FontContext::new())
    }

    /// Creates an engine whose font collections start as clones of `font_cx`.
    pub fn with_font_context(font_cx: FontContext) -> Self {
        Self {
            layout_cx: LayoutContext::new(),
            font_cx,
            quantize: true,
        }
    }

    /// Whether glyph positions are rounded to whole device pixels.
    #[must_use]
    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self
    }
}

/// Font collection of one measurement.
#[derive(Clone)]
pub struct ParleyFonts {
    font_cx: FontContext,
    aliases: HashMap<String, String>,
}

impl core::fmt::Debug for ParleyFonts {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParleyFonts")
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

impl ParleyFonts {
    /// The collection name of a registered family, if `family` was registered.
    pub fn resolve(&self, family: &str) -> Option<&str> {
        self.aliases.get(family).map(String::as_str)
    }
}

impl FontCollection for ParleyFonts {
    fn register_font(&mut self, family: &str, data: Arc<Vec<u8>>) -> Result<()> {
        let registered = self
            .font_cx
            .collection
            .register_fonts(Blob::new(data), None);
        let name = registered
            .first()
            .and_then(|(id, _)| self.font_cx.collection.family_name(*id))
            .map(str::to_owned)
            .ok_or_else(|| Error::FontRegistration {
                family: family.to_owned(),
                reason: "no font faces in data".to_owned(),
            })?;
        log::debug!("registered font family {family} as {name}");
        self.aliases.insert(family.to_owned(), name);
        Ok(())
    }
}

#[derive(Clone, Debug)]
enum ContentOp {
    Push(TextAttributes),
    Pop,
    Text(String),
    Placeholder(PlaceholderBox),
}

/// Styled content recorded for replay into a Parley tree builder.
#[derive(Clone, Debug)]
pub struct ParleyContent {
    typography: TypographyStyle,
    ops: Vec<ContentOp>,
}

impl StyledContent for ParleyContent {
    fn push_style(&mut self, attributes: &TextAttributes) {
        self.ops.push(ContentOp::Push(attributes.clone()));
    }

    fn pop_style(&mut self) {
        self.ops.push(ContentOp::Pop);
    }

    fn add_text(&mut self, text: &str) {
        self.ops.push(ContentOp::Text(text.to_owned()));
    }

    fn add_placeholder(&mut self, placeholder: PlaceholderBox) {
        self.ops.push(ContentOp::Placeholder(placeholder));
    }
}

impl TextEngine for ParleyEngine {
    type Fonts = ParleyFonts;
    type Content = ParleyContent;
    type Layout = ParleyLayout;

    fn create_font_collection(&mut self) -> ParleyFonts {
        ParleyFonts {
            font_cx: self.font_cx.clone(),
            aliases: HashMap::new(),
        }
    }

    fn create_content(&mut self, style: &TypographyStyle) -> ParleyContent {
        ParleyContent {
            typography: style.clone(),
            ops: Vec::new(),
        }
    }

    fn create_layout(
        &mut self,
        content: ParleyContent,
        fonts: &mut ParleyFonts,
    ) -> Result<ParleyLayout> {
        let ParleyFonts { font_cx, aliases } = fonts;
        let ParleyContent { typography, ops } = content;

        let root_style = TextStyle::default();
        let mut builder = self
            .layout_cx
            .tree_builder(font_cx, 1.0, self.quantize, &root_style);
        builder.set_white_space_mode(WhiteSpaceCollapse::Preserve);
        builder.push_style_modification_span(&[
            StyleProperty::WordBreak(to_parley_word_break(typography.word_break)),
            StyleProperty::OverflowWrap(OverflowWrap::Anywhere),
        ]);

        let mut utf16 = Utf16Map::default();
        let mut placeholders = 0;
        for op in &ops {
            match op {
                ContentOp::Push(attributes) => {
                    let family = attributes.font_family.as_deref().map(|family| {
                        aliases.get(family).map_or(family, String::as_str)
                    });
                    builder.push_style_modification_span(&style_properties(attributes, family));
                }
                ContentOp::Pop => builder.pop_style_span(),
                ContentOp::Text(text) => {
                    utf16.push_text(text);
                    builder.push_text(text);
                }
                ContentOp::Placeholder(placeholder) => {
                    let index = utf16.push_placeholder();
                    builder.push_inline_box(InlineBox {
                        id: placeholder.slot as u64,
                        index,
                        width: placeholder.width,
                        height: placeholder.height,
                    });
                    placeholders += 1;
                }
            }
        }
        builder.pop_style_span();
        let (layout, _text) = builder.build();

        Ok(ParleyLayout {
            layout,
            typography,
            utf16,
            placeholders,
        })
    }
}

/// A Parley layout with the bookkeeping needed to answer UTF-16 queries.
#[derive(Clone)]
pub struct ParleyLayout {
    layout: Layout<SpanPaint>,
    typography: TypographyStyle,
    utf16: Utf16Map,
    placeholders: usize,
}

impl core::fmt::Debug for ParleyLayout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParleyLayout")
            .field("lines", &self.layout.len())
            .field("typography", &self.typography)
            .field("utf16_len", &self.utf16.utf16_len())
            .field("placeholders", &self.placeholders)
            .finish_non_exhaustive()
    }
}

impl ParleyLayout {
    /// The Parley layout, for painting.
    pub fn parley_layout(&self) -> &Layout<SpanPaint> {
        &self.layout
    }

    /// Number of lines within the line budget.
    pub fn visible_lines(&self) -> usize {
        let lines = self.layout.len();
        match self.typography.max_lines {
            Some(limit) => lines.min(limit as usize),
            None => lines,
        }
    }
}

impl TextLayout for ParleyLayout {
    fn layout(&mut self, max_width: f32) {
        self.layout.break_all_lines(Some(max_width));
        self.layout.align(
            None,
            to_parley_alignment(self.typography.align),
            AlignmentOptions::default(),
        );
    }

    fn height(&self) -> f32 {
        let visible = self.visible_lines();
        let (Some(first), Some(last)) = (
            self.layout.get(0),
            visible.checked_sub(1).and_then(|i| self.layout.get(i)),
        ) else {
            return 0.0;
        };
        let mut height = last.metrics().max_coord;
        if self.typography.trim_leading {
            height -= (first.metrics().leading + last.metrics().leading) / 2.0;
        }
        height.max(0.0)
    }

    fn longest_line(&self) -> f32 {
        self.layout
            .lines()
            .take(self.visible_lines())
            .map(|line| {
                let metrics = line.metrics();
                metrics.advance - metrics.trailing_whitespace
            })
            .fold(0.0, f32::max)
    }

    fn rects_for_range(&self, range: Range<usize>) -> Vec<Rect> {
        if range.is_empty() {
            return Vec::new();
        }
        let start = self.utf16.byte_index(range.start);
        let end = self.utf16.byte_index(range.end);
        let selection = Selection::new(
            Cursor::from_byte_index(&self.layout, start, Affinity::Downstream),
            Cursor::from_byte_index(&self.layout, end, Affinity::Upstream),
        );
        let visible = self.visible_lines();
        let mut rects = Vec::new();
        selection.geometry_with(&self.layout, |bb, line| {
            if line < visible {
                rects.push(Rect::new(bb.x0, bb.y0, bb.x1, bb.y1));
            }
        });
        rects
    }

    fn placeholder_rects(&self) -> Vec<Rect> {
        let mut rects = vec![Rect::ZERO; self.placeholders];
        for line in self.layout.lines().take(self.visible_lines()) {
            let metrics = line.metrics();
            for item in line.items() {
                let PositionedLayoutItem::InlineBox(inline_box) = item else {
                    continue;
                };
                let Some(rect) = usize::try_from(inline_box.id)
                    .ok()
                    .and_then(|slot| rects.get_mut(slot))
                else {
                    continue;
                };
                // Centered on the line box.
                let top = metrics.min_coord
                    + (metrics.max_coord - metrics.min_coord - inline_box.height) / 2.0;
                *rect = Rect::new(
                    f64::from(inline_box.x),
                    f64::from(top),
                    f64::from(inline_box.x + inline_box.width),
                    f64::from(top + inline_box.height),
                );
            }
        }
        rects
    }
}
