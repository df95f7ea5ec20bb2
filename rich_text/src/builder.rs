// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lowering of a [`Paragraph`] into engine styled content.
//!
//! One style scope is pushed per span. Text spans record their UTF-16 range in
//! the [`SpanTable`], placeholder spans record their slot ordinal; both are
//! keyed by the same span index.

use hashbrown::HashMap;
use peniko::Color;
use peniko::kurbo::Size;

use crate::config::RenderConfig;
use crate::engine::{Paint, PlaceholderBox, SpanPaint, StyledContent, TextAttributes, TextEngine};
use crate::font::{FontCollectionResource, FontRegistry, ResourceManager};
use crate::span::{Fill, Paragraph, Shadow, Span, SpanStyle, Stroke};
use crate::style::{TypographyStyle, effective_line_height, quantize_weight, weight_class_value};

/// Host supplied inputs of a build.
#[derive(Clone, Copy)]
pub struct BuildEnv<'a> {
    /// Density and accessibility scales.
    pub config: RenderConfig,
    /// Custom font adapters.
    pub registry: &'a FontRegistry,
    /// Bundled resource access for `rawfile:` fonts.
    pub resources: Option<&'a dyn ResourceManager>,
}

impl core::fmt::Debug for BuildEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BuildEnv")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("resources", &self.resources.is_some())
            .finish()
    }
}

/// The UTF-16 range covered by one text span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetEntry {
    /// Index of the span in the paragraph.
    pub span_index: usize,
    /// First code unit.
    pub start: usize,
    /// One past the last code unit.
    pub end: usize,
}

/// Span index bookkeeping produced by a build.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanTable {
    /// Text spans in input order.
    pub offsets: Vec<OffsetEntry>,
    /// Span index to placeholder slot.
    pub placeholders: HashMap<usize, usize>,
    /// Number of spans built.
    pub span_count: usize,
}

impl SpanTable {
    /// The placeholder slot of `span_index`, if that span is a placeholder.
    pub fn placeholder_slot(&self, span_index: usize) -> Option<usize> {
        self.placeholders.get(&span_index).copied()
    }

    /// The text range of `span_index`, if that span is text.
    pub fn offset(&self, span_index: usize) -> Option<&OffsetEntry> {
        self.offsets.iter().find(|entry| entry.span_index == span_index)
    }
}

/// Paint corrections the painter applies when drawing the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawOffsets {
    /// Horizontal offset in device units.
    pub x: f32,
    /// Vertical offset in device units.
    pub y: f32,
}

/// The result of [`build`].
#[derive(Debug)]
pub struct BuiltContent<C> {
    /// Engine styled content, ready for layout creation.
    pub content: C,
    /// Span index tables.
    pub table: SpanTable,
    /// Paint corrections derived from line height scaling.
    pub draw_offset: DrawOffsets,
    /// Paragraph attributes the content was created with.
    pub typography: TypographyStyle,
}

/// Resolves the paragraph attributes from the paragraph style and its first span.
pub fn typography_style(
    paragraph: &Paragraph,
    first: Option<&Span>,
    config: &RenderConfig,
) -> TypographyStyle {
    let first_style = first.map(Span::style);
    let trim_leading = first_style.is_some_and(|style| {
        let (_, line_spacing) = line_ratios(style, config);
        line_spacing > 0.0
    });
    let style = &paragraph.style;
    TypographyStyle {
        max_lines: style.line_limit(),
        align: first_style
            .and_then(|style| style.text_align)
            .unwrap_or(style.align),
        line_break_mode: style.line_break_mode,
        ellipsis: style.line_break_mode.ellipsis(),
        word_break: style.word_break(),
        trim_leading,
    }
}

/// Builds engine styled content for `paragraph`.
///
/// `gradient_bounds` are the final bounds in device units. Without them,
/// gradient fills are painted with their first stop color.
pub fn build<E: TextEngine>(
    engine: &mut E,
    fonts: &mut FontCollectionResource<E::Fonts>,
    paragraph: &Paragraph,
    env: &BuildEnv<'_>,
    gradient_bounds: Option<Size>,
) -> BuiltContent<E::Content> {
    let config = env.config.sanitized();
    let spans = paragraph.spans_for_build();
    let typography = typography_style(paragraph, spans.first(), &config);
    let mut content = engine.create_content(&typography);
    let mut table = SpanTable {
        span_count: spans.len(),
        ..SpanTable::default()
    };
    let mut draw_offset = DrawOffsets::default();
    let mut offset = 0;

    for (span_index, span) in spans.iter().enumerate() {
        let style = span.style();
        if let Some(family) = &style.font_family {
            fonts.ensure_registered(family, env.registry, env.resources);
        }
        let attributes = text_attributes(style, &config, gradient_bounds);
        let (line_height, line_spacing) = line_ratios(style, &config);
        if line_spacing <= 0.0 && line_height > 0.0 {
            let size = attributes.font_size;
            draw_offset.y = (size * line_height.max(1.0) - size) / 4.0;
        }

        content.push_style(&attributes);
        match span {
            Span::Placeholder(placeholder) => {
                let slot = table.placeholders.len();
                content.add_placeholder(PlaceholderBox {
                    slot,
                    width: placeholder.width * config.density,
                    height: placeholder.height * config.density,
                });
                table.placeholders.insert(span_index, slot);
                offset += 1;
            }
            Span::Text(text) => {
                content.add_text(&text.text);
                let len = text.text.encode_utf16().count();
                table.offsets.push(OffsetEntry {
                    span_index,
                    start: offset,
                    end: offset + len,
                });
                offset += len;
            }
        }
        content.pop_style();
    }

    BuiltContent {
        content,
        table,
        draw_offset,
        typography,
    }
}

/// Line height and line spacing as ratios of the scaled font size.
fn line_ratios(style: &SpanStyle, config: &RenderConfig) -> (f32, f32) {
    let size = style.font_size_or_default() * config.font_size_scale;
    (style.line_height / size, style.line_spacing / size)
}

/// Scales a span style to device units and resolves its paint.
pub fn text_attributes(
    style: &SpanStyle,
    config: &RenderConfig,
    gradient_bounds: Option<Size>,
) -> TextAttributes {
    let density = config.density;
    let (line_height, line_spacing) = line_ratios(style, config);
    let fill = match &style.fill {
        Fill::Solid(color) => Paint::Solid(*color),
        Fill::Gradient(gradient) => gradient_bounds
            .and_then(|bounds| gradient.resolve(bounds))
            .map(Paint::Gradient)
            .unwrap_or_else(|| Paint::Solid(gradient.fallback_color().unwrap_or(Color::BLACK))),
    };
    TextAttributes {
        font_family: style.font_family.clone(),
        font_size: style.font_size_or_default() * density * config.font_size_scale,
        font_weight: weight_class_value(quantize_weight(
            style.font_weight,
            config.font_weight_scale,
        )),
        font_style: style.font_style,
        paint: SpanPaint {
            fill,
            stroke: style.stroke.map(|stroke| Stroke {
                width: stroke.width * density,
                ..stroke
            }),
            shadow: style.shadow.map(|shadow| Shadow {
                offset: shadow.offset * f64::from(density),
                blur_radius: shadow.blur_radius * density,
                color: shadow.color,
            }),
        },
        decoration: style.decoration,
        letter_spacing: if style.letter_spacing > 0.0 {
            style.letter_spacing * density
        } else {
            0.0
        },
        line_height: effective_line_height(line_height, line_spacing),
    }
}
