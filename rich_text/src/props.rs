// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding of the loosely typed property maps sent over the bridge.
//!
//! Every span attribute is looked up in the span's own map first and in the
//! paragraph map second. Values that are missing or of the wrong shape decode
//! as absent so that the documented defaults apply; decoding never fails.

use std::borrow::Cow;
use std::sync::Arc;

use peniko::Color;
use peniko::kurbo::Vec2;
use serde_json::{Map, Value};

use crate::gradient::LinearGradient;
use crate::span::{Fill, Paragraph, PlaceholderSpan, Shadow, Span, SpanStyle, Stroke, TextSpan};
use crate::style::{Decoration, FontStyle, LineBreakMode, ParagraphStyle, TextAlign};

/// A property map as delivered by the bridge.
pub type PropsMap = Map<String, Value>;

/// Parses a CSS `linear-gradient(...)` string.
pub type GradientParser = Arc<dyn Fn(&str) -> Option<LinearGradient> + Send + Sync>;

/// Property keys understood by the decoder.
pub mod keys {
    /// Span array of a paragraph.
    pub const VALUES: &str = "values";
    /// Span text.
    pub const VALUE: &str = "value";
    /// Span text, used when [`VALUE`] is empty.
    pub const TEXT: &str = "text";
    /// Font size in logical units.
    pub const FONT_SIZE: &str = "fontSize";
    /// Font weight, 100 through 900.
    pub const FONT_WEIGHT: &str = "fontWeight";
    /// ARGB text color.
    pub const COLOR: &str = "color";
    /// Custom font family.
    pub const FONT_FAMILY: &str = "fontFamily";
    /// Line height in logical units.
    pub const LINE_HEIGHT: &str = "lineHeight";
    /// Line spacing in logical units.
    pub const LINE_SPACING: &str = "lineSpacing";
    /// Alignment keyword.
    pub const TEXT_ALIGN: &str = "textAlign";
    /// Decoration keyword.
    pub const TEXT_DECORATION: &str = "textDecoration";
    /// Slant keyword.
    pub const FONT_STYLE: &str = "fontStyle";
    /// Letter spacing in logical units.
    pub const LETTER_SPACING: &str = "letterSpacing";
    /// `"offsetX offsetY blurRadius color"`.
    pub const TEXT_SHADOW: &str = "textShadow";
    /// Outline width.
    pub const STROKE_WIDTH: &str = "strokeWidth";
    /// ARGB outline color.
    pub const STROKE_COLOR: &str = "strokeColor";
    /// CSS linear gradient fill.
    pub const BACKGROUND_IMAGE: &str = "backgroundImage";
    /// Placeholder width; non-zero makes the span a placeholder.
    pub const PLACEHOLDER_WIDTH: &str = "placeholderWidth";
    /// Placeholder height.
    pub const PLACEHOLDER_HEIGHT: &str = "placeholderHeight";
    /// Maximum line count, `0` for unlimited.
    pub const NUMBER_OF_LINES: &str = "numberOfLines";
    /// Overflow keyword.
    pub const LINE_BREAK_MODE: &str = "lineBreakMode";
}

/// Turns bridge property maps into a [`Paragraph`].
#[derive(Clone, Default)]
pub struct SpanDecoder {
    gradient_parser: Option<GradientParser>,
}

impl core::fmt::Debug for SpanDecoder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpanDecoder")
            .field("gradient_parser", &self.gradient_parser.is_some())
            .finish()
    }
}

impl SpanDecoder {
    /// Creates a decoder that treats `backgroundImage` as absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder that resolves `backgroundImage` through `parser`.
    pub fn with_gradient_parser(
        parser: impl Fn(&str) -> Option<LinearGradient> + Send + Sync + 'static,
    ) -> Self {
        Self {
            gradient_parser: Some(Arc::new(parser)),
        }
    }

    /// Decodes a span array and its paragraph props.
    ///
    /// Entries of `values` that are not objects are skipped. With no spans the
    /// paragraph map itself is decoded as the single span.
    pub fn decode_paragraph(&self, values: &[Value], props: &PropsMap) -> Paragraph {
        let mut spans: Vec<Span> = values
            .iter()
            .filter_map(Value::as_object)
            .map(|span| self.decode_span(span, props))
            .collect();
        if spans.is_empty() {
            spans.push(self.decode_span(props, props));
        }
        Paragraph::new(spans, decode_paragraph_style(props))
    }

    /// Decodes one span, falling back to `props` for style attributes.
    pub fn decode_span(&self, span: &PropsMap, props: &PropsMap) -> Span {
        let style = self.decode_style(span, props);
        let placeholder_width = span
            .get(keys::PLACEHOLDER_WIDTH)
            .and_then(number)
            .unwrap_or(0.0);
        if placeholder_width != 0.0 {
            let height = span
                .get(keys::PLACEHOLDER_HEIGHT)
                .and_then(number)
                .unwrap_or(0.0);
            return Span::Placeholder(PlaceholderSpan {
                width: placeholder_width,
                height,
                style,
            });
        }
        Span::Text(TextSpan {
            text: span_text(span),
            style,
        })
    }

    fn decode_style(&self, span: &PropsMap, props: &PropsMap) -> SpanStyle {
        let get = |key: &str| lookup(key, span, props);
        let num = |key: &str| get(key).and_then(number).unwrap_or(0.0);
        let keyword = |key: &str| get(key).and_then(text).unwrap_or_default();

        let gradient = get(keys::BACKGROUND_IMAGE)
            .and_then(text)
            .filter(|css| !css.is_empty())
            .zip(self.gradient_parser.as_ref())
            .and_then(|(css, parser)| parser(css.as_ref()));
        let fill = match gradient {
            Some(gradient) => Fill::Gradient(gradient),
            None => Fill::Solid(get(keys::COLOR).and_then(parse_color).unwrap_or(Color::BLACK)),
        };

        let stroke_width = num(keys::STROKE_WIDTH);
        let stroke = get(keys::STROKE_COLOR)
            .and_then(parse_color)
            .filter(|_| stroke_width > 0.0)
            .map(|color| Stroke {
                width: stroke_width,
                color,
            });

        SpanStyle {
            font_family: get(keys::FONT_FAMILY)
                .and_then(text)
                .filter(|family| !family.is_empty())
                .map(Cow::into_owned),
            font_size: num(keys::FONT_SIZE),
            font_weight: num(keys::FONT_WEIGHT).max(0.0) as u32,
            font_style: FontStyle::from_keyword(&keyword(keys::FONT_STYLE)),
            fill,
            decoration: Decoration::from_keyword(&keyword(keys::TEXT_DECORATION)),
            shadow: get(keys::TEXT_SHADOW)
                .and_then(text)
                .and_then(|shadow| parse_shadow(&shadow)),
            stroke,
            letter_spacing: num(keys::LETTER_SPACING),
            line_height: num(keys::LINE_HEIGHT),
            line_spacing: num(keys::LINE_SPACING),
            text_align: get(keys::TEXT_ALIGN)
                .and_then(text)
                .map(|align| TextAlign::from_keyword(&align)),
        }
    }
}

/// Decodes the paragraph level props.
pub fn decode_paragraph_style(props: &PropsMap) -> ParagraphStyle {
    let keyword = |key: &str| props.get(key).and_then(text).unwrap_or_default();
    ParagraphStyle {
        max_lines: props
            .get(keys::NUMBER_OF_LINES)
            .and_then(number)
            .map_or(0, |lines| lines.max(0.0) as u32),
        align: TextAlign::from_keyword(&keyword(keys::TEXT_ALIGN)),
        line_break_mode: LineBreakMode::from_keyword(&keyword(keys::LINE_BREAK_MODE)),
    }
}

/// The text of a span map: `value`, or `text` when `value` is empty.
pub fn span_text(span: &PropsMap) -> String {
    [keys::VALUE, keys::TEXT]
        .into_iter()
        .filter_map(|key| span.get(key).and_then(text))
        .find(|text| !text.is_empty())
        .map(Cow::into_owned)
        .unwrap_or_default()
}

fn lookup<'a>(key: &str, span: &'a PropsMap, props: &'a PropsMap) -> Option<&'a Value> {
    span.get(key)
        .filter(|value| !value.is_null())
        .or_else(|| props.get(key).filter(|value| !value.is_null()))
}

fn text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n as f32)
}

/// Parses an ARGB color given as a number, a decimal string or a `0x` hex string.
///
/// Negative values are accepted as the two's complement of a 32-bit ARGB value.
pub fn parse_color(value: &Value) -> Option<Color> {
    let argb = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_u64().map(|v| v as i64))?,
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => i64::from_str_radix(hex, 16).ok()?,
                None => s.parse::<i64>().ok()?,
            }
        }
        _ => return None,
    };
    Some(color_from_argb(argb as u32))
}

/// Converts a packed `0xAARRGGBB` value.
pub fn color_from_argb(argb: u32) -> Color {
    let [a, r, g, b] = argb.to_be_bytes();
    Color::from_rgba8(r, g, b, a)
}

/// Parses `"offsetX offsetY blurRadius color"`; the color defaults to black.
pub fn parse_shadow(shadow: &str) -> Option<Shadow> {
    let mut parts = shadow.split_whitespace();
    let mut next_number = || parts.next()?.parse::<f32>().ok().filter(|n| n.is_finite());
    let x = next_number()?;
    let y = next_number()?;
    let blur_radius = next_number()?;
    let color = parts
        .next()
        .and_then(|color| parse_color(&Value::String(color.to_owned())))
        .unwrap_or(Color::BLACK);
    Some(Shadow {
        offset: Vec2::new(f64::from(x), f64::from(y)),
        blur_radius,
        color,
    })
}
