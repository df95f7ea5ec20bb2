// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use parley::{
    Alignment, FontFamily, FontStack, FontStyle as ParleyFontStyle, FontWeight, LineHeight,
    StyleProperty, WordBreakStrength,
};
use rich_text::{Decoration, FontStyle, SpanPaint, TextAlign, TextAttributes, WordBreak};

#[inline]
pub(crate) fn to_parley_alignment(align: TextAlign) -> Alignment {
    match align {
        TextAlign::Left => Alignment::Left,
        TextAlign::Center => Alignment::Center,
        TextAlign::Right => Alignment::Right,
        TextAlign::Justify => Alignment::Justify,
    }
}

#[inline]
pub(crate) fn to_parley_font_style(style: FontStyle) -> ParleyFontStyle {
    match style {
        FontStyle::Normal => ParleyFontStyle::Normal,
        FontStyle::Italic => ParleyFontStyle::Italic,
    }
}

#[inline]
pub(crate) fn to_parley_word_break(word_break: WordBreak) -> WordBreakStrength {
    match word_break {
        WordBreak::Word => WordBreakStrength::Normal,
        WordBreak::All => WordBreakStrength::BreakAll,
    }
}

/// Style properties of one span scope.
///
/// `family` is the name the font is known by in the collection, which for a
/// registered custom font may differ from the name the span asked for.
pub(crate) fn style_properties<'a>(
    attributes: &TextAttributes,
    family: Option<&'a str>,
) -> Vec<StyleProperty<'a, SpanPaint>> {
    let mut properties = vec![
        StyleProperty::Brush(attributes.paint.clone()),
        StyleProperty::FontSize(attributes.font_size),
        StyleProperty::FontWeight(FontWeight::new(attributes.font_weight as f32)),
        StyleProperty::FontStyle(to_parley_font_style(attributes.font_style)),
        StyleProperty::Underline(attributes.decoration == Decoration::Underline),
        StyleProperty::Strikethrough(attributes.decoration == Decoration::LineThrough),
        StyleProperty::LetterSpacing(attributes.letter_spacing),
    ];
    if let Some(family) = family {
        properties.push(StyleProperty::FontStack(FontStack::Single(FontFamily::Named(
            family.into(),
        ))));
    }
    if let Some(line_height) = attributes.line_height {
        properties.push(StyleProperty::LineHeight(LineHeight::FontSizeRelative(
            line_height,
        )));
    }
    properties
}

/// Maps UTF-16 code unit offsets into the byte offsets of the built text.
///
/// Placeholders take one code unit in the span tables but no bytes in the
/// text handed to Parley, so they map to the byte offset they sit at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Utf16Map {
    bytes: Vec<usize>,
    len: usize,
}

impl Utf16Map {
    /// Appends text, returning the byte length now covered.
    pub(crate) fn push_text(&mut self, text: &str) -> usize {
        for ch in text.chars() {
            for _ in 0..ch.len_utf16() {
                self.bytes.push(self.len);
            }
            self.len += ch.len_utf8();
        }
        self.len
    }

    /// Appends a placeholder, returning the byte offset it sits at.
    pub(crate) fn push_placeholder(&mut self) -> usize {
        self.bytes.push(self.len);
        self.len
    }

    /// The byte offset of a code unit offset, clamped to the end of the text.
    pub(crate) fn byte_index(&self, utf16: usize) -> usize {
        self.bytes.get(utf16).copied().unwrap_or(self.len)
    }

    /// Number of code units mapped.
    pub(crate) fn utf16_len(&self) -> usize {
        self.bytes.len()
    }
}
