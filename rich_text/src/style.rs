// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph level style and the pure numeric style policies.

/// Horizontal alignment of lines within the paragraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Align to the left edge.
    #[default]
    Left,
    /// Center each line.
    Center,
    /// Align to the right edge.
    Right,
    /// Stretch every line but the last to the full width.
    Justify,
}

impl TextAlign {
    /// Parses the bridge keyword, falling back to [`TextAlign::Left`].
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "center" => Self::Center,
            "right" => Self::Right,
            "justify" => Self::Justify,
            _ => Self::Left,
        }
    }
}

/// How text that does not fit in the line budget is cut.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineBreakMode {
    /// Cut without an ellipsis.
    Clip,
    /// Ellipsis at the start of the last visible line.
    Head,
    /// Ellipsis in the middle of the last visible line.
    Middle,
    /// Ellipsis at the end of the last visible line.
    #[default]
    Tail,
}

impl LineBreakMode {
    /// Parses the bridge keyword, falling back to [`LineBreakMode::Tail`].
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "clip" => Self::Clip,
            "head" => Self::Head,
            "middle" => Self::Middle,
            _ => Self::Tail,
        }
    }

    /// The ellipsis string painted for this mode.
    pub fn ellipsis(self) -> &'static str {
        match self {
            Self::Clip => "",
            _ => "\u{2026}",
        }
    }
}

/// Line breaking opportunity policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WordBreak {
    /// Break between words only.
    #[default]
    Word,
    /// Break between any two characters.
    All,
}

/// Font slant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
}

impl FontStyle {
    /// Parses the bridge keyword, falling back to [`FontStyle::Normal`].
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "italic" => Self::Italic,
            _ => Self::Normal,
        }
    }
}

/// Text decoration line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Decoration {
    /// No decoration.
    #[default]
    None,
    /// Line under the text.
    Underline,
    /// Line through the text.
    LineThrough,
}

impl Decoration {
    /// Parses the bridge keyword, falling back to [`Decoration::None`].
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "underline" => Self::Underline,
            "line-through" => Self::LineThrough,
            _ => Self::None,
        }
    }
}

/// Paragraph level style shared by every span.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphStyle {
    /// Maximum number of visible lines. `0` means unlimited.
    pub max_lines: u32,
    /// Paragraph alignment; a span's alignment override takes precedence.
    pub align: TextAlign,
    /// Overflow handling.
    pub line_break_mode: LineBreakMode,
}

impl ParagraphStyle {
    /// The line budget, `None` meaning effectively unlimited.
    ///
    /// Each engine picks its own representation of "unlimited".
    pub fn line_limit(&self) -> Option<u32> {
        (self.max_lines != 0).then_some(self.max_lines)
    }

    /// Single line paragraphs break anywhere so that the ellipsis lands on the first line.
    pub fn word_break(&self) -> WordBreak {
        if self.max_lines == 1 {
            WordBreak::All
        } else {
            WordBreak::Word
        }
    }
}

/// Paragraph attributes handed to the engine when styled content is created.
#[derive(Clone, Debug, PartialEq)]
pub struct TypographyStyle {
    /// Maximum number of visible lines, `None` for unlimited.
    pub max_lines: Option<u32>,
    /// Resolved paragraph alignment.
    pub align: TextAlign,
    /// Overflow handling.
    pub line_break_mode: LineBreakMode,
    /// Ellipsis string for [`Self::line_break_mode`].
    pub ellipsis: &'static str,
    /// Line breaking policy.
    pub word_break: WordBreak,
    /// Suppress the extra leading above the first and below the last line.
    ///
    /// Set when line spacing is emulated through the line height multiplier.
    pub trim_leading: bool,
}

/// Default weight used when a span does not carry one.
pub const DEFAULT_FONT_WEIGHT: u32 = 400;

/// Number of standard weight classes (100 through 900).
pub const WEIGHT_CLASSES: usize = 9;

/// Maps a requested weight and accessibility scale to a weight class index.
///
/// Index `0` is weight 100 and index `8` is weight 900. A weight of `0` means
/// "unspecified" and is treated as 400; a scale that is not positive is
/// treated as `1.0`.
pub fn quantize_weight(weight: u32, scale: f32) -> usize {
    let weight = if weight == 0 {
        DEFAULT_FONT_WEIGHT
    } else {
        weight
    };
    let scale = if scale.is_finite() && scale > f32::EPSILON {
        scale
    } else {
        1.0
    };
    let scaled = weight as f32 * scale;
    let bucket = (scaled / 100.0).round() - 1.0;
    bucket.clamp(0.0, (WEIGHT_CLASSES - 1) as f32) as usize
}

/// The numeric weight of a weight class index returned by [`quantize_weight`].
pub fn weight_class_value(index: usize) -> u32 {
    (index.min(WEIGHT_CLASSES - 1) as u32 + 1) * 100
}

/// Resolves the line height multiplier passed to the engine.
///
/// Both arguments are ratios of the scaled font size. Line spacing, when
/// present, is added on top of a line height of at least `1.0`; a line height
/// alone is clamped to at least `1.0`; with neither the engine default applies
/// and `None` is returned.
pub fn effective_line_height(line_height: f32, line_spacing: f32) -> Option<f32> {
    if line_spacing > 0.0 {
        Some(line_spacing + line_height.max(1.0))
    } else if line_height > 0.0 {
        Some(line_height.max(1.0))
    } else {
        None
    }
}
