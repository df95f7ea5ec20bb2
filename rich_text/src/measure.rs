// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement of a paragraph, and spatial queries against the result.
//!
//! A paragraph without gradient fills is built and laid out once. When any
//! span declares a gradient, the first layout only serves to learn the final
//! bounds: it is discarded and the paragraph is built again with every
//! gradient resolved against those bounds. The second result is the one kept.
//!
//! Geometry stays in device units until it leaves a [`MeasuredLayout`].

use parking_lot::Mutex;
use peniko::kurbo::{Point, Rect, Size};

use crate::Result;
use crate::builder::{BuildEnv, BuiltContent, DrawOffsets, SpanTable, build};
use crate::engine::{TextEngine, TextLayout};
use crate::font::FontCollectionResource;
use crate::span::Paragraph;
use crate::style::{LineBreakMode, TextAlign, TypographyStyle};

/// Width, in logical units, used when the host imposes no width constraint.
pub const UNBOUNDED_WIDTH: f32 = 10_000_000.0;

/// Widths below this, in logical units, are reported as suspicious.
const MIN_VISIBLE_WIDTH: f32 = 0.01;

/// Maps a host width constraint to the width the paragraph is laid out at.
///
/// Zero, negative and non-finite constraints mean "unbounded".
pub fn constraint_width(width: f32) -> f32 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        UNBOUNDED_WIDTH
    }
}

/// Which layout pass produced a [`MeasuredLayout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// Laid out without resolved gradients.
    First,
    /// Rebuilt with gradients resolved against the first pass bounds.
    Gradient,
}

/// A laid out paragraph together with everything needed to query and paint it.
pub struct MeasuredLayout<E: TextEngine> {
    layout: E::Layout,
    fonts: Mutex<FontCollectionResource<E::Fonts>>,
    size: Size,
    density: f32,
    pass: Pass,
    table: SpanTable,
    draw_offset: DrawOffsets,
    typography: TypographyStyle,
}

impl<E: TextEngine> core::fmt::Debug for MeasuredLayout<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MeasuredLayout")
            .field("size", &self.size)
            .field("density", &self.density)
            .field("pass", &self.pass)
            .field("table", &self.table)
            .field("draw_offset", &self.draw_offset)
            .field("typography", &self.typography)
            .finish_non_exhaustive()
    }
}

/// Measures `paragraph` at `width` logical units.
///
/// Returns an error only when the engine fails to create a layout.
pub fn measure<E: TextEngine>(
    engine: &mut E,
    paragraph: &Paragraph,
    width: f32,
    env: &BuildEnv<'_>,
) -> Result<MeasuredLayout<E>> {
    let env = BuildEnv {
        config: env.config.sanitized(),
        ..*env
    };
    let density = env.config.density;
    let max_width = constraint_width(width) * density;
    let mut fonts = FontCollectionResource::new(engine.create_font_collection());

    let first = run_pass(engine, &mut fonts, paragraph, &env, Pass::First, None, max_width)?;
    let result = if paragraph.has_gradient_fill() {
        let bounds = first.size * f64::from(density);
        drop(first);
        run_pass(
            engine,
            &mut fonts,
            paragraph,
            &env,
            Pass::Gradient,
            Some(bounds),
            max_width,
        )?
    } else {
        first
    };

    if result.size.width < f64::from(MIN_VISIBLE_WIDTH) {
        let text = paragraph.plain_text();
        if !text.is_empty() {
            log::warn!(
                "measured size {}x{} for {} bytes of text",
                result.size.width,
                result.size.height,
                text.len()
            );
        }
    }

    Ok(MeasuredLayout {
        layout: result.layout,
        fonts: Mutex::new(fonts),
        size: result.size,
        density,
        pass: result.pass,
        table: result.built.table,
        draw_offset: result.built.draw_offset,
        typography: result.built.typography,
    })
}

struct PassResult<L> {
    layout: L,
    built: BuiltContent<()>,
    size: Size,
    pass: Pass,
}

fn run_pass<E: TextEngine>(
    engine: &mut E,
    fonts: &mut FontCollectionResource<E::Fonts>,
    paragraph: &Paragraph,
    env: &BuildEnv<'_>,
    pass: Pass,
    gradient_bounds: Option<Size>,
    max_width: f32,
) -> Result<PassResult<E::Layout>> {
    log::debug!(
        "{pass:?} pass: {} spans, max width {max_width}",
        paragraph.spans.len()
    );
    let BuiltContent {
        content,
        table,
        draw_offset,
        typography,
    } = build(engine, fonts, paragraph, env, gradient_bounds);
    let mut layout = engine.create_layout(content, fonts.collection_mut())?;
    layout.layout(max_width);

    let density = env.config.density;
    let width = layout.longest_line().ceil().min(max_width).max(0.0) / density;
    let height = layout.height() / density;
    Ok(PassResult {
        layout,
        built: BuiltContent {
            content: (),
            table,
            draw_offset,
            typography,
        },
        size: Size::new(f64::from(width), f64::from(height)),
        pass,
    })
}

impl<E: TextEngine> MeasuredLayout<E> {
    /// The engine layout, for painting.
    pub fn layout(&self) -> &E::Layout {
        &self.layout
    }

    /// Runs `f` with the font collection the layout was built against.
    pub fn with_fonts<R>(&self, f: impl FnOnce(&mut FontCollectionResource<E::Fonts>) -> R) -> R {
        f(&mut self.fonts.lock())
    }

    /// Measured size in logical units.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Logical to device scale the layout was built at.
    pub fn density(&self) -> f32 {
        self.density
    }

    /// The pass whose result this is.
    pub fn pass(&self) -> Pass {
        self.pass
    }

    /// Span index tables of the build.
    pub fn table(&self) -> &SpanTable {
        &self.table
    }

    /// Paint corrections, in device units.
    pub fn draw_offset(&self) -> DrawOffsets {
        self.draw_offset
    }

    /// Paragraph attributes the layout was built with.
    pub fn typography(&self) -> &TypographyStyle {
        &self.typography
    }

    /// Resolved paragraph alignment.
    pub fn align(&self) -> TextAlign {
        self.typography.align
    }

    /// Overflow handling.
    pub fn line_break_mode(&self) -> LineBreakMode {
        self.typography.line_break_mode
    }

    /// Bounding box of a placeholder span in whole logical units.
    ///
    /// Text spans, and span indices past the end, have no queryable box and
    /// yield [`Rect::ZERO`].
    pub fn span_rect(&self, span_index: usize) -> Rect {
        let Some(slot) = self.table.placeholder_slot(span_index) else {
            debug_assert!(
                span_index >= self.table.span_count || self.table.offset(span_index).is_some(),
                "span {span_index} is neither text nor placeholder"
            );
            return Rect::ZERO;
        };
        let Some(rect) = self.layout.placeholder_rects().get(slot).copied() else {
            return Rect::ZERO;
        };
        let rect = self.to_logical(rect);
        Rect::from_origin_size(
            (rect.x0.round(), rect.y0.round()),
            (rect.width().round(), rect.height().round()),
        )
    }

    /// Index of the first text span with a box containing `point` (logical units).
    ///
    /// Boxes are half open: a point on the right or bottom edge is outside.
    pub fn span_index_at(&self, point: Point) -> Option<usize> {
        self.table.offsets.iter().find_map(|entry| {
            self.layout
                .rects_for_range(entry.start..entry.end)
                .into_iter()
                .map(|rect| self.to_logical(rect))
                .any(|rect| contains_half_open(rect, point))
                .then_some(entry.span_index)
        })
    }

    fn to_logical(&self, rect: Rect) -> Rect {
        let scale = 1.0 / f64::from(self.density);
        rect.scale_from_origin(scale)
    }
}

fn contains_half_open(rect: Rect, point: Point) -> bool {
    rect.x0 <= point.x && point.x < rect.x1 && rect.y0 <= point.y && point.y < rect.y1
}
