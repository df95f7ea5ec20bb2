// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-view shadow object.
//!
//! A [`RichTextShadow`] lives on the context thread, where properties are
//! set and paragraphs are measured. The painter reads the layout installed
//! for it on the UI thread. Layouts move between the two only through tasks
//! posted to the UI thread, and are always dropped there.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use peniko::kurbo::{Point, Rect, Size};
use serde_json::Value;

use crate::builder::{BuildEnv, DrawOffsets};
use crate::engine::TextEngine;
use crate::font::FontRegistry;
use crate::host::{RootView, RootViewGuard, UiTask};
use crate::measure::{MeasuredLayout, measure};
use crate::props::{PropsMap, SpanDecoder, keys};
use crate::span::Paragraph;
use crate::style::TextAlign;

/// Bridge method returning the box of a placeholder span.
pub const SPAN_RECT_METHOD: &str = "spanRect";

/// Bridge method returning the index of the text span under a point, or `-1`.
pub const SPAN_INDEX_AT_METHOD: &str = "spanIndexAt";

/// What the painter needs from the installed layout.
///
/// Only lent out by [`RichTextShadow::with_paint_state`], so the layout it
/// holds cannot outlive the UI thread's ownership of it.
pub struct PaintState<E: TextEngine> {
    layout: Arc<MeasuredLayout<E>>,
    /// Paint corrections in device units.
    pub draw_offset: DrawOffsets,
    /// Paragraph alignment.
    pub align: TextAlign,
    /// Measured size in logical units.
    pub size: Size,
}

impl<E: TextEngine> core::fmt::Debug for PaintState<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintState")
            .field("layout", &self.layout)
            .field("draw_offset", &self.draw_offset)
            .field("align", &self.align)
            .field("size", &self.size)
            .finish()
    }
}

impl<E: TextEngine> PaintState<E> {
    /// The installed layout.
    pub fn layout(&self) -> &MeasuredLayout<E> {
        &self.layout
    }
}

/// UI thread state.
///
/// Written only by tasks on the UI queue. The painter reads it through the
/// shadow, and the queued tasks own a handle to it, so the slot is shared
/// between threads and needs a `Sync` cell. The mutex is that cell: install
/// and release tasks run in queue order on the UI thread, and paint reads
/// happen on that same thread, so it is never contended.
struct UiSlot<E: TextEngine> {
    installed: Option<PaintState<E>>,
}

/// Layout, tables and lifetime management for one rich text view.
pub struct RichTextShadow<E: TextEngine + 'static> {
    root: Weak<dyn RootView>,
    registry: Arc<FontRegistry>,
    decoder: SpanDecoder,
    values: Vec<Value>,
    props: PropsMap,
    paragraph: Paragraph,
    current: Option<Arc<MeasuredLayout<E>>>,
    ui: Arc<Mutex<UiSlot<E>>>,
}

impl<E: TextEngine + 'static> core::fmt::Debug for RichTextShadow<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RichTextShadow")
            .field("paragraph", &self.paragraph)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<E: TextEngine + 'static> RichTextShadow<E> {
    /// Creates a shadow for a view of the tree rooted at `root`.
    ///
    /// Custom fonts are looked up in the global [`FontRegistry`].
    pub fn new(root: Weak<dyn RootView>) -> Self {
        Self::with_registry(root, FontRegistry::global())
    }

    /// Creates a shadow using its own font registry.
    pub fn with_registry(root: Weak<dyn RootView>, registry: Arc<FontRegistry>) -> Self {
        Self {
            root,
            registry,
            decoder: SpanDecoder::new(),
            values: Vec::new(),
            props: PropsMap::new(),
            paragraph: Paragraph::default(),
            current: None,
            ui: Arc::new(Mutex::new(UiSlot { installed: None })),
        }
    }

    /// Replaces the decoder used for bridge properties.
    #[must_use]
    pub fn with_decoder(mut self, decoder: SpanDecoder) -> Self {
        self.decoder = decoder;
        self.redecode();
        self
    }

    /// Sets a bridge property. `"values"` replaces the span array, anything
    /// else is a paragraph property.
    pub fn set_prop(&mut self, key: &str, value: Value) {
        if key == keys::VALUES {
            self.values = match value {
                Value::Array(values) => values,
                _ => Vec::new(),
            };
        } else {
            self.props.insert(key.to_owned(), value);
        }
        self.redecode();
    }

    /// Replaces the paragraph directly, discarding bridge properties.
    pub fn set_paragraph(&mut self, paragraph: Paragraph) {
        self.values.clear();
        self.props.clear();
        self.paragraph = paragraph;
    }

    /// The paragraph that will be measured.
    pub fn paragraph(&self) -> &Paragraph {
        &self.paragraph
    }

    fn redecode(&mut self) {
        self.paragraph = self.decoder.decode_paragraph(&self.values, &self.props);
    }

    /// Measures the paragraph for a view constrained to `width` logical units.
    ///
    /// The previous layout is released first. When the root view is gone or
    /// the engine fails, the result is a zero size and no layout is kept.
    /// Paragraphs grow vertically, so `_height` does not affect the result.
    pub fn calculate_render_view_size(
        &mut self,
        engine: &mut E,
        width: f32,
        _height: f32,
    ) -> Size {
        self.release_current();
        let Some(root) = RootViewGuard::lock(&self.root) else {
            return Size::ZERO;
        };
        let env = BuildEnv {
            config: root.config(),
            registry: &self.registry,
            resources: root.resource_manager(),
        };
        match measure(engine, &self.paragraph, width, &env) {
            Ok(layout) => {
                let size = layout.size();
                self.current = Some(Arc::new(layout));
                size
            }
            Err(err) => {
                log::warn!("rich text measurement failed: {err}");
                Size::ZERO
            }
        }
    }

    /// The layout of the last measurement, on the context thread.
    ///
    /// Borrowed only: the shadow alone decides when the layout is handed to
    /// the UI thread for destruction.
    pub fn current_layout(&self) -> Option<&MeasuredLayout<E>> {
        self.current.as_deref()
    }

    /// Size of the last measurement in logical units.
    pub fn measured_size(&self) -> Size {
        self.current.as_ref().map_or(Size::ZERO, |layout| layout.size())
    }

    /// A task that installs the current layout for painting when run on the UI thread.
    ///
    /// With no current layout the task clears the installed one.
    pub fn schedule_install(&self) -> UiTask {
        let state = self.current.as_ref().map(|layout| PaintState {
            layout: layout.clone(),
            draw_offset: layout.draw_offset(),
            align: layout.align(),
            size: layout.size(),
        });
        let ui = self.ui.clone();
        Box::new(move || {
            log::trace!("installing rich text layout: {}", state.is_some());
            ui.lock().installed = state;
        })
    }

    /// Gives up the current layout.
    ///
    /// The layout is cleared immediately and dropped by a task on the UI
    /// thread, after being uninstalled if it is still the installed one.
    /// Without a reachable root view it is leaked instead.
    pub fn release_current(&mut self) {
        let Some(layout) = self.current.take() else {
            return;
        };
        let ui = self.ui.clone();
        self.post_or_leak(layout, move |layout| {
            let mut slot = ui.lock();
            if slot
                .installed
                .as_ref()
                .is_some_and(|state| Arc::ptr_eq(&state.layout, &layout))
            {
                slot.installed = None;
            }
            drop(slot);
            log::trace!("releasing rich text layout");
            drop(layout);
        });
    }

    fn post_or_leak<T: Send + 'static>(&self, value: T, task: impl FnOnce(T) + Send + 'static) {
        match RootViewGuard::lock(&self.root) {
            Some(root) => root.scheduler().run_on_ui(Box::new(move || task(value))),
            None => {
                log::warn!("no UI thread to release rich text layout on; leaking it");
                core::mem::forget(value);
            }
        }
    }

    /// Runs `paint` against the installed layout, on the UI thread.
    ///
    /// Returns `None` when nothing is installed.
    pub fn with_paint_state<R>(&self, paint: impl FnOnce(&PaintState<E>) -> R) -> Option<R> {
        self.ui.lock().installed.as_ref().map(paint)
    }

    /// Bounding box of a placeholder span, see [`MeasuredLayout::span_rect`].
    ///
    /// Zero before the first measurement.
    pub fn span_rect(&self, span_index: usize) -> Rect {
        self.current
            .as_ref()
            .map_or(Rect::ZERO, |layout| layout.span_rect(span_index))
    }

    /// Index of the text span under `(x, y)` in logical units, if any.
    pub fn span_index_at(&self, x: f64, y: f64) -> Option<usize> {
        self.current
            .as_ref()
            .and_then(|layout| layout.span_index_at(Point::new(x, y)))
    }

    /// Dispatches a bridge method call.
    pub fn call(&self, method: &str, params: &str) -> Option<String> {
        match method {
            SPAN_RECT_METHOD => {
                let rect = params
                    .trim()
                    .parse::<usize>()
                    .map_or(Rect::ZERO, |index| self.span_rect(index));
                Some(format_rect(rect))
            }
            SPAN_INDEX_AT_METHOD => {
                let mut coords = params.split_whitespace().map(str::parse::<f64>);
                let index = match (coords.next(), coords.next()) {
                    (Some(Ok(x)), Some(Ok(y))) => self.span_index_at(x, y),
                    _ => None,
                };
                Some(index.map_or_else(|| "-1".to_owned(), |index| index.to_string()))
            }
            _ => None,
        }
    }

    /// Concatenated plain text of every span.
    pub fn text_content(&self) -> String {
        self.paragraph.plain_text()
    }
}

impl<E: TextEngine + 'static> Drop for RichTextShadow<E> {
    fn drop(&mut self) {
        self.release_current();
        let ui = self.ui.clone();
        self.post_or_leak(ui, |ui| {
            let installed = ui.lock().installed.take();
            drop(installed);
        });
    }
}

/// Formats a rect as the bridge's whole unit `"x y width height"` string.
pub fn format_rect(rect: Rect) -> String {
    format!(
        "{:.0} {:.0} {:.0} {:.0}",
        rect.x0,
        rect.y0,
        rect.width(),
        rect.height()
    )
}
