// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic engine: every UTF-16 code unit advances half the font size,
//! lines are as tall as their tallest item and break greedily between items.

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use peniko::kurbo::Rect;

use crate::engine::{
    FontCollection, Paint, PlaceholderBox, StyledContent, TextAttributes, TextEngine, TextLayout,
};
use crate::gradient::LinearShader;
use crate::style::TypographyStyle;
use crate::{Error, Result};

/// Observations shared by an engine and everything it creates.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) contents: AtomicUsize,
    pub(crate) layouts: AtomicUsize,
    pub(crate) destroyed: AtomicUsize,
    pub(crate) registrations: AtomicUsize,
    pub(crate) destroyed_on: Mutex<Vec<ThreadId>>,
    pub(crate) shaders: Mutex<Vec<LinearShader>>,
    pub(crate) typographies: Mutex<Vec<TypographyStyle>>,
    pub(crate) attributes: Mutex<Vec<TextAttributes>>,
}

impl Counters {
    pub(crate) fn contents(&self) -> usize {
        self.contents.load(Ordering::SeqCst)
    }

    pub(crate) fn layouts(&self) -> usize {
        self.layouts.load(Ordering::SeqCst)
    }

    pub(crate) fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub(crate) fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockEngine {
    pub(crate) counters: Arc<Counters>,
    pub(crate) fail_layout: bool,
}

impl MockEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Op {
    Push(TextAttributes),
    Pop,
    Text(String),
    Placeholder(PlaceholderBox),
}

#[derive(Debug)]
pub(crate) struct MockContent {
    pub(crate) ops: Vec<Op>,
}

impl StyledContent for MockContent {
    fn push_style(&mut self, attributes: &TextAttributes) {
        self.ops.push(Op::Push(attributes.clone()));
    }

    fn pop_style(&mut self) {
        self.ops.push(Op::Pop);
    }

    fn add_text(&mut self, text: &str) {
        self.ops.push(Op::Text(text.to_owned()));
    }

    fn add_placeholder(&mut self, placeholder: PlaceholderBox) {
        self.ops.push(Op::Placeholder(placeholder));
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockFonts {
    pub(crate) families: Vec<String>,
    pub(crate) reject: Option<String>,
    counters: Arc<Counters>,
}

impl MockFonts {
    pub(crate) fn new(counters: Arc<Counters>) -> Self {
        Self {
            families: Vec::new(),
            reject: None,
            counters,
        }
    }
}

impl FontCollection for MockFonts {
    fn register_font(&mut self, family: &str, data: Arc<Vec<u8>>) -> Result<()> {
        if self.reject.as_deref() == Some(family) || data.is_empty() {
            return Err(Error::FontRegistration {
                family: family.to_owned(),
                reason: "rejected".to_owned(),
            });
        }
        self.counters.registrations.fetch_add(1, Ordering::SeqCst);
        self.families.push(family.to_owned());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct Item {
    offset: usize,
    width: f64,
    height: f64,
    slot: Option<usize>,
    line: usize,
    rect: Rect,
}

#[derive(Debug)]
pub(crate) struct MockLayout {
    items: Vec<Item>,
    line_widths: Vec<f64>,
    height: f64,
    pub(crate) ops: Vec<Op>,
    counters: Arc<Counters>,
}

impl Drop for MockLayout {
    fn drop(&mut self) {
        self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
        self.counters.destroyed_on.lock().push(thread::current().id());
    }
}

impl TextEngine for MockEngine {
    type Fonts = MockFonts;
    type Content = MockContent;
    type Layout = MockLayout;

    fn create_font_collection(&mut self) -> MockFonts {
        MockFonts::new(self.counters.clone())
    }

    fn create_content(&mut self, style: &TypographyStyle) -> MockContent {
        self.counters.contents.fetch_add(1, Ordering::SeqCst);
        self.counters.typographies.lock().push(style.clone());
        MockContent { ops: Vec::new() }
    }

    fn create_layout(&mut self, content: MockContent, _fonts: &mut MockFonts) -> Result<MockLayout> {
        if self.fail_layout {
            return Err(Error::LayoutCreation("mock failure".to_owned()));
        }
        self.counters.layouts.fetch_add(1, Ordering::SeqCst);

        let mut stack: Vec<TextAttributes> = Vec::new();
        let mut items = Vec::new();
        let mut offset = 0;
        for op in &content.ops {
            match op {
                Op::Push(attributes) => {
                    if let Paint::Gradient(shader) = &attributes.paint.fill {
                        self.counters.shaders.lock().push(shader.clone());
                    }
                    self.counters.attributes.lock().push(attributes.clone());
                    stack.push(attributes.clone());
                }
                Op::Pop => {
                    stack.pop();
                }
                Op::Text(text) => {
                    let size = f64::from(stack.last().map_or(15.0, |a| a.font_size));
                    let line_height = f64::from(
                        stack.last().and_then(|a| a.line_height).unwrap_or(1.0),
                    );
                    for _ in text.encode_utf16() {
                        items.push(Item {
                            offset,
                            width: size / 2.0,
                            height: size * line_height,
                            slot: None,
                            line: 0,
                            rect: Rect::ZERO,
                        });
                        offset += 1;
                    }
                }
                Op::Placeholder(placeholder) => {
                    items.push(Item {
                        offset,
                        width: f64::from(placeholder.width),
                        height: f64::from(placeholder.height),
                        slot: Some(placeholder.slot),
                        line: 0,
                        rect: Rect::ZERO,
                    });
                    offset += 1;
                }
            }
        }
        Ok(MockLayout {
            items,
            line_widths: Vec::new(),
            height: 0.0,
            ops: content.ops,
            counters: self.counters.clone(),
        })
    }
}

impl MockLayout {
    fn finish_line(&mut self, range: Range<usize>, line: usize, top: f64, width: f64) -> f64 {
        let height = self.items[range.clone()]
            .iter()
            .map(|item| item.height)
            .fold(0.0, f64::max);
        let mut x = 0.0;
        for item in &mut self.items[range] {
            let y0 = match item.slot {
                Some(_) => top + (height - item.height) / 2.0,
                None => top,
            };
            let y1 = match item.slot {
                Some(_) => y0 + item.height,
                None => top + height,
            };
            item.rect = Rect::new(x, y0, x + item.width, y1);
            item.line = line;
            x += item.width;
        }
        self.line_widths.push(width);
        height
    }
}

impl TextLayout for MockLayout {
    fn layout(&mut self, max_width: f32) {
        let max_width = f64::from(max_width);
        self.line_widths.clear();
        let mut top = 0.0;
        let mut start = 0;
        let mut x = 0.0;
        for i in 0..self.items.len() {
            let width = self.items[i].width;
            if i > start && x + width > max_width {
                let line = self.line_widths.len();
                top += self.finish_line(start..i, line, top, x);
                start = i;
                x = 0.0;
            }
            x += width;
        }
        if start < self.items.len() {
            let line = self.line_widths.len();
            top += self.finish_line(start..self.items.len(), line, top, x);
        }
        self.height = top;
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn longest_line(&self) -> f32 {
        self.line_widths.iter().copied().fold(0.0, f64::max) as f32
    }

    fn rects_for_range(&self, range: Range<usize>) -> Vec<Rect> {
        let mut rects: Vec<(usize, Rect)> = Vec::new();
        for item in self.items.iter().filter(|item| range.contains(&item.offset)) {
            match rects.last_mut() {
                Some((line, rect)) if *line == item.line => *rect = rect.union(item.rect),
                _ => rects.push((item.line, item.rect)),
            }
        }
        rects.into_iter().map(|(_, rect)| rect).collect()
    }

    fn placeholder_rects(&self) -> Vec<Rect> {
        let mut boxes: Vec<(usize, Rect)> = self
            .items
            .iter()
            .filter_map(|item| item.slot.map(|slot| (slot, item.rect)))
            .collect();
        boxes.sort_by_key(|(slot, _)| *slot);
        boxes.into_iter().map(|(_, rect)| rect).collect()
    }
}
