// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod engine;
mod host;

use std::sync::{Arc, Weak};

use peniko::Color;

pub(crate) use engine::{MockEngine, MockFonts, Op};
pub(crate) use host::{ManualQueue, MemoryResources, TestRoot};

use crate::builder::BuildEnv;
use crate::config::RenderConfig;
use crate::font::FontRegistry;
use crate::gradient::{ColorStop, GradientDirection, LinearGradient};
use crate::host::RootView;
use crate::span::{Fill, Span, SpanStyle};

pub(crate) fn env(registry: &FontRegistry, density: f32) -> BuildEnv<'_> {
    BuildEnv {
        config: RenderConfig::with_density(density),
        registry,
        resources: None,
    }
}

pub(crate) fn text(text: &str) -> Span {
    Span::text(text, SpanStyle::default())
}

pub(crate) fn red_to_blue() -> LinearGradient {
    LinearGradient::new(
        GradientDirection::ToRight,
        vec![
            ColorStop {
                offset: 0.0,
                color: Color::from_rgba8(255, 0, 0, 255),
            },
            ColorStop {
                offset: 0.6,
                color: Color::from_rgba8(0, 0, 255, 255),
            },
        ],
    )
}

pub(crate) fn gradient_text(text: &str) -> Span {
    Span::text(
        text,
        SpanStyle {
            fill: Fill::Gradient(red_to_blue()),
            ..SpanStyle::default()
        },
    )
}

pub(crate) fn weak_root(root: &Arc<TestRoot>) -> Weak<dyn RootView> {
    let root: Arc<dyn RootView> = root.clone();
    Arc::downgrade(&root)
}
