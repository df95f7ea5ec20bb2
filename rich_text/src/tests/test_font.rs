// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::utils::{MemoryResources, MockEngine, MockFonts, env};
use crate::Error;
use crate::builder::build;
use crate::engine::TextEngine;
use crate::font::{FontCollectionResource, FontRegistry, FontSource, RAW_FILE_PREFIX};
use crate::span::{Paragraph, Span, SpanStyle};
use crate::style::ParagraphStyle;

fn font_bytes() -> Arc<Vec<u8>> {
    Arc::new(vec![0, 1, 0, 0])
}

fn collection() -> FontCollectionResource<MockFonts> {
    FontCollectionResource::new(MockEngine::new().create_font_collection())
}

#[test]
fn source_from_path() {
    assert_eq!(
        FontSource::from_path("rawfile:fonts/a.ttf"),
        FontSource::RawFile("fonts/a.ttf".to_owned())
    );
    assert_eq!(
        FontSource::from_path("/data/a.ttf"),
        FontSource::File("/data/a.ttf".into())
    );
    assert!(RAW_FILE_PREFIX.ends_with(':'));
}

#[test]
fn registration_is_idempotent() {
    let registry = FontRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    registry.install_adapter("Brand", move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
        Some(FontSource::Bytes(font_bytes()))
    });

    let mut fonts = collection();
    assert!(fonts.ensure_registered("Brand", &registry, None));
    assert!(fonts.ensure_registered("Brand", &registry, None));
    assert!(fonts.is_registered("Brand"));
    assert_eq!(fonts.collection().families, ["Brand"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "adapter consulted once");
}

#[test]
fn families_without_adapter_are_left_alone() {
    let registry = FontRegistry::new();
    let mut fonts = collection();
    assert!(!fonts.ensure_registered("serif", &registry, None));
    assert!(!fonts.is_registered("serif"));
    assert!(
        matches!(
            registry.load("serif", None),
            Err(Error::UnknownFontFamily(family)) if family == "serif"
        ),
        "unknown family"
    );
}

#[test]
fn raw_files_come_from_resources() {
    let registry = FontRegistry::new();
    registry.install_adapter("Bundled", |_| {
        Some(FontSource::from_path("rawfile:fonts/bundled.ttf"))
    });
    let mut resources = MemoryResources::default();
    resources
        .files
        .insert("fonts/bundled.ttf".to_owned(), vec![1, 2, 3]);

    let data = registry
        .load("Bundled", Some(&resources))
        .expect("bundled font loads");
    assert_eq!(*data, [1, 2, 3]);

    resources.files.clear();
    let cached = registry
        .load("Bundled", Some(&resources))
        .expect("served from cache");
    assert!(Arc::ptr_eq(&data, &cached), "same cached buffer");

    registry.clear();
    assert!(!registry.has_adapter("Bundled"));
}

#[test]
fn raw_files_need_a_resource_manager() {
    let registry = FontRegistry::new();
    registry.install_adapter("Bundled", |_| Some(FontSource::RawFile("a.ttf".to_owned())));
    let err = registry.load("Bundled", None).expect_err("nowhere to read from");
    assert!(matches!(err, Error::FontLoad { .. }), "unexpected error {err:?}");
}

#[test]
fn empty_sources_are_rejected() {
    let registry = FontRegistry::new();
    registry.install_adapter("Empty", |_| Some(FontSource::Bytes(Arc::new(Vec::new()))));
    registry.install_adapter("None", |_| None);
    assert!(matches!(
        registry.load("Empty", None),
        Err(Error::FontRegistration { .. })
    ), "empty buffer");
    assert!(matches!(
        registry.load("None", None),
        Err(Error::FontRegistration { .. })
    ), "no source");
}

#[test]
fn failed_registration_is_retried() {
    let registry = FontRegistry::new();
    registry.install_adapter("Brand", |_| Some(FontSource::Bytes(font_bytes())));
    let mut fonts = collection();
    fonts.collection_mut().reject = Some("Brand".to_owned());
    assert!(!fonts.ensure_registered("Brand", &registry, None));
    assert!(!fonts.is_registered("Brand"));

    fonts.collection_mut().reject = None;
    assert!(fonts.ensure_registered("Brand", &registry, None), "second attempt");
}

#[test]
fn missing_files_fail_to_load() {
    let registry = FontRegistry::new();
    registry.install_adapter("Gone", |_| {
        Some(FontSource::File("/nonexistent/rich-text/font.ttf".into()))
    });
    let mut fonts = collection();
    assert!(!fonts.ensure_registered("Gone", &registry, None));
}

#[test]
fn building_registers_span_families_once() {
    let registry = FontRegistry::new();
    registry.install_adapter("Brand", |_| Some(FontSource::Bytes(font_bytes())));
    let styled = |text: &str, family: Option<&str>| {
        Span::text(
            text,
            SpanStyle {
                font_family: family.map(str::to_owned),
                ..SpanStyle::default()
            },
        )
    };
    let paragraph = Paragraph::new(
        vec![
            styled("a", Some("Brand")),
            styled("b", Some("Brand")),
            styled("c", Some("system-ui")),
            styled("d", None),
        ],
        ParagraphStyle::default(),
    );

    let mut engine = MockEngine::new();
    let mut fonts = FontCollectionResource::new(engine.create_font_collection());
    let built = build(&mut engine, &mut fonts, &paragraph, &env(&registry, 1.0), None);
    assert_eq!(engine.counters.registrations(), 1);
    assert!(fonts.is_registered("Brand"));
    assert!(!fonts.is_registered("system-ui"), "left to the engine");
    assert_eq!(built.table.offsets.len(), 4);
}
