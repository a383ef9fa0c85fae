//! Locator Operations Benchmarks
//!
//! Benchmarks for XPath literal escaping, text normalization, candidate
//! generation, and mock query throughput.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use esperar::prelude::*;

fn bench_xpath_literal(c: &mut Criterion) {
    let mut group = c.benchmark_group("xpath_literal");

    let inputs = vec![
        ("plain", "Save changes"),
        ("apostrophe", "O'Brien's profile"),
        ("quotes", r#"the "fruit" table"#),
        ("mixed", r#"she said "it's done""#),
        (
            "long_mixed",
            r#"a much longer caption, with "several" embedded 'quoted' fragments, as real pages have"#,
        ),
    ];

    for (name, text) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |bench, t| {
            bench.iter(|| {
                let literal = xpath_literal(black_box(*t));
                black_box(literal);
            });
        });
    }

    group.finish();
}

fn bench_normalize_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_text");

    let inputs = vec![
        ("clean", "Welcome back"),
        ("ragged", "  Welcome \t back,\n    dev  "),
        (
            "long",
            "lorem   ipsum dolor\tsit amet consectetur\n adipiscing elit sed do eiusmod tempor",
        ),
    ];

    for (name, text) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |bench, t| {
            bench.iter(|| {
                let normalized = normalize_text(black_box(*t));
                black_box(normalized);
            });
        });
    }

    group.finish();
}

fn bench_text_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_query");

    let needles = vec![
        ("short", "OK"),
        ("sentence", "Your changes have been saved"),
        ("quoted", r#"she said "it's done""#),
    ];

    for (name, needle) in needles {
        group.bench_with_input(BenchmarkId::from_parameter(name), &needle, |bench, n| {
            bench.iter(|| {
                let locator = text_query(black_box(*n));
                black_box(locator);
            });
        });
    }

    group.finish();
}

fn bench_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidates");

    let kinds = vec![
        ("fillable_field", ElementKind::FillableField),
        ("link", ElementKind::Link),
        ("button", ElementKind::Button),
        ("checkbox_or_radio", ElementKind::CheckboxOrRadio),
        ("select", ElementKind::Select),
        ("table", ElementKind::Table),
    ];

    for (name, kind) in kinds {
        group.bench_with_input(BenchmarkId::from_parameter(name), &kind, |bench, &k| {
            bench.iter(|| {
                let list = candidates(black_box(k), black_box("Save changes"));
                black_box(list);
            });
        });
    }

    group.finish();
}

fn bench_mock_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock_query");

    let sizes = vec![10usize, 100, 1000];

    for size in sizes {
        let browser = MockBrowser::new();
        for i in 0..size {
            browser.add_element(
                MockElement::new(format!("row-{i}"), "tr").with_class("row"),
            );
        }
        let session = Session::new();
        let locator = Locator::new(Strategy::ClassName, "row");

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}_elements")),
            &size,
            |bench, _| {
                bench.iter(|| {
                    let handles = browser.query_elements(session, black_box(&locator)).unwrap();
                    black_box(handles);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_xpath_literal,
    bench_normalize_text,
    bench_text_query,
    bench_candidates,
    bench_mock_query
);
criterion_main!(benches);
