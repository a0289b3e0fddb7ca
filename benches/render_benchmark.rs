//! Benchmarks for markupdoc rendering performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks build documents of various sizes in every dialect.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use markupdoc::{normalize_anchor, MarkupLanguage, Operation, Script, TableColumn};

/// Creates a script with the given number of sections, each holding text,
/// a list, a table, and a cross-reference back to the first section.
fn create_test_script(section_count: usize) -> Script {
    let mut operations = vec![Operation::DocumentTitle {
        title: "Benchmark".to_string(),
    }];

    for i in 0..section_count {
        operations.push(Operation::SectionTitle {
            level: 1 + (i % 3) as u8,
            title: format!("Section {i}"),
            anchor: None,
        });
        operations.push(Operation::Paragraph {
            text: format!("Paragraph {i}\nwith a hard break"),
        });
        operations.push(Operation::UnorderedList {
            items: vec!["first".to_string(), "second".to_string()],
        });
        operations.push(Operation::Table {
            columns: Some(vec![TableColumn::new("Name"), TableColumn::new("Value")]),
            rows: (0..5)
                .map(|r| vec![format!("key {r}"), format!("value | {r}")])
                .collect(),
        });
        operations.push(Operation::CrossReference {
            document: None,
            anchor: "Section 0".to_string(),
            text: None,
            raw: false,
        });
    }

    Script {
        anchor_prefix: None,
        operations,
    }
}

/// Benchmark script rendering per dialect.
fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");

    for section_count in [10, 100, 500].iter() {
        let script = create_test_script(*section_count);

        for language in MarkupLanguage::ALL {
            group.bench_with_input(
                BenchmarkId::new(language.extension(), section_count),
                &script,
                |b, script| {
                    b.iter(|| {
                        let _ = black_box(script).render(language);
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark anchor normalization.
fn bench_anchor_normalization(c: &mut Criterion) {
    let titles = [
        "API Overview",
        "GET /pets/{petId}/photos",
        "Café Crème Brûlée",
        "  Many    spaces -- and -- dashes  ",
    ];

    c.bench_function("normalize_anchor", |b| {
        b.iter(|| {
            for title in titles {
                let _ = normalize_anchor(black_box(title), Some("api"));
            }
        });
    });
}

criterion_group!(benches, bench_rendering, bench_anchor_normalization);
criterion_main!(benches);
