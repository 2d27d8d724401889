//! Benchmarks for markdown parsing and preview layout.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use memopad::document::Document;

fn sample_memo(sections: usize) -> String {
    let mut md = String::new();
    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\nSome *emphasis* and `code` in a paragraph.\n\n"));
        md.push_str("- first\n  - nested\n    - deeper\n- second\n\n");
        md.push_str("1. one\n2. two\n\n```rust\nfn main() {}\n```\n\n");
    }
    md
}

fn bench_parse_simple(c: &mut Criterion) {
    let md = "# Hello\n\n- World";
    c.bench_function("parse_simple", |b| b.iter(|| Document::parse(black_box(md))));
}

fn bench_parse_medium(c: &mut Criterion) {
    let md = sample_memo(20);
    c.bench_function("parse_medium", |b| {
        b.iter(|| Document::parse(black_box(&md)))
    });
}

fn bench_layout_medium(c: &mut Criterion) {
    let doc = Document::parse(&sample_memo(20));
    c.bench_function("layout_medium", |b| b.iter(|| doc.layout(black_box(80))));
}

criterion_group!(
    benches,
    bench_parse_simple,
    bench_parse_medium,
    bench_layout_medium
);
criterion_main!(benches);
