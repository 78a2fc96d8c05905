//! Benchmarks for page rendering performance.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::fs;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use folio_renderer::{RenderOptions, render_document};
use folio_site::{Site, SiteConfig};

/// Generate markdown with headings, sidenotes, a tab group and a diagram
/// per section.
fn generate_markdown(sections: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * (300 + paragraphs_per_section * 120));
    md.push_str("# Document Title\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "Paragraph {j} of section {i} has **bold** text and a note[^n{i}].\n\n"
            ));
        }
        md.push_str(&format!(
            ":::tabs\n::tab{{title=\"Rust\"}}\n```rust\nfn main() {{}}\n```\n::tab{{title=\"Notes\"}}\nSee [next](/posts/s{i}).\n:::\n\n"
        ));
        md.push_str("```mermaid\n---\nheight: 300px\n---\ngraph TD\n  A --> B\n```\n\n");
    }
    for i in 0..sections {
        md.push_str(&format!("[^n{i}]: Note for section *{i}*.\n"));
    }
    md
}

fn site(root: &std::path::Path) -> Site {
    Site::open(
        root,
        SiteConfig {
            title: "Bench".to_owned(),
            render_options: RenderOptions::default(),
        },
    )
}

fn bench_render_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_document");

    for (sections, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let markdown = generate_markdown(sections, paragraphs);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}s_{paragraphs}p")),
            &markdown,
            |b, md| b.iter(|| render_document(md, &RenderOptions::default())),
        );
    }

    group.finish();
}

fn bench_render_page_cached(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("page.md"),
        format!("---\ntitle: Bench\n---\n{}", generate_markdown(10, 2)),
    )
    .unwrap();
    let site = site(temp_dir.path());

    c.bench_function("render_page_cached_document", |b| {
        b.iter(|| site.render_page("page").unwrap());
    });
}

fn bench_navigation(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    for folder in 0..10 {
        let dir = temp_dir.path().join(format!("folder-{folder}"));
        fs::create_dir(&dir).unwrap();
        for doc in 0..10 {
            fs::write(
                dir.join(format!("doc-{doc}.md")),
                format!("---\ntitle: Doc {doc}\n---\nBody"),
            )
            .unwrap();
        }
    }
    let site = site(temp_dir.path());

    c.bench_function("navigation_100_documents", |b| {
        b.iter(|| site.navigation());
    });
}

criterion_group!(
    benches,
    bench_render_document,
    bench_render_page_cached,
    bench_navigation
);
criterion_main!(benches);
