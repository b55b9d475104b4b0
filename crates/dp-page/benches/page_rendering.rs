//! Benchmarks for page rendering performance.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dp_page::{Collaborators, MapTranslator, MemoryPartials, Page, PageRenderer, StaticAssets};

/// Generate a page template with the given structure.
fn generate_template(headings: usize, paragraphs_per_section: usize) -> String {
    let mut src = String::with_capacity(headings * 80 + headings * paragraphs_per_section * 200);
    src.push_str("# Document Title\n\n<%= toc %>\n\n");

    for i in 0..headings {
        src.push_str(&format!("## Section {i}\n\n"));
        src.push_str("<%= image \"diagram.png\", size: \"640x480\" %>\n\n");
        for j in 0..paragraphs_per_section {
            src.push_str(&format!(
                "This is paragraph {j} in section {i}. It contains **bold** and *italic* text.\n\n"
            ));
        }
        src.push_str(&format!("```\ncurl https://api.example.com/builds/{{build{i}}}\n```\n\n"));
    }
    src
}

struct Host {
    assets: StaticAssets,
    translator: MapTranslator,
    partials: MemoryPartials,
}

impl Host {
    fn new() -> Self {
        Self {
            assets: StaticAssets::new("/assets"),
            translator: MapTranslator::new().with("nav.next", "Next"),
            partials: MemoryPartials::new().with("shared/_note.md", "**Note:** <%= text %>\n"),
        }
    }

    fn collaborators(&self) -> Collaborators<'_> {
        Collaborators::new(&self.assets, &self.translator, &self.partials)
    }
}

fn bench_render_simple(c: &mut Criterion) {
    let host = Host::new();
    let renderer = PageRenderer::default();
    let page = Page::new("simple", Some("# Hello\n\nSimple content.".to_owned()));

    c.bench_function("render_simple_page", |b| {
        b.iter(|| renderer.render(&page, host.collaborators()));
    });
}

fn bench_render_with_partials(c: &mut Criterion) {
    let host = Host::new();
    let renderer = PageRenderer::default();
    let mut source = generate_template(5, 1);
    for i in 0..10 {
        source.push_str(&format!(
            "<%= render_markdown \"shared/_note\", text: \"note {i}\" %>\n\n"
        ));
    }
    let page = Page::new("partials", Some(source));

    c.bench_function("render_with_10_partials", |b| {
        b.iter(|| renderer.render(&page, host.collaborators()));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let host = Host::new();
    let renderer = PageRenderer::default();

    let mut group = c.benchmark_group("render_by_size");

    for (headings, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let template = generate_template(headings, paragraphs);
        let size = template.len();
        let page = Page::new("generated", Some(template));

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("template", format!("{headings}h_{paragraphs}p")),
            &page,
            |b, page| b.iter(|| renderer.render(page, host.collaborators())),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_with_partials,
    bench_render_varying_sizes,
);
criterion_main!(benches);
