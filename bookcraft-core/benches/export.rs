//! Export benchmarks

use bookcraft_core::{BookProject, ExportFormat, ExportPipeline, Normalizer};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn sample_project() -> BookProject {
    let paragraph = "\u{201c}Hold the line,\u{201d} said **Mara**, and the wind *answered*. ".repeat(12);
    let chapter = format!(
        "Here is the chapter:\n# Chapter 1: Dawn\n\n{}",
        vec![paragraph.as_str(); 40].join("\n\n")
    );
    (1..=10).fold(
        BookProject::new("Benchmark Saga", 200, 10),
        |project, n| project.with_chapter(n, chapter.clone()),
    )
}

fn export_benchmark(c: &mut Criterion) {
    let project = sample_project();
    let raw = project.chapter_content(1).unwrap_or_default().to_string();
    let normalizer = Normalizer::new();
    let pipeline = ExportPipeline::new();

    c.bench_function("normalize_chapter", |b| {
        b.iter(|| normalizer.normalize(black_box(&raw), 1, "Dawn"))
    });

    for format in [ExportFormat::Html, ExportFormat::Pdf, ExportFormat::Docx] {
        c.bench_function(&format!("render_{}", format.file_extension()), |b| {
            b.iter(|| pipeline.render(black_box(&project), false, format))
        });
    }
}

criterion_group!(benches, export_benchmark);
criterion_main!(benches);
