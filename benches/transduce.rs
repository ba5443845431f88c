//! Benchmarks for the markup transducer.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use blogify::{collect_definitions, convert_document, transduce};

/// A representative post body exercising every mode of the scanner.
fn sample_body() -> Vec<String> {
    let mut lines = Vec::new();
    for section in 0..50 {
        lines.push(format!("# Section {section}\n"));
        lines.push("\n".to_string());
        lines.push("Some *bold* and _italic_ text with `inline code`,\n".to_string());
        lines.push("a ![doc:link] and a <span class=\"x\">raw tag</span>.\n".to_string());
        lines.push("Escapes: \\*literal\\* and &#955; references.\n".to_string());
        lines.push("\n".to_string());
        lines.push("<table>\n".to_string());
        lines.push("alpha|beta|gamma\n".to_string());
        lines.push("1|2|3\n".to_string());
        lines.push("</table>\n".to_string());
        lines.push("```\n".to_string());
        lines.push("fn main() { println!(\"*not bold*\"); }\n".to_string());
        lines.push("```\n".to_string());
    }
    lines.push("! doc: https://example.com/doc\n".to_string());
    lines
}

fn bench_transduce(c: &mut Criterion) {
    let mut body = sample_body();
    let links = collect_definitions(&mut body);

    c.bench_function("transduce_sample_body", |b| {
        b.iter(|| transduce(std::hint::black_box(&body), &links).unwrap())
    });
}

fn bench_collect_definitions(c: &mut Criterion) {
    c.bench_function("collect_definitions", |b| {
        b.iter(|| {
            let mut body = sample_body();
            collect_definitions(std::hint::black_box(&mut body))
        })
    });
}

fn bench_convert_document(c: &mut Criterion) {
    let raw = format!(
        "---\nBench post\n2024/03/21\n2024/03/22\n---\nSubtitle\n---\n{}---\n",
        sample_body().concat()
    );

    c.bench_function("convert_document", |b| {
        b.iter(|| convert_document(std::hint::black_box(&raw)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_transduce,
    bench_collect_definitions,
    bench_convert_document
);
criterion_main!(benches);
