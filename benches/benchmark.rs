use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use itinerary_tools::strip::{StripRules, strip};

// a builder-like class with `methods` methods, each carrying a mix of
// single line, multi line and nested logging calls
fn generate_source(methods: usize) -> String {
    let mut source = String::from(
        "import * as fs from 'fs';\nimport * as path from 'path';\n\nexport class TimelineBuilder {\n  private logFilePath: string;\n\n",
    );
    for n in 0..methods {
        source.push_str(&format!("  step{n}(routeId: number) {{\n"));
        source.push_str(&format!("    this.log('step {n}');\n"));
        source.push_str("    const start = Date.now();\n");
        source.push_str("    this.log(\n      'route',\n      routeId\n    );\n");
        source.push_str("    this.log(`took ${elapsed(start)}`);\n");
        source.push_str("    return start;\n  }\n\n");
    }
    source.push_str("}\n");
    source
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let rules = StripRules::default();
    for (label, methods) in [("strip 10", 10), ("strip 1k", 1_000), ("strip 10k", 10_000)] {
        let source = generate_source(methods);
        c.bench_function(label, |b| b.iter(|| strip(black_box(&source), &rules)));
    }
    let clean = strip(&generate_source(1_000), &rules).map(|o| o.text).unwrap_or_default();
    c.bench_function("strip 1k clean", |b| b.iter(|| strip(black_box(&clean), &rules)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
