//! Criterion benchmarks for bypass decisions
//!
//! Covers the two hot paths (ignore-path match and GraphQL operation match)
//! and how operation extraction scales with body size.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use envoy_authz_bypass::bypass::{BypassConfig, BypassEngine, RequestDescriptor, extract_operation_name};

// =============================================================================
// Fixtures
// =============================================================================

const PATH_RULES: &str = r#"{"hostSettings": {"test.com": {"ignorePaths": ["/some/path/here/*"]}}}"#;

const OPERATION_RULES: &str = r#"{"hostSettings": {"test.com": {"ignorePaths": ["/some/path/here/*"], "ignoreGraphqlOperations": ["doThing"]}}}"#;

const PRETTY_BODY: &str = "{\n  \"operationName\": \"DoThing\",\n  \"variables\": {},\n  \"query\": \"query DoThing {\\n  doThing {\\n    result {\\n      name\\n      place\\n}\\n}\\n}\"\n}";

fn engine(json: &str) -> BypassEngine {
    BypassEngine::new(BypassConfig::from_json(json).expect("benchmark rules should parse"))
}

/// A query selecting `doThing` with `fields` extra leaf fields under `result`
fn padded_body(fields: usize) -> String {
    let selection: Vec<String> = (0..fields).map(|i| format!("field{i}")).collect();
    let query = format!(
        "query DoThing {{\n  doThing {{\n    result {{\n      {}\n}}\n}}\n}}",
        selection.join("\n      ")
    );
    serde_json::json!({
        "operationName": "DoThing",
        "variables": {},
        "query": query,
    })
    .to_string()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_path_match(c: &mut Criterion) {
    let engine = engine(PATH_RULES);
    let request = RequestDescriptor::new("test.com", "GET", "/some/path/here/do/some/stuff", "");
    assert!(engine.decide(&request));

    c.bench_function("decide/path_match", |b| {
        b.iter(|| engine.decide(black_box(&request)))
    });
}

fn bench_operation_match(c: &mut Criterion) {
    let engine = engine(OPERATION_RULES);
    let request = RequestDescriptor::new("test.com", "POST", "/path/not/matched", PRETTY_BODY);
    assert!(engine.decide(&request));

    c.bench_function("decide/graphql_operation_match", |b| {
        b.iter(|| engine.decide(black_box(&request)))
    });
}

fn bench_body_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_operation_name");

    for fields in [0usize, 10, 100, 1_000, 10_000] {
        let body = padded_body(fields);
        assert_eq!(extract_operation_name(&body).as_deref(), Some("doThing"));

        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::new("body_fields", fields), &body, |b, body| {
            b.iter(|| extract_operation_name(black_box(body)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_path_match, bench_operation_match, bench_body_size);
criterion_main!(benches);
