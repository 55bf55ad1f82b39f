//! Parameter normalization benchmark.
//!
//! Measures key resolution across casing styles and the full
//! normalize + default-fill + validate pass a tool call goes through.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Map, Value};
use unity_mcp::catalog;
use unity_mcp::tools::{check_params, normalize_param_keys, normalize_params};

fn declared_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("paramNumber{}", i)).collect()
}

fn snake_case_input(count: usize) -> Map<String, Value> {
    (0..count)
        .map(|i| (format!("param_number{}", i), json!(i)))
        .collect()
}

fn bench_normalize_keys(c: &mut Criterion) {
    let sizes: &[usize] = &[1, 4, 16, 64];

    let mut group = c.benchmark_group("normalize_param_keys");
    for &size in sizes {
        let declared = declared_keys(size);
        let declared: Vec<&str> = declared.iter().map(String::as_str).collect();
        let input = snake_case_input(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| normalize_param_keys(black_box(&declared), input.clone()));
        });
    }
    group.finish();
}

fn bench_full_pass(c: &mut Criterion) {
    let registry = catalog::build_registry();
    let Some(definition) = registry.get_tool("add_rigidbody") else {
        panic!("add_rigidbody missing from catalog");
    };
    let metadata = definition.metadata.clone();

    let inputs = [
        ("exact", json!({"gameObjectName": "Crate", "mass": 2.5})),
        ("snake_case", json!({"game_object_name": "Crate", "use_gravity": false})),
        ("upper_case", json!({"GAMEOBJECTNAME": "Crate", "ISKINEMATIC": true})),
    ];

    let mut group = c.benchmark_group("normalize_and_check");
    for (label, input) in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(label), input, |b, input| {
            b.iter(|| {
                let mut params = normalize_params(&metadata, black_box(input.clone())).unwrap();
                check_params(&metadata, &mut params).unwrap();
                params
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize_keys, bench_full_pass);
criterion_main!(benches);
