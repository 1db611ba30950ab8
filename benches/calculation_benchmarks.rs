//! Performance benchmarks for the Child Support Assessment Engine.
//!
//! This benchmark suite verifies that the assessment engine meets
//! performance targets:
//! - Single assessment through the engine: < 100μs mean
//! - Single assessment through the HTTP API: < 1ms mean
//! - Batch of 100 assessments: < 100ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use assessment_engine::api::{create_router, AppState, AssessmentRequest};
use assessment_engine::calculation::assess;
use assessment_engine::config::ConfigLoader;
use assessment_engine::models::{CarePeriod, ChildInput, ParentInput};

use axum::{body::Body, http::Request};
use rust_decimal::Decimal;
use tower::ServiceExt;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/csa").expect("Failed to load config");
    AppState::new(config)
}

/// Creates a parent input with the given income.
fn create_parent(ati: u64) -> ParentInput {
    ParentInput {
        adjusted_taxable_income: Decimal::from(ati),
        relevant_dependents: Default::default(),
        receives_income_support: false,
        other_case_children: vec![],
    }
}

/// Creates children alternating across age groups and care splits.
fn create_children(count: usize) -> Vec<ChildInput> {
    (0..count)
        .map(|i| ChildInput {
            id: format!("child_{:03}", i + 1),
            age_years: if i % 2 == 0 { 8 } else { 14 },
            care_a: Decimal::from(if i % 2 == 0 { 0 } else { 35 }),
            care_b: Decimal::from(if i % 2 == 0 { 100 } else { 65 }),
            care_npc: None,
            care_period: CarePeriod::Percent,
        })
        .collect()
}

/// Creates an assessment request body with the given number of children.
fn create_request_with_children(child_count: usize) -> AssessmentRequest {
    let children: Vec<serde_json::Value> = (0..child_count)
        .map(|i| {
            serde_json::json!({
                "id": format!("child_{:03}", i + 1),
                "age_years": if i % 2 == 0 { 8 } else { 14 },
                "care_a": "0",
                "care_b": "100",
                "care_period": "percent"
            })
        })
        .collect();

    let request_json = serde_json::json!({
        "year": 2026,
        "parent_a": { "adjusted_taxable_income": "80000" },
        "parent_b": { "adjusted_taxable_income": "50000" },
        "children": children
    });

    serde_json::from_value(request_json).expect("Failed to build request")
}

/// Benchmarks the pure engine without the HTTP layer.
fn bench_engine(c: &mut Criterion) {
    let config = ConfigLoader::load("./config/csa").expect("Failed to load config");
    let table = config.rate_table(2026).expect("Missing 2026 table").clone();
    let bands = config.care_cost_bands().to_vec();

    let mut group = c.benchmark_group("engine");

    for child_count in [1usize, 2, 4] {
        let parent_a = create_parent(80000);
        let parent_b = create_parent(50000);
        let children = create_children(child_count);

        group.bench_with_input(
            BenchmarkId::new("assess", child_count),
            &child_count,
            |b, _| {
                b.iter(|| {
                    assess(
                        black_box(&parent_a),
                        black_box(&parent_b),
                        black_box(&children),
                        &table,
                        &bands,
                    )
                    .expect("assessment failed")
                })
            },
        );
    }

    group.finish();
}

/// Benchmarks a single assessment through the HTTP API.
fn bench_api_single(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    c.bench_function("api/assess_single", |b| {
        b.to_async(&runtime).iter(|| {
            let router = create_router(state.clone());
            let request = create_request_with_children(2);
            async move {
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/assess")
                            .header("Content-Type", "application/json")
                            .body(Body::from(serde_json::to_string(&request).unwrap()))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                black_box(response.status());
            }
        })
    });
}

/// Benchmarks batches of assessments through the HTTP API.
fn bench_api_batch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    let mut group = c.benchmark_group("api/batch");

    for batch_size in [10usize, 100] {
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &size| {
                b.to_async(&runtime).iter(|| {
                    let state = state.clone();
                    async move {
                        for _ in 0..size {
                            let router = create_router(state.clone());
                            let request = create_request_with_children(2);
                            let response = router
                                .oneshot(
                                    Request::builder()
                                        .method("POST")
                                        .uri("/assess")
                                        .header("Content-Type", "application/json")
                                        .body(Body::from(
                                            serde_json::to_string(&request).unwrap(),
                                        ))
                                        .unwrap(),
                                )
                                .await
                                .unwrap();
                            black_box(response.status());
                        }
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_engine, bench_api_single, bench_api_batch);
criterion_main!(benches);
