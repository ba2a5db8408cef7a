use criterion::{criterion_group, criterion_main, Criterion};
use ragdesk::api::Envelope;
use ragdesk::api::endpoints::normalize_path;
use ragdesk::mock::MockRouter;
use ragdesk::navigation::{decide, default_routes, GuardState};
use ragdesk::config::NavigationConfig;
use serde_json::json;
use std::hint::black_box;

fn bench_route_resolution(c: &mut Criterion) {
    let router = MockRouter::with_default_routes().unwrap();
    let mut group = c.benchmark_group("mock_resolve");

    group.bench_function("first_route", |b| {
        b.iter(|| router.resolve(black_box("/api/auth/logout"), &json!({})))
    });

    group.bench_function("late_route", |b| {
        b.iter(|| router.resolve(black_box("/api/dashboard/system-status"), &json!({})))
    });

    group.bench_function("unmatched", |b| {
        b.iter(|| router.resolve(black_box("/api/nowhere"), &json!({})))
    });

    group.bench_function("search", |b| {
        b.iter(|| {
            router.resolve(
                black_box("/api/search/documents"),
                &json!({ "keyword": "redis", "sortBy": "title" }),
            )
        })
    });

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_endpoint", |b| {
        b.iter(|| normalize_path(black_box("/api/knowledge-base/list/?page=2#top")))
    });
}

fn bench_classification(c: &mut Criterion) {
    let raw = json!({ "statusCode": 1002, "message": "Wrong password", "payload": null }).to_string();

    c.bench_function("envelope_decode_classify", |b| {
        b.iter(|| {
            let envelope: Envelope = serde_json::from_str(black_box(&raw)).unwrap();
            envelope.into_result()
        })
    });
}

fn bench_guard(c: &mut Criterion) {
    let routes = default_routes();
    let config = NavigationConfig::default();

    c.bench_function("guard_decide_nested", |b| {
        b.iter(|| {
            decide(
                &routes,
                &config,
                black_box(GuardState::AuthenticatedUser),
                black_box("/users/user_003/edit"),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_route_resolution,
    bench_normalize,
    bench_classification,
    bench_guard
);
criterion_main!(benches);
