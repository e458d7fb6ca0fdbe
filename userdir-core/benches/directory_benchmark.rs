use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use userdir_core::{
    render, Criteria, DirectoryConfig, Field, FormatMode, Metrics, RenderOptions, UserStore,
};

const ROLES: [&str; 3] = ["Admin", "User", "Moderator"];

fn records(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("User {}", i),
                "email": format!("user{}@example.com", i),
                "role": ROLES[i % ROLES.len()],
                "status": if i % 4 == 0 { "Inactive" } else { "Active" },
                "join_date": "2023-01-01",
                "last_login": "2025-11-26",
            })
        })
        .collect()
}

fn store(n: usize, config: DirectoryConfig) -> UserStore {
    let store = UserStore::with_metrics(config, Arc::new(Metrics::new()));
    store.load(&records(n)).expect("benchmark records are valid");
    store
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for size in [100, 1_000, 10_000].iter() {
        let input = records(*size);
        group.bench_with_input(BenchmarkId::new("auto_fix", size), &input, |b, input| {
            b.iter(|| {
                let store = UserStore::with_metrics(DirectoryConfig::default(), Arc::new(Metrics::new()));
                black_box(store.load(black_box(input)).expect("valid"));
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [100, 1_000, 10_000].iter() {
        let store = store(*size, DirectoryConfig::default());
        let last = (*size - 1) as i64;
        group.bench_with_input(BenchmarkId::new("get_by_id", size), &last, |b, &id| {
            b.iter(|| black_box(store.get_by_id(black_box(id))));
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let criteria = Criteria::new()
        .with(Field::Role, "User")
        .with(Field::Name, "9");

    for size in [1_000, 10_000].iter() {
        let cached = store(*size, DirectoryConfig::default());
        group.bench_with_input(BenchmarkId::new("cached", size), &criteria, |b, criteria| {
            b.iter(|| black_box(cached.filter_by(black_box(criteria))));
        });

        let uncached = store(*size, DirectoryConfig::default().without_cache());
        group.bench_with_input(BenchmarkId::new("uncached", size), &criteria, |b, criteria| {
            b.iter(|| black_box(uncached.filter_by(black_box(criteria))));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let users = store(1_000, DirectoryConfig::default()).get_all();
    let options = RenderOptions::default();

    for mode in [
        FormatMode::Compact,
        FormatMode::Verbose,
        FormatMode::Json,
        FormatMode::Table,
        FormatMode::Export,
    ] {
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| black_box(render(black_box(&users), mode, &options)));
        });
    }

    group.finish();
}

fn bench_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_reads");
    let shared = Arc::new(store(1_000, DirectoryConfig::default()));

    for threads in [2, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(threads), threads, |b, &threads| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let store = Arc::clone(&shared);
                        thread::spawn(move || {
                            for i in 0..100 {
                                black_box(store.get_by_id((t * 100 + i) as i64));
                            }
                            black_box(store.filter_by(&Criteria::new().with(Field::Status, "Active")));
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().expect("reader thread");
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_load,
    bench_lookup,
    bench_filter,
    bench_render,
    bench_concurrent_reads
);
criterion_main!(benches);
