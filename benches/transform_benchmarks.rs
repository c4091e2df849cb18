//! Benchmarks for the transform and cache hot paths
//!
//! The transform runs once per ingested row and the cache once per read,
//! so both sit on the service's critical paths.

use std::hint::black_box;
use std::num::NonZeroUsize;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};

use depthframe::models::DepthKey;
use depthframe::processing::{ColorMap, Transform, encode_png, resize_row};
use depthframe::services::frame_cache::TtlCache;

const SOURCE_WIDTH: usize = 200;
const TARGET_WIDTH: usize = 150;

fn ramp_row() -> Vec<u8> {
    (0..SOURCE_WIDTH).map(|i| i.min(255) as u8).collect()
}

fn bench_transform_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_stages");
    let row = ramp_row();
    let colormap = ColorMap::new();
    let resized = resize_row(&row, TARGET_WIDTH).unwrap();
    let rgb = colormap.apply(&resized);

    group.bench_function("colormap_build", |b| b.iter(ColorMap::new));

    group.bench_function("colormap_apply", |b| {
        b.iter(|| black_box(colormap.apply(black_box(&resized))))
    });

    group.bench_function("resize_row", |b| {
        b.iter(|| black_box(resize_row(black_box(&row), TARGET_WIDTH).unwrap()))
    });

    group.bench_function("encode_png", |b| {
        b.iter(|| black_box(encode_png(black_box(&rgb), TARGET_WIDTH as u32, 1).unwrap()))
    });

    group.finish();
}

fn bench_transform_full(c: &mut Criterion) {
    let transform = Transform::new(SOURCE_WIDTH, TARGET_WIDTH).unwrap();
    let row = ramp_row();
    let depth = DepthKey::from_f64(100.0).unwrap();

    c.bench_function("transform_apply_full", |b| {
        b.iter(|| black_box(transform.apply(depth, black_box(&row)).unwrap()))
    });
}

fn bench_cache_operations(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("ttl_cache");

    let cache: TtlCache<i64, Vec<u8>> =
        TtlCache::new(NonZeroUsize::new(1000).unwrap(), Duration::from_secs(60));
    let payload = vec![0u8; 512];
    rt.block_on(async {
        for key in 0..1000i64 {
            cache.put(key, payload.clone()).await;
        }
    });

    group.bench_function("get_hit", |b| {
        b.iter(|| rt.block_on(async { black_box(cache.get(&500).await) }))
    });

    group.bench_function("get_miss", |b| {
        b.iter(|| rt.block_on(async { black_box(cache.get(&-1).await) }))
    });

    group.bench_function("put_replace", |b| {
        b.iter(|| rt.block_on(async { cache.put(500, payload.clone()).await }))
    });

    group.bench_function("stats_snapshot", |b| {
        b.iter(|| rt.block_on(async { black_box(cache.stats().await) }))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_transform_stages,
    bench_transform_full,
    bench_cache_operations
);
criterion_main!(benches);
