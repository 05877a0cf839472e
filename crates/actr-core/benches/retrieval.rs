//! Benchmarks for retrieval
//!
//! Tests end-to-end retrieval performance with:
//! - Various memory sizes (100, 500, 1000, 2000)
//! - Exact, partial and blended retrieval
//! - With and without a goal to spread from

#![allow(clippy::expect_used)] // Fine in benchmarks

use actr_core::{ActrParams, Chunk, Model, Slots};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

/// Build a model holding `count` wait facts encountered over the last hour
fn generate_model(count: usize) -> Model {
	let mut rng = rand::thread_rng();
	let mut model = Model::seeded(ActrParams::default(), 42);

	for i in 0..count {
		let gap: i32 = rng.gen_range(1..20);
		let chunk = Chunk::new(
			format!("wf-{i}"),
			Slots::new()
				.with("type", "wait-fact")
				.with("gap", gap)
				.with("card", format!("card-{}", i % 13))
				.with("wait", rng.gen_range(20.0_f64..80.0)),
		);
		model.record(chunk).expect("distinct names");
		let _ = model.advance(3600.0 / count as f64).expect("positive step");
	}

	model
}

fn bench_retrieve_exact(c: &mut Criterion) {
	let mut group = c.benchmark_group("retrieve_exact");

	for count in &[100, 500, 1000, 2000] {
		let mut model = generate_model(*count);
		let pattern = Slots::new().with("type", "wait-fact").with("gap", 5);

		let _ = group.throughput(Throughput::Elements(*count as u64));
		let _ = group.bench_with_input(BenchmarkId::new("chunks", count), count, |bench, _| {
			bench.iter(|| {
				model
					.retrieve_exact(black_box(&pattern))
					.map(|r| r.latency)
					.expect("encountered")
			});
		});
	}

	group.finish();
}

fn bench_retrieve_partial(c: &mut Criterion) {
	let mut group = c.benchmark_group("retrieve_partial");

	for count in &[100, 500, 1000, 2000] {
		let mut model = generate_model(*count);
		let pattern = Slots::new().with("type", "wait-fact").with("gap", 5);

		let _ = group.throughput(Throughput::Elements(*count as u64));
		let _ = group.bench_with_input(BenchmarkId::new("chunks", count), count, |bench, _| {
			bench.iter(|| {
				model
					.retrieve_partial(black_box(&pattern))
					.map(|r| r.latency)
					.expect("encountered")
			});
		});
	}

	group.finish();
}

fn bench_retrieve_blended_with_goal(c: &mut Criterion) {
	let mut group = c.benchmark_group("retrieve_blended_with_goal");

	for count in &[100, 500, 1000, 2000] {
		let mut model = generate_model(*count);
		let _ = model.set_goal(Some(Chunk::new(
			"goal",
			Slots::new().with("card", "card-3").with("gap", 5),
		)));
		let pattern = Slots::new().with("type", "wait-fact");

		let _ = group.throughput(Throughput::Elements(*count as u64));
		let _ = group.bench_with_input(BenchmarkId::new("chunks", count), count, |bench, _| {
			bench.iter(|| model.retrieve_blended(black_box(&pattern), "wait"));
		});
	}

	group.finish();
}

criterion_group!(
	benches,
	bench_retrieve_exact,
	bench_retrieve_partial,
	bench_retrieve_blended_with_goal
);
criterion_main!(benches);
