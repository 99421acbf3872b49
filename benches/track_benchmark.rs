use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trackgraph::track::TrackGraph;

fn build_line(size: usize) -> TrackGraph<usize, u32> {
	let mut g = TrackGraph::new();
	for i in 0..size {
		g.add_edge(i, i + 1, 10).unwrap();
		if i > 0 {
			g.connect(&(i - 1), &i, &(i + 1)).unwrap();
		}
	}
	g
}

fn bench_add_edge(c: &mut Criterion) {
	let mut group = c.benchmark_group("add_edge");
	for size in [100usize, 1_000, 10_000] {
		group.throughput(Throughput::Elements(size as u64));
		group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
			b.iter(|| {
				let mut g = TrackGraph::new();
				for i in 0..size {
					g.add_edge(i, i + 1, 10).unwrap();
				}
				g
			});
		});
	}
	group.finish();
}

fn bench_slice_growth(c: &mut Criterion) {
	let mut group = c.benchmark_group("slice_growth");
	for size in [100usize, 1_000, 10_000] {
		let total_len = (size as u64) * 10;
		group.throughput(Throughput::Elements(size as u64));
		group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
			b.iter_batched(
				|| build_line(size),
				|mut g| {
					g.add_slice(0u32, 0usize);
					g.grow_front(&0u32, total_len, |choices| choices.iter().max().copied());
				},
				criterion::BatchSize::SmallInput,
			);
		});
	}
	group.finish();
}

criterion_group!(benches, bench_add_edge, bench_slice_growth);
criterion_main!(benches);
