// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Criterion benchmarks comparing `AaTree` against the standard set types.
//!
//! This benchmark suite compares:
//! - `aatree::AaTree` - Arena-backed Andersson tree
//! - `std::collections::BTreeSet` - Standard library B-tree
//! - `std::collections::HashSet` - Standard library hash set (unordered)

use aatree::{AaTree, Direction};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::{BTreeSet, HashSet};
use std::hint::black_box;

const SEED: u64 = 42;

// ============================================================================
// Helper Functions
// ============================================================================

/// Generate sequential keys from 0 to count-1
fn sequential_keys(count: usize) -> Vec<i64> {
	(0..count as i64).collect()
}

/// Generate random keys using a seeded RNG
fn random_keys(count: usize) -> Vec<i64> {
	let mut rng = StdRng::seed_from_u64(SEED);
	(0..count).map(|_| rng.random()).collect()
}

/// Generate keys that don't exist in a sequential key set
fn missing_keys(count: usize) -> Vec<i64> {
	(0..count as i64).map(|i| -(i + 1)).collect()
}

fn filled_tree(keys: &[i64]) -> AaTree<i64> {
	let mut tree = AaTree::new();
	for k in keys {
		tree.insert(k).unwrap();
	}
	tree
}

// ============================================================================
// Insert Benchmarks
// ============================================================================

fn bench_insert(c: &mut Criterion, name: &str, make_keys: fn(usize) -> Vec<i64>) {
	let mut group = c.benchmark_group(name);

	for count in [1_000, 10_000, 100_000] {
		let keys = make_keys(count);
		group.throughput(Throughput::Elements(count as u64));

		group.bench_with_input(BenchmarkId::new("aatree", count), &keys, |b, keys| {
			b.iter_batched(
				AaTree::<i64>::new,
				|mut tree| {
					for k in keys {
						black_box(tree.insert(k).is_ok());
					}
					tree
				},
				BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("btreeset", count), &keys, |b, keys| {
			b.iter_batched(
				BTreeSet::new,
				|mut set| {
					for &k in keys {
						black_box(set.insert(k));
					}
					set
				},
				BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("hashset", count), &keys, |b, keys| {
			b.iter_batched(
				HashSet::new,
				|mut set| {
					for &k in keys {
						black_box(set.insert(k));
					}
					set
				},
				BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

fn bench_insert_sequential(c: &mut Criterion) {
	bench_insert(c, "insert_sequential", sequential_keys);
}

fn bench_insert_random(c: &mut Criterion) {
	bench_insert(c, "insert_random", random_keys);
}

// ============================================================================
// Lookup Benchmarks
// ============================================================================

fn bench_lookup(c: &mut Criterion, name: &str, hit: bool) {
	let mut group = c.benchmark_group(name);

	for count in [1_000, 10_000, 100_000] {
		let keys = sequential_keys(count);
		let probes = if hit {
			keys.clone()
		} else {
			missing_keys(count)
		};
		group.throughput(Throughput::Elements(count as u64));

		let tree = filled_tree(&keys);
		group.bench_with_input(BenchmarkId::new("aatree", count), &probes, |b, probes| {
			b.iter(|| {
				for k in probes {
					black_box(tree.find(k));
				}
			})
		});

		let set: BTreeSet<i64> = keys.iter().copied().collect();
		group.bench_with_input(BenchmarkId::new("btreeset", count), &probes, |b, probes| {
			b.iter(|| {
				for k in probes {
					black_box(set.get(k));
				}
			})
		});

		let set: HashSet<i64> = keys.iter().copied().collect();
		group.bench_with_input(BenchmarkId::new("hashset", count), &probes, |b, probes| {
			b.iter(|| {
				for k in probes {
					black_box(set.get(k));
				}
			})
		});
	}
	group.finish();
}

fn bench_lookup_hit(c: &mut Criterion) {
	bench_lookup(c, "lookup_hit", true);
}

fn bench_lookup_miss(c: &mut Criterion) {
	bench_lookup(c, "lookup_miss", false);
}

// ============================================================================
// Erase Benchmarks
// ============================================================================

fn bench_erase(c: &mut Criterion) {
	let mut group = c.benchmark_group("erase");

	for count in [1_000, 10_000, 100_000] {
		let keys = sequential_keys(count);
		let remove_count = count / 10; // Remove 10% of entries
		let remove_keys: Vec<i64> = keys[..remove_count].to_vec();

		group.throughput(Throughput::Elements(remove_count as u64));

		group.bench_with_input(BenchmarkId::new("aatree", count), &remove_keys, |b, remove_keys| {
			b.iter_batched(
				|| filled_tree(&keys),
				|mut tree| {
					for k in remove_keys {
						black_box(tree.erase(k).is_ok());
					}
					tree
				},
				BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("btreeset", count), &remove_keys, |b, remove_keys| {
			b.iter_batched(
				|| keys.iter().copied().collect::<BTreeSet<_>>(),
				|mut set| {
					for k in remove_keys {
						black_box(set.remove(k));
					}
					set
				},
				BatchSize::SmallInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("hashset", count), &remove_keys, |b, remove_keys| {
			b.iter_batched(
				|| keys.iter().copied().collect::<HashSet<_>>(),
				|mut set| {
					for k in remove_keys {
						black_box(set.remove(k));
					}
					set
				},
				BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

// ============================================================================
// Traversal Benchmarks (ordered containers only)
// ============================================================================

fn bench_traversal(c: &mut Criterion) {
	let mut group = c.benchmark_group("traversal");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		group.throughput(Throughput::Elements(count as u64));

		let tree = filled_tree(&keys);
		group.bench_function(BenchmarkId::new("aatree_cursor", count), |b| {
			b.iter(|| {
				let mut cursor = tree.cursor();
				let mut item = cursor.begin(&tree, Direction::Forward);
				while let Some(k) = item {
					black_box(k);
					item = cursor.advance(Direction::Forward);
				}
			})
		});

		group.bench_function(BenchmarkId::new("aatree_iter_rev", count), |b| {
			b.iter(|| {
				for k in tree.iter_rev() {
					black_box(k);
				}
			})
		});

		let set: BTreeSet<i64> = keys.iter().copied().collect();
		group.bench_function(BenchmarkId::new("btreeset", count), |b| {
			b.iter(|| {
				for k in &set {
					black_box(k);
				}
			})
		});
	}
	group.finish();
}

// ============================================================================
// Teardown Benchmarks
// ============================================================================

fn bench_teardown(c: &mut Criterion) {
	let mut group = c.benchmark_group("teardown");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		group.throughput(Throughput::Elements(count as u64));

		group.bench_with_input(BenchmarkId::new("aatree", count), &keys, |b, keys| {
			b.iter_batched(|| filled_tree(keys), drop, BatchSize::SmallInput)
		});

		group.bench_with_input(BenchmarkId::new("btreeset", count), &keys, |b, keys| {
			b.iter_batched(|| keys.iter().copied().collect::<BTreeSet<_>>(), drop, BatchSize::SmallInput)
		});
	}
	group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
	benches,
	bench_insert_sequential,
	bench_insert_random,
	bench_lookup_hit,
	bench_lookup_miss,
	bench_erase,
	bench_traversal,
	bench_teardown,
);

criterion_main!(benches);
