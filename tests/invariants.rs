//! # Invariant Testing for the Andersson Tree
//!
//! This module contains tests specifically designed to validate the level
//! invariants after every structural change. It focuses on:
//!
//! - Insertion orders that force skews and splits at the root
//! - Erasure patterns that exercise the level-demotion repair
//! - Randomized operations with invariant validation after each step

use aatree::{AaTree, Direction};
use rand::prelude::*;

// ===========================================================================
// Insertion Pattern Tests
// ===========================================================================

/// Ascending insertion only ever builds high-side links, so every insert
/// after the second triggers a split somewhere on the path.
#[test]
fn ascending_insertions() {
	let mut tree: AaTree<i32> = AaTree::new();

	for i in 0..2000 {
		tree.insert(&i).unwrap();
		tree.assert_invariants();
	}

	assert_eq!(tree.len(), 2000);
	assert_eq!(tree.first(), Some(&0));
	assert_eq!(tree.last(), Some(&1999));
}

/// Descending insertion builds low-side links, which skew must undo.
#[test]
fn descending_insertions() {
	let mut tree: AaTree<i32> = AaTree::new();

	for i in (0..2000).rev() {
		tree.insert(&i).unwrap();
		tree.assert_invariants();
	}

	for i in 0..2000 {
		assert_eq!(tree.find(&i), Some(&i), "Key {} not found", i);
	}
}

/// Alternating between both ends of the range.
#[test]
fn zigzag_insertions() {
	let mut tree: AaTree<i32> = AaTree::new();

	for i in 0..1000 {
		let key = if i % 2 == 0 {
			i
		} else {
			10_000 - i
		};
		tree.insert(&key).unwrap();
		tree.assert_invariants();
	}

	assert_eq!(tree.len(), 1000);
}

/// Height stays logarithmic: an AA tree is never deeper than about
/// `2 * log2(n + 1)`.
#[test]
fn height_is_logarithmic() {
	let mut tree: AaTree<u32> = AaTree::new();

	for n in 1..=4096u32 {
		tree.insert(&n).unwrap();
		if n.is_power_of_two() {
			let bound = 2 * (32 - (n + 1).leading_zeros()) as usize;
			assert!(tree.height() <= bound, "height {} exceeds {} at n = {}", tree.height(), bound, n);
		}
	}
}

// ===========================================================================
// Erasure Pattern Tests
// ===========================================================================

#[test]
fn erase_from_front() {
	let mut tree: AaTree<i32> = AaTree::new();
	for i in 0..1000 {
		tree.insert(&i).unwrap();
	}

	for i in 0..1000 {
		tree.erase(&i).unwrap();
		tree.assert_invariants();
		assert_eq!(tree.first().copied(), if i < 999 { Some(i + 1) } else { None });
	}
}

#[test]
fn erase_from_back() {
	let mut tree: AaTree<i32> = AaTree::new();
	for i in 0..1000 {
		tree.insert(&i).unwrap();
	}

	for i in (0..1000).rev() {
		tree.erase(&i).unwrap();
		tree.assert_invariants();
	}
	assert!(tree.is_empty());
}

/// Erasing from the middle of the key range mostly removes interior nodes,
/// which goes through the in-order successor path.
#[test]
fn erase_from_middle() {
	let mut tree: AaTree<i32> = AaTree::new();
	for i in 0..1024 {
		tree.insert(&i).unwrap();
	}

	let mut left: Vec<i32> = (0..1024).collect();
	while !left.is_empty() {
		let key = left.remove(left.len() / 2);
		tree.erase(&key).unwrap();
		tree.assert_invariants();
	}
}

#[test]
fn refill_after_emptying() {
	let mut tree: AaTree<i32> = AaTree::new();

	for round in 0..5 {
		for i in 0..300 {
			tree.insert(&(i * round)).unwrap();
		}
		tree.assert_invariants();
		for i in 0..300 {
			tree.erase(&(i * round)).unwrap();
		}
		tree.assert_invariants();
		assert!(tree.is_empty());
	}
}

// ===========================================================================
// Randomized Tests
// ===========================================================================

#[test]
fn random_operations_keep_invariants() {
	let mut rng = StdRng::seed_from_u64(0x5eed);

	for _ in 0..20 {
		let mut tree: AaTree<u16> = AaTree::new();
		let mut expected: Vec<u16> = Vec::new();

		for _ in 0..500 {
			let key: u16 = rng.random_range(0..200);
			if rng.random_bool(0.55) {
				tree.insert(&key).unwrap();
				expected.push(key);
			} else {
				let pos = expected.iter().position(|k| *k == key);
				assert_eq!(tree.erase(&key).is_ok(), pos.is_some());
				if let Some(pos) = pos {
					expected.swap_remove(pos);
				}
			}
			tree.assert_invariants();
		}

		expected.sort_unstable();
		assert!(tree.iter().eq(expected.iter()));
	}
}

/// Small trees go through every shape; check each erase position.
#[test]
fn every_erase_position_in_small_trees() {
	for n in 1..=40 {
		for victim in 0..n {
			let mut tree: AaTree<i32> = AaTree::new();
			for i in 0..n {
				tree.insert(&i).unwrap();
			}

			tree.erase(&victim).unwrap();
			tree.assert_invariants();

			let expected: Vec<i32> = (0..n).filter(|i| *i != victim).collect();
			assert!(tree.iter().eq(expected.iter()), "n = {}, victim = {}", n, victim);
		}
	}
}

/// Heavy duplication over a few keys; a reverse cursor walk must agree with
/// the per-key counts after every step.
#[test]
fn clustered_duplicates_keep_invariants() {
	for seed in 0..200u64 {
		let mut rng = StdRng::seed_from_u64(seed);
		let mut tree: AaTree<u8> = AaTree::new();
		let mut counts = [0usize; 16];

		for step in 0..400 {
			let key: u8 = rng.random_range(0..16);
			if rng.random_bool(0.5) {
				tree.insert(&key).unwrap();
				counts[key as usize] += 1;
			} else {
				let present = counts[key as usize] > 0;
				assert_eq!(tree.erase(&key).is_ok(), present, "seed {}, step {}", seed, step);
				if present {
					counts[key as usize] -= 1;
				}
			}
			tree.assert_invariants();

			let mut walked = [0usize; 16];
			let mut prev = u8::MAX;
			let mut cursor = tree.cursor();
			let mut item = cursor.begin(&tree, Direction::Reverse);
			while let Some(&k) = item {
				assert!(k <= prev, "seed {}, step {}", seed, step);
				prev = k;
				walked[k as usize] += 1;
				item = cursor.advance(Direction::Reverse);
			}
			assert_eq!(walked, counts, "seed {}, step {}", seed, step);
		}
	}
}
