//! Allocation tracking and failure injection for tests.
//!
//! This module provides a global allocator that counts allocations made by
//! the current thread and can be told to refuse the next one. It exists so
//! tests can check that a dropped tree gives back everything it took, and
//! that an insert whose node allocation fails leaves the tree untouched.
//!
//! # Usage
//!
//! In test binaries that want to track allocations, use:
//!
//! ```ignore
//! use aatree::alloc::TrackingAllocator;
//!
//! #[global_allocator]
//! static ALLOC: TrackingAllocator = TrackingAllocator;
//!
//! #[test]
//! fn test_no_leaks() {
//!     aatree::alloc::reset_counters();
//!
//!     // ... test code ...
//!
//!     drop(tree);
//!
//!     aatree::alloc::check_no_leaks();
//! }
//! ```
//!
//! # Caveats
//!
//! - Counters are per thread, so tests running in parallel do not disturb
//!   each other, but memory freed on another thread is not seen.
//! - The tracking allocator adds overhead to every allocation.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
	static ALLOC_COUNT: Cell<usize> = const { Cell::new(0) };
	static DEALLOC_COUNT: Cell<usize> = const { Cell::new(0) };
	static BYTES_ALLOCATED: Cell<isize> = const { Cell::new(0) };
	static PEAK_BYTES: Cell<usize> = const { Cell::new(0) };
	static FAIL_NEXT: Cell<bool> = const { Cell::new(false) };
}

/// A tracking allocator that counts allocations and deallocations.
///
/// This wraps the system allocator and updates the calling thread's counters
/// on each allocation operation.
pub struct TrackingAllocator;

/// Consumes a pending failure request, if any.
fn take_failure() -> bool {
	FAIL_NEXT.try_with(|f| f.replace(false)).unwrap_or(false)
}

fn record_alloc(size: usize) {
	let _ = ALLOC_COUNT.try_with(|c| c.set(c.get() + 1));
	grow(size as isize);
}

fn grow(diff: isize) {
	let current = BYTES_ALLOCATED
		.try_with(|b| {
			let current = b.get() + diff;
			b.set(current);
			current
		})
		.unwrap_or(0);
	if current > 0 {
		let _ = PEAK_BYTES.try_with(|p| p.set(p.get().max(current as usize)));
	}
}

unsafe impl GlobalAlloc for TrackingAllocator {
	unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
		if take_failure() {
			return std::ptr::null_mut();
		}
		record_alloc(layout.size());
		System.alloc(layout)
	}

	unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
		let _ = DEALLOC_COUNT.try_with(|c| c.set(c.get() + 1));
		grow(-(layout.size() as isize));
		System.dealloc(ptr, layout)
	}

	unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
		if take_failure() {
			return std::ptr::null_mut();
		}
		record_alloc(layout.size());
		System.alloc_zeroed(layout)
	}

	unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
		if take_failure() {
			return std::ptr::null_mut();
		}
		grow(new_size as isize - layout.size() as isize);
		System.realloc(ptr, layout, new_size)
	}
}

/// Makes the next allocation or reallocation on this thread return null.
///
/// The request stays pending until some allocation consumes it or
/// [`cancel_failure`] is called.
pub fn fail_next_allocation() {
	FAIL_NEXT.with(|f| f.set(true));
}

/// Withdraws a pending [`fail_next_allocation`] request. Returns `true` if one
/// was still pending.
pub fn cancel_failure() -> bool {
	take_failure()
}

/// Resets this thread's allocation counters to zero.
///
/// Call this at the beginning of a test to start fresh counting.
pub fn reset_counters() {
	ALLOC_COUNT.with(|c| c.set(0));
	DEALLOC_COUNT.with(|c| c.set(0));
	BYTES_ALLOCATED.with(|c| c.set(0));
	PEAK_BYTES.with(|c| c.set(0));
}

/// Returns this thread's allocation statistics.
pub fn get_stats() -> AllocationStats {
	AllocationStats {
		alloc_count: ALLOC_COUNT.with(Cell::get),
		dealloc_count: DEALLOC_COUNT.with(Cell::get),
		bytes_allocated: BYTES_ALLOCATED.with(Cell::get),
		peak_bytes: PEAK_BYTES.with(Cell::get),
	}
}

/// Allocation statistics snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AllocationStats {
	/// Total number of allocations since reset.
	pub alloc_count: usize,
	/// Total number of deallocations since reset.
	pub dealloc_count: usize,
	/// Net bytes allocated since reset.
	pub bytes_allocated: isize,
	/// Peak net bytes since reset.
	pub peak_bytes: usize,
}

/// Checks that no memory has been leaked since the last reset.
///
/// # Panics
///
/// Panics if there are unmatched allocations or bytes still allocated.
pub fn check_no_leaks() {
	let stats = get_stats();
	let diff = stats.alloc_count as isize - stats.dealloc_count as isize;

	if diff != 0 {
		panic!(
			"Memory leak detected!\n\
             Allocations: {}\n\
             Deallocations: {}\n\
             Difference: {}\n\
             Bytes still allocated: {}",
			stats.alloc_count, stats.dealloc_count, diff, stats.bytes_allocated
		);
	}

	if stats.bytes_allocated != 0 {
		panic!(
			"Memory leak detected!\n\
             Bytes still allocated: {}\n\
             (alloc_count == dealloc_count but bytes != 0, possible size mismatch)",
			stats.bytes_allocated
		);
	}
}
