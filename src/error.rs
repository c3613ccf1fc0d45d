//! # Error Types for the Andersson Tree
//!
//! The engine reports exactly two failure kinds, both as values:
//!
//! - [`Error::AllocationFailure`]: a node slot could not be reserved. The tree
//!   is left exactly as it was before the call.
//! - [`Error::NotFound`]: an erase found no element equal to the probe. This is
//!   an ordinary outcome, not a fault.
//!
//! ## Error Flow
//!
//! ```text
//! insert(element)
//!      │
//!      ▼
//! Reserve node slot ───────► Err(AllocationFailure)   (nothing linked yet)
//!      │
//!      ▼ (Ok)
//! Link + rebalance path
//!      │
//!      ▼
//! Ok(())
//! ```
//!
//! The conformance harness has its own error type, [`ConformanceError`], whose
//! variants map onto distinct process exit codes.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors returned by tree operations.
#[derive(Error, Debug)]
pub enum Error {
	/// The arena could not grow to hold a new node.
	///
	/// No link has been touched when this is returned, so the caller may retry
	/// or give up freely.
	#[error("failed to allocate a tree node: {0}")]
	AllocationFailure(#[from] TryReserveError),

	/// No stored element compares equal to the probe.
	#[error("no element equal to the probe")]
	NotFound,
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures detected by [`crate::harness::Conformance::run`].
///
/// Each variant corresponds to one exit status of the conformance binary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConformanceError {
	/// The container under test could not be created.
	#[error("{name}: failed to allocate container")]
	Allocation {
		/// Container name.
		name: &'static str,
	},

	/// A lookup disagreed with the truth array.
	#[error("{name}: step {step}, index {index}: was {found} but should have been {expected}")]
	Mismatch {
		/// Container name.
		name: &'static str,
		/// Zero-based step number.
		step: usize,
		/// Index into the truth array.
		index: usize,
		/// What the container reported.
		found: bool,
		/// What the truth array holds.
		expected: bool,
	},

	/// An insert or remove reported failure where the truth array said it
	/// must succeed.
	#[error("{name}: step {step}, index {index}: failed to {operation}")]
	OperationFailed {
		/// Container name.
		name: &'static str,
		/// Zero-based step number.
		step: usize,
		/// Index into the truth array.
		index: usize,
		/// `"insert"` or `"remove"`.
		operation: &'static str,
	},

	/// The mid-run resize hook reported failure.
	#[error("{name}: failed to resize container")]
	ResizeFailed {
		/// Container name.
		name: &'static str,
	},
}

impl ConformanceError {
	/// Process exit status for this failure.
	pub fn exit_code(&self) -> i32 {
		match self {
			ConformanceError::Allocation { .. } => 1,
			ConformanceError::Mismatch { .. } => 2,
			ConformanceError::OperationFailed { .. } => 3,
			ConformanceError::ResizeFailed { .. } => 4,
		}
	}
}
