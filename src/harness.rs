//! Randomized conformance checking for ordered and hashed containers.
//!
//! A [`Container`] stores strings and answers membership queries. The
//! [`Conformance`] driver picks random indices into a fixed universe of
//! numeric strings, asks the container whether each is present, checks the
//! answer against a truth array, and then toggles the element: removing it if
//! present, inserting it if not. Halfway through, the container's resize hook
//! is invoked once.
//!
//! Any disagreement stops the run with a [`ConformanceError`] whose
//! [`exit_code`](ConformanceError::exit_code) tells the failure kinds apart.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ConformanceError;
use crate::{AaTree, Policy};

/// Membership interface shared by every container the harness can drive.
pub trait Container {
	/// Name used in reports.
	fn name(&self) -> &'static str;

	/// Stores `item`, returning `false` if the container could not.
	fn insert_item(&mut self, item: &str) -> bool;

	/// Removes one `item`, returning `false` if it was not present.
	fn remove_item(&mut self, item: &str) -> bool;

	/// Returns `true` if `item` is present.
	fn lookup_item(&self, item: &str) -> bool;

	/// Grows the container's backing storage. Containers without one succeed
	/// without doing anything.
	fn resize(&mut self) -> bool {
		true
	}
}

impl<P: Policy<String>> Container for AaTree<String, P> {
	fn name(&self) -> &'static str {
		"test-atree"
	}

	fn insert_item(&mut self, item: &str) -> bool {
		self.insert(&item.to_owned()).is_ok()
	}

	fn remove_item(&mut self, item: &str) -> bool {
		self.erase(&item.to_owned()).is_ok()
	}

	fn lookup_item(&self, item: &str) -> bool {
		self.contains(&item.to_owned())
	}
}

/// Parameters of one conformance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conformance {
	/// Size of the element universe; elements are `"0"` to `"members - 1"`.
	pub members: usize,
	/// Number of lookup-and-toggle steps.
	pub steps: usize,
	/// The resize hook runs right after this step.
	pub resize_at: usize,
	/// Seed for the index generator.
	pub seed: u64,
}

impl Default for Conformance {
	fn default() -> Self {
		Conformance {
			members: 2048,
			steps: 2 * 2048,
			resize_at: 2048,
			seed: 0,
		}
	}
}

/// Summary of a passing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
	/// Steps executed.
	pub steps: usize,
	/// Insertions performed.
	pub inserts: usize,
	/// Removals performed.
	pub removes: usize,
	/// Elements the truth array holds at the end.
	pub present: usize,
}

impl Conformance {
	/// Same parameters with a different seed.
	pub fn with_seed(self, seed: u64) -> Self {
		Conformance {
			seed,
			..self
		}
	}

	/// Drives `container` through the configured steps.
	///
	/// The container is expected to start empty.
	pub fn run<C: Container>(&self, container: &mut C) -> Result<Report, ConformanceError> {
		let name = container.name();
		let mut rng = StdRng::seed_from_u64(self.seed);
		let mut members = vec![false; self.members];
		let mut report = Report {
			steps: 0,
			inserts: 0,
			removes: 0,
			present: 0,
		};

		info!("{name}: seed = {}", self.seed);
		if self.members == 0 {
			return Ok(report);
		}

		for step in 0..self.steps {
			let index = rng.random_range(0..self.members);
			let item = index.to_string();

			let found = container.lookup_item(&item);
			if found != members[index] {
				return Err(ConformanceError::Mismatch {
					name,
					step,
					index,
					found,
					expected: members[index],
				});
			}

			let (ok, operation) = if found {
				report.removes += 1;
				(container.remove_item(&item), "remove")
			} else {
				report.inserts += 1;
				(container.insert_item(&item), "insert")
			};
			if !ok {
				return Err(ConformanceError::OperationFailed {
					name,
					step,
					index,
					operation,
				});
			}

			members[index] = !members[index];
			report.steps += 1;

			if step == self.resize_at {
				debug!("{name}: resizing after step {step}");
				if !container.resize() {
					return Err(ConformanceError::ResizeFailed {
						name,
					});
				}
			}
		}

		report.present = members.iter().filter(|&&m| m).count();
		info!(
			"{name}: {} steps, {} inserts, {} removes, {} present",
			report.steps, report.inserts, report.removes, report.present
		);
		Ok(report)
	}
}
