//! Ordering and lifecycle policies.
//!
//! A tree never looks inside its elements. Everything it needs to know is
//! supplied by a [`Policy`]: how two elements order, how to make the copy the
//! tree will own, and what to do with that copy once the tree is finished with
//! it.

use std::cmp::Ordering;
use std::fmt;

/// The three user-supplied operations that parameterize a tree.
pub trait Policy<T> {
	/// Orders two elements. Only the part of the element this inspects acts as
	/// its key.
	fn compare(&self, a: &T, b: &T) -> Ordering;

	/// Produces the copy the tree stores for a caller-supplied element.
	fn duplicate(&self, element: &T) -> T;

	/// Disposes of a stored copy on erase or teardown.
	fn release(&self, element: T) {
		drop(element);
	}
}

/// `Ord` ordering, `Clone` duplication and plain drop on release.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + Clone> Policy<T> for Natural {
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		a.cmp(b)
	}

	#[inline]
	fn duplicate(&self, element: &T) -> T {
		element.clone()
	}
}

/// A policy assembled from three closures.
///
/// # Example
///
/// ```
/// use aatree::policy::FnPolicy;
/// use aatree::AaTree;
///
/// // Order strings by length only.
/// let policy = FnPolicy::new(
/// 	|a: &String, b: &String| a.len().cmp(&b.len()),
/// 	|s: &String| s.clone(),
/// 	|s: String| drop(s),
/// );
/// let mut tree = AaTree::with_policy(policy);
/// tree.insert(&"abc".to_string()).unwrap();
/// assert_eq!(tree.find(&"xyz".to_string()).map(String::as_str), Some("abc"));
/// ```
#[derive(Clone)]
pub struct FnPolicy<C, D, R> {
	compare: C,
	duplicate: D,
	release: R,
}

impl<C, D, R> FnPolicy<C, D, R> {
	/// Bundles a compare, duplicate and release function into a policy.
	pub fn new(compare: C, duplicate: D, release: R) -> Self {
		FnPolicy {
			compare,
			duplicate,
			release,
		}
	}
}

impl<T, C, D, R> Policy<T> for FnPolicy<C, D, R>
where
	C: Fn(&T, &T) -> Ordering,
	D: Fn(&T) -> T,
	R: Fn(T),
{
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		(self.compare)(a, b)
	}

	#[inline]
	fn duplicate(&self, element: &T) -> T {
		(self.duplicate)(element)
	}

	#[inline]
	fn release(&self, element: T) {
		(self.release)(element)
	}
}

impl<C, D, R> fmt::Debug for FnPolicy<C, D, R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FnPolicy").finish_non_exhaustive()
	}
}
