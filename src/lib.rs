//! # aatree: An Arena-Backed Andersson Tree
//!
//! This crate provides an ordered container built on an Andersson tree (an
//! "AA tree"), a binary search tree kept balanced by two small rotations, plus
//! a reusable cursor that walks it in either direction.
//!
//! ## Design Overview
//!
//! The balancing scheme follows Arne Andersson's *Balanced Search Trees Made
//! Simple*: each node carries a **level** instead of a colour or height, and
//! two local repairs keep the tree shallow.
//!
//! **Skew**: a low child on the same level as its parent is a forbidden
//! "horizontal" link. A right rotation turns it into a high-side link.
//!
//! **Split**: two consecutive horizontal links on the high side are too long.
//! A left rotation lifts the middle node one level up.
//!
//! ```text
//!   skew:                         split:
//!
//!       L ← T            L → T        T → R → X           R
//!      / \   \    ==>   /   / \      /   /            /   \
//!     A   B   R        A   B   R    A   B            T     X
//!                                                  / \
//!                                                 A   B
//! ```
//!
//! **Sentinel**: slot 0 of the node arena is a level-0 node whose links point
//! at itself. Every absent child links there, so the rotations above never
//! test for a missing child; they compare levels.
//!
//! **Explicit paths**: nodes have no parent links. Insert and erase record the
//! descent in a small inline stack and rewrite child links on the way back up.
//!
//! ## Basic Usage
//!
//! ```
//! use aatree::{AaTree, Direction};
//!
//! let mut tree: AaTree<String> = AaTree::new();
//! for s in ["5", "3", "8", "1", "4"] {
//! 	tree.insert(&s.to_string()).unwrap();
//! }
//!
//! assert_eq!(tree.find(&"3".to_string()).map(String::as_str), Some("3"));
//! tree.erase(&"3".to_string()).unwrap();
//! assert!(tree.find(&"3".to_string()).is_none());
//! assert_eq!(tree.len(), 4);
//!
//! let mut cursor = tree.cursor();
//! let mut seen = Vec::new();
//! let mut item = cursor.begin(&tree, Direction::Forward);
//! while let Some(s) = item {
//! 	seen.push(s.as_str());
//! 	item = cursor.advance(Direction::Forward);
//! }
//! assert_eq!(seen, ["1", "4", "5", "8"]);
//! ```
//!
//! ## Equal Elements
//!
//! The tree is a multiset. Inserting an element equal to one already stored
//! adds a second node; each [`AaTree::erase`] removes one of them.
//!
//! ## Thread Safety
//!
//! None is provided. Mutation takes `&mut self`, and a [`Cursor`] borrows the
//! tree it walks, so mutating a tree under an active cursor does not compile.

use std::cmp::Ordering;
use std::fmt;

use log::trace;
use smallvec::SmallVec;

pub mod alloc;
pub mod error;
pub mod harness;
pub mod iter;
mod node;
pub mod policy;

pub use error::{Error, Result};
pub use iter::{Cursor, Iter};
pub use policy::{FnPolicy, Natural, Policy};

use node::{Arena, NodeId, HIGH, LOW};

// ---------------------------------------------------------------------------
// Configuration Constants
// ---------------------------------------------------------------------------

/// Inline capacity of the descent paths kept by insert, erase and cursors.
///
/// An AA tree over `n` elements is at most about `2 * log2(n)` nodes deep, so
/// 64 covers every tree that fits in memory. Deeper paths spill to the heap.
pub const HEIGHT_LIMIT: usize = 64;

/// Descent path: each visited node with the link index taken out of it.
type Path = SmallVec<[(NodeId, usize); HEIGHT_LIMIT]>;

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// An ordered multiset balanced as an Andersson tree.
///
/// Elements are copied in with [`Policy::duplicate`], ordered with
/// [`Policy::compare`] and handed to [`Policy::release`] when erased or when
/// the tree is cleared or dropped.
pub struct AaTree<T, P: Policy<T> = Natural> {
	arena: Arena<T>,
	root: NodeId,
	len: usize,
	policy: P,
}

/// Direction of a cursor step.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
	/// Toward greater elements.
	Forward,
	/// Toward lesser elements.
	Reverse,
}

impl Direction {
	/// The other direction.
	pub fn opposite(self) -> Direction {
		match self {
			Direction::Forward => Direction::Reverse,
			Direction::Reverse => Direction::Forward,
		}
	}

	/// Child link followed when stepping this way.
	#[inline]
	pub(crate) fn link(self) -> usize {
		match self {
			Direction::Forward => HIGH,
			Direction::Reverse => LOW,
		}
	}
}

impl<T: Ord + Clone> AaTree<T, Natural> {
	/// Creates an empty tree ordered by `Ord` that stores clones.
	///
	/// # Example
	///
	/// ```
	/// use aatree::AaTree;
	///
	/// let tree: AaTree<i32> = AaTree::new();
	/// assert!(tree.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::with_policy(Natural)
	}
}

impl<T: Ord + Clone> Default for AaTree<T, Natural> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T, C, D, R> AaTree<T, FnPolicy<C, D, R>>
where
	C: Fn(&T, &T) -> Ordering,
	D: Fn(&T) -> T,
	R: Fn(T),
{
	/// Creates an empty tree from a compare, duplicate and release function.
	///
	/// Fails only if the sentinel cannot be allocated.
	pub fn from_fns(compare: C, duplicate: D, release: R) -> Result<Self> {
		Self::try_with_policy(FnPolicy::new(compare, duplicate, release))
	}
}

impl<T, P: Policy<T>> AaTree<T, P> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates an empty tree driven by `policy`.
	pub fn with_policy(policy: P) -> Self {
		AaTree {
			arena: Arena::new(),
			root: NodeId::NIL,
			len: 0,
			policy,
		}
	}

	/// Creates an empty tree driven by `policy`, reporting allocation failure
	/// instead of aborting.
	pub fn try_with_policy(policy: P) -> Result<Self> {
		Ok(AaTree {
			arena: Arena::try_new()?,
			root: NodeId::NIL,
			len: 0,
			policy,
		})
	}

	/// The policy this tree was built with.
	pub fn policy(&self) -> &P {
		&self.policy
	}

	// -----------------------------------------------------------------------
	// Size Operations
	// -----------------------------------------------------------------------

	/// Number of stored elements, equal ones counted separately.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the tree stores nothing.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of nodes on the longest root-to-leaf path; 0 when empty.
	pub fn height(&self) -> usize {
		self.depth(self.root)
	}

	fn depth(&self, id: NodeId) -> usize {
		if id.is_nil() {
			return 0;
		}
		1 + self.depth(self.arena.link(id, LOW)).max(self.depth(self.arena.link(id, HIGH)))
	}

	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Returns the stored element equal to `probe`.
	///
	/// The reference points at the tree's own copy, not at `probe`. With equal
	/// elements stored more than once, the first one met on the way down is
	/// returned.
	///
	/// # Example
	///
	/// ```
	/// use aatree::AaTree;
	///
	/// let mut tree: AaTree<i32> = AaTree::new();
	/// tree.insert(&7).unwrap();
	///
	/// assert_eq!(tree.find(&7), Some(&7));
	/// assert_eq!(tree.find(&8), None);
	/// ```
	pub fn find(&self, probe: &T) -> Option<&T> {
		let mut it = self.root;

		// The sentinel holds no element, which ends the search.
		loop {
			let stored = self.arena.element(it)?;
			it = match self.policy.compare(stored, probe) {
				Ordering::Equal => return Some(stored),
				Ordering::Less => self.arena.link(it, HIGH),
				Ordering::Greater => self.arena.link(it, LOW),
			};
		}
	}

	/// Returns `true` if an element equal to `probe` is stored.
	pub fn contains(&self, probe: &T) -> bool {
		self.find(probe).is_some()
	}

	/// The least element.
	pub fn first(&self) -> Option<&T> {
		self.extreme(LOW)
	}

	/// The greatest element.
	pub fn last(&self) -> Option<&T> {
		self.extreme(HIGH)
	}

	fn extreme(&self, dir: usize) -> Option<&T> {
		let mut it = self.root;
		loop {
			let next = self.arena.link(it, dir);
			if next.is_nil() {
				return self.arena.element(it);
			}
			it = next;
		}
	}

	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Stores a duplicate of `element`.
	///
	/// Equal elements are kept side by side rather than replaced.
	///
	/// # Errors
	///
	/// [`Error::AllocationFailure`] if no node slot could be reserved. The
	/// tree is untouched in that case: the slot is reserved before the descent
	/// starts and before `duplicate` is called.
	///
	/// # Example
	///
	/// ```
	/// use aatree::AaTree;
	///
	/// let mut tree: AaTree<&str> = AaTree::new();
	/// tree.insert(&"7").unwrap();
	/// tree.insert(&"7").unwrap();
	/// assert_eq!(tree.len(), 2);
	/// ```
	pub fn insert(&mut self, element: &T) -> Result<()> {
		self.arena.reserve_slot()?;

		// Find the attachment point, remembering the way down. Ties go low.
		let mut path = Path::new();
		let mut it = self.root;
		while let Some(stored) = self.arena.element(it) {
			let dir = match self.policy.compare(stored, element) {
				Ordering::Less => HIGH,
				Ordering::Equal | Ordering::Greater => LOW,
			};
			path.push((it, dir));
			it = self.arena.link(it, dir);
		}

		let node = self.arena.attach(self.policy.duplicate(element));
		self.relink(&path, node);

		// Walk back up and rebalance
		for top in (0..path.len()).rev() {
			let (mut up, _) = path[top];
			up = self.skew(up);
			up = self.split(up);
			self.relink(&path[..top], up);
		}

		self.len += 1;
		Ok(())
	}

	// -----------------------------------------------------------------------
	// Erasure
	// -----------------------------------------------------------------------

	/// Removes one element equal to `probe` and releases it.
	///
	/// # Errors
	///
	/// [`Error::NotFound`] if nothing equal to `probe` is stored; the tree is
	/// unchanged.
	///
	/// # Example
	///
	/// ```
	/// use aatree::{AaTree, Error};
	///
	/// let mut tree: AaTree<i32> = AaTree::new();
	/// tree.insert(&1).unwrap();
	///
	/// assert!(tree.erase(&1).is_ok());
	/// assert!(matches!(tree.erase(&1), Err(Error::NotFound)));
	/// ```
	pub fn erase(&mut self, probe: &T) -> Result<()> {
		let mut path = Path::new();
		let mut it = self.root;
		loop {
			let stored = self.arena.element(it).ok_or(Error::NotFound)?;
			let dir = match self.policy.compare(stored, probe) {
				Ordering::Equal => break,
				Ordering::Less => HIGH,
				Ordering::Greater => LOW,
			};
			path.push((it, dir));
			it = self.arena.link(it, dir);
		}

		let low = self.arena.link(it, LOW);
		let high = self.arena.link(it, HIGH);

		let released = if low.is_nil() || high.is_nil() {
			// At most one real child: splice the node out.
			let child = if low.is_nil() {
				high
			} else {
				low
			};
			self.relink(&path, child);
			self.arena.detach(it)
		} else {
			// Two children: the in-order successor takes the node's place.
			path.push((it, HIGH));
			let mut heir = high;
			loop {
				let next = self.arena.link(heir, LOW);
				if next.is_nil() {
					break;
				}
				path.push((heir, LOW));
				heir = next;
			}

			// The successor has no low child; its high subtree moves up.
			let heir_high = self.arena.link(heir, HIGH);
			self.relink(&path, heir_high);

			let moved = self.arena.detach(heir);
			std::mem::replace(&mut self.arena.get_mut(it).element, moved)
		};

		// Walk back up and rebalance. Order is important: each skew and split
		// assumes the links below it have already been normalized.
		for top in (0..path.len()).rev() {
			let (mut up, _) = path[top];
			let level = self.arena.level(up);

			if self.arena.level(self.arena.link(up, LOW)) + 1 < level
				|| self.arena.level(self.arena.link(up, HIGH)) + 1 < level
			{
				let level = level - 1;
				self.arena.get_mut(up).level = level;
				let high = self.arena.link(up, HIGH);
				if self.arena.level(high) > level {
					self.arena.get_mut(high).level = level;
				}

				up = self.skew(up);
				self.skew_high(up);
				let high = self.arena.link(up, HIGH);
				self.skew_high(high);
				up = self.split(up);
				self.split_high(up);
			}

			self.relink(&path[..top], up);
		}

		self.len -= 1;
		if let Some(element) = released {
			self.policy.release(element);
		}
		Ok(())
	}

	// -----------------------------------------------------------------------
	// Destruction
	// -----------------------------------------------------------------------

	/// Releases every element, leaving an empty tree.
	///
	/// The tree is dismantled by rotation: while the current node has a low
	/// child, that child is rotated above it; once it has none, the node is
	/// released and the walk continues with its high child. No recursion and
	/// no stack are needed, and elements are released in ascending order.
	pub fn clear(&mut self) {
		let mut it = self.root;
		let mut released = 0usize;

		while !it.is_nil() {
			let low = self.arena.link(it, LOW);
			it = if low.is_nil() {
				let next = self.arena.link(it, HIGH);
				if let Some(element) = self.arena.get_mut(it).element.take() {
					self.policy.release(element);
					released += 1;
				}
				next
			} else {
				// Rotate right
				let low_high = self.arena.link(low, HIGH);
				self.arena.set_link(it, LOW, low_high);
				self.arena.set_link(low, HIGH, it);
				low
			};
		}

		self.arena.reset();
		self.root = NodeId::NIL;
		self.len = 0;
		trace!("tree cleared, {released} elements released");
	}

	// -----------------------------------------------------------------------
	// Traversal
	// -----------------------------------------------------------------------

	/// A fresh cursor for this tree's element and policy types.
	///
	/// The cursor borrows this tree for as long as it lives, but is not
	/// positioned until [`Cursor::begin`] is called.
	///
	/// The tree cannot be changed while the cursor is in use:
	///
	/// ```compile_fail
	/// use aatree::{AaTree, Direction};
	///
	/// let mut tree: AaTree<i32> = AaTree::new();
	/// tree.insert(&1).unwrap();
	///
	/// let mut cursor = tree.cursor();
	/// tree.insert(&2).unwrap();
	/// cursor.begin(&tree, Direction::Forward);
	/// ```
	pub fn cursor(&self) -> Cursor<'_, T, P> {
		Cursor::new()
	}

	/// Iterates in ascending order.
	pub fn iter(&self) -> Iter<'_, T, P> {
		Iter::new(self, Direction::Forward)
	}

	/// Iterates in descending order.
	pub fn iter_rev(&self) -> Iter<'_, T, P> {
		Iter::new(self, Direction::Reverse)
	}

	// -----------------------------------------------------------------------
	// Rebalancing Primitives
	// -----------------------------------------------------------------------

	/// Removes a low-side horizontal link by rotating right.
	fn skew(&mut self, t: NodeId) -> NodeId {
		let level = self.arena.level(t);
		let low = self.arena.link(t, LOW);
		if level == 0 || self.arena.level(low) != level {
			return t;
		}

		let low_high = self.arena.link(low, HIGH);
		self.arena.set_link(t, LOW, low_high);
		self.arena.set_link(low, HIGH, t);
		low
	}

	/// Removes two consecutive high-side horizontal links by rotating left
	/// and promoting the middle node.
	fn split(&mut self, t: NodeId) -> NodeId {
		let level = self.arena.level(t);
		let high = self.arena.link(t, HIGH);
		if level == 0 || self.arena.level(self.arena.link(high, HIGH)) != level {
			return t;
		}

		let high_low = self.arena.link(high, LOW);
		self.arena.set_link(t, HIGH, high_low);
		self.arena.set_link(high, LOW, t);
		self.arena.get_mut(high).level += 1;
		high
	}

	/// Skews the high child of `parent` in place.
	fn skew_high(&mut self, parent: NodeId) {
		let child = self.arena.link(parent, HIGH);
		let fixed = self.skew(child);
		if fixed != child {
			self.arena.set_link(parent, HIGH, fixed);
		}
	}

	/// Splits the high child of `parent` in place.
	fn split_high(&mut self, parent: NodeId) {
		let child = self.arena.link(parent, HIGH);
		let fixed = self.split(child);
		if fixed != child {
			self.arena.set_link(parent, HIGH, fixed);
		}
	}

	/// Points the last step of `path` (or the root) at `node`.
	fn relink(&mut self, path: &[(NodeId, usize)], node: NodeId) {
		match path.last() {
			Some(&(parent, dir)) => self.arena.set_link(parent, dir, node),
			None => self.root = node,
		}
	}

	// -----------------------------------------------------------------------
	// Debugging and Validation
	// -----------------------------------------------------------------------

	/// Validates the structural invariants of the tree.
	///
	/// This is intended for testing and debugging. Panics with a descriptive
	/// message on the first violation found.
	///
	/// Checked invariants:
	/// 1. Sentinel intact: level 0, no element, both links to itself
	/// 2. Low links are never horizontal: `level(low) == level - 1`
	/// 3. High links step down by at most one level
	/// 4. No two consecutive horizontal high links
	/// 5. Leaves sit on level 1
	/// 6. In-order sequence is non-decreasing under the policy
	/// 7. `len` matches the number of linked nodes
	pub fn assert_invariants(&self) {
		let sentinel = self.arena.get(NodeId::NIL);
		assert_eq!(sentinel.level, 0, "sentinel level changed");
		assert!(sentinel.element.is_none(), "sentinel holds an element");
		assert_eq!(sentinel.link, [NodeId::NIL; 2], "sentinel links changed");

		let count = self.validate_node_recursive(self.root, None, None);
		assert_eq!(count, self.len, "linked node count {} != len {}", count, self.len);
		assert!(
			count < self.arena.slots(),
			"{} linked nodes cannot fit in {} slots",
			count,
			self.arena.slots()
		);
	}

	/// Validates the subtree under `id`, returning its node count.
	///
	/// `lower` and `upper` are the nearest enclosing elements; every element
	/// in the subtree must lie between them (inclusive, since equal elements
	/// may land on either side after rotations).
	fn validate_node_recursive(&self, id: NodeId, lower: Option<&T>, upper: Option<&T>) -> usize {
		if id.is_nil() {
			return 0;
		}

		let node = self.arena.get(id);
		let element = node.element.as_ref().unwrap_or_else(|| panic!("node {:?} is linked but empty", id));
		let level = node.level;
		let [low, high] = node.link;

		assert!(level >= 1, "node {:?} is linked with level 0", id);
		assert_eq!(
			self.arena.level(low),
			level - 1,
			"node {:?}: low child level {} != {} - 1",
			id,
			self.arena.level(low),
			level
		);
		assert!(
			self.arena.level(high) == level || self.arena.level(high) + 1 == level,
			"node {:?}: high child level {} not within one of {}",
			id,
			self.arena.level(high),
			level
		);
		assert_ne!(
			self.arena.level(self.arena.link(high, HIGH)),
			level,
			"node {:?}: two consecutive horizontal links",
			id
		);
		if low.is_nil() && high.is_nil() {
			assert_eq!(level, 1, "leaf {:?} has level {}", id, level);
		}

		if let Some(lower) = lower {
			assert_ne!(
				self.policy.compare(lower, element),
				Ordering::Greater,
				"node {:?} orders before its lower bound",
				id
			);
		}
		if let Some(upper) = upper {
			assert_ne!(
				self.policy.compare(element, upper),
				Ordering::Greater,
				"node {:?} orders after its upper bound",
				id
			);
		}

		1 + self.validate_node_recursive(low, lower, Some(element))
			+ self.validate_node_recursive(high, Some(element), upper)
	}
}

impl<T, P: Policy<T>> Drop for AaTree<T, P> {
	fn drop(&mut self) {
		self.clear();
	}
}

impl<T: fmt::Debug, P: Policy<T>> fmt::Debug for AaTree<T, P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl<'t, T, P: Policy<T>> IntoIterator for &'t AaTree<T, P> {
	type Item = &'t T;
	type IntoIter = Iter<'t, T, P>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
