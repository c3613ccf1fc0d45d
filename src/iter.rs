//! Cursors and iterators for the `AaTree` data structure
use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::node::NodeId;
use crate::{AaTree, Direction, Natural, Policy, HEIGHT_LIMIT};

/// A reusable, bidirectional position in a tree.
///
/// A cursor is created unbound and attached to a tree by [`Cursor::begin`].
/// It keeps the chain of ancestors above its current node on an explicit
/// stack, so stepping never needs parent links or recursion. Calling `begin`
/// again, on the same tree or another, starts a new walk.
///
/// The cursor borrows the tree for `'t`, so the tree cannot be mutated while
/// the cursor is alive.
///
/// # Example
///
/// ```
/// use aatree::{AaTree, Cursor, Direction};
///
/// let mut tree: AaTree<i32> = AaTree::new();
/// for i in [2, 1, 3] {
/// 	tree.insert(&i).unwrap();
/// }
///
/// let mut cursor = Cursor::new();
/// assert_eq!(cursor.begin(&tree, Direction::Reverse), Some(&3));
/// assert_eq!(cursor.advance(Direction::Reverse), Some(&2));
/// assert_eq!(cursor.advance(Direction::Reverse), Some(&1));
/// assert_eq!(cursor.advance(Direction::Reverse), None);
/// ```
pub struct Cursor<'t, T, P: Policy<T> = Natural> {
	tree: Option<&'t AaTree<T, P>>,
	it: NodeId,
	path: SmallVec<[NodeId; HEIGHT_LIMIT]>,
}

impl<'t, T, P: Policy<T>> Cursor<'t, T, P> {
	/// Creates a cursor that is not bound to any tree.
	pub fn new() -> Self {
		Cursor {
			tree: None,
			it: NodeId::NIL,
			path: SmallVec::new(),
		}
	}

	/// Binds the cursor to `tree` and moves it to the first element in
	/// `direction`: the least for [`Direction::Forward`], the greatest for
	/// [`Direction::Reverse`].
	///
	/// Returns `None` if the tree is empty.
	pub fn begin(&mut self, tree: &'t AaTree<T, P>, direction: Direction) -> Option<&'t T> {
		let arena = &tree.arena;
		let toward = direction.opposite().link();

		self.tree = Some(tree);
		self.path.clear();
		self.it = tree.root;

		// Build a path to work with
		loop {
			let next = arena.link(self.it, toward);
			if next.is_nil() {
				break;
			}
			self.path.push(self.it);
			self.it = next;
		}

		arena.element(self.it)
	}

	/// Moves one element in `direction` and returns it.
	///
	/// Returns `None` once the walk runs off the end, and keeps returning
	/// `None` until the cursor is restarted with [`Cursor::begin`].
	pub fn advance(&mut self, direction: Direction) -> Option<&'t T> {
		let arena = &self.tree?.arena;
		let dir = direction.link();
		let back = direction.opposite().link();

		let next = arena.link(self.it, dir);
		if !next.is_nil() {
			// Continue down this branch
			self.path.push(self.it);
			self.it = next;
			loop {
				let next = arena.link(self.it, back);
				if next.is_nil() {
					break;
				}
				self.path.push(self.it);
				self.it = next;
			}
		} else {
			// Climb until we arrive from the other side
			loop {
				let Some(parent) = self.path.pop() else {
					self.it = NodeId::NIL;
					break;
				};
				let last = std::mem::replace(&mut self.it, parent);
				if arena.link(parent, dir) != last {
					break;
				}
			}
		}

		arena.element(self.it)
	}

	/// The element under the cursor, `None` when unbound or past the end.
	pub fn current(&self) -> Option<&'t T> {
		self.tree?.arena.element(self.it)
	}
}

impl<T, P: Policy<T>> Default for Cursor<'_, T, P> {
	fn default() -> Self {
		Self::new()
	}
}

/// An iterator over a tree's elements in one direction.
///
/// Created by [`AaTree::iter`] and [`AaTree::iter_rev`].
pub struct Iter<'t, T, P: Policy<T> = Natural> {
	tree: &'t AaTree<T, P>,
	cursor: Cursor<'t, T, P>,
	direction: Direction,
	started: bool,
	remaining: usize,
}

impl<'t, T, P: Policy<T>> Iter<'t, T, P> {
	pub(crate) fn new(tree: &'t AaTree<T, P>, direction: Direction) -> Self {
		Iter {
			tree,
			cursor: Cursor::new(),
			direction,
			started: false,
			remaining: tree.len(),
		}
	}
}

impl<'t, T, P: Policy<T>> Iterator for Iter<'t, T, P> {
	type Item = &'t T;

	fn next(&mut self) -> Option<&'t T> {
		let item = if self.started {
			self.cursor.advance(self.direction)
		} else {
			self.started = true;
			self.cursor.begin(self.tree, self.direction)
		};
		if item.is_some() {
			self.remaining = self.remaining.saturating_sub(1);
		}
		item
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<T, P: Policy<T>> ExactSizeIterator for Iter<'_, T, P> {}

impl<T, P: Policy<T>> FusedIterator for Iter<'_, T, P> {}
