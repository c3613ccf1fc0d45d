//! Arena storage for tree nodes.
//!
//! Nodes live in a `Vec` and refer to each other by index. Slot 0 is the
//! sentinel: level 0, no element, both links pointing back at itself. Every
//! "missing child" in the tree is a link to slot 0, so the rebalancing code
//! never branches on absence; it compares levels instead.
//!
//! Freed slots are chained through their low link into a free list headed by
//! [`Arena::free`]. The chain is terminated by the sentinel, so popping from an
//! empty list is the same check as reaching the bottom of the tree.

use crate::error;

/// Index of the low (lesser) child link.
pub(crate) const LOW: usize = 0;
/// Index of the high (greater) child link.
pub(crate) const HIGH: usize = 1;

/// Stable handle to an arena slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

impl NodeId {
	/// The sentinel slot.
	pub(crate) const NIL: NodeId = NodeId(0);

	#[inline]
	pub(crate) fn is_nil(self) -> bool {
		self == NodeId::NIL
	}
}

pub(crate) struct Node<T> {
	/// Horizontal level; 0 only for the sentinel and for free slots.
	pub(crate) level: usize,
	/// `None` only for the sentinel and for free slots.
	pub(crate) element: Option<T>,
	pub(crate) link: [NodeId; 2],
}

impl<T> Node<T> {
	fn sentinel() -> Self {
		Node {
			level: 0,
			element: None,
			link: [NodeId::NIL; 2],
		}
	}
}

pub(crate) struct Arena<T> {
	nodes: Vec<Node<T>>,
	/// Head of the free-slot chain.
	free: NodeId,
}

impl<T> Arena<T> {
	pub(crate) fn new() -> Self {
		Arena {
			nodes: vec![Node::sentinel()],
			free: NodeId::NIL,
		}
	}

	/// Creates an arena holding only the sentinel, reporting allocation
	/// failure instead of aborting.
	pub(crate) fn try_new() -> error::Result<Self> {
		let mut nodes = Vec::new();
		nodes.try_reserve_exact(1)?;
		nodes.push(Node::sentinel());
		Ok(Arena {
			nodes,
			free: NodeId::NIL,
		})
	}

	#[inline]
	pub(crate) fn get(&self, id: NodeId) -> &Node<T> {
		&self.nodes[id.0]
	}

	#[inline]
	pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<T> {
		debug_assert!(!id.is_nil(), "the sentinel is never mutated");
		&mut self.nodes[id.0]
	}

	#[inline]
	pub(crate) fn level(&self, id: NodeId) -> usize {
		self.nodes[id.0].level
	}

	#[inline]
	pub(crate) fn link(&self, id: NodeId, dir: usize) -> NodeId {
		self.nodes[id.0].link[dir]
	}

	#[inline]
	pub(crate) fn set_link(&mut self, id: NodeId, dir: usize, child: NodeId) {
		self.get_mut(id).link[dir] = child;
	}

	/// The element stored in a linked node, `None` for the sentinel.
	#[inline]
	pub(crate) fn element(&self, id: NodeId) -> Option<&T> {
		self.nodes[id.0].element.as_ref()
	}

	/// Makes sure a following [`Arena::attach`] cannot allocate.
	///
	/// Nothing observable changes if this fails.
	pub(crate) fn reserve_slot(&mut self) -> error::Result<()> {
		if self.free.is_nil() {
			self.nodes.try_reserve(1)?;
		}
		Ok(())
	}

	/// Places `element` in a fresh level-1 leaf and returns its handle.
	///
	/// Must be preceded by a successful [`Arena::reserve_slot`].
	pub(crate) fn attach(&mut self, element: T) -> NodeId {
		let node = Node {
			level: 1,
			element: Some(element),
			link: [NodeId::NIL; 2],
		};

		if self.free.is_nil() {
			self.nodes.push(node);
			NodeId(self.nodes.len() - 1)
		} else {
			let id = self.free;
			self.free = self.nodes[id.0].link[LOW];
			self.nodes[id.0] = node;
			id
		}
	}

	/// Returns a slot to the free chain, handing back whatever element it
	/// still holds.
	pub(crate) fn detach(&mut self, id: NodeId) -> Option<T> {
		let free = self.free;
		let node = self.get_mut(id);
		let element = node.element.take();
		node.level = 0;
		node.link = [free, NodeId::NIL];
		self.free = id;
		element
	}

	/// Drops every slot except the sentinel. Elements must already have been
	/// taken out.
	pub(crate) fn reset(&mut self) {
		self.nodes.truncate(1);
		self.free = NodeId::NIL;
	}

	/// Number of slots, sentinel and free slots included.
	pub(crate) fn slots(&self) -> usize {
		self.nodes.len()
	}
}
