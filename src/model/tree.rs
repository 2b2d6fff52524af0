/* src/model/tree.rs */

use super::ClassId;

/// Index of a component inside a [`ComponentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
	class: ClassId,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// Arena holding the live component tree of a UI.
///
/// The root node is the UI itself. Detached subtrees leave vacant slots
/// behind; ids are never reused.
#[derive(Debug, Clone)]
pub struct ComponentTree {
	nodes: Vec<Option<Node>>,
}

impl ComponentTree {
	pub fn new(root_class: ClassId) -> Self {
		Self {
			nodes: vec![Some(Node {
				class: root_class,
				parent: None,
				children: Vec::new(),
			})],
		}
	}

	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Appends a new component of `class` under `parent`.
	///
	/// Returns `None` if `parent` is no longer part of the tree.
	pub fn add_child(&mut self, parent: NodeId, class: ClassId) -> Option<NodeId> {
		self.node(parent)?;
		let id = NodeId(self.nodes.len());
		self.nodes.push(Some(Node {
			class,
			parent: Some(parent),
			children: Vec::new(),
		}));
		if let Some(Some(node)) = self.nodes.get_mut(parent.0) {
			node.children.push(id);
		}
		Some(id)
	}

	/// Detaches `node` and its whole subtree. The root cannot be removed.
	pub fn remove(&mut self, node: NodeId) -> bool {
		if node == self.root() || self.node(node).is_none() {
			return false;
		}
		if let Some(parent) = self.parent(node)
			&& let Some(Some(parent)) = self.nodes.get_mut(parent.0)
		{
			parent.children.retain(|child| *child != node);
		}
		let mut pending = vec![node];
		while let Some(current) = pending.pop() {
			if let Some(slot) = self.nodes.get_mut(current.0)
				&& let Some(removed) = slot.take()
			{
				pending.extend(removed.children);
			}
		}
		true
	}

	pub fn contains(&self, node: NodeId) -> bool {
		self.node(node).is_some()
	}

	pub fn class_of(&self, node: NodeId) -> Option<&ClassId> {
		self.node(node).map(|n| &n.class)
	}

	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.node(node).and_then(|n| n.parent)
	}

	pub fn children(&self, node: NodeId) -> &[NodeId] {
		self.node(node).map(|n| n.children.as_slice()).unwrap_or_default()
	}

	/// Depth-first iterator over the descendants of `node`, excluding `node`.
	pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
		let mut stack: Vec<NodeId> = self.children(node).to_vec();
		stack.reverse();
		Descendants { tree: self, stack }
	}

	fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.0).and_then(Option::as_ref)
	}
}

pub struct Descendants<'a> {
	tree: &'a ComponentTree,
	stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let next = self.stack.pop()?;
		self.stack.extend(self.tree.children(next).iter().rev());
		Some(next)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_descendants_depth_first() {
		let mut tree = ComponentTree::new(ClassId::new("UI"));
		let root = tree.root();
		let a = tree.add_child(root, ClassId::new("A")).unwrap();
		let a1 = tree.add_child(a, ClassId::new("A1")).unwrap();
		let b = tree.add_child(root, ClassId::new("B")).unwrap();

		let order: Vec<NodeId> = tree.descendants(root).collect();
		assert_eq!(order, vec![a, a1, b]);
		assert_eq!(tree.parent(a1), Some(a));
	}

	#[test]
	fn test_remove_detaches_subtree() {
		let mut tree = ComponentTree::new(ClassId::new("UI"));
		let root = tree.root();
		let a = tree.add_child(root, ClassId::new("A")).unwrap();
		let a1 = tree.add_child(a, ClassId::new("A1")).unwrap();

		assert!(tree.remove(a));
		assert!(!tree.contains(a1));
		assert!(tree.children(root).is_empty());
		assert!(tree.add_child(a, ClassId::new("late")).is_none());
		assert!(!tree.remove(root));
	}
}
