/* src/hotswap/walker.rs */

//!
//! Collects the component classes currently in play for a UI.

use std::collections::HashMap;

use crate::model::{ClassId, NodeId, RouteRegistry, Ui};

/// Part of the UI a class in play belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placement {
	/// The route component or one of its descendants.
	Route,
	/// A layout of the router chain, mounted or assigned by the registry.
	Layout,
	/// A modal subtree attached outside the router chain.
	Modal,
}

/// Classes in play for one UI, each tagged with where it lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InPlay {
	route: Option<ClassId>,
	entries: Vec<(ClassId, Placement)>,
}

impl InPlay {
	/// True for a UI that has not navigated anywhere.
	pub fn is_empty(&self) -> bool {
		self.route.is_none()
	}

	pub fn route(&self) -> Option<&ClassId> {
		self.route.as_ref()
	}

	pub fn entries(&self) -> &[(ClassId, Placement)] {
		&self.entries
	}

	pub fn classes_at(&self, placement: Placement) -> impl Iterator<Item = &ClassId> {
		self.entries
			.iter()
			.filter(move |(_, at)| *at == placement)
			.map(|(class, _)| class)
	}

	pub fn contains(&self, class: &ClassId) -> bool {
		self.entries.iter().any(|(entry, _)| entry == class)
	}

	fn push(&mut self, class: ClassId, placement: Placement) {
		if !self.entries.iter().any(|(c, p)| *c == class && *p == placement) {
			self.entries.push((class, placement));
		}
	}
}

/// Walks `ui` and the route registry entry for its location.
pub fn walk(ui: &Ui, routes: &RouteRegistry) -> InPlay {
	let Some(route_node) = ui.route_node() else {
		return InPlay::default();
	};
	let tree = ui.tree();

	let mut owners: HashMap<NodeId, Placement> = HashMap::new();
	owners.insert(route_node, Placement::Route);
	for layout in &ui.active_chain()[1..] {
		owners.insert(*layout, Placement::Layout);
	}
	for modal in ui.modals() {
		owners.insert(*modal, Placement::Modal);
	}

	let mut in_play = InPlay {
		route: tree.class_of(route_node).cloned(),
		entries: Vec::new(),
	};

	for node in tree.descendants(tree.root()) {
		let Some(placement) = owner_of(ui, &owners, node) else {
			continue;
		};
		if let Some(class) = tree.class_of(node) {
			in_play.push(class.clone(), placement);
		}
	}

	if let Some(path) = ui.location() {
		for layout in registered_layouts(routes, path) {
			in_play.push(layout, Placement::Layout);
		}
	}

	in_play
}

/// Nearest chain item or modal at or above `node`. Components attached
/// straight to the UI root outside the chain are not in play.
fn owner_of(ui: &Ui, owners: &HashMap<NodeId, Placement>, node: NodeId) -> Option<Placement> {
	let tree = ui.tree();
	let mut current = Some(node);
	while let Some(candidate) = current {
		if let Some(placement) = owners.get(&candidate) {
			return Some(*placement);
		}
		current = tree.parent(candidate);
	}
	None
}

/// Layouts the registry currently assigns to `path`.
///
/// These may differ from the mounted chain when a layout was registered
/// or reassigned after the UI navigated.
fn registered_layouts(routes: &RouteRegistry, path: &str) -> Vec<ClassId> {
	let Some(target) = routes.route_target(path) else {
		return Vec::new();
	};
	if !target.parent_layouts.is_empty() {
		return target.parent_layouts;
	}
	if target.auto_layout && routes.has_layout(path) {
		return routes.layout_chain(path);
	}
	Vec::new()
}
