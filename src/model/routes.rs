/* src/model/routes.rs */

//!
//! Route and layout registrations, populated at application assembly time.

use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::RwLock;

use super::ClassId;

/// A route registration: the navigation target and its explicit layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
	pub target: ClassId,
	/// Explicit parent layouts, innermost first.
	pub parent_layouts: Vec<ClassId>,
	/// Whether an automatic layout may be applied when no explicit layout is set.
	pub auto_layout: bool,
}

/// Layout chain resolved for a navigation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
	pub target: ClassId,
	/// Layouts wrapping the target, innermost first.
	pub layouts: Vec<ClassId>,
	/// True when `layouts` comes from an automatic layout registration.
	pub auto_layout: bool,
}

#[derive(Debug, Clone)]
struct LayoutEntry {
	class: ClassId,
	path: String,
}

#[derive(Debug, Default)]
struct RegistryState {
	routes: BTreeMap<String, RouteTarget>,
	layouts: Vec<LayoutEntry>,
	parents: HashMap<ClassId, ClassId>,
	/// Generation at which a class first appeared as a route target or layout.
	first_registered: HashMap<ClassId, u64>,
	generation: u64,
}

impl RegistryState {
	fn bump(&mut self, classes: impl IntoIterator<Item = ClassId>) {
		self.generation += 1;
		let generation = self.generation;
		for class in classes {
			self.first_registered.entry(class).or_insert(generation);
		}
	}

	fn layout_for(&self, path: &str) -> Option<&LayoutEntry> {
		let path = normalize(path);
		self.layouts
			.iter()
			.filter(|entry| path_matches(&entry.path, &path))
			.max_by_key(|entry| entry.path.len())
	}

	fn parent_chain(&self, layout: &ClassId) -> Vec<ClassId> {
		let mut chain = vec![layout.clone()];
		let mut seen: HashSet<ClassId> = HashSet::from([layout.clone()]);
		let mut current = layout;
		while let Some(parent) = self.parents.get(current) {
			if !seen.insert(parent.clone()) {
				break;
			}
			chain.push(parent.clone());
			current = parent;
		}
		chain
	}
}

/// Queryable route/layout registry shared by all UIs of a service.
///
/// Every mutation bumps the registry generation; the generation at which a
/// class was first registered tells a first-time registration apart from a
/// change to an already known route or layout.
#[derive(Debug, Default)]
pub struct RouteRegistry {
	state: RwLock<RegistryState>,
}

impl RouteRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers (or replaces) a route with an explicit parent layout list.
	pub fn set_route(&self, path: &str, target: ClassId, parent_layouts: Vec<ClassId>) {
		let mut state = self.state.write();
		let mut classes = parent_layouts.clone();
		classes.push(target.clone());
		state.routes.insert(
			normalize(path),
			RouteTarget {
				target,
				parent_layouts,
				auto_layout: true,
			},
		);
		state.bump(classes);
	}

	/// Registers a route that never receives an automatic layout.
	pub fn set_route_without_auto_layout(&self, path: &str, target: ClassId) {
		let mut state = self.state.write();
		state.routes.insert(
			normalize(path),
			RouteTarget {
				target: target.clone(),
				parent_layouts: Vec::new(),
				auto_layout: false,
			},
		);
		state.bump([target]);
	}

	pub fn remove_route(&self, path: &str) -> Option<RouteTarget> {
		let mut state = self.state.write();
		let removed = state.routes.remove(&normalize(path));
		if removed.is_some() {
			state.bump([]);
		}
		removed
	}

	/// Registers an automatic layout for every route below `path` (empty for all routes).
	pub fn set_layout(&self, path: &str, layout: ClassId) {
		let mut state = self.state.write();
		let path = normalize(path);
		state.layouts.retain(|entry| entry.path != path);
		state.layouts.push(LayoutEntry {
			class: layout.clone(),
			path,
		});
		state.bump([layout]);
	}

	/// Declares the parent layout of a layout class.
	pub fn set_parent_layout(&self, layout: ClassId, parent: ClassId) {
		let mut state = self.state.write();
		state.parents.insert(layout.clone(), parent.clone());
		state.bump([layout, parent]);
	}

	pub fn route_target(&self, path: &str) -> Option<RouteTarget> {
		self.state.read().routes.get(&normalize(path)).cloned()
	}

	pub fn has_layout(&self, path: &str) -> bool {
		self.state.read().layout_for(path).is_some()
	}

	/// The automatic layout for `path` followed by its declared parent layouts.
	pub fn layout_chain(&self, path: &str) -> Vec<ClassId> {
		let state = self.state.read();
		state
			.layout_for(path)
			.map(|entry| state.parent_chain(&entry.class))
			.unwrap_or_default()
	}

	/// Resolves the target and layout chain used when navigating to `path`.
	pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
		let state = self.state.read();
		let route = state.routes.get(&normalize(path))?;
		if !route.parent_layouts.is_empty() || !route.auto_layout {
			return Some(ResolvedRoute {
				target: route.target.clone(),
				layouts: route.parent_layouts.clone(),
				auto_layout: false,
			});
		}
		let layouts = state
			.layout_for(path)
			.map(|entry| state.parent_chain(&entry.class))
			.unwrap_or_default();
		Some(ResolvedRoute {
			target: route.target.clone(),
			auto_layout: !layouts.is_empty(),
			layouts,
		})
	}

	pub fn generation(&self) -> u64 {
		self.state.read().generation
	}

	/// True if `class` first appeared as a route target or layout after `generation`.
	pub fn registered_after(&self, class: &ClassId, generation: u64) -> bool {
		self.state
			.read()
			.first_registered
			.get(class)
			.is_some_and(|registered| *registered > generation)
	}

	pub fn is_registered(&self, class: &ClassId) -> bool {
		self.state.read().first_registered.contains_key(class)
	}
}

fn normalize(path: &str) -> String {
	path.trim_matches('/').to_string()
}

fn path_matches(prefix: &str, path: &str) -> bool {
	prefix.is_empty()
		|| path == prefix
		|| path
			.strip_prefix(prefix)
			.is_some_and(|rest| rest.starts_with('/'))
}
