/* src/model/ui.rs */

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::{ClassId, ComponentTree, NodeId, RouteRegistry};
use crate::hotswap::HotswapError;

/// Identity of a UI instance within its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UiId(pub u64);

impl fmt::Display for UiId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ui-{}", self.0)
	}
}

/// Push configuration of a UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushMode {
	/// Server can only answer client requests.
	#[default]
	Disabled,
	/// Push channel open, flushed explicitly by the application.
	Manual,
	/// Push channel open, flushed automatically.
	Automatic,
}

impl PushMode {
	pub fn is_enabled(self) -> bool {
		self != PushMode::Disabled
	}
}

/// Commands sent to a browser through the UI's own outbound channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientCommand {
	/// Installs the browser-side listener that re-requests the current route.
	InstallRefreshListener,
	/// Re-renders the current route; with `full_refresh` the layouts too.
	#[serde(rename_all = "camelCase")]
	RefreshRoute { full_refresh: bool },
	/// Reloads the page.
	Reload,
}

/// Outbound, fire-and-forget channel to the browser of a single UI.
pub trait ClientChannel: Send + Sync {
	fn send(&self, command: ClientCommand);
}

/// A live UI: its component tree, active router chain and modal overlays.
pub struct Ui {
	id: UiId,
	push: PushMode,
	closing: bool,
	tree: ComponentTree,
	location: Option<String>,
	/// Route component first, then enclosing layouts from innermost outwards.
	chain: Vec<NodeId>,
	modals: Vec<NodeId>,
	client: Arc<dyn ClientChannel>,
}

impl Ui {
	pub const ROOT_CLASS: &'static str = "UI";

	pub fn new(id: UiId, client: Arc<dyn ClientChannel>) -> Self {
		Self {
			id,
			push: PushMode::default(),
			closing: false,
			tree: ComponentTree::new(ClassId::new(Self::ROOT_CLASS)),
			location: None,
			chain: Vec::new(),
			modals: Vec::new(),
			client,
		}
	}

	pub fn id(&self) -> UiId {
		self.id
	}

	pub fn push_mode(&self) -> PushMode {
		self.push
	}

	pub fn set_push_mode(&mut self, push: PushMode) {
		self.push = push;
	}

	pub fn is_closing(&self) -> bool {
		self.closing
	}

	pub fn close(&mut self) {
		self.closing = true;
	}

	pub fn tree(&self) -> &ComponentTree {
		&self.tree
	}

	pub fn tree_mut(&mut self) -> &mut ComponentTree {
		&mut self.tree
	}

	pub fn location(&self) -> Option<&str> {
		self.location.as_deref()
	}

	/// Nodes of the active router chain, route first.
	pub fn active_chain(&self) -> &[NodeId] {
		&self.chain
	}

	pub fn route_node(&self) -> Option<NodeId> {
		self.chain.first().copied()
	}

	/// Modal components attached outside the router chain.
	pub fn modals(&self) -> &[NodeId] {
		&self.modals
	}

	pub fn has_modals(&self) -> bool {
		!self.modals.is_empty()
	}

	pub fn client(&self) -> &Arc<dyn ClientChannel> {
		&self.client
	}

	/// Replaces the router chain with the one registered for `path`.
	pub fn navigate(&mut self, registry: &RouteRegistry, path: &str) -> Result<(), HotswapError> {
		let resolved = registry
			.resolve(path)
			.ok_or_else(|| HotswapError::UnknownRoute(path.to_string()))?;

		if let Some(outermost) = self.chain.last().copied() {
			self.tree.remove(outermost);
		}
		self.chain.clear();

		let mut parent = self.tree.root();
		let mut layouts = Vec::with_capacity(resolved.layouts.len());
		for layout in resolved.layouts.iter().rev() {
			parent = self
				.tree
				.add_child(parent, layout.clone())
				.ok_or_else(|| HotswapError::UnknownRoute(path.to_string()))?;
			layouts.push(parent);
		}
		let route = self
			.tree
			.add_child(parent, resolved.target)
			.ok_or_else(|| HotswapError::UnknownRoute(path.to_string()))?;

		self.chain.push(route);
		self.chain.extend(layouts.into_iter().rev());
		self.location = Some(path.trim_matches('/').to_string());
		Ok(())
	}

	/// Attaches a modal component directly under the UI root.
	pub fn add_modal(&mut self, class: ClassId) -> NodeId {
		let root = self.tree.root();
		// root is never removed
		let node = self.tree.add_child(root, class).unwrap_or(root);
		self.modals.push(node);
		node
	}

	pub fn close_modal(&mut self, node: NodeId) -> bool {
		let before = self.modals.len();
		self.modals.retain(|modal| *modal != node);
		before != self.modals.len() && self.tree.remove(node)
	}
}

impl fmt::Debug for Ui {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Ui")
			.field("id", &self.id)
			.field("push", &self.push)
			.field("closing", &self.closing)
			.field("location", &self.location)
			.field("chain", &self.chain)
			.field("modals", &self.modals)
			.finish_non_exhaustive()
	}
}
