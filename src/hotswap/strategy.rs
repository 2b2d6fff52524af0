/* src/hotswap/strategy.rs */

//!
//! Per-UI refresh decisions and the single client flush of a cycle.

use std::sync::Arc;

use tracing::{debug, trace};

use super::classify::Classification;
use crate::event::UiUpdateStrategy;
use crate::model::{ClientChannel, ClientCommand, LiveReload, Ui, UiId};

/// Update applied to one UI. Variants are ordered by strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RefreshStrategy {
	Skip,
	/// Push: re-render the route component only.
	PushRefreshRoute,
	/// Push: re-render the route and its layout chain.
	PushRefreshChain,
	/// No push: refresh through the live-reload channel.
	Refresh,
	/// Full browser page reload.
	Reload,
}

/// Picks the strategy for a UI from what a change set hits.
///
/// In force-reload mode only redefined classes count, and they reload.
pub fn select(hit: &Classification, push: bool, force_reload: bool, redefined: bool) -> RefreshStrategy {
	if !hit.intersects() {
		return RefreshStrategy::Skip;
	}
	if force_reload {
		return if redefined {
			RefreshStrategy::Reload
		} else {
			RefreshStrategy::Skip
		};
	}
	match (push, hit.route_only()) {
		(true, true) => RefreshStrategy::PushRefreshRoute,
		(true, false) => RefreshStrategy::PushRefreshChain,
		(false, _) => RefreshStrategy::Refresh,
	}
}

/// Merges a listener request into a computed strategy.
pub fn merge_requested(computed: RefreshStrategy, requested: Option<UiUpdateStrategy>, push: bool) -> RefreshStrategy {
	let requested = match requested {
		None => return computed,
		Some(UiUpdateStrategy::Reload) => RefreshStrategy::Reload,
		Some(UiUpdateStrategy::Refresh) if push => RefreshStrategy::PushRefreshRoute,
		Some(UiUpdateStrategy::Refresh) => RefreshStrategy::Refresh,
	};
	computed.max(requested)
}

struct PushRefresh {
	ui: UiId,
	client: Arc<dyn ClientChannel>,
	full_chain: bool,
}

/// Collected per-UI decisions, flushed once per cycle.
///
/// Holds the client channels so the flush happens after all session
/// locks are released.
#[derive(Default)]
pub struct RefreshPlan {
	push: Vec<PushRefresh>,
	refresh: bool,
	full_refresh: bool,
	reload: bool,
}

impl RefreshPlan {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, ui: &Ui, strategy: RefreshStrategy) {
		trace!(ui = %ui.id(), ?strategy, "refresh strategy selected");
		match strategy {
			RefreshStrategy::Skip => {}
			RefreshStrategy::PushRefreshRoute | RefreshStrategy::PushRefreshChain => {
				self.push.push(PushRefresh {
					ui: ui.id(),
					client: Arc::clone(ui.client()),
					full_chain: strategy == RefreshStrategy::PushRefreshChain,
				});
			}
			RefreshStrategy::Refresh => {
				self.refresh = true;
				self.full_refresh |= ui.has_modals();
			}
			RefreshStrategy::Reload => self.reload = true,
		}
	}

	/// Escalates the whole cycle to a page reload.
	pub fn force_reload(&mut self) {
		self.reload = true;
	}

	pub fn is_empty(&self) -> bool {
		self.push.is_empty() && !self.refresh && !self.reload
	}

	pub fn requires_reload(&self) -> bool {
		self.reload
	}

	pub fn requires_refresh(&self) -> bool {
		self.refresh
	}

	pub fn push_refresh_count(&self) -> usize {
		self.push.len()
	}

	/// Sends the collected updates to the clients.
	pub fn execute(self, live_reload: Option<&dyn LiveReload>) {
		if self.reload {
			match live_reload {
				Some(live_reload) => {
					debug!("reloading browser pages after hotswap");
					live_reload.reload();
				}
				None => debug!("page reload required but no live reload channel is available"),
			}
			return;
		}

		if self.refresh {
			match live_reload {
				Some(live_reload) => {
					debug!(full = self.full_refresh, "refreshing browser pages after hotswap");
					live_reload.refresh(self.full_refresh);
					return;
				}
				None => debug!("refresh required but no live reload channel is available"),
			}
		}

		for push in self.push {
			debug!(ui = %push.ui, full = push.full_chain, "refreshing route over push");
			push.client.send(ClientCommand::RefreshRoute {
				full_refresh: push.full_chain,
			});
		}
	}
}

impl std::fmt::Debug for RefreshPlan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RefreshPlan")
			.field("push", &self.push.iter().map(|p| (p.ui, p.full_chain)).collect::<Vec<_>>())
			.field("refresh", &self.refresh)
			.field("full_refresh", &self.full_refresh)
			.field("reload", &self.reload)
			.finish()
	}
}
