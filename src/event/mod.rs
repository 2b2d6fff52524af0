/* src/event/mod.rs */

//!
//! Events passed to hotswap listeners during one notification cycle.
//!
//! A single event accumulates the update decisions of every listener. The
//! dispatcher invokes listeners one after the other, so the merge state is
//! never touched concurrently. Invoking listeners in parallel would require
//! locking around [`UpdateRequests`].

mod class;
mod complete;
mod resource;

pub use class::{ChangeSet, HotswapClassEvent, HotswapClassSessionEvent};
pub use complete::HotswapCompleteEvent;
pub use resource::{HotswapResourceEvent, ResourceChangeSet};

use std::collections::HashMap;
use std::sync::Arc;

use crate::hotswap::HotswapError;
use crate::model::{LiveReload, Service, SessionId, UiId};

/// How a UI must be updated after a hotswap. `Reload` dominates `Refresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UiUpdateStrategy {
	/// Re-render the UI without reloading the page.
	Refresh,
	/// Reload the browser page.
	Reload,
}

/// Client-side command queued by a listener, flushed after all listeners ran.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingCommand {
	UpdateResource {
		path: String,
		content: Option<String>,
	},
	HmrEvent {
		event: String,
		data: Option<serde_json::Value>,
	},
}

/// Update decisions and deferred client commands of one cycle.
///
/// UI ids are only unique within their session, so per-UI requests are
/// keyed by both.
#[derive(Debug, Default)]
pub struct UpdateRequests {
	global: Option<UiUpdateStrategy>,
	per_ui: HashMap<(SessionId, UiId), UiUpdateStrategy>,
	commands: Vec<PendingCommand>,
}

fn merge(current: Option<UiUpdateStrategy>, requested: UiUpdateStrategy) -> UiUpdateStrategy {
	current.map_or(requested, |current| current.max(requested))
}

impl UpdateRequests {
	pub fn trigger(&mut self, strategy: UiUpdateStrategy) {
		self.global = Some(merge(self.global, strategy));
	}

	pub fn trigger_ui(&mut self, session: &SessionId, ui: UiId, strategy: UiUpdateStrategy) {
		let key = (session.clone(), ui);
		let merged = merge(self.per_ui.get(&key).copied(), strategy);
		self.per_ui.insert(key, merged);
	}

	pub fn global(&self) -> Option<UiUpdateStrategy> {
		self.global
	}

	/// Effective strategy for `ui`: its own request merged with the global one.
	pub fn for_ui(&self, session: &SessionId, ui: UiId) -> Option<UiUpdateStrategy> {
		match (self.per_ui.get(&(session.clone(), ui)).copied(), self.global) {
			(Some(own), global) => Some(merge(global, own)),
			(None, global) => global,
		}
	}

	pub fn any_reload(&self) -> bool {
		self.global == Some(UiUpdateStrategy::Reload)
			|| self.per_ui.values().any(|s| *s == UiUpdateStrategy::Reload)
	}

	pub fn commands(&self) -> &[PendingCommand] {
		&self.commands
	}

	fn push(&mut self, command: PendingCommand) {
		self.commands.push(command);
	}

	fn take_commands(&mut self) -> Vec<PendingCommand> {
		std::mem::take(&mut self.commands)
	}
}

/// Capabilities shared by class, session-scoped and resource events.
pub trait HotswapEvent {
	fn service(&self) -> &Arc<Service>;

	fn updates(&self) -> &UpdateRequests;

	fn updates_mut(&mut self) -> &mut UpdateRequests;

	/// Requests an update of every UI.
	fn trigger_update(&mut self, strategy: UiUpdateStrategy) {
		self.updates_mut().trigger(strategy);
	}

	/// Requests an update of a single UI of `session`.
	fn trigger_ui_update(&mut self, session: &SessionId, ui: UiId, strategy: UiUpdateStrategy) {
		self.updates_mut().trigger_ui(session, ui, strategy);
	}

	/// True if a page reload was requested globally.
	fn requires_page_reload(&self) -> bool {
		self.updates().global() == Some(UiUpdateStrategy::Reload)
	}

	fn ui_update_strategy(&self, session: &SessionId, ui: UiId) -> Option<UiUpdateStrategy> {
		self.updates().for_ui(session, ui)
	}

	/// True if a page reload was requested globally or for any UI.
	fn any_ui_requires_page_reload(&self) -> bool {
		self.updates().any_reload()
	}

	/// Queues a hot-patch of a served resource.
	///
	/// Repeated calls for the same path are kept and flushed in order.
	fn update_client_resource(&mut self, path: &str, content: Option<&str>) -> Result<(), HotswapError> {
		if path.is_empty() {
			return Err(HotswapError::InvalidArgument("resource path must not be empty"));
		}
		self.updates_mut().push(PendingCommand::UpdateResource {
			path: path.to_string(),
			content: content.map(str::to_string),
		});
		Ok(())
	}

	/// Queues a custom message for client-side HMR handlers.
	fn send_hmr_event(&mut self, event: &str, data: Option<serde_json::Value>) -> Result<(), HotswapError> {
		if event.is_empty() {
			return Err(HotswapError::InvalidArgument("event name must not be empty"));
		}
		self.updates_mut().push(PendingCommand::HmrEvent {
			event: event.to_string(),
			data,
		});
		Ok(())
	}

	/// Sends the queued commands to `live_reload` in insertion order and
	/// empties the queue.
	fn apply_client_commands(&mut self, live_reload: &dyn LiveReload) {
		for command in self.updates_mut().take_commands() {
			match command {
				PendingCommand::UpdateResource { path, content } => {
					live_reload.update(&path, content.as_deref());
				}
				PendingCommand::HmrEvent { event, data } => {
					live_reload.send_hmr_event(&event, data.as_ref());
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_never_downgrades() {
		let mut updates = UpdateRequests::default();
		updates.trigger(UiUpdateStrategy::Reload);
		updates.trigger(UiUpdateStrategy::Refresh);
		assert_eq!(updates.global(), Some(UiUpdateStrategy::Reload));

		let session = SessionId::new("s1");
		updates.trigger_ui(&session, UiId(1), UiUpdateStrategy::Refresh);
		assert_eq!(updates.for_ui(&session, UiId(1)), Some(UiUpdateStrategy::Reload));
	}

	#[test]
	fn test_per_ui_reload_is_not_global() {
		let mut updates = UpdateRequests::default();
		let session = SessionId::new("s1");
		updates.trigger(UiUpdateStrategy::Refresh);
		updates.trigger_ui(&session, UiId(7), UiUpdateStrategy::Reload);

		assert_eq!(updates.global(), Some(UiUpdateStrategy::Refresh));
		assert_eq!(updates.for_ui(&session, UiId(7)), Some(UiUpdateStrategy::Reload));
		assert_eq!(updates.for_ui(&session, UiId(8)), Some(UiUpdateStrategy::Refresh));
		assert!(updates.any_reload());
	}

	#[test]
	fn test_ui_request_stays_in_its_session() {
		let mut updates = UpdateRequests::default();
		let a = SessionId::new("a");
		let b = SessionId::new("b");
		updates.trigger_ui(&a, UiId(1), UiUpdateStrategy::Refresh);

		assert_eq!(updates.for_ui(&a, UiId(1)), Some(UiUpdateStrategy::Refresh));
		assert_eq!(updates.for_ui(&b, UiId(1)), None);
	}
}
