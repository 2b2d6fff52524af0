/* src/hotswap/tracker.rs */

use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;

use crate::model::{Session, SessionId, UiId};

/// A session eligible for dispatch, with the UIs initialized in it.
#[derive(Debug, Clone)]
pub struct TrackedSession {
	pub session: Arc<Session>,
	pub uis: BTreeSet<UiId>,
}

/// Registry of active sessions and their UIs.
///
/// Uses the RCU pattern: lifecycle hooks publish a new map, dispatch works
/// on the snapshot it loaded and never blocks them.
#[derive(Debug, Default)]
pub struct SessionTracker {
	inner: ArcSwap<HashMap<SessionId, TrackedSession>>,
	destroyed: AtomicBool,
}

impl SessionTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn session_init(&self, session: &Arc<Session>) {
		if self.is_destroyed() {
			return;
		}
		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			new_map
				.entry(session.id().clone())
				.or_insert_with(|| TrackedSession {
					session: Arc::clone(session),
					uis: BTreeSet::new(),
				});
			new_map
		});
	}

	/// Tracks `ui`, registering its session if needed.
	///
	/// Returns true the first time the UI is seen.
	pub fn ui_init(&self, session: &Arc<Session>, ui: UiId) -> bool {
		if self.is_destroyed() {
			return false;
		}
		// rcu may retry the closure; only the last run counts.
		let inserted = Cell::new(false);
		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			let tracked = new_map
				.entry(session.id().clone())
				.or_insert_with(|| TrackedSession {
					session: Arc::clone(session),
					uis: BTreeSet::new(),
				});
			inserted.set(tracked.uis.insert(ui));
			new_map
		});
		inserted.get()
	}

	pub fn session_destroy(&self, session: &SessionId) -> bool {
		let removed = Cell::new(false);
		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			removed.set(new_map.remove(session).is_some());
			new_map
		});
		removed.get()
	}

	/// Stops tracking for good.
	pub fn destroy(&self) {
		self.destroyed.store(true, Ordering::SeqCst);
		self.inner.store(Arc::new(HashMap::new()));
	}

	pub fn is_destroyed(&self) -> bool {
		self.destroyed.load(Ordering::SeqCst)
	}

	pub fn snapshot(&self) -> Arc<HashMap<SessionId, TrackedSession>> {
		self.inner.load_full()
	}

	pub fn is_tracked(&self, session: &SessionId) -> bool {
		self.inner.load().contains_key(session)
	}

	pub fn tracked_uis(&self, session: &SessionId) -> Option<BTreeSet<UiId>> {
		self.inner.load().get(session).map(|tracked| tracked.uis.clone())
	}

	pub fn len(&self) -> usize {
		self.inner.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.load().is_empty()
	}
}
