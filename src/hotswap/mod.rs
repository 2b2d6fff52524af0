/* src/hotswap/mod.rs */

//!
//! Entry point for class and resource change notifications.
//!
//! The [`Hotswapper`] is installed on a development-mode [`Service`]. It
//! tracks live sessions and UIs, runs the registered [`HotswapListener`]s
//! and decides, per UI, whether the browser needs a route refresh, a
//! layout chain refresh, a live-reload refresh or a full page reload.

mod error;
mod listener;
mod stylesheet;
mod tracker;

pub mod classify;
pub mod strategy;
pub mod walker;

pub use error::{HotswapError, ListenerError};
pub use listener::HotswapListener;
pub use stylesheet::{StyleSheetHotswapper, resource_path};
pub use tracker::{SessionTracker, TrackedSession};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, trace, warn};

use self::classify::Classifier;
use self::listener::isolate;
use self::strategy::{RefreshPlan, RefreshStrategy, merge_requested, select};
use crate::config;
use crate::event::{
	HotswapClassEvent, HotswapClassSessionEvent, HotswapCompleteEvent, HotswapEvent,
	HotswapResourceEvent, ResourceChangeSet, UpdateRequests,
};
use crate::model::{ClassId, ClientCommand, LifecycleListener, Service, Session, SessionId, Ui, UiId};

/// HMR event sent when a translation bundle changes.
pub const TRANSLATIONS_UPDATE_EVENT: &str = "translations-update";

/// Coordinates hotswap notifications for one service.
pub struct Hotswapper {
	service: Arc<Service>,
	tracker: SessionTracker,
	translations: GlobSet,
	/// Route registry generation at the end of the previous cycle.
	baseline: AtomicU64,
}

impl Hotswapper {
	/// Creates a hotswapper without installing it on the service.
	pub fn new(service: Arc<Service>) -> Self {
		let translations = compile_patterns(&service.config().translation_patterns);
		let baseline = AtomicU64::new(service.routes().generation());
		Self {
			service,
			tracker: SessionTracker::new(),
			translations,
			baseline,
		}
	}

	/// Installs a hotswapper on `service`. Returns `None` in production mode.
	pub fn register(service: &Arc<Service>) -> Option<Arc<Self>> {
		if service.is_production_mode() {
			debug!("production mode, hotswap disabled");
			return None;
		}
		let hotswapper = Arc::new(Self::new(Arc::clone(service)));
		service.add_lifecycle_listener(Arc::clone(&hotswapper) as Arc<dyn LifecycleListener>);
		for listener in service.listeners() {
			listener.on_init(service);
		}
		debug!(listeners = service.listeners().len(), "hotswapper registered");
		Some(hotswapper)
	}

	pub fn service(&self) -> &Arc<Service> {
		&self.service
	}

	pub fn tracker(&self) -> &SessionTracker {
		&self.tracker
	}

	fn is_active(&self) -> bool {
		!self.tracker.is_destroyed() && !self.service.is_destroyed()
	}

	fn force_reload_requested(&self) -> bool {
		self.service.is_force_reload() || config::force_reload_from_env()
	}

	/// Notifies about changed classes, by name.
	///
	/// `redefined` is false when the classes were loaded for the first time.
	pub fn on_hotswap<S: AsRef<str>>(&self, class_names: &[S], redefined: bool) {
		if !self.is_active() {
			debug!("hotswapper destroyed, class change ignored");
			return;
		}
		if class_names.is_empty() {
			return;
		}

		let classes: HashSet<ClassId> = class_names
			.iter()
			.filter_map(|name| {
				let name = name.as_ref();
				let resolved = self.service.classes().resolve(name);
				if resolved.is_none() {
					debug!(class = name, "changed class cannot be resolved, skipped");
				}
				resolved
			})
			.collect();
		if classes.is_empty() {
			return;
		}

		debug!(count = classes.len(), redefined, "classes changed");
		self.dispatch_classes(classes, redefined);
	}

	fn dispatch_classes(&self, classes: HashSet<ClassId>, redefined: bool) {
		let service = &self.service;
		let force_mode = self.force_reload_requested();
		let mut event = HotswapClassEvent::new(Arc::clone(service), classes.clone(), redefined);
		let mut reload_requested = false;

		for listener in service.listeners() {
			let listener = listener.as_ref();
			if let Some(reload) = isolate(listener, "classes change", || listener.on_classes_change(&mut event)) {
				reload_requested |= reload;
			}
		}

		let sessions = self.tracker.snapshot();
		for tracked in sessions.values() {
			let mut data = tracked.session.lock();
			for listener in service.listeners() {
				let listener = listener.as_ref();
				let mut scoped = HotswapClassSessionEvent::new(&mut event, &tracked.session, &mut data);
				if let Some(reload) = isolate(listener, "session classes change", || {
					listener.on_session_classes_change(&mut scoped)
				}) {
					reload_requested |= reload;
				}
			}
		}

		let mut plan = if reload_requested || event.requires_page_reload() {
			RefreshPlan::new()
		} else {
			let classifier = Classifier::new(service.classes(), service.routes(), self.baseline.load(Ordering::SeqCst));
			let changes = event.changes();
			self.plan(&sessions, event.updates(), |ui| {
				let in_play = walker::walk(ui, service.routes());
				let hit = classifier.classify(&in_play, changes);
				select(&hit, ui.push_mode().is_enabled(), force_mode, changes.is_redefined())
			})
		};
		if reload_requested || event.requires_page_reload() {
			plan.force_reload();
		}

		self.flush(&mut event, plan);
		self.baseline.store(service.routes().generation(), Ordering::SeqCst);

		let complete = HotswapCompleteEvent::new(Arc::clone(service), classes, redefined);
		for listener in service.listeners() {
			let listener = listener.as_ref();
			isolate(listener, "hotswap complete", || listener.on_hotswap_complete(&complete));
		}
	}

	/// Notifies about changed resources, by URI.
	pub fn on_resource_hotswap<S: AsRef<str>>(&self, created: &[S], modified: &[S], deleted: &[S]) {
		let to_vec = |uris: &[S]| uris.iter().map(|uri| uri.as_ref().to_string()).collect::<Vec<_>>();
		self.dispatch_resources(ResourceChangeSet {
			created: to_vec(created),
			modified: to_vec(modified),
			deleted: to_vec(deleted),
		});
	}

	/// Same as [`on_resource_hotswap`](Self::on_resource_hotswap) with a prepared change set.
	pub fn dispatch_resources(&self, changes: ResourceChangeSet) {
		if !self.is_active() {
			debug!("hotswapper destroyed, resource change ignored");
			return;
		}
		if changes.is_empty() {
			return;
		}
		trace!(?changes, "resources changed");

		let service = &self.service;
		let translations_changed = changes.all().any(|uri| self.is_translation(uri));
		let mut event = HotswapResourceEvent::new(Arc::clone(service), changes);

		for listener in service.listeners() {
			let listener = listener.as_ref();
			isolate(listener, "resources change", || listener.on_resources_change(&mut event));
		}

		if translations_changed {
			debug!("translation bundle changed, refreshing all UIs");
			if let Err(e) = event.send_hmr_event(TRANSLATIONS_UPDATE_EVENT, Some(serde_json::json!({}))) {
				debug!(error = %e, "translation update event not queued");
			}
		}

		let sessions = self.tracker.snapshot();
		let mut plan = self.plan(&sessions, event.updates(), |ui| {
			match (translations_changed, ui.push_mode().is_enabled()) {
				(false, _) => RefreshStrategy::Skip,
				(true, true) => RefreshStrategy::PushRefreshChain,
				(true, false) => RefreshStrategy::Refresh,
			}
		});
		if event.requires_page_reload() {
			plan.force_reload();
		}
		self.flush(&mut event, plan);
	}

	/// Collects the strategy of every eligible UI.
	///
	/// Each session is locked while its UIs are inspected.
	fn plan(
		&self,
		sessions: &HashMap<SessionId, TrackedSession>,
		requested: &UpdateRequests,
		mut compute: impl FnMut(&Ui) -> RefreshStrategy,
	) -> RefreshPlan {
		let mut plan = RefreshPlan::new();
		for tracked in sessions.values() {
			let data = tracked.session.lock();
			for ui in data.uis() {
				if ui.is_closing() || !tracked.uis.contains(&ui.id()) {
					continue;
				}
				let push = ui.push_mode().is_enabled();
				let own = requested.for_ui(tracked.session.id(), ui.id());
				let strategy = merge_requested(compute(ui), own, push);
				plan.add(ui, strategy);
			}
		}
		plan
	}

	/// Applies queued client commands, then the refresh plan.
	fn flush(&self, event: &mut impl HotswapEvent, plan: RefreshPlan) {
		match self.service.live_reload() {
			Some(live_reload) => event.apply_client_commands(live_reload.as_ref()),
			None if !event.updates().commands().is_empty() => {
				debug!(
					count = event.updates().commands().len(),
					"no live reload channel, client commands dropped"
				);
			}
			None => {}
		}
		trace!(?plan, "flushing refresh plan");
		plan.execute(self.service.live_reload().map(|live_reload| live_reload.as_ref()));
	}

	fn is_translation(&self, uri: &str) -> bool {
		self.translations.is_match(resource_path(uri))
	}
}

impl LifecycleListener for Hotswapper {
	fn session_init(&self, session: &Arc<Session>) {
		trace!(session = %session.id(), "tracking session");
		self.tracker.session_init(session);
	}

	fn session_destroy(&self, session: &Arc<Session>) {
		trace!(session = %session.id(), "session destroyed");
		self.tracker.session_destroy(session.id());
	}

	fn ui_init(&self, session: &Arc<Session>, ui: UiId) {
		if !self.tracker.ui_init(session, ui) {
			return;
		}
		let client = session.lock().ui(ui).map(|ui| Arc::clone(ui.client()));
		match client {
			Some(client) => client.send(ClientCommand::InstallRefreshListener),
			None => warn!(session = %session.id(), %ui, "initialized UI not found in its session"),
		}
	}

	fn service_destroy(&self) {
		debug!("service destroyed, hotswap disabled");
		self.tracker.destroy();
	}
}

impl std::fmt::Debug for Hotswapper {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Hotswapper")
			.field("service", &self.service)
			.field("sessions", &self.tracker.len())
			.field("baseline", &self.baseline.load(Ordering::SeqCst))
			.finish_non_exhaustive()
	}
}

fn compile_patterns(patterns: &[String]) -> GlobSet {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		match Glob::new(pattern) {
			Ok(glob) => {
				builder.add(glob);
			}
			Err(e) => warn!(pattern = %pattern, error = %e, "invalid translation pattern ignored"),
		}
	}
	builder.build().unwrap_or_else(|e| {
		warn!(error = %e, "translation patterns disabled");
		GlobSet::empty()
	})
}

