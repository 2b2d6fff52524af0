/* src/model/service.rs */

//!
//! The owning service: configuration, registries, hotswap listeners and the
//! optional live-reload channel.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use super::{ClassRegistry, RouteRegistry, Session, Ui, UiId};
use crate::config::HotswapConfig;
use crate::hotswap::HotswapListener;

/// Out-of-band browser tooling connection used in development mode.
pub trait LiveReload: Send + Sync {
	/// Full page reload of every connected browser.
	fn reload(&self);
	/// Refresh without a page reload; `full_refresh` also re-creates overlays.
	fn refresh(&self, full_refresh: bool);
	/// Hot-patches a served resource. `None` content drops a previous patch.
	fn update(&self, path: &str, content: Option<&str>);
	/// Custom message for client-side HMR handlers.
	fn send_hmr_event(&self, event: &str, data: Option<&serde_json::Value>);
}

/// Hooks fired by the service on session and UI lifecycle changes.
pub trait LifecycleListener: Send + Sync {
	fn session_init(&self, _session: &Arc<Session>) {}
	fn session_destroy(&self, _session: &Arc<Session>) {}
	fn ui_init(&self, _session: &Arc<Session>, _ui: UiId) {}
	fn service_destroy(&self) {}
}

pub struct Service {
	config: HotswapConfig,
	classes: Arc<ClassRegistry>,
	routes: Arc<RouteRegistry>,
	listeners: Vec<Arc<dyn HotswapListener>>,
	live_reload: Option<Arc<dyn LiveReload>>,
	force_reload: AtomicBool,
	destroyed: AtomicBool,
	lifecycle: RwLock<Vec<Arc<dyn LifecycleListener>>>,
}

/// Builder for [`Service`].
#[derive(Default)]
pub struct ServiceBuilder {
	config: Option<HotswapConfig>,
	classes: Option<Arc<ClassRegistry>>,
	routes: Option<Arc<RouteRegistry>>,
	listeners: Vec<Arc<dyn HotswapListener>>,
	live_reload: Option<Arc<dyn LiveReload>>,
}

impl ServiceBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn config(mut self, config: HotswapConfig) -> Self {
		self.config = Some(config);
		self
	}

	pub fn production_mode(mut self, production: bool) -> Self {
		self.config.get_or_insert_with(HotswapConfig::default).production_mode = production;
		self
	}

	pub fn classes(mut self, classes: Arc<ClassRegistry>) -> Self {
		self.classes = Some(classes);
		self
	}

	pub fn routes(mut self, routes: Arc<RouteRegistry>) -> Self {
		self.routes = Some(routes);
		self
	}

	/// Appends a hotswap listener. Listeners run in registration order.
	pub fn listener(mut self, listener: Arc<dyn HotswapListener>) -> Self {
		self.listeners.push(listener);
		self
	}

	pub fn live_reload(mut self, live_reload: Arc<dyn LiveReload>) -> Self {
		self.live_reload = Some(live_reload);
		self
	}

	pub fn build(self) -> Arc<Service> {
		let config = self.config.unwrap_or_default();
		let force_reload = AtomicBool::new(config.force_reload);
		Arc::new(Service {
			config,
			classes: self.classes.unwrap_or_default(),
			routes: self.routes.unwrap_or_default(),
			listeners: self.listeners,
			live_reload: self.live_reload,
			force_reload,
			destroyed: AtomicBool::new(false),
			lifecycle: RwLock::new(Vec::new()),
		})
	}
}

impl Service {
	pub fn builder() -> ServiceBuilder {
		ServiceBuilder::new()
	}

	pub fn config(&self) -> &HotswapConfig {
		&self.config
	}

	pub fn is_production_mode(&self) -> bool {
		self.config.production_mode
	}

	pub fn classes(&self) -> &Arc<ClassRegistry> {
		&self.classes
	}

	pub fn routes(&self) -> &Arc<RouteRegistry> {
		&self.routes
	}

	pub fn listeners(&self) -> &[Arc<dyn HotswapListener>] {
		&self.listeners
	}

	pub fn live_reload(&self) -> Option<&Arc<dyn LiveReload>> {
		self.live_reload.as_ref()
	}

	/// Forces every following hotswap of redefined classes to reload the page.
	pub fn set_force_reload(&self, force: bool) {
		self.force_reload.store(force, Ordering::SeqCst);
	}

	pub fn is_force_reload(&self) -> bool {
		self.force_reload.load(Ordering::SeqCst)
	}

	pub fn is_destroyed(&self) -> bool {
		self.destroyed.load(Ordering::SeqCst)
	}

	pub fn add_lifecycle_listener(&self, listener: Arc<dyn LifecycleListener>) {
		self.lifecycle.write().push(listener);
	}

	pub fn lifecycle_listener_count(&self) -> usize {
		self.lifecycle.read().len()
	}

	pub fn init_session(&self, session: &Arc<Session>) {
		for listener in self.lifecycle_snapshot() {
			listener.session_init(session);
		}
	}

	/// Adds `ui` to the session and fires the UI init hooks.
	///
	/// Must not be called while holding the session lock.
	pub fn init_ui(&self, session: &Arc<Session>, ui: Ui) -> UiId {
		let id = ui.id();
		session.lock().add_ui(ui);
		for listener in self.lifecycle_snapshot() {
			listener.ui_init(session, id);
		}
		id
	}

	pub fn destroy_session(&self, session: &Arc<Session>) {
		for listener in self.lifecycle_snapshot() {
			listener.session_destroy(session);
		}
	}

	/// Fires the destroy hooks once and drops every lifecycle listener.
	pub fn destroy(&self) {
		if self.destroyed.swap(true, Ordering::SeqCst) {
			return;
		}
		let listeners = std::mem::take(&mut *self.lifecycle.write());
		for listener in listeners {
			listener.service_destroy();
		}
	}

	fn lifecycle_snapshot(&self) -> Vec<Arc<dyn LifecycleListener>> {
		self.lifecycle.read().clone()
	}
}

impl fmt::Debug for Service {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Service")
			.field("config", &self.config)
			.field("listeners", &self.listeners.len())
			.field("live_reload", &self.live_reload.is_some())
			.field("force_reload", &self.is_force_reload())
			.field("destroyed", &self.is_destroyed())
			.finish_non_exhaustive()
	}
}
