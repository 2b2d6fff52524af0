/* tests/common/mod.rs */

#![allow(dead_code)]

use std::sync::Arc;

use hotswap::event::{HotswapClassEvent, HotswapClassSessionEvent, HotswapCompleteEvent, HotswapResourceEvent};
use hotswap::hotswap::{HotswapListener, Hotswapper, ListenerError};
use hotswap::model::{
	ClassRegistry, ClientChannel, ClientCommand, LiveReload, PushMode, RouteRegistry, Service, ServiceBuilder, Session,
	SessionId, Ui, UiId,
};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum LiveCall {
	Reload,
	Refresh(bool),
	Update(String, Option<String>),
	Hmr(String, Option<serde_json::Value>),
}

#[derive(Default)]
pub struct RecordingLiveReload {
	calls: Mutex<Vec<LiveCall>>,
}

impl RecordingLiveReload {
	pub fn calls(&self) -> Vec<LiveCall> {
		self.calls.lock().clone()
	}

	pub fn clear(&self) {
		self.calls.lock().clear();
	}
}

impl LiveReload for RecordingLiveReload {
	fn reload(&self) {
		self.calls.lock().push(LiveCall::Reload);
	}

	fn refresh(&self, full_refresh: bool) {
		self.calls.lock().push(LiveCall::Refresh(full_refresh));
	}

	fn update(&self, path: &str, content: Option<&str>) {
		self.calls
			.lock()
			.push(LiveCall::Update(path.to_string(), content.map(str::to_string)));
	}

	fn send_hmr_event(&self, event: &str, data: Option<&serde_json::Value>) {
		self.calls.lock().push(LiveCall::Hmr(event.to_string(), data.cloned()));
	}
}

#[derive(Default)]
pub struct RecordingChannel {
	commands: Mutex<Vec<ClientCommand>>,
}

impl RecordingChannel {
	pub fn commands(&self) -> Vec<ClientCommand> {
		self.commands.lock().clone()
	}

	/// Route refresh commands only, as `full_refresh` flags.
	pub fn refreshes(&self) -> Vec<bool> {
		self.commands
			.lock()
			.iter()
			.filter_map(|command| match command {
				ClientCommand::RefreshRoute { full_refresh } => Some(*full_refresh),
				_ => None,
			})
			.collect()
	}
}

impl ClientChannel for RecordingChannel {
	fn send(&self, command: ClientCommand) {
		self.commands.lock().push(command);
	}
}

/// Records every hook invocation by name.
#[derive(Default)]
pub struct RecordingListener {
	calls: Mutex<Vec<String>>,
}

impl RecordingListener {
	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}
}

impl HotswapListener for RecordingListener {
	fn name(&self) -> &str {
		"recording"
	}

	fn on_init(&self, _service: &Arc<Service>) {
		self.calls.lock().push("init".to_string());
	}

	fn on_classes_change(&self, _event: &mut HotswapClassEvent) -> Result<bool, ListenerError> {
		self.calls.lock().push("classes".to_string());
		Ok(false)
	}

	fn on_session_classes_change(&self, event: &mut HotswapClassSessionEvent<'_>) -> Result<bool, ListenerError> {
		self.calls.lock().push(format!("session:{}", event.session().id()));
		Ok(false)
	}

	fn on_resources_change(&self, _event: &mut HotswapResourceEvent) -> Result<(), ListenerError> {
		self.calls.lock().push("resources".to_string());
		Ok(())
	}

	fn on_hotswap_complete(&self, event: &HotswapCompleteEvent) -> Result<(), ListenerError> {
		self.calls
			.lock()
			.push(format!("complete:{}:{}", event.classes().len(), event.is_redefined()));
		Ok(())
	}
}

/// Class hierarchy and routes of a small application:
///
/// - `orders` -> `app.Orders` inside `app.MainLayout`
/// - `home` -> `app.Home` with the automatic layout `app.AutoLayout`
pub fn app_registries() -> (Arc<ClassRegistry>, Arc<RouteRegistry>) {
	let classes = Arc::new(ClassRegistry::new());
	let base = classes.define("app.BaseView", &[]);
	classes.define("app.Orders", &[base.clone()]);
	classes.define("app.Home", &[base]);
	classes.define("app.MainLayout", &[]);
	classes.define("app.AutoLayout", &[]);
	classes.define("app.Grid", &[]);
	classes.define("app.Dialog", &[]);
	classes.define("app.Unrelated", &[]);

	let routes = Arc::new(RouteRegistry::new());
	routes.set_route("orders", classes.resolve("app.Orders").unwrap(), vec![
		classes.resolve("app.MainLayout").unwrap(),
	]);
	routes.set_route("home", classes.resolve("app.Home").unwrap(), Vec::new());
	routes.set_layout("", classes.resolve("app.AutoLayout").unwrap());
	(classes, routes)
}

pub struct Host {
	pub service: Arc<Service>,
	pub hotswapper: Arc<Hotswapper>,
	pub live: Arc<RecordingLiveReload>,
}

pub fn host(listeners: Vec<Arc<dyn HotswapListener>>) -> Host {
	host_with(listeners, true)
}

pub fn host_with(listeners: Vec<Arc<dyn HotswapListener>>, with_live_reload: bool) -> Host {
	let (classes, routes) = app_registries();
	let live = Arc::new(RecordingLiveReload::default());
	let mut builder: ServiceBuilder = Service::builder().classes(classes).routes(routes);
	for listener in listeners {
		builder = builder.listener(listener);
	}
	if with_live_reload {
		builder = builder.live_reload(live.clone());
	}
	let service = builder.build();
	let hotswapper = Hotswapper::register(&service).expect("development mode");
	Host {
		service,
		hotswapper,
		live,
	}
}

impl Host {
	pub fn session(&self, id: &str) -> Arc<Session> {
		let session = Arc::new(Session::new(SessionId::new(id)));
		self.service.init_session(&session);
		session
	}

	/// Opens a UI navigated to `path` and returns its id and client channel.
	pub fn open_ui(&self, session: &Arc<Session>, push: PushMode, path: &str) -> (UiId, Arc<RecordingChannel>) {
		let channel = Arc::new(RecordingChannel::default());
		let id = session.lock().next_ui_id();
		let mut ui = Ui::new(id, channel.clone());
		ui.set_push_mode(push);
		ui.navigate(self.service.routes(), path).unwrap();
		self.service.init_ui(session, ui);
		(id, channel)
	}
}
