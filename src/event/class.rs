/* src/event/class.rs */

use std::collections::HashSet;
use std::sync::Arc;

use super::{HotswapEvent, UiUpdateStrategy, UpdateRequests};
use crate::model::{ClassId, Service, Session, SessionData, UiId};

/// Classes reported in one hotswap cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	classes: HashSet<ClassId>,
	redefined: bool,
}

impl ChangeSet {
	pub fn new(classes: HashSet<ClassId>, redefined: bool) -> Self {
		Self { classes, redefined }
	}

	pub fn classes(&self) -> &HashSet<ClassId> {
		&self.classes
	}

	/// False when the classes were loaded for the first time.
	pub fn is_redefined(&self) -> bool {
		self.redefined
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}
}

/// Class change event at service scope.
#[derive(Debug)]
pub struct HotswapClassEvent {
	service: Arc<Service>,
	changes: ChangeSet,
	updates: UpdateRequests,
}

impl HotswapClassEvent {
	pub fn new(service: Arc<Service>, classes: HashSet<ClassId>, redefined: bool) -> Self {
		Self {
			service,
			changes: ChangeSet::new(classes, redefined),
			updates: UpdateRequests::default(),
		}
	}

	pub fn changes(&self) -> &ChangeSet {
		&self.changes
	}

	pub fn changed_classes(&self) -> &HashSet<ClassId> {
		self.changes.classes()
	}

	pub fn is_redefined(&self) -> bool {
		self.changes.is_redefined()
	}
}

impl HotswapEvent for HotswapClassEvent {
	fn service(&self) -> &Arc<Service> {
		&self.service
	}

	fn updates(&self) -> &UpdateRequests {
		&self.updates
	}

	fn updates_mut(&mut self) -> &mut UpdateRequests {
		&mut self.updates
	}
}

/// Class change event scoped to one session.
///
/// Built by the dispatcher while it holds the session lock; the session
/// data is handed over already locked, so listeners must not call
/// [`Session::lock`] themselves. Decisions land in the cycle's shared
/// [`HotswapClassEvent`].
pub struct HotswapClassSessionEvent<'a> {
	event: &'a mut HotswapClassEvent,
	session: &'a Session,
	data: &'a mut SessionData,
}

impl<'a> HotswapClassSessionEvent<'a> {
	pub fn new(event: &'a mut HotswapClassEvent, session: &'a Session, data: &'a mut SessionData) -> Self {
		Self { event, session, data }
	}

	pub fn session(&self) -> &Session {
		self.session
	}

	pub fn session_data(&self) -> &SessionData {
		&*self.data
	}

	pub fn session_data_mut(&mut self) -> &mut SessionData {
		&mut *self.data
	}

	pub fn changed_classes(&self) -> &HashSet<ClassId> {
		self.event.changed_classes()
	}

	pub fn is_redefined(&self) -> bool {
		self.event.is_redefined()
	}

	/// Requests an update of one UI of this session.
	pub fn trigger_session_ui_update(&mut self, ui: UiId, strategy: UiUpdateStrategy) {
		let session: &Session = self.session;
		self.event.updates_mut().trigger_ui(session.id(), ui, strategy);
	}
}

impl HotswapEvent for HotswapClassSessionEvent<'_> {
	fn service(&self) -> &Arc<Service> {
		self.event.service()
	}

	fn updates(&self) -> &UpdateRequests {
		self.event.updates()
	}

	fn updates_mut(&mut self) -> &mut UpdateRequests {
		self.event.updates_mut()
	}
}
