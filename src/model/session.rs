/* src/model/session.rs */

use std::fmt;

use parking_lot::{Mutex, MutexGuard};

use super::{Ui, UiId};

/// Identity of a user session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// State guarded by the session lock.
#[derive(Debug, Default)]
pub struct SessionData {
	uis: Vec<Ui>,
	next_ui_id: u64,
}

impl SessionData {
	pub fn uis(&self) -> &[Ui] {
		&self.uis
	}

	pub fn uis_mut(&mut self) -> &mut [Ui] {
		&mut self.uis
	}

	pub fn ui(&self, id: UiId) -> Option<&Ui> {
		self.uis.iter().find(|ui| ui.id() == id)
	}

	pub fn ui_mut(&mut self, id: UiId) -> Option<&mut Ui> {
		self.uis.iter_mut().find(|ui| ui.id() == id)
	}

	/// Allocates the next UI id for this session.
	pub fn next_ui_id(&mut self) -> UiId {
		self.next_ui_id += 1;
		UiId(self.next_ui_id)
	}

	pub fn add_ui(&mut self, ui: Ui) {
		self.uis.retain(|existing| existing.id() != ui.id());
		self.uis.push(ui);
	}

	pub fn remove_ui(&mut self, id: UiId) -> Option<Ui> {
		let index = self.uis.iter().position(|ui| ui.id() == id)?;
		Some(self.uis.remove(index))
	}
}

/// A user session. All access to its UIs goes through [`Session::lock`].
pub struct Session {
	id: SessionId,
	data: Mutex<SessionData>,
}

impl Session {
	pub fn new(id: SessionId) -> Self {
		Self {
			id,
			data: Mutex::new(SessionData::default()),
		}
	}

	pub fn id(&self) -> &SessionId {
		&self.id
	}

	/// Acquires the session lock. The lock is not reentrant.
	pub fn lock(&self) -> MutexGuard<'_, SessionData> {
		self.data.lock()
	}
}

impl fmt::Debug for Session {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Session").field("id", &self.id).finish_non_exhaustive()
	}
}
