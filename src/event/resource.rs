/* src/event/resource.rs */

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{HotswapEvent, UpdateRequests};
use crate::model::Service;

/// Resources (by URI) changed on disk in one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceChangeSet {
	pub created: Vec<String>,
	pub modified: Vec<String>,
	pub deleted: Vec<String>,
}

impl ResourceChangeSet {
	pub fn is_empty(&self) -> bool {
		self.created.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
	}

	/// Every changed URI, regardless of the kind of change.
	pub fn all(&self) -> impl Iterator<Item = &str> {
		self.created
			.iter()
			.chain(self.modified.iter())
			.chain(self.deleted.iter())
			.map(String::as_str)
	}
}

#[derive(Debug)]
pub struct HotswapResourceEvent {
	service: Arc<Service>,
	resources: ResourceChangeSet,
	updates: UpdateRequests,
}

impl HotswapResourceEvent {
	pub fn new(service: Arc<Service>, resources: ResourceChangeSet) -> Self {
		Self {
			service,
			resources,
			updates: UpdateRequests::default(),
		}
	}

	pub fn resources(&self) -> &ResourceChangeSet {
		&self.resources
	}

	pub fn changed_resources(&self) -> BTreeSet<&str> {
		self.resources.all().collect()
	}
}

impl HotswapEvent for HotswapResourceEvent {
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
