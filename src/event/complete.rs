/* src/event/complete.rs */

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{ClassId, Service};

/// Fired once after a class hotswap cycle has been fully processed.
#[derive(Debug, Clone)]
pub struct HotswapCompleteEvent {
	service: Arc<Service>,
	classes: HashSet<ClassId>,
	redefined: bool,
}

impl HotswapCompleteEvent {
	pub fn new(service: Arc<Service>, classes: HashSet<ClassId>, redefined: bool) -> Self {
		Self {
			service,
			classes,
			redefined,
		}
	}

	pub fn service(&self) -> &Arc<Service> {
		&self.service
	}

	pub fn classes(&self) -> &HashSet<ClassId> {
		&self.classes
	}

	pub fn is_redefined(&self) -> bool {
		self.redefined
	}
}
