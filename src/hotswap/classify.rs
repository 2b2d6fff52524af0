/* src/hotswap/classify.rs */

use crate::event::ChangeSet;
use crate::model::{ClassId, ClassRegistry, RouteRegistry};

use super::walker::{InPlay, Placement};

/// Which parts of a UI a change set hits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
	pub route: bool,
	pub layout: bool,
	pub modal: bool,
}

impl Classification {
	pub fn intersects(&self) -> bool {
		self.route || self.layout || self.modal
	}

	/// Only the route component subtree needs re-rendering.
	pub fn route_only(&self) -> bool {
		self.route && !self.layout && !self.modal
	}

	fn hit(&mut self, placement: Placement) {
		match placement {
			Placement::Route => self.route = true,
			Placement::Layout => self.layout = true,
			Placement::Modal => self.modal = true,
		}
	}
}

/// Matches changed classes against the classes in play of a UI.
pub struct Classifier<'a> {
	classes: &'a ClassRegistry,
	routes: &'a RouteRegistry,
	baseline: u64,
}

impl<'a> Classifier<'a> {
	/// `baseline` is the route registry generation observed at the end of
	/// the previous cycle.
	pub fn new(classes: &'a ClassRegistry, routes: &'a RouteRegistry, baseline: u64) -> Self {
		Self {
			classes,
			routes,
			baseline,
		}
	}

	/// A class loaded for the first time and only just registered as a
	/// route or layout. Such classes never trigger an update on their own.
	pub fn is_new_registration(&self, class: &ClassId, redefined: bool) -> bool {
		!redefined && self.routes.registered_after(class, self.baseline)
	}

	pub fn classify(&self, in_play: &InPlay, changes: &ChangeSet) -> Classification {
		let mut classification = Classification::default();
		if in_play.is_empty() {
			return classification;
		}
		for changed in changes.classes() {
			if self.is_new_registration(changed, changes.is_redefined()) {
				continue;
			}
			for (class, placement) in in_play.entries() {
				if self.classes.is_assignable_from(changed, class) {
					classification.hit(*placement);
				}
			}
		}
		classification
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;
	use std::sync::Arc;

	use super::*;
	use crate::hotswap::walker::walk;
	use crate::model::{ClientChannel, ClientCommand, Ui, UiId};

	struct Silent;

	impl ClientChannel for Silent {
		fn send(&self, _command: ClientCommand) {}
	}

	fn changes(names: &[&str], redefined: bool) -> ChangeSet {
		ChangeSet::new(names.iter().map(|n| ClassId::new(*n)).collect::<HashSet<_>>(), redefined)
	}

	fn setup() -> (ClassRegistry, RouteRegistry, Ui) {
		let classes = ClassRegistry::new();
		let base = classes.define("app.BaseView", &[]);
		classes.define("app.Orders", &[base]);
		classes.define("app.Main", &[]);
		let routes = RouteRegistry::new();
		routes.set_route("orders", ClassId::new("app.Orders"), vec![ClassId::new("app.Main")]);
		let mut ui = Ui::new(UiId(1), Arc::new(Silent));
		ui.navigate(&routes, "orders").unwrap();
		(classes, routes, ui)
	}

	#[test]
	fn test_supertype_change_hits_route() {
		let (classes, routes, ui) = setup();
		let classifier = Classifier::new(&classes, &routes, routes.generation());
		let in_play = walk(&ui, &routes);

		let hit = classifier.classify(&in_play, &changes(&["app.BaseView"], true));
		assert!(hit.route_only());

		let hit = classifier.classify(&in_play, &changes(&["app.Main", "app.Orders"], true));
		assert!(hit.route && hit.layout);
		assert!(!hit.route_only());

		let miss = classifier.classify(&in_play, &changes(&["app.Unrelated"], true));
		assert!(!miss.intersects());
	}

	#[test]
	fn test_new_registration_is_suppressed() {
		let (classes, routes, _) = setup();
		routes.set_route("home", ClassId::new("app.Home"), Vec::new());
		let mut ui = Ui::new(UiId(2), Arc::new(Silent));
		ui.navigate(&routes, "home").unwrap();

		let baseline = routes.generation();
		routes.set_layout("", ClassId::new("app.Fresh"));
		let classifier = Classifier::new(&classes, &routes, baseline);
		let in_play = walk(&ui, &routes);

		assert!(classifier.is_new_registration(&ClassId::new("app.Fresh"), false));
		assert!(!classifier.is_new_registration(&ClassId::new("app.Fresh"), true));
		assert!(!classifier.is_new_registration(&ClassId::new("app.Home"), false));

		let hit = classifier.classify(&in_play, &changes(&["app.Fresh"], false));
		assert!(!hit.intersects());
		let hit = classifier.classify(&in_play, &changes(&["app.Fresh"], true));
		assert!(hit.layout);
		let hit = classifier.classify(&in_play, &changes(&["app.Fresh", "app.Home"], false));
		assert!(hit.route_only());
	}
}
