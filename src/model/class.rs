/* src/model/class.rs */

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Stable identity of an application class, keyed by its fully-qualified name.
///
/// Cloning is cheap: the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(Arc<str>);

impl ClassId {
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	pub fn name(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ClassId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ClassId {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

#[derive(Debug, Clone)]
struct ClassInfo {
	id: ClassId,
	supertypes: Vec<ClassId>,
}

/// Classes currently known to the runtime, with their declared supertypes.
///
/// Resolution of reported class names goes through this registry; a name
/// that was never defined does not resolve.
#[derive(Debug, Default)]
pub struct ClassRegistry {
	classes: RwLock<HashMap<Arc<str>, ClassInfo>>,
}

impl ClassRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Defines (or redefines) a class and returns its identity.
	pub fn define(&self, name: &str, supertypes: &[ClassId]) -> ClassId {
		let mut classes = self.classes.write();
		if let Some(info) = classes.get_mut(name) {
			info.supertypes = supertypes.to_vec();
			return info.id.clone();
		}
		let id = ClassId::new(name);
		classes.insert(
			Arc::clone(&id.0),
			ClassInfo {
				id: id.clone(),
				supertypes: supertypes.to_vec(),
			},
		);
		id
	}

	pub fn resolve(&self, name: &str) -> Option<ClassId> {
		self.classes.read().get(name).map(|info| info.id.clone())
	}

	/// Returns true when an instance of `class` is also an instance of `ancestor`.
	pub fn is_assignable_from(&self, ancestor: &ClassId, class: &ClassId) -> bool {
		if ancestor == class {
			return true;
		}
		let classes = self.classes.read();
		let mut seen = HashSet::new();
		let mut pending = vec![class.clone()];
		while let Some(current) = pending.pop() {
			if !seen.insert(current.clone()) {
				continue;
			}
			if let Some(info) = classes.get(current.name()) {
				for parent in &info.supertypes {
					if parent == ancestor {
						return true;
					}
					pending.push(parent.clone());
				}
			}
		}
		false
	}
}
