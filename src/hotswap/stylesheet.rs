/* src/hotswap/stylesheet.rs */

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{HotswapListener, ListenerError};
use crate::config::HotswapConfig;
use crate::event::{HotswapEvent, HotswapResourceEvent};

/// Hot-patches changed stylesheets in the browser without a refresh.
///
/// A `.css` file below one of the roots is served as
/// `<prefix><path relative to the root>`.
#[derive(Debug, Clone)]
pub struct StyleSheetHotswapper {
	roots: Vec<PathBuf>,
	prefix: String,
}

impl StyleSheetHotswapper {
	pub fn new(roots: Vec<PathBuf>, prefix: impl Into<String>) -> Self {
		Self {
			roots,
			prefix: prefix.into(),
		}
	}

	pub fn from_config(config: &HotswapConfig) -> Self {
		Self::new(config.stylesheet_roots.clone(), config.context_prefix.clone())
	}

	/// Served path of an on-disk stylesheet, if it lives below a root.
	pub fn served_path(&self, file: &Path) -> Option<String> {
		if !file.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("css")) {
			return None;
		}
		self.roots.iter().find_map(|root| {
			let relative = file.strip_prefix(root).ok()?;
			let parts: Vec<_> = relative.iter().map(|part| part.to_string_lossy()).collect();
			Some(format!("{}{}", self.prefix, parts.join("/")))
		})
	}
}

/// Turns a resource URI into a filesystem path.
pub fn resource_path(uri: &str) -> PathBuf {
	PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

impl HotswapListener for StyleSheetHotswapper {
	fn name(&self) -> &str {
		"stylesheet"
	}

	fn on_resources_change(&self, event: &mut HotswapResourceEvent) -> Result<(), ListenerError> {
		let resources = event.resources().clone();

		for uri in resources.created.iter().chain(&resources.modified) {
			let path = resource_path(uri);
			let Some(served) = self.served_path(&path) else {
				continue;
			};
			match std::fs::read_to_string(&path) {
				Ok(content) => {
					debug!(%served, "hot-patching stylesheet");
					event.update_client_resource(&served, Some(&content))?;
				}
				Err(e) => debug!(path = %path.display(), error = %e, "stylesheet not readable, skipped"),
			}
		}

		for uri in &resources.deleted {
			if let Some(served) = self.served_path(&resource_path(uri)) {
				debug!(%served, "removing stylesheet patch");
				event.update_client_resource(&served, None)?;
			}
		}
		Ok(())
	}
}
