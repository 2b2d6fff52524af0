/* src/watch/target.rs */

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use super::Result;
use crate::config::WatchConfig;

/// Compiled include/exclude rules for paths below the watched root.
#[derive(Debug)]
pub(crate) struct PathFilter {
	include: Option<GlobSet>,
	exclude: GlobSet,
	ignore_hidden: bool,
}

impl PathFilter {
	pub(crate) fn new(config: &WatchConfig) -> Result<Self> {
		let include = if config.include.is_empty() {
			None
		} else {
			Some(build_set(&config.include)?)
		};
		Ok(Self {
			include,
			exclude: build_set(&config.exclude)?,
			ignore_hidden: config.ignore_hidden,
		})
	}

	pub(crate) fn matches(&self, path: &Path, root: &Path) -> bool {
		let relative_path = path.strip_prefix(root).unwrap_or(path);

		if self.ignore_hidden {
			for component in relative_path.components() {
				if component
					.as_os_str()
					.to_str()
					.is_some_and(|s| s.starts_with('.') && s != "." && s != "..")
				{
					return false;
				}
			}
		}

		if self.exclude.is_match(relative_path) {
			return false;
		}
		match &self.include {
			Some(set) => set.is_match(relative_path),
			None => true,
		}
	}
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		builder.add(Glob::new(pattern)?);
	}
	Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_filter_rules() {
		let config = WatchConfig {
			include: vec!["**/*.css".to_string(), "**/*.properties".to_string()],
			exclude: vec!["build/**".to_string()],
			..WatchConfig::default()
		};
		let filter = PathFilter::new(&config).unwrap();
		let root = Path::new("/app");

		assert!(filter.matches(Path::new("/app/styles/main.css"), root));
		assert!(filter.matches(Path::new("/app/i18n/en.properties"), root));
		assert!(!filter.matches(Path::new("/app/src/app.js"), root));
		assert!(!filter.matches(Path::new("/app/build/main.css"), root));
		assert!(!filter.matches(Path::new("/app/.cache/main.css"), root));
	}
}
