/* src/config/mod.rs */

//!
//! Hotswap engine configuration.
//!
//! The types are always available. Loading from a file needs the `config`
//! feature, and the `toml`, `yaml` and `validate` features add parsers
//! and field validation.

mod error;
mod format;

pub use error::ConfigError;
pub use format::{ConfigFormat, Format, Json};

#[cfg(feature = "toml")]
pub use format::Toml;
#[cfg(feature = "yaml")]
pub use format::Yaml;

#[cfg(feature = "validate")]
use validator::Validate;

use std::path::PathBuf;

use globset::Glob;
use serde::{Deserialize, Serialize};

/// Environment variable that forces a page reload for redefined classes.
pub const FORCE_RELOAD_ENV: &str = "HOTSWAP_FORCE_RELOAD";

/// Default prefix under which stylesheets are served.
pub const DEFAULT_CONTEXT_PREFIX: &str = "context://";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "validate", derive(validator::Validate))]
#[serde(default)]
pub struct HotswapConfig {
	/// Hotswap never registers in production mode.
	pub production_mode: bool,
	/// Reload the page for every redefined class in play.
	pub force_reload: bool,
	/// Globs of translation bundles. A change to a match refreshes every UI.
	pub translation_patterns: Vec<String>,
	/// On-disk directories whose stylesheets are served below `context_prefix`.
	pub stylesheet_roots: Vec<PathBuf>,
	#[cfg_attr(feature = "validate", validate(length(min = 1)))]
	pub context_prefix: String,
	#[cfg_attr(feature = "validate", validate(nested))]
	pub watch: WatchConfig,
}

impl Default for HotswapConfig {
	fn default() -> Self {
		Self {
			production_mode: false,
			force_reload: false,
			translation_patterns: vec![
				"**/vaadin-i18n/**/*.properties".to_string(),
				"**/i18n/**/*.properties".to_string(),
			],
			stylesheet_roots: Vec::new(),
			context_prefix: DEFAULT_CONTEXT_PREFIX.to_string(),
			watch: WatchConfig::default(),
		}
	}
}

/// Resource watcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "validate", derive(validator::Validate))]
#[serde(default)]
pub struct WatchConfig {
	/// Quiet period before a batch of file events is flushed.
	#[cfg_attr(feature = "validate", validate(range(min = 1, max = 60000)))]
	pub debounce_ms: u64,
	/// Merge events of one path inside a batch.
	pub coalesce: bool,
	/// Skip dot files and dot directories.
	pub ignore_hidden: bool,
	/// Globs relative to the watched root. Empty means everything.
	pub include: Vec<String>,
	pub exclude: Vec<String>,
}

impl Default for WatchConfig {
	fn default() -> Self {
		Self {
			debounce_ms: 100,
			coalesce: true,
			ignore_hidden: true,
			include: Vec::new(),
			exclude: Vec::new(),
		}
	}
}

impl HotswapConfig {
	/// Parses a configuration document in the given format.
	pub fn from_slice(input: &[u8], format: ConfigFormat) -> Result<Self, ConfigError> {
		let config: Self = format.parse(input)?;
		config.check()?;
		Ok(config)
	}

	/// Reads a configuration file, picking the format from its extension.
	#[cfg(feature = "config")]
	pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
		let format = ConfigFormat::from_extension(ext).ok_or_else(|| ConfigError::UnsupportedFormat(ext.to_string()))?;
		let bytes = tokio::fs::read(path).await?;
		let config = Self::from_slice(&bytes, format)?;
		tracing::debug!(path = %path.display(), ?format, "loaded hotswap configuration");
		Ok(config)
	}

	/// Validates fields and compiles every glob once.
	pub fn check(&self) -> Result<(), ConfigError> {
		#[cfg(feature = "validate")]
		validator::Validate::validate(self)?;

		let globs = self
			.translation_patterns
			.iter()
			.chain(&self.watch.include)
			.chain(&self.watch.exclude);
		for pattern in globs {
			Glob::new(pattern).map_err(|e| ConfigError::Pattern {
				pattern: pattern.clone(),
				message: e.to_string(),
			})?;
		}
		Ok(())
	}
}

/// True when [`FORCE_RELOAD_ENV`] is set to `true` or `1`.
pub fn force_reload_from_env() -> bool {
	std::env::var(FORCE_RELOAD_ENV)
		.map(|value| parse_flag(&value))
		.unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
	let value = value.trim();
	value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_fill_missing_fields() {
		let config = HotswapConfig::from_slice(br#"{"force_reload": true}"#, ConfigFormat::Json).unwrap();
		assert!(config.force_reload);
		assert!(!config.production_mode);
		assert_eq!(config.context_prefix, DEFAULT_CONTEXT_PREFIX);
		assert_eq!(config.watch.debounce_ms, 100);
		assert!(config.translation_patterns.iter().any(|p| p.contains("vaadin-i18n")));
	}

	#[test]
	fn test_invalid_glob_is_rejected() {
		let err = HotswapConfig::from_slice(br#"{"translation_patterns": ["a/[b"]}"#, ConfigFormat::Json).unwrap_err();
		assert!(matches!(err, ConfigError::Pattern { .. }));
	}

	#[test]
	fn test_parse_flag() {
		assert!(parse_flag("true"));
		assert!(parse_flag(" TRUE "));
		assert!(parse_flag("1"));
		assert!(!parse_flag("yes"));
		assert!(!parse_flag(""));
	}

	#[test]
	fn test_from_extension() {
		assert_eq!(ConfigFormat::from_extension("JSON"), Some(ConfigFormat::Json));
		assert_eq!(ConfigFormat::from_extension("ini"), None);
	}
}
