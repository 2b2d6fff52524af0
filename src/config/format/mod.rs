/* src/config/format/mod.rs */

use super::ConfigError;
use serde::de::DeserializeOwned;

mod json;
pub use json::Json;

#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "toml")]
pub use self::toml::Toml;

#[cfg(feature = "yaml")]
mod yaml;
#[cfg(feature = "yaml")]
pub use yaml::Yaml;

/// Parser that converts raw bytes into a structured object.
pub trait Format: Send + Sync {
	/// Supported file extensions, without the leading dot.
	fn extensions(&self) -> &'static [&'static str];

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, ConfigError>;
}

/// Every format compiled into the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
	Json,
	#[cfg(feature = "toml")]
	Toml,
	#[cfg(feature = "yaml")]
	Yaml,
}

impl ConfigFormat {
	pub const ALL: &'static [ConfigFormat] = &[
		ConfigFormat::Json,
		#[cfg(feature = "toml")]
		ConfigFormat::Toml,
		#[cfg(feature = "yaml")]
		ConfigFormat::Yaml,
	];

	/// Picks the format registered for a file extension, case-insensitively.
	pub fn from_extension(ext: &str) -> Option<Self> {
		let ext = ext.to_ascii_lowercase();
		Self::ALL
			.iter()
			.copied()
			.find(|format| format.extensions().contains(&ext.as_str()))
	}
}

impl Format for ConfigFormat {
	fn extensions(&self) -> &'static [&'static str] {
		match self {
			Self::Json => Json.extensions(),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.extensions(),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.extensions(),
		}
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, ConfigError> {
		match self {
			Self::Json => Json.parse(input),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.parse(input),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.parse(input),
		}
	}
}
