/* src/config/error.rs */

/// Errors raised while reading or checking a [`HotswapConfig`](super::HotswapConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The document does not parse in the selected format.
	#[error("parse error: {0}")]
	Parse(String),

	/// No parser is compiled in for the file extension.
	#[error("unsupported config format: {0}")]
	UnsupportedFormat(String),

	/// A glob in the configuration does not compile.
	#[error("invalid pattern {pattern:?}: {message}")]
	Pattern { pattern: String, message: String },

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[cfg(feature = "validate")]
	#[error("validation failed: {0}")]
	Validation(#[from] validator::ValidationErrors),
}
