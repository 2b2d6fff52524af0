/* src/hotswap/error.rs */

use thiserror::Error;

/// Errors raised by the hotswap engine and its event model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotswapError {
	/// A listener passed an empty resource path or event name.
	#[error("invalid argument: {0}")]
	InvalidArgument(&'static str),

	/// Navigation to a path without a registered route.
	#[error("no route registered for path: {0}")]
	UnknownRoute(String),

	/// A hotswap listener returned an error. Logged, never propagated.
	#[error("hotswap listener {listener} failed during {stage}: {message}")]
	ListenerFailed {
		listener: String,
		stage: &'static str,
		message: String,
	},

	/// A hotswap listener panicked. Logged, never propagated.
	#[error("hotswap listener {listener} panicked during {stage}: {message}")]
	ListenerPanicked {
		listener: String,
		stage: &'static str,
		message: String,
	},
}

/// Error type returned by hotswap listener hooks.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;
