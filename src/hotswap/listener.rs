/* src/hotswap/listener.rs */

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

use super::{HotswapError, ListenerError};
use crate::event::{HotswapClassEvent, HotswapClassSessionEvent, HotswapCompleteEvent, HotswapResourceEvent};
use crate::model::Service;

/// Pluggable hotswap logic invoked by the [`Hotswapper`](super::Hotswapper).
///
/// Every hook has a no-op default. Class hooks return `true` to request a
/// full browser reload.
pub trait HotswapListener: Send + Sync {
	/// Name used in log messages.
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	/// Called once when the hotswapper is registered for `service`.
	fn on_init(&self, _service: &Arc<Service>) {}

	/// Classes changed; service scope. Runs before any session scope call.
	fn on_classes_change(&self, _event: &mut HotswapClassEvent) -> Result<bool, ListenerError> {
		Ok(false)
	}

	/// Classes changed; invoked once per active session, under its lock.
	fn on_session_classes_change(&self, _event: &mut HotswapClassSessionEvent<'_>) -> Result<bool, ListenerError> {
		Ok(false)
	}

	/// Resources changed on disk.
	fn on_resources_change(&self, _event: &mut HotswapResourceEvent) -> Result<(), ListenerError> {
		Ok(())
	}

	/// The class hotswap cycle is over.
	fn on_hotswap_complete(&self, _event: &HotswapCompleteEvent) -> Result<(), ListenerError> {
		Ok(())
	}
}

/// Runs a listener hook, turning errors and panics into a logged `None`.
pub(crate) fn isolate<T>(
	listener: &dyn HotswapListener,
	stage: &'static str,
	hook: impl FnOnce() -> Result<T, ListenerError>,
) -> Option<T> {
	let error = match panic::catch_unwind(AssertUnwindSafe(hook)) {
		Ok(Ok(value)) => return Some(value),
		Ok(Err(err)) => HotswapError::ListenerFailed {
			listener: listener.name().to_string(),
			stage,
			message: err.to_string(),
		},
		Err(payload) => HotswapError::ListenerPanicked {
			listener: listener.name().to_string(),
			stage,
			message: panic_message(payload.as_ref()),
		},
	};
	debug!("{}", error);
	None
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic payload".to_string()
	}
}
