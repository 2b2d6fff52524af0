/* tests/force_reload_env.rs */

// Kept in its own binary: the variable is process wide.

mod common;

use common::{LiveCall, host};
use hotswap::config::{FORCE_RELOAD_ENV, force_reload_from_env};
use hotswap::model::PushMode;

#[test]
fn test_environment_forces_reload() {
	let host = host(Vec::new());
	let session = host.session("s1");
	let (_, channel) = host.open_ui(&session, PushMode::Automatic, "orders");

	unsafe { std::env::set_var(FORCE_RELOAD_ENV, "true") };
	assert!(force_reload_from_env());
	host.hotswapper.on_hotswap(&["app.Orders"], true);
	assert_eq!(host.live.calls(), vec![LiveCall::Reload]);
	assert!(channel.refreshes().is_empty());

	unsafe { std::env::set_var(FORCE_RELOAD_ENV, "false") };
	host.live.clear();
	host.hotswapper.on_hotswap(&["app.Orders"], true);
	assert!(host.live.calls().is_empty());
	assert_eq!(channel.refreshes(), vec![false]);

	unsafe { std::env::remove_var(FORCE_RELOAD_ENV) };
}
