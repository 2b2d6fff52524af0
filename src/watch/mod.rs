/* src/watch/mod.rs */

//!
//! Filesystem watcher feeding resource changes into a [`Hotswapper`].
//!
//! Raw `notify` events are filtered, debounced and coalesced per path,
//! then published in batches as [`ResourceChangeSet`]s.
//!
//! [`Hotswapper`]: crate::hotswap::Hotswapper
//! [`ResourceChangeSet`]: crate::event::ResourceChangeSet

mod target;
mod watcher;
mod worker;

pub use watcher::ResourceWatcher;

#[cfg(feature = "watch-stream")]
pub use watcher::ChangeStream;

/// Errors raised while setting up a [`ResourceWatcher`].
#[derive(thiserror::Error, Debug)]
pub enum WatchError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Notify error: {0}")]
	Notify(#[from] notify::Error),

	#[error("Invalid configuration: {0}")]
	Config(String),

	#[error("Glob pattern error: {0}")]
	Glob(#[from] globset::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;

/// Kind of change recorded for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKind {
	Create,
	Modify,
	Remove,
}
