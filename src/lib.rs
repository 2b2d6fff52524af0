/* src/lib.rs */

//!
//! Development-mode hotswap coordination for server-driven web UIs.
//!
//! When classes or resources change while the application runs, this
//! crate decides which live UIs are affected and how each browser is
//! brought up to date: a route refresh over push, a layout chain refresh,
//! a live-reload refresh or a full page reload.
//!
//! - **model**: sessions, UIs, component trees, routes and the service.
//! - **event**: events handed to hotswap listeners.
//! - **hotswap**: the [`Hotswapper`] dispatcher, the tree walker, change
//!   classification and refresh strategy selection.
//! - **config**: [`HotswapConfig`] and its file formats.
//! - **watch**: filesystem watcher that feeds resource changes in.
//!
//! ## Feature Flags
//!
//! - `config` (default): async loading of configuration files.
//! - `toml`, `yaml`: extra configuration formats.
//! - `validate`: field validation with `validator`.
//! - `watch` (default): the `notify` based resource watcher.
//! - `watch-stream`: expose watcher batches as a `Stream`.
//! - `full`: everything above.

pub mod config;
pub mod event;
pub mod hotswap;
pub mod model;

#[cfg(feature = "watch")]
pub mod watch;

pub use config::{ConfigError, HotswapConfig, WatchConfig};
pub use event::{HotswapEvent, UiUpdateStrategy};
pub use hotswap::{HotswapError, HotswapListener, Hotswapper, StyleSheetHotswapper};
pub use model::{Service, ServiceBuilder};
