/* src/watch/watcher.rs */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::target::PathFilter;
use super::worker::{WorkerSettings, process_events};
use super::{Result, WatchError};
use crate::config::WatchConfig;
use crate::event::ResourceChangeSet;
use crate::hotswap::Hotswapper;

/// Watches a directory tree and publishes debounced resource batches.
///
/// Must be created inside a tokio runtime.
pub struct ResourceWatcher {
	_internal_watcher: RecommendedWatcher,
	task_handle: JoinHandle<()>,
	batch_tx: broadcast::Sender<ResourceChangeSet>,
	root: PathBuf,
}

impl ResourceWatcher {
	/// Starts watching `root` recursively. A relative `root` is resolved
	/// against the current directory.
	#[must_use = "ResourceWatcher must be kept alive"]
	pub fn new(root: impl Into<PathBuf>, config: &WatchConfig) -> Result<Self> {
		let root = root.into();
		if !root.exists() {
			return Err(WatchError::Config(format!("Path does not exist: {:?}", root)));
		}
		// batch URIs are built from the absolute path
		let root = root.canonicalize()?;
		if config.debounce_ms == 0 {
			return Err(WatchError::Config("debounce must be positive".to_string()));
		}

		let (raw_tx, raw_rx) = mpsc::channel(100);
		let mut internal_watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
			let _ = raw_tx.blocking_send(res);
		})?;

		let settings = WorkerSettings {
			filter: PathFilter::new(config)?,
			debounce: Duration::from_millis(config.debounce_ms),
			coalesce: config.coalesce,
			root: root.clone(),
		};

		internal_watcher.watch(&root, RecursiveMode::Recursive)?;

		let (batch_tx, _) = broadcast::channel(100);
		let tx_clone = batch_tx.clone();
		let task_handle = tokio::spawn(async move {
			process_events(raw_rx, tx_clone, settings).await;
		});

		tracing::debug!(root = %root.display(), "resource watcher started");
		Ok(Self {
			_internal_watcher: internal_watcher,
			task_handle,
			batch_tx,
			root,
		})
	}

	pub fn root(&self) -> &PathBuf {
		&self.root
	}

	pub fn subscribe(&self) -> broadcast::Receiver<ResourceChangeSet> {
		self.batch_tx.subscribe()
	}

	/// Forwards every batch to `hotswapper` until the watcher stops.
	///
	/// Dispatch runs on the blocking pool since it takes session locks.
	pub fn forward(&self, hotswapper: Arc<Hotswapper>) -> JoinHandle<()> {
		let mut rx = self.subscribe();
		tokio::spawn(async move {
			loop {
				match rx.recv().await {
					Ok(batch) => {
						let hotswapper = Arc::clone(&hotswapper);
						if let Err(e) = tokio::task::spawn_blocking(move || hotswapper.dispatch_resources(batch)).await {
							tracing::error!("Resource dispatch failed: {}", e);
						}
					}
					Err(broadcast::error::RecvError::Lagged(skipped)) => {
						tracing::warn!(skipped, "resource batches dropped, dispatch too slow");
					}
					Err(broadcast::error::RecvError::Closed) => break,
				}
			}
		})
	}

	pub fn stop(&self) {
		self.task_handle.abort();
	}
}

impl Drop for ResourceWatcher {
	fn drop(&mut self) {
		self.task_handle.abort();
	}
}

#[cfg(feature = "watch-stream")]
pub struct ChangeStream {
	inner: tokio_stream::wrappers::BroadcastStream<ResourceChangeSet>,
}

#[cfg(feature = "watch-stream")]
impl futures_util::Stream for ChangeStream {
	type Item = std::result::Result<ResourceChangeSet, tokio_stream::wrappers::errors::BroadcastStreamRecvError>;

	fn poll_next(
		mut self: std::pin::Pin<&mut Self>,
		cx: &mut std::task::Context<'_>,
	) -> std::task::Poll<Option<Self::Item>> {
		futures_util::Stream::poll_next(std::pin::Pin::new(&mut self.inner), cx)
	}
}

#[cfg(feature = "watch-stream")]
impl ResourceWatcher {
	pub fn stream(&self) -> ChangeStream {
		ChangeStream {
			inner: tokio_stream::wrappers::BroadcastStream::new(self.subscribe()),
		}
	}
}
