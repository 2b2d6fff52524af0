/* src/watch/worker.rs */

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};

use super::ChangeKind;
use super::target::PathFilter;
use crate::event::ResourceChangeSet;

struct DebounceState {
	last_seen: Instant,
	kind: ChangeKind,
}

pub(crate) struct WorkerSettings {
	pub(crate) filter: PathFilter,
	pub(crate) debounce: Duration,
	pub(crate) coalesce: bool,
	pub(crate) root: PathBuf,
}

pub(crate) async fn process_events(
	mut raw_rx: mpsc::Receiver<notify::Result<notify::Event>>,
	tx: broadcast::Sender<ResourceChangeSet>,
	settings: WorkerSettings,
) {
	let mut pending: HashMap<PathBuf, DebounceState> = HashMap::new();

	let tick_rate = if settings.debounce < Duration::from_millis(50) {
		settings.debounce
	} else {
		settings.debounce / 5
	};
	let mut interval = tokio::time::interval(tick_rate.max(Duration::from_millis(1)));

	loop {
		tokio::select! {
			maybe_event = raw_rx.recv() => {
				match maybe_event {
					Some(Ok(event)) => handle_raw_event(event, &mut pending, &settings),
					Some(Err(e)) => tracing::error!("Notify error: {:?}", e),
					None => break,
				}
			}
			_ = interval.tick() => {
				flush_pending(&mut pending, &tx, settings.debounce);
			}
		}
	}

	// Source closed: deliver what is left.
	flush_pending(&mut pending, &tx, Duration::ZERO);
}

fn handle_raw_event(event: notify::Event, pending: &mut HashMap<PathBuf, DebounceState>, settings: &WorkerSettings) {
	use notify::EventKind as NK;
	let kind = match event.kind {
		NK::Create(_) => ChangeKind::Create,
		NK::Modify(_) => ChangeKind::Modify,
		NK::Remove(_) => ChangeKind::Remove,
		_ => return,
	};

	for path in event.paths {
		if !settings.filter.matches(&path, &settings.root) {
			continue;
		}
		record(pending, path, kind, settings.coalesce);
	}
}

fn record(pending: &mut HashMap<PathBuf, DebounceState>, path: PathBuf, kind: ChangeKind, coalesce: bool) {
	let mut state = match pending.entry(path) {
		Entry::Vacant(slot) => {
			slot.insert(DebounceState {
				last_seen: Instant::now(),
				kind,
			});
			return;
		}
		Entry::Occupied(state) => state,
	};
	let current = state.get_mut();
	current.last_seen = Instant::now();
	if !coalesce {
		current.kind = kind;
		return;
	}
	match (current.kind, kind) {
		// never seen by the consumer
		(ChangeKind::Create, ChangeKind::Remove) => {
			state.remove();
		}
		// still new to the consumer
		(ChangeKind::Create, ChangeKind::Modify) => {}
		(ChangeKind::Remove, ChangeKind::Modify) => {}
		// recreated after removal within the window
		(ChangeKind::Remove, ChangeKind::Create) => current.kind = ChangeKind::Modify,
		_ => current.kind = kind,
	}
}

fn flush_pending(
	pending: &mut HashMap<PathBuf, DebounceState>,
	tx: &broadcast::Sender<ResourceChangeSet>,
	debounce: Duration,
) {
	let now = Instant::now();
	let mut ready: Vec<(PathBuf, ChangeKind)> = Vec::new();
	pending.retain(|path, state| {
		if now.duration_since(state.last_seen) >= debounce {
			ready.push((path.clone(), state.kind));
			false
		} else {
			true
		}
	});
	if ready.is_empty() {
		return;
	}
	ready.sort();

	let mut batch = ResourceChangeSet::default();
	for (path, kind) in ready {
		let uri = to_uri(&path);
		match kind {
			ChangeKind::Create => batch.created.push(uri),
			ChangeKind::Modify => batch.modified.push(uri),
			ChangeKind::Remove => batch.deleted.push(uri),
		}
	}
	tracing::trace!(?batch, "resource batch ready");
	// No subscriber is not an error.
	let _ = tx.send(batch);
}

fn to_uri(path: &Path) -> String {
	format!("file://{}", path.display())
}
