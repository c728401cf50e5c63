//! Change-driven reload for file-backed sources
//!
//! A background thread subscribes to filesystem notifications for every
//! source that requested reload-on-change. Events are debounced, the affected
//! sources re-parse their files, and the resolver swaps in a fresh snapshot.
//! Readers observe either the pre-reload or post-reload snapshot, never a
//! partial merge. The subscription is torn down when the resolver is
//! dropped.

use crate::error::Result;
use crate::resolver::ResolverState;
use crate::sync::RwLockExt;
use log::{debug, warn};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Weak;
use std::thread::JoinHandle;
use std::time::Duration;

/// Quiet period after the last filesystem event before reloading
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Handle to the watch subscription and its worker thread.
///
/// Dropping the handle closes the notification channel, which stops the
/// worker.
pub(crate) struct FileWatcher {
    watcher: Option<RecommendedWatcher>,
    thread: Option<JoinHandle<()>>,
}

impl FileWatcher {
    /// Subscribe to changes of `paths` and reload through `state`.
    ///
    /// Parent directories are watched rather than the files themselves, so
    /// replace-by-rename editors and recreated files keep notifying.
    pub(crate) fn spawn(state: Weak<ResolverState>, paths: Vec<PathBuf>) -> Result<Self> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |event| {
            let _ = tx.send(event);
        })?;

        let mut dirs = BTreeSet::new();
        for path in &paths {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            dirs.insert(dir);
        }
        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }
        debug!(
            "Watching {} directorie(s) for {} reloadable file(s)",
            dirs.len(),
            paths.len()
        );

        let thread = std::thread::spawn(move || run(state, &rx));

        Ok(Self {
            watcher: Some(watcher),
            thread: Some(thread),
        })
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        // Dropping the watcher first closes the channel and unblocks the
        // worker before the join
        self.watcher.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run(state: Weak<ResolverState>, rx: &Receiver<notify::Result<notify::Event>>) {
    loop {
        let mut pending = match rx.recv() {
            Ok(event) => event_paths(event),
            Err(_) => break,
        };

        // Debounce: keep draining until the stream stays quiet
        loop {
            match rx.recv_timeout(DEBOUNCE) {
                Ok(event) => pending.extend(event_paths(event)),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
        if pending.is_empty() {
            continue;
        }

        let Some(state) = state.upgrade() else { break };

        let mut reloaded = false;
        {
            let sources = state.sources.read_recovered();
            for source in sources.iter() {
                let Some(watch_path) = source.watch_path() else {
                    continue;
                };
                if !pending.iter().any(|p| matches(p, watch_path)) {
                    continue;
                }
                match source.reload() {
                    Ok(()) => {
                        debug!("Reloaded source '{}' after file change", source.name());
                        reloaded = true;
                    }
                    Err(e) => warn!(
                        "Reload of source '{}' failed, keeping previous values: {e}",
                        source.name()
                    ),
                }
            }
        }

        if reloaded {
            if let Err(e) = state.rebuild() {
                warn!("Snapshot rebuild after file change failed: {e}");
            }
        }
    }
}

fn event_paths(event: notify::Result<notify::Event>) -> Vec<PathBuf> {
    match event {
        Ok(event) => event.paths,
        Err(e) => {
            warn!("File watch event error: {e}");
            Vec::new()
        }
    }
}

/// Event paths come from the watched directory; matching by file name covers
/// both direct writes and replace-by-rename
fn matches(event_path: &Path, source_path: &Path) -> bool {
    match (event_path.file_name(), source_path.file_name()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
