//! Manifest watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Watches the manifest directory and emits a trigger on every change to
/// a JSON file in it.
pub struct ManifestWatcher {
    dir: PathBuf,
    poll_interval: Duration,
    trigger_tx: mpsc::UnboundedSender<()>,
}

impl ManifestWatcher {
    /// Create a new ManifestWatcher.
    ///
    /// Returns the watcher and a receiver of reload triggers.
    pub fn new(dir: &Path, poll_interval: Duration) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();

        (
            Self {
                dir: dir.to_path_buf(),
                poll_interval,
                trigger_tx,
            },
            trigger_rx,
        )
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.trigger_tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_manifest_change(&event) => {
                    tracing::debug!(paths = ?event.paths, "Manifest change detected");
                    let _ = tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.dir, "Manifest watcher started");
        Ok(watcher)
    }
}

fn is_manifest_change(event: &Event) -> bool {
    (event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove())
        && event
            .paths
            .iter()
            .any(|path| path.extension().is_some_and(|ext| ext == "json"))
}
