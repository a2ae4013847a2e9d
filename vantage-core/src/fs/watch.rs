//! Debounced directory watching.
//!
//! A thin wrapper around `notify` that collapses bursts of raw filesystem
//! notifications into a single payloadless "something changed, re-list"
//! signal. One watch slot exists per service instance; starting a new watch
//! silently supersedes the previous subscription.

use std::fmt;
use std::path::Path;

use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};
use tracing::{debug, warn};

use crate::error::{BrowserError, Result};

/// Tuning for watch processing.
#[derive(Clone, Debug)]
pub struct WatchConfig {
    /// Debounce window for coalescing rapid event bursts. Every raw event
    /// restarts the window; the signal fires once it stays quiet.
    pub debounce_window: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(500),
        }
    }
}

impl From<&vantage_config::WatchSettings> for WatchConfig {
    fn from(settings: &vantage_config::WatchSettings) -> Self {
        Self {
            debounce_window: Duration::from_millis(settings.debounce_ms.max(1)),
        }
    }
}

/// Single-slot directory watcher.
///
/// Watches one directory non-recursively: only entries appearing,
/// disappearing, or changing at the top level are observed. Dotfile-only
/// events (sidecar writes included) are ignored.
pub struct DirectoryWatcher {
    config: WatchConfig,
    active: Mutex<Option<WatchHandle>>,
}

impl fmt::Debug for DirectoryWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self
            .active
            .try_lock()
            .map(|guard| guard.is_some())
            .unwrap_or(true);
        f.debug_struct("DirectoryWatcher")
            .field("config", &self.config)
            .field("active", &active)
            .finish()
    }
}

impl DirectoryWatcher {
    pub fn new(config: WatchConfig) -> Self {
        Self {
            config,
            active: Mutex::new(None),
        }
    }

    /// Begin watching `path`, replacing any existing subscription.
    ///
    /// Debounced change signals are delivered on `changes`; no payload is
    /// carried, callers re-list on receipt. Dropping the receiver ends
    /// delivery but the OS watch handle stays held until [`Self::unwatch`]
    /// or the next [`Self::watch`].
    pub async fn watch(&self, path: &Path, changes: mpsc::Sender<()>) -> Result<()> {
        let (raw_tx, raw_rx) = mpsc::channel::<()>(64);

        let event_path = path.to_path_buf();
        let mut watcher = RecommendedWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if is_visible_change(&event) && raw_tx.blocking_send(()).is_err() {
                        debug!(
                            path = %event_path.display(),
                            "watch channel closed, dropping event"
                        );
                    }
                }
                Err(err) => {
                    warn!(path = %event_path.display(), error = %err, "watch error");
                }
            },
            NotifyConfig::default(),
        )
        .map_err(|err| {
            BrowserError::Internal(format!(
                "failed to create watcher for {}: {err}",
                path.display()
            ))
        })?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|err| {
                BrowserError::Internal(format!("failed to watch {}: {err}", path.display()))
            })?;

        let debounce_task = tokio::spawn(debounce_loop(
            raw_rx,
            changes,
            self.config.debounce_window,
        ));

        let handle = WatchHandle {
            _watcher: watcher,
            debounce_task,
        };
        if let Some(previous) = self.active.lock().await.replace(handle) {
            previous.shutdown();
        }
        debug!(path = %path.display(), "watching directory");
        Ok(())
    }

    /// Stop watching. Idempotent; safe with no active subscription.
    pub async fn unwatch(&self) {
        if let Some(handle) = self.active.lock().await.take() {
            handle.shutdown();
        }
    }

    #[cfg(test)]
    pub async fn is_watching(&self) -> bool {
        self.active.lock().await.is_some()
    }
}

struct WatchHandle {
    _watcher: RecommendedWatcher,
    debounce_task: JoinHandle<()>,
}

impl WatchHandle {
    fn shutdown(self) {
        self.debounce_task.abort();
        // Dropping the watcher stops the notify stream.
    }
}

/// Single-slot timer: each raw event restarts the window; one signal goes
/// out when a burst stays quiet for the full window.
async fn debounce_loop(
    mut raw_rx: mpsc::Receiver<()>,
    changes: mpsc::Sender<()>,
    window: Duration,
) {
    while raw_rx.recv().await.is_some() {
        loop {
            match timeout(window, raw_rx.recv()).await {
                // Another event inside the window; keep waiting.
                Ok(Some(())) => {}
                // Watcher gone; flush the pending signal and stop.
                Ok(None) => {
                    let _ = changes.send(()).await;
                    return;
                }
                // Quiet for a full window.
                Err(_) => break,
            }
        }
        if changes.send(()).await.is_err() {
            return;
        }
    }
}

/// Events that only touch hidden entries are invisible to listings and are
/// not worth a refresh. Pure access events never are.
fn is_visible_change(event: &Event) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    if event.paths.is_empty() {
        return true;
    }
    !event.paths.iter().all(|path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'))
    })
}
