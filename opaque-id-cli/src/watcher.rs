//! Regeneration triggers for `generate --watch`.
//!
//! Only changes that can alter a pass are reported: Rust sources, the crate
//! manifest (dependencies decide capabilities) and `opaque-id.toml`.
//! Directories the pass writes into are ignored so its own output never
//! re-triggers it.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use tracing::{debug, trace};

use crate::config::CONFIG_FILENAME;
use crate::error::{CliResult, WatchError};
use crate::manifest::MANIFEST_FILENAME;

const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// A change worth another pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A Rust source was created or edited.
    Source(PathBuf),
    /// `Cargo.toml` or `opaque-id.toml` was edited.
    Settings(PathBuf),
    /// A relevant file disappeared.
    Removed(PathBuf),
    Error(String),
}

impl WatchEvent {
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Source(path) | WatchEvent::Settings(path) | WatchEvent::Removed(path) => {
                Some(path)
            }
            WatchEvent::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WatchEvent::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Debounced recursive watcher over a crate root.
#[derive(Debug, Clone)]
pub struct FileWatcher {
    root: PathBuf,
    ignored: Vec<PathBuf>,
    debounce: Duration,
}

impl FileWatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignored: Vec::new(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }

    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce = Duration::from_millis(ms);
        self
    }

    /// Never report changes below `dir`.
    pub fn with_ignored(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ignored.push(dir.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// What a change at `path` means for the pass, if anything.
    ///
    /// `exists` tells an edit from a removal.
    pub fn classify(&self, path: &Path, exists: bool) -> Option<WatchEvent> {
        if self.ignored.iter().any(|dir| path.starts_with(dir)) {
            return None;
        }
        let is_settings = path
            .file_name()
            .is_some_and(|name| name == MANIFEST_FILENAME || name == CONFIG_FILENAME);
        let is_source = path.extension().is_some_and(|ext| ext == "rs");

        let path = path.to_path_buf();
        match (is_settings, is_source, exists) {
            (false, false, _) => None,
            (_, _, false) => Some(WatchEvent::Removed(path)),
            (true, _, true) => Some(WatchEvent::Settings(path)),
            (false, true, true) => Some(WatchEvent::Source(path)),
        }
    }

    /// Start watching. Events arrive on the receiver for as long as the
    /// returned debouncer is alive.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = mpsc::channel();
        let classifier = self.clone();

        let mut debouncer = new_debouncer(self.debounce, move |result: DebounceEventResult| {
            let events = match result {
                Ok(events) => events,
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                    return;
                }
            };
            for event in events {
                let exists = event.path.exists();
                match classifier.classify(&event.path, exists) {
                    Some(change) => {
                        let _ = tx.send(change);
                    }
                    None => trace!(path = %event.path.display(), "ignored change"),
                }
            }
        })
        .map_err(|e| WatchError::Init(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Notify(e.to_string()))?;

        debug!(root = %self.root.display(), debounce_ms = self.debounce.as_millis() as u64, "watching");
        Ok((debouncer, rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watcher() -> FileWatcher {
        FileWatcher::new("/shop").with_ignored("/shop/src/generated")
    }

    #[test]
    fn test_sources_and_settings() {
        let w = watcher();
        assert_eq!(
            w.classify(Path::new("/shop/src/orders.rs"), true),
            Some(WatchEvent::Source(PathBuf::from("/shop/src/orders.rs")))
        );
        assert_eq!(
            w.classify(Path::new("/shop/Cargo.toml"), true),
            Some(WatchEvent::Settings(PathBuf::from("/shop/Cargo.toml")))
        );
        assert_eq!(
            w.classify(Path::new("/shop/opaque-id.toml"), true),
            Some(WatchEvent::Settings(PathBuf::from("/shop/opaque-id.toml")))
        );
    }

    #[test]
    fn test_removals() {
        assert_eq!(
            watcher().classify(Path::new("/shop/src/old.rs"), false),
            Some(WatchEvent::Removed(PathBuf::from("/shop/src/old.rs")))
        );
    }

    #[test]
    fn test_irrelevant_and_ignored_paths() {
        let w = watcher();
        assert_eq!(w.classify(Path::new("/shop/README.md"), true), None);
        assert_eq!(w.classify(Path::new("/shop/notes.txt"), false), None);
        assert_eq!(
            w.classify(Path::new("/shop/src/generated/registration.rs"), true),
            None
        );
    }

    #[test]
    fn test_event_accessors() {
        let source = WatchEvent::Source(PathBuf::from("/shop/src/lib.rs"));
        assert_eq!(source.path(), Some(Path::new("/shop/src/lib.rs")));
        assert!(!source.is_error());

        let error = WatchEvent::Error("inotify limit reached".to_string());
        assert_eq!(error.path(), None);
        assert_eq!(error.error_message(), Some("inotify limit reached"));
    }

    #[test]
    fn test_debounce() {
        let w = FileWatcher::new("/shop").with_debounce(1000);
        assert_eq!(w.root(), Path::new("/shop"));
        assert_eq!(w.debounce, Duration::from_millis(1000));
    }
}
