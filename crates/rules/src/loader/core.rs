//! Core [`ConfigLoader`] struct: file-backed config loading with optional hot-reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::evaluator::RuleSet;
use crate::schema::WatchConfig;
use crate::validation::{validate_config, ValidationWarning};

use super::error::{Result, RuleError};
use super::watcher::handle_fs_event;

/// A validated, compiled config. Never mutated after construction; reloads
/// replace the whole snapshot.
#[derive(Debug)]
pub struct ActiveConfig {
    pub config: WatchConfig,
    pub rules: RuleSet,
    /// File contents the snapshot was built from.
    pub raw: String,
    pub warnings: Vec<ValidationWarning>,
}

impl ActiveConfig {
    /// Parse, validate and compile a config document.
    pub fn parse(raw: &str) -> Result<Self> {
        let config = WatchConfig::from_yaml(raw)?;

        let report = validate_config(&config);
        if !report.valid {
            return Err(RuleError::Validation(report.error_summary()));
        }

        let rules = RuleSet::compile(&config.rules)?;
        Ok(Self {
            config,
            rules,
            raw: raw.to_string(),
            warnings: report.warnings,
        })
    }
}

/// Shared slot holding the active snapshot.
pub(crate) type SharedSnapshot = Arc<RwLock<Arc<ActiveConfig>>>;

/// File-backed config loader.
///
/// Holds the active [`ActiveConfig`] behind an `Arc` swap so readers take a
/// cheap clone of the current snapshot and never observe a half-applied
/// reload.
pub struct ConfigLoader {
    /// Path to the YAML config file.
    path: PathBuf,
    pub(super) active: SharedSnapshot,
    /// Notifies subscribers after every successful swap.
    pub(super) changes: Arc<watch::Sender<Arc<ActiveConfig>>>,
    /// Active filesystem watcher (held to keep it alive).
    pub(super) _watcher: Option<RecommendedWatcher>,
}

impl ConfigLoader {
    /// Load the config at `path`. Any parse, validation or compile error is
    /// returned; there is no previous snapshot to fall back to.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let active = Arc::new(Self::load_file(&path)?);
        info!(
            path = %path.display(),
            rules = active.rules.len(),
            sinks = active.config.match_outputs.len(),
            "loaded config"
        );

        let (tx, _rx) = watch::channel(Arc::clone(&active));
        Ok(Self {
            path,
            active: Arc::new(RwLock::new(active)),
            changes: Arc::new(tx),
            _watcher: None,
        })
    }

    /// Read and build a snapshot from a file without installing it.
    pub fn load_file(path: &Path) -> Result<ActiveConfig> {
        let contents = fs::read_to_string(path)?;
        let active = ActiveConfig::parse(&contents)?;
        for w in &active.warnings {
            warn!(path = %w.path, "{}", w.message);
        }
        Ok(active)
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The snapshot that is active right now.
    pub fn snapshot(&self) -> Arc<ActiveConfig> {
        Arc::clone(&self.active.read().expect("config lock poisoned"))
    }

    /// Get the shared snapshot slot.
    #[cfg(test)]
    pub(crate) fn shared(&self) -> SharedSnapshot {
        Arc::clone(&self.active)
    }

    /// Receive every snapshot installed after this call.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ActiveConfig>> {
        self.changes.subscribe()
    }

    /// Re-read the file and swap the snapshot if the contents changed.
    ///
    /// Returns `Ok(false)` when the file is byte-identical to the active
    /// snapshot. On error the active snapshot is left untouched.
    pub fn reload(&self) -> Result<bool> {
        reload_snapshot(&self.path, &self.active, &self.changes)
    }

    /// Start a filesystem watcher on the config file's directory.
    ///
    /// Editors commonly replace files by rename, so the parent directory is
    /// watched and events are filtered by file name.
    pub fn watch(&mut self) -> Result<()> {
        let path = self.path.clone();
        let active = Arc::clone(&self.active);
        let changes = Arc::clone(&self.changes);

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => handle_fs_event(&event, &path, &active, &changes),
                Err(e) => warn!(error = %e, "filesystem watcher error"),
            },
        )?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        info!(path = %self.path.display(), "watching config file for changes");
        self._watcher = Some(watcher);
        Ok(())
    }
}

pub(super) fn reload_snapshot(
    path: &Path,
    active: &SharedSnapshot,
    changes: &watch::Sender<Arc<ActiveConfig>>,
) -> Result<bool> {
    let contents = fs::read_to_string(path)?;
    if active.read().expect("config lock poisoned").raw == contents {
        return Ok(false);
    }

    let next = ActiveConfig::parse(&contents)?;
    for w in &next.warnings {
        warn!(path = %w.path, "{}", w.message);
    }
    let next = Arc::new(next);
    *active.write().expect("config lock poisoned") = Arc::clone(&next);
    info!(
        path = %path.display(),
        rules = next.rules.len(),
        sinks = next.config.match_outputs.len(),
        "config reloaded"
    );
    changes.send_replace(next);
    Ok(true)
}
