//! Filesystem event handler for the notify watcher (hot-reload).

use std::path::Path;
use std::sync::{Arc, RwLock};

use notify::event::{CreateKind, ModifyKind};
use notify::{Event, EventKind};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::core::{reload_snapshot, ActiveConfig};

/// Handle a single filesystem event from the notify watcher.
pub(super) fn handle_fs_event(
    event: &Event,
    config_path: &Path,
    active: &Arc<RwLock<Arc<ActiveConfig>>>,
    changes: &watch::Sender<Arc<ActiveConfig>>,
) {
    let relevant = matches!(
        event.kind,
        EventKind::Create(CreateKind::File | CreateKind::Any)
            | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any)
    );
    if !relevant {
        return;
    }

    let target = config_path.file_name();
    if !event.paths.iter().any(|p| p.file_name() == target) {
        return;
    }

    match reload_snapshot(config_path, active, changes) {
        Ok(true) => {}
        Ok(false) => debug!(path = %config_path.display(), "config unchanged, skipping reload"),
        Err(e) => warn!(
            path = %config_path.display(),
            error = %e,
            "failed to reload config, keeping previous version"
        ),
    }
}
