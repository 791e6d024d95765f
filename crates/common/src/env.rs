//! Environment/runtime helpers
//!
//! Sanity checks to ensure the session data directory exists at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the parent directory of the session store file exists.
pub fn ensure_data_dir(store_path: &Path) -> anyhow::Result<()> {
    let Some(parent) = store_path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if parent.exists() {
        debug!(dir = %parent.display(), "session data directory present");
        return Ok(());
    }
    warn!(dir = %parent.display(), "session data directory missing; creating it");
    std::fs::create_dir_all(parent)
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}
