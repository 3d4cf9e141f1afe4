use anyhow::{Context, Result};
use std::path::Path;

/// Create the taskflow data directory (idempotent).
///
/// Returns `true` if the directory was created by this call.
pub fn init_data_dir(data_dir: &Path) -> Result<bool> {
    if data_dir.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    Ok(true)
}
