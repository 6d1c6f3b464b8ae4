//! `.env` loading.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Loads `path` into the process environment if it exists.
///
/// Variables that are already set keep their values.
pub fn load_env_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        debug!(path = %path.display(), "no environment file");
        return Ok(());
    }
    dotenv::from_path(path)
        .with_context(|| format!("load environment file {}", path.display()))?;
    info!(path = %path.display(), "loaded environment file");
    Ok(())
}
