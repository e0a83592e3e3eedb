//! Small helpers shared across modules.

use std::{fs, path::Path};

use crate::error::Result;

/// Create a directory, and its parents, if it doesn't already exist.
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}
