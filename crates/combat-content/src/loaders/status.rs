//! Status catalog loader.

use std::path::Path;

use crate::descriptors::status::StatusDescriptor;
use crate::loaders::{LoadResult, read_file};

/// Loader for a status catalog from a RON file.
///
/// RON format: `Vec<StatusDescriptor>`.
pub struct StatusLoader;

impl StatusLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<StatusDescriptor>> {
        let content = read_file(path)?;
        ron::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse status catalog RON: {}", e))
    }
}
