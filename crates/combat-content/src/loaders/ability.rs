//! Ability catalog loader.

use std::path::Path;

use crate::descriptors::ability::AbilityDescriptor;
use crate::loaders::{LoadResult, read_file};

/// Loader for an ability catalog from a RON file.
///
/// RON format: `Vec<AbilityDescriptor>`.
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<AbilityDescriptor>> {
        let content = read_file(path)?;
        ron::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))
    }
}
