//! Combatant template catalog loader.

use std::path::Path;

use crate::descriptors::combatant::CombatantTemplate;
use crate::loaders::{LoadResult, read_file};

/// Loader for a combatant template catalog from a RON file.
///
/// RON format: `Vec<CombatantTemplate>`.
pub struct CombatantLoader;

impl CombatantLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<CombatantTemplate>> {
        let content = read_file(path)?;
        ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combatant template catalog RON: {}", e))
    }
}
