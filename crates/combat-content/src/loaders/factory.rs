//! Content factory for loading a whole data directory at once.

use std::path::{Path, PathBuf};

use combat_core::{BoostOrigin, CombatConfig, ParsedBoost};

use crate::descriptors::ability::AbilityDescriptor;
use crate::descriptors::combatant::CombatantTemplate;
use crate::descriptors::status::StatusDescriptor;
use crate::loaders::{
    AbilityLoader, BoostCatalogLoader, CombatantLoader, ConfigLoader, LoadResult, StatusLoader,
};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron
/// ├── statuses.ron
/// ├── combatants.ron
/// └── boosts.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<AbilityDescriptor>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Loads the status catalog from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<Vec<StatusDescriptor>> {
        StatusLoader::load(&self.data_dir.join("statuses.ron"))
    }

    /// Loads the combatant template catalog from `combatants.ron`.
    pub fn load_combatants(&self) -> LoadResult<Vec<CombatantTemplate>> {
        CombatantLoader::load(&self.data_dir.join("combatants.ron"))
    }

    /// Loads and parses the boost string catalog from `boosts.ron`.
    pub fn load_boosts(&self) -> LoadResult<Vec<(BoostOrigin, Vec<ParsedBoost>)>> {
        BoostCatalogLoader::load(&self.data_dir.join("boosts.ron"))
    }

    /// Loads the combat config overrides from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
