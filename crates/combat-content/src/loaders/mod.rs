//! Content loaders for reading ability/status/combatant data from files.
//!
//! Every loader parses one file format into the plain descriptors in
//! [`crate::descriptors`]; none of them execute an effect or touch
//! `combat_core::Arena` directly.

pub mod ability;
pub mod boost;
pub mod combatant;
pub mod config;
pub mod factory;
pub mod status;

pub use ability::AbilityLoader;
pub use boost::BoostCatalogLoader;
pub use combatant::CombatantLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use status::StatusLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
