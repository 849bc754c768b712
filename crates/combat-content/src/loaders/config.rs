//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`CombatConfig`] from a TOML file.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        toml::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_overridden_resolution_depth() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_critical_threshold = 20\nmax_resolution_depth = 16\nhalf_cover_ac_bonus = 2\nthree_quarters_cover_ac_bonus = 5\n"
        )
        .unwrap();
        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.max_resolution_depth, 16);
    }
}
