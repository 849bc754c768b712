//! Boost string catalog loader. Boost strings are free-form DSL text (see
//! `combat_core::boost`); this loader only reads them off disk and hands
//! them to the real parser, it does not reinterpret the DSL itself.

use std::path::Path;

use combat_core::{BoostOrigin, ParsedBoost, parse_boost_string};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One content entry's raw boost strings, as written in a RON catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBoostEntry {
    kind: String,
    id: String,
    boosts: Vec<String>,
}

/// Loader for a boost string catalog from a RON file.
///
/// RON format: `Vec<RawBoostEntry>`, each a `{kind, id, boosts}` triple.
/// Fails on the first malformed boost string; content is not recoverable
/// at load time.
pub struct BoostCatalogLoader;

impl BoostCatalogLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(BoostOrigin, Vec<ParsedBoost>)>> {
        let content = read_file(path)?;
        let raw: Vec<RawBoostEntry> =
            ron::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse boost catalog RON: {}", e))?;

        raw.into_iter()
            .map(|entry| {
                let origin = BoostOrigin::new(entry.kind, entry.id);
                let mut parsed = Vec::new();
                for raw_boost in &entry.boosts {
                    let mut clauses = parse_boost_string(raw_boost, origin.clone()).map_err(|e| {
                        anyhow::anyhow!("Failed to parse boost string '{}': {}", raw_boost, e)
                    })?;
                    parsed.append(&mut clauses);
                }
                Ok((origin, parsed))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_parses_a_boost_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[(kind: "status", id: "bless", boosts: ["advantage(attack_roll)"])]"#
        )
        .unwrap();
        let loaded = BoostCatalogLoader::load(file.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0.id, "bless");
        assert_eq!(loaded[0].1.len(), 1);
    }
}
