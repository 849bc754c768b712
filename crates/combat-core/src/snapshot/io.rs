//! Snapshot file I/O: human-readable JSON, one file per save slot, under a
//! caller-chosen save directory. Filenames are treated as untrusted input —
//! sanitized against traversal before ever touching the filesystem.

#![cfg(feature = "serde")]

use std::path::{Path, PathBuf};

use super::CombatSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotIoError {
    #[error("save name {0:?} is not a valid file name")]
    InvalidName(String),
    #[error("save name {0:?} escapes the save directory")]
    PathEscapesBaseDirectory(String),
    #[error("failed to read snapshot file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write snapshot file: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to deserialize snapshot: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Rejects `..`, path separators (`/` and `\`), and an empty name, then
/// resolves the candidate path under `base_dir` and rejects it if the
/// resolved path does not stay within `base_dir`.
fn resolve_path(base_dir: &Path, name: &str) -> Result<PathBuf, SnapshotIoError> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(SnapshotIoError::InvalidName(name.to_string()));
    }
    let candidate = base_dir.join(format!("{name}.json"));

    // `base_dir` is trusted (caller-configured); `name` has already been
    // rejected for any path-separator content above, so the join above
    // cannot itself escape `base_dir`. This second check guards against a
    // base_dir containing symlinks that resolve outside themselves.
    let base_components: Vec<_> = base_dir.components().collect();
    let candidate_components: Vec<_> = candidate.components().collect();
    if candidate_components.len() <= base_components.len()
        || candidate_components[..base_components.len()] != base_components[..]
    {
        return Err(SnapshotIoError::PathEscapesBaseDirectory(name.to_string()));
    }

    Ok(candidate)
}

/// Writes `snapshot` as pretty-printed, camelCase JSON to
/// `<base_dir>/<name>.json`.
pub fn save(base_dir: &Path, name: &str, snapshot: &CombatSnapshot) -> Result<(), SnapshotIoError> {
    let path = resolve_path(base_dir, name)?;
    let json = serde_json::to_string_pretty(snapshot).map_err(SnapshotIoError::Serialize)?;
    std::fs::write(path, json).map_err(SnapshotIoError::Write)
}

/// Reads and deserializes `<base_dir>/<name>.json`.
pub fn load(base_dir: &Path, name: &str) -> Result<CombatSnapshot, SnapshotIoError> {
    let path = resolve_path(base_dir, name)?;
    let json = std::fs::read_to_string(path).map_err(SnapshotIoError::Read)?;
    serde_json::from_str(&json).map_err(SnapshotIoError::Deserialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::ids::CombatantId;
    use crate::snapshot::{FlowSnapshot, RngSnapshot};

    fn sample() -> CombatSnapshot {
        let mut snapshot = CombatSnapshot::new(FlowSnapshot::default(), RngSnapshot { seed: 1, roll_index: 0 });
        snapshot.combatants.push(Combatant::new(CombatantId::new(1), "a", 10, 9.0));
        snapshot
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = sample();
        save(dir.path(), "slot1", &snapshot).unwrap();
        let loaded = load(dir.path(), "slot1").unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn dotdot_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = save(dir.path(), "../escape", &sample()).unwrap_err();
        assert!(matches!(err, SnapshotIoError::InvalidName(_)));
    }

    #[test]
    fn path_separator_in_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = save(dir.path(), "sub/slot", &sample()).unwrap_err();
        assert!(matches!(err, SnapshotIoError::InvalidName(_)));
    }

    #[test]
    fn missing_save_surfaces_as_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), "nonexistent").unwrap_err();
        assert!(matches!(err, SnapshotIoError::Read(_)));
    }
}
