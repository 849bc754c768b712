//! Forward-only snapshot migration. Takes a raw, untrusted JSON document of
//! unknown (but declared) schema version and upgrades it to
//! [`CURRENT_SCHEMA_VERSION`] before deserializing into a [`CombatSnapshot`].
//!
//! The source data this core descends from carried two divergent
//! `CombatantSnapshot` shapes: one with `definitionId`/`tags`/`knownActions`/
//! `passiveToggleStates`/`equipmentSlots`, one without. We treat the smaller
//! shape as schema version 0 and up-convert by defaulting the missing fields
//! to empty, matching the authoritative (larger) shape.

#![cfg(feature = "serde")]

use serde_json::Value;

use super::{CombatSnapshot, CURRENT_SCHEMA_VERSION};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("snapshot has no schema version field")]
    MissingVersion,
    #[error("schema version {0} is newer than this binary's {CURRENT_SCHEMA_VERSION}")]
    FutureVersion(u32),
    #[error("malformed snapshot JSON: {0}")]
    Malformed(String),
}

/// Upgrades `raw` in place to [`CURRENT_SCHEMA_VERSION`] and deserializes it.
/// A document already at the current version is deserialized as-is.
pub fn migrate(mut raw: Value) -> Result<CombatSnapshot, MigrationError> {
    let version = raw
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .ok_or(MigrationError::MissingVersion)? as u32;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(MigrationError::FutureVersion(version));
    }
    if version == 0 {
        normalize_v0(&mut raw);
    }

    serde_json::from_value(raw).map_err(|e| MigrationError::Malformed(e.to_string()))
}

/// Defaults the fields the v0 shape omitted on every element of
/// `combatants`, then bumps `schemaVersion` to 1.
fn normalize_v0(raw: &mut Value) {
    if let Some(combatants) = raw.get_mut("combatants").and_then(Value::as_array_mut) {
        for combatant in combatants {
            if let Some(obj) = combatant.as_object_mut() {
                obj.entry("tags").or_insert_with(|| Value::Array(Vec::new()));
                obj.entry("knownActionIds").or_insert_with(|| Value::Array(Vec::new()));
                obj.entry("passiveToggleStates")
                    .or_insert_with(|| Value::Object(serde_json::Map::new()));
                obj.entry("equipmentSlots")
                    .or_insert_with(|| Value::Object(serde_json::Map::new()));
            }
        }
    }
    raw["schemaVersion"] = Value::from(1);
}
