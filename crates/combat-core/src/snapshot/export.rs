//! Deterministic export: the same combat history always serializes to the
//! same bytes, independent of wall-clock capture time, volatile id counter
//! drift, or field insertion order. Used for golden tests and for detecting
//! accidental divergence between two combat instances that should be in
//! lockstep.

#![cfg(feature = "serde")]

use sha2::{Digest, Sha256};
use serde_json::{Map, Value};

use super::CombatSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(String),
}

/// A canonical JSON rendering of a snapshot plus its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicExport {
    /// Canonical JSON text: object keys in sorted order (via `serde_json`'s
    /// default `BTreeMap`-backed `Map`), camelCase field names.
    pub json: String,
    /// Lowercase hex-encoded SHA-256 of `json`'s bytes.
    pub state_hash: String,
}

/// Serializes `snapshot` to its canonical form and hashes it.
///
/// This does *not* reuse `serde_json`'s pretty-printer or preserve the
/// insertion order features some builds enable elsewhere in a workspace;
/// canonical ordering here relies on `serde_json::Map` being a `BTreeMap`
/// by default, which sorts object keys alphabetically regardless of struct
/// field declaration order.
pub fn export(snapshot: &CombatSnapshot) -> Result<DeterministicExport, ExportError> {
    let value = canonical_value(snapshot).map_err(|e| ExportError::Serialize(e.to_string()))?;
    let json = serde_json::to_string(&value).map_err(|e| ExportError::Serialize(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let state_hash = hex::encode(hasher.finalize());

    Ok(DeterministicExport { json, state_hash })
}

/// Builds the projection the rules require of a deterministic export: drop
/// `timestamp` (caller-supplied capture time, pure observability data) and
/// every volatile, counter-issued instance id
/// (`StatusInstanceId`/`SurfaceInstanceId`/`ResolutionItemId`/
/// `ConcentrationId`/`PropId`/`ReactionPromptId`), then sort the entries that
/// have a stable key to compare by: combatants by combatant id, surfaces by
/// surface id, statuses by `(target id, status id)`. The sort key's own
/// volatile id (surface id, status id) is still dropped from the output
/// afterwards — it only exists to fix a relative order, since two snapshots
/// reached by equivalent play can have their id counters drift apart (e.g. a
/// restore rebases `IdCounter` past ids the uninterrupted run never issued).
/// `CombatantId` is never stripped: it is assigned by scenario placement, not
/// a per-instance counter, so it is stable data rather than a volatile id.
fn canonical_value(snapshot: &CombatSnapshot) -> serde_json::Result<Value> {
    let mut combatants = snapshot.combatants.clone();
    combatants.sort_by_key(|c| c.id.get());

    let mut surfaces = snapshot.surfaces.clone();
    surfaces.sort_by_key(|s| s.id.get());
    let surfaces = surfaces
        .iter()
        .map(|s| serde_json::to_value(s).map(|v| strip_field(v, "id")))
        .collect::<serde_json::Result<Vec<_>>>()?;

    let mut statuses = snapshot.statuses.clone();
    statuses.sort_by_key(|s| (s.target.get(), s.id.get()));
    let statuses = statuses
        .iter()
        .map(|s| serde_json::to_value(s).map(|v| strip_field(v, "id")))
        .collect::<serde_json::Result<Vec<_>>>()?;

    let resolution_stack = snapshot
        .resolution_stack
        .iter()
        .map(|item| serde_json::to_value(item).map(|v| strip_field(v, "id")))
        .collect::<serde_json::Result<Vec<_>>>()?;

    // Concentration links reference other volatile ids by value; reducing
    // them to counts keeps the link's existence comparable without leaking
    // the ids they point at.
    let concentrations = snapshot
        .concentrations
        .iter()
        .map(|c| {
            let mut entry = Map::new();
            entry.insert("source".to_string(), serde_json::to_value(c.source)?);
            entry.insert("abilityId".to_string(), Value::String(c.ability_id.clone()));
            entry.insert("linkedStatusCount".to_string(), Value::from(c.linked_statuses.len()));
            entry.insert("linkedSurfaceCount".to_string(), Value::from(c.linked_surfaces.len()));
            Ok(Value::Object(entry))
        })
        .collect::<serde_json::Result<Vec<_>>>()?;

    let reaction_prompts = snapshot
        .reaction_prompts
        .iter()
        .map(|p| serde_json::to_value(p).map(|v| strip_field(v, "id")))
        .collect::<serde_json::Result<Vec<_>>>()?;

    let props = snapshot
        .props
        .iter()
        .map(|p| serde_json::to_value(p).map(|v| strip_field(v, "id")))
        .collect::<serde_json::Result<Vec<_>>>()?;

    let mut root = Map::new();
    root.insert("schemaVersion".to_string(), serde_json::to_value(snapshot.schema_version)?);
    root.insert("flow".to_string(), serde_json::to_value(&snapshot.flow)?);
    root.insert("rng".to_string(), serde_json::to_value(&snapshot.rng)?);
    root.insert("combatants".to_string(), serde_json::to_value(&combatants)?);
    root.insert("surfaces".to_string(), Value::Array(surfaces));
    root.insert("statuses".to_string(), Value::Array(statuses));
    root.insert("resolutionStack".to_string(), Value::Array(resolution_stack));
    root.insert("cooldowns".to_string(), serde_json::to_value(&snapshot.cooldowns)?);
    root.insert("concentrations".to_string(), Value::Array(concentrations));
    root.insert("reactionPrompts".to_string(), Value::Array(reaction_prompts));
    root.insert("props".to_string(), Value::Array(props));
    root.insert("extra".to_string(), serde_json::to_value(&snapshot.extra)?);

    Ok(Value::Object(root))
}

fn strip_field(value: Value, field: &str) -> Value {
    match value {
        Value::Object(mut map) => {
            map.remove(field);
            Value::Object(map)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::ids::{CombatantId, StatusInstanceId};
    use crate::snapshot::{FlowSnapshot, RngSnapshot};
    use crate::status::StatusInstance;

    fn sample() -> CombatSnapshot {
        let mut snapshot = CombatSnapshot::new(FlowSnapshot::default(), RngSnapshot { seed: 1, roll_index: 0 });
        snapshot.combatants.push(Combatant::new(CombatantId::new(1), "a", 10, 9.0));
        snapshot
    }

    #[test]
    fn same_snapshot_exports_identically() {
        let a = export(&sample()).unwrap();
        let b = export(&sample()).unwrap();
        assert_eq!(a.json, b.json);
        assert_eq!(a.state_hash, b.state_hash);
    }

    #[test]
    fn different_snapshots_hash_differently() {
        let mut other = sample();
        other.combatants[0].current_hp = 1;
        let a = export(&sample()).unwrap();
        let b = export(&other).unwrap();
        assert_ne!(a.state_hash, b.state_hash);
    }

    #[test]
    fn differing_timestamps_export_identically() {
        let mut a = sample();
        a.timestamp = 111;
        let mut b = sample();
        b.timestamp = 999_999;

        let ea = export(&a).unwrap();
        let eb = export(&b).unwrap();
        assert_eq!(ea.json, eb.json);
        assert_eq!(ea.state_hash, eb.state_hash);
    }

    #[test]
    fn statuses_with_different_volatile_ids_but_same_relative_order_export_identically() {
        let mut a = sample();
        a.statuses.push(StatusInstance::new(StatusInstanceId::new(2), "bless", CombatantId::new(1)));
        a.statuses.push(StatusInstance::new(StatusInstanceId::new(5), "prone", CombatantId::new(1)));

        let mut b = sample();
        b.statuses.push(StatusInstance::new(StatusInstanceId::new(20), "bless", CombatantId::new(1)));
        b.statuses.push(StatusInstance::new(StatusInstanceId::new(30), "prone", CombatantId::new(1)));

        let ea = export(&a).unwrap();
        let eb = export(&b).unwrap();
        assert_eq!(ea.json, eb.json);
        assert_eq!(ea.state_hash, eb.state_hash);
    }

    #[test]
    fn statuses_are_reordered_to_target_then_status_id_regardless_of_push_order() {
        let mut a = sample();
        a.statuses.push(StatusInstance::new(StatusInstanceId::new(5), "prone", CombatantId::new(1)));
        a.statuses.push(StatusInstance::new(StatusInstanceId::new(2), "bless", CombatantId::new(1)));

        let mut b = sample();
        b.statuses.push(StatusInstance::new(StatusInstanceId::new(2), "bless", CombatantId::new(1)));
        b.statuses.push(StatusInstance::new(StatusInstanceId::new(5), "prone", CombatantId::new(1)));

        let ea = export(&a).unwrap();
        let eb = export(&b).unwrap();
        assert_eq!(ea.json, eb.json);
    }
}
