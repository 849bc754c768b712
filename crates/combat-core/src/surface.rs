//! Positioned, radial, duration-bounded area effects (fire, fog, ice, water)
//! that can obscure line of sight, carry tick effects, and interact with
//! other surfaces. Surface *definitions* are content; this models the
//! runtime instance the arena tracks.

use std::collections::BTreeSet;

use crate::combatant::Position;
use crate::ids::{CombatantId, SurfaceInstanceId};

/// One active surface instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Surface {
    pub id: SurfaceInstanceId,
    pub definition_id: String,
    pub center: Position,
    pub radius: f64,
    /// `None` = permanent; `Some(0)` = a timed surface that has expired.
    pub remaining_duration_rounds: Option<u32>,
    pub owner: CombatantId,
    pub tags: BTreeSet<String>,
}

impl Surface {
    pub fn new(
        id: SurfaceInstanceId,
        definition_id: impl Into<String>,
        center: Position,
        radius: f64,
        owner: CombatantId,
    ) -> Self {
        Self {
            id,
            definition_id: definition_id.into(),
            center,
            radius,
            remaining_duration_rounds: None,
            owner,
            tags: BTreeSet::new(),
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.remaining_duration_rounds.is_none()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_duration_rounds == Some(0)
    }

    pub fn tick_round(&mut self) {
        if let Some(remaining) = self.remaining_duration_rounds {
            self.remaining_duration_rounds = Some(remaining.saturating_sub(1));
        }
    }

    /// Whether `point` falls within this surface's radius (inclusive).
    pub fn contains(&self, point: Position) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let dz = point.z - self.center.z;
        (dx * dx + dy * dy + dz * dz).sqrt() <= self.radius
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_surface_never_expires_from_ticking() {
        let mut surface = Surface::new(
            SurfaceInstanceId::new(1),
            "fog_cloud",
            Position::default(),
            5.0,
            CombatantId::new(1),
        );
        surface.tick_round();
        assert!(surface.is_permanent());
        assert!(!surface.is_expired());
    }

    #[test]
    fn timed_surface_expires_after_its_duration() {
        let mut surface = Surface::new(
            SurfaceInstanceId::new(1),
            "fire",
            Position::default(),
            3.0,
            CombatantId::new(1),
        );
        surface.remaining_duration_rounds = Some(1);
        surface.tick_round();
        assert!(surface.is_expired());
    }

    #[test]
    fn contains_respects_radius() {
        let surface = Surface::new(
            SurfaceInstanceId::new(1),
            "ice",
            Position { x: 0.0, y: 0.0, z: 0.0 },
            2.0,
            CombatantId::new(1),
        );
        assert!(surface.contains(Position { x: 1.0, y: 1.0, z: 0.0 }));
        assert!(!surface.contains(Position { x: 5.0, y: 0.0, z: 0.0 }));
    }
}
