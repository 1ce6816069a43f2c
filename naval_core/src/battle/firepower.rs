//! Pre-battle firepower comparison by range

use super::Battle;
use crate::error::FleetError;
use crate::types::{DamageScale, FiringArc, GroupKind, ShipId, SideLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Farthest range a comparison table reaches, in yards
pub const MAX_COMPARISON_RANGE: f64 = 100_000.0;

/// Broadside firepower of both selections at one range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirepowerRow {
    /// Range in yards
    pub range: f64,
    pub side_a: f64,
    pub side_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirepowerComparison {
    /// Unit the figures are expressed in
    pub scale: DamageScale,
    pub rows: Vec<FirepowerRow>,
}

impl Battle {
    /// Compare undamaged broadside firepower of groups from each side
    ///
    /// Rows run every 1000 yards out to the longest gun range, capped at
    /// [`MAX_COMPARISON_RANGE`]. All groups
    /// must be of the same kind, since 6-inch and 15-inch hits do not mix.
    pub fn firepower_comparison(
        &self,
        side_a_groups: &[&str],
        side_b_groups: &[&str],
    ) -> Result<FirepowerComparison, FleetError> {
        let ships_a = self.selected_ships(SideLabel::A, side_a_groups)?;
        let ships_b = self.selected_ships(SideLabel::B, side_b_groups)?;

        let mut kinds = ships_a.1.iter().chain(ships_b.1.iter());
        let kind = match kinds.next() {
            Some(kind) => *kind,
            None => return Err(FleetError::EmptyGroup("firepower comparison".to_string())),
        };
        if kinds.any(|k| *k != kind) {
            return Err(FleetError::MixedGroupKinds);
        }

        let max_range = ships_a
            .0
            .iter()
            .chain(ships_b.0.iter())
            .filter_map(|id| self.ships.get(*id))
            .map(|ship| ship.max_range())
            .fold(0.0, f64::max)
            .min(MAX_COMPARISON_RANGE);
        let steps = (max_range / 1000.0).floor() as u32;

        let total = |ids: &BTreeSet<ShipId>, range: f64| -> f64 {
            ids.iter()
                .filter_map(|id| self.ships.get(*id))
                .map(|ship| ship.firepower(range, FiringArc::Broadside, self.rules.to_hit))
                .sum()
        };
        let rows = (1..=steps)
            .map(|step| {
                let range = step as f64 * 1000.0;
                FirepowerRow {
                    range,
                    side_a: total(&ships_a.0, range),
                    side_b: total(&ships_b.0, range),
                }
            })
            .collect();

        Ok(FirepowerComparison {
            scale: kind.damage_scale(),
            rows,
        })
    }

    fn selected_ships(
        &self,
        label: SideLabel,
        names: &[&str],
    ) -> Result<(BTreeSet<ShipId>, Vec<GroupKind>), FleetError> {
        let side = self.side(label);
        let mut ships = BTreeSet::new();
        let mut kinds = Vec::with_capacity(names.len());
        for name in names {
            let id = side.resolve_group(name)?;
            if let Some(group) = side.group(id) {
                ships.extend(group.members().iter().copied());
                kinds.push(group.kind());
            }
        }
        Ok((ships, kinds))
    }
}
