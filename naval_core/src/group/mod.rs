//! Groups: formations that fire and take fire as one unit

use crate::error::FleetError;
use crate::roll::HitRoll;
use crate::rules::RuleSet;
use crate::ship::{Shot, ShotOutcome, ShipRegistry};
use crate::types::{BatteryRole, GroupKind, Salvo, ShipId};
use serde::{Deserialize, Serialize};

/// Parameters of one group-on-group engagement for one minute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volley {
    /// Range in yards
    pub range: f64,
    pub salvo: Salvo,
    /// Umpire's effectiveness multiplier (visibility, training, ...)
    pub modifier: f64,
    /// Angle between the line of fire and the target's course, in degrees
    pub incidence: f64,
    pub batteries: Vec<BatteryRole>,
    /// First minute of fire on this target
    pub opening: bool,
}

impl Volley {
    /// Full broadside from the primary batteries at `range`
    pub fn new(range: f64) -> Self {
        Volley {
            range,
            salvo: Salvo::default(),
            modifier: 1.0,
            incidence: 90.0,
            batteries: vec![BatteryRole::Primary],
            opening: false,
        }
    }
}

/// Named set of ships
///
/// `staying_power`, `hit_points` and `status` are sums over the members,
/// refreshed only by [`Group::update`] or [`Group::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    kind: GroupKind,
    members: Vec<ShipId>,
    staying_power: f64,
    hit_points: f64,
    status: f64,
}

impl Group {
    /// Build a group over ships already in the registry
    pub fn new(
        name: impl Into<String>,
        kind: GroupKind,
        members: Vec<ShipId>,
        ships: &ShipRegistry,
    ) -> Result<Self, FleetError> {
        let name = name.into();
        if members.is_empty() {
            return Err(FleetError::EmptyGroup(name));
        }
        for (i, id) in members.iter().enumerate() {
            let ship = ships
                .get(*id)
                .ok_or_else(|| FleetError::UnknownShip(format!("#{}", id.0)))?;
            if members[..i].contains(id) {
                return Err(FleetError::DuplicateShip(ship.name().to_string()));
            }
        }

        let mut group = Group {
            name,
            kind,
            members,
            staying_power: 0.0,
            hit_points: 0.0,
            status: 1.0,
        };
        group.refresh(ships);
        Ok(group)
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capital or light
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Ships in the group
    pub fn members(&self) -> &[ShipId] {
        &self.members
    }

    /// Summed staying power of the members
    pub fn staying_power(&self) -> f64 {
        self.staying_power
    }

    /// Summed hit points of the members
    pub fn hit_points(&self) -> f64 {
        self.hit_points
    }

    /// Hit points as a fraction of staying power
    pub fn status(&self) -> f64 {
        self.status
    }

    /// Bring another ship into the group mid-battle
    pub fn add_ship(&mut self, id: ShipId, ships: &ShipRegistry) -> Result<(), FleetError> {
        let ship = ships
            .get(id)
            .ok_or_else(|| FleetError::UnknownShip(format!("#{}", id.0)))?;
        if self.members.contains(&id) {
            return Err(FleetError::DuplicateShip(ship.name().to_string()));
        }
        self.members.push(id);
        self.staying_power += ship.staying_power();
        self.hit_points += ship.hit_points();
        self.status = ratio(self.hit_points, self.staying_power);
        Ok(())
    }

    /// Each target member's share of incoming fire
    ///
    /// Shares follow the pre-pulse hit points. A group with no hit points
    /// left is split evenly.
    pub fn distribution(&self, ships: &ShipRegistry) -> Vec<f64> {
        if self.hit_points > 0.0 {
            self.members
                .iter()
                .map(|id| ships.get(*id).map_or(0.0, |s| s.starting_hit_points()) / self.hit_points)
                .collect()
        } else {
            let even = 1.0 / self.members.len() as f64;
            vec![even; self.members.len()]
        }
    }

    /// Fire a single volley at `target`
    pub fn fire(
        &self,
        target: &Group,
        ships: &mut ShipRegistry,
        volley: &Volley,
        rules: &RuleSet,
        roll: &mut dyn HitRoll,
    ) -> ShotOutcome {
        self.fire_concurrent(target, ships, std::slice::from_ref(volley), 0, rules, roll)
    }

    /// Fire `volleys[index]` at `target`, with `volleys` being everything
    /// this group fires in the current minute
    ///
    /// Every member fires at every target member, scaled by that member's
    /// share, so the target group is treated as one pool of hit points.
    pub fn fire_concurrent(
        &self,
        target: &Group,
        ships: &mut ShipRegistry,
        volleys: &[Volley],
        index: usize,
        rules: &RuleSet,
        roll: &mut dyn HitRoll,
    ) -> ShotOutcome {
        let mut outcome = ShotOutcome::default();
        let volley = match volleys.get(index) {
            Some(volley) => volley,
            None => return outcome,
        };

        let modifier =
            volley.modifier * rules.concentration_multiplier(self.members.len(), target.members.len());
        let shares = target.distribution(ships);

        for firer in &self.members {
            for (target_id, share) in target.members.iter().zip(&shares) {
                let shot = Shot {
                    concurrent: volleys,
                    index,
                    distribution: *share,
                    modifier,
                };
                if let Some((firing_ship, target_ship)) = ships.pair_mut(*firer, *target_id) {
                    outcome += firing_ship.fire(target_ship, &shot, rules, roll);
                }
            }
        }
        outcome
    }

    /// Commit every member's pending damage, then refresh the totals
    pub fn update(&mut self, ships: &mut ShipRegistry) {
        ships.update(self.members.iter().copied());
        self.refresh(ships);
    }

    /// Recompute totals from the members without touching them
    pub fn refresh(&mut self, ships: &ShipRegistry) {
        let members = self.members.iter().filter_map(|id| ships.get(*id));
        let (staying_power, hit_points) = members.fold((0.0, 0.0), |(sp, hp), ship| {
            (sp + ship.staying_power(), hp + ship.hit_points())
        });
        self.staying_power = staying_power;
        self.hit_points = hit_points;
        self.status = ratio(hit_points, staying_power);
    }
}

pub(crate) fn ratio(hit_points: f64, staying_power: f64) -> f64 {
    if staying_power > 0.0 {
        (hit_points / staying_power).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::ExpectedHits;
    use crate::ship::tests::light_cruiser;

    fn fleet(names: &[&str], staying_power: f64) -> (ShipRegistry, Vec<ShipId>) {
        let mut ships = ShipRegistry::new();
        let ids = names
            .iter()
            .map(|n| {
                ships
                    .add(light_cruiser(n).with_staying_power(staying_power).unwrap())
                    .unwrap()
            })
            .collect();
        (ships, ids)
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        let (ships, ids) = fleet(&["A", "B"], 10.0);
        assert_eq!(
            Group::new("None", GroupKind::Light, vec![], &ships).unwrap_err(),
            FleetError::EmptyGroup("None".to_string())
        );
        assert_eq!(
            Group::new("Twice", GroupKind::Light, vec![ids[0], ids[0]], &ships).unwrap_err(),
            FleetError::DuplicateShip("A".to_string())
        );
        assert!(Group::new("Ghost", GroupKind::Light, vec![ShipId(7)], &ships).is_err());
    }

    #[test]
    fn test_distribution_follows_starting_hit_points() {
        let (mut ships, ids) = fleet(&["A", "B"], 10.0);
        ships.get_mut(ids[0]).unwrap().damage(4.0);
        ships.get_mut(ids[1]).unwrap().damage(6.0);
        let mut group = Group::new("Pair", GroupKind::Light, ids.clone(), &ships).unwrap();
        group.update(&mut ships);

        let shares = group.distribution(&ships);
        assert!((shares[0] - 0.6).abs() < 1e-12);
        assert!((shares[1] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_even_when_sunk() {
        let (mut ships, ids) = fleet(&["A", "B", "C", "D"], 10.0);
        for id in &ids {
            ships.get_mut(*id).unwrap().damage(100.0);
        }
        let mut group = Group::new("Lost", GroupKind::Light, ids, &ships).unwrap();
        group.update(&mut ships);
        assert_eq!(group.hit_points(), 0.0);
        assert_eq!(group.distribution(&ships), vec![0.25; 4]);
    }

    #[test]
    fn test_update_sums_members() {
        let (mut ships, ids) = fleet(&["A", "B"], 10.0);
        let mut group = Group::new("Pair", GroupKind::Light, ids.clone(), &ships).unwrap();
        ships.get_mut(ids[1]).unwrap().damage(2.5);
        assert_eq!(group.hit_points(), 20.0);
        group.update(&mut ships);
        assert!((group.hit_points() - 17.5).abs() < 1e-12);
        assert!((group.status() - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_concentration_penalty_applied() {
        let (mut ships, ids) = fleet(&["A", "B", "C", "T"], 100.0);
        let firers = Group::new("Line", GroupKind::Light, ids[..3].to_vec(), &ships).unwrap();
        let target = Group::new("Target", GroupKind::Light, vec![ids[3]], &ships).unwrap();
        let volley = Volley::new(8_000.0);

        let outcome = firers.fire(&target, &mut ships, &volley, &RuleSet::default(), &mut ExpectedHits);
        // three ships at 0.25 hits each, times (3/2 + 1) / 3
        let base = 3.0 * 0.25;
        assert!((outcome.hits - base * 2.5 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_ship_late() {
        let (ships, ids) = fleet(&["A", "B"], 10.0);
        let mut group = Group::new("Solo", GroupKind::Light, vec![ids[0]], &ships).unwrap();
        group.add_ship(ids[1], &ships).unwrap();
        assert_eq!(group.members().len(), 2);
        assert_eq!(group.staying_power(), 20.0);
        assert!(group.add_ship(ids[1], &ships).is_err());
    }
}
