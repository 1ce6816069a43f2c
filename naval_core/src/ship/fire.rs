//! Ship-to-ship fire resolution

use super::{HullCategory, Ship};
use crate::armament::Armament;
use crate::group::Volley;
use crate::roll::HitRoll;
use crate::rules::{size_modifier, table_b_fraction, FlotillaKnockout, HitValueRule, MountAllocation, RuleSet};
use crate::types::Salvo;
use std::ops::AddAssign;

/// One ship's share of a group volley against one target ship
#[derive(Debug, Clone, Copy)]
pub struct Shot<'a> {
    /// Every volley the firing group delivers this minute
    pub concurrent: &'a [Volley],
    /// Position of the volley being fired within `concurrent`
    pub index: usize,
    /// Fraction of the firer's guns aimed at this target
    pub distribution: f64,
    /// Volley modifier after any formation penalty
    pub modifier: f64,
}

impl<'a> Shot<'a> {
    /// A lone volley at full distribution
    pub fn single(volley: &'a Volley) -> Self {
        Shot {
            concurrent: std::slice::from_ref(volley),
            index: 0,
            distribution: 1.0,
            modifier: volley.modifier,
        }
    }

    /// The volley this shot fires
    pub fn volley(&self) -> Option<&'a Volley> {
        self.concurrent.get(self.index)
    }
}

/// Raw hits scored and standard damage points dealt
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShotOutcome {
    pub hits: f64,
    pub damage: f64,
}

impl AddAssign for ShotOutcome {
    fn add_assign(&mut self, other: Self) {
        self.hits += other.hits;
        self.damage += other.damage;
    }
}

impl Ship {
    /// Fire every selected battery at `target`
    ///
    /// Reads only this ship's pre-pulse status; damage lands on the target's
    /// pending hit points.
    pub fn fire(
        &self,
        target: &mut Ship,
        shot: &Shot<'_>,
        rules: &RuleSet,
        roll: &mut dyn HitRoll,
    ) -> ShotOutcome {
        let mut outcome = ShotOutcome::default();
        let volley = match shot.volley() {
            Some(volley) => volley,
            None => return outcome,
        };
        let readiness = rules.readiness(self.status);
        if readiness <= 0.0 || shot.distribution <= 0.0 {
            return outcome;
        }

        for armament in &self.armaments {
            if !armament.is_active() || !volley.batteries.contains(&armament.role()) {
                continue;
            }
            let guns = self.guns_firing(armament, shot, rules);
            if guns == 0 {
                continue;
            }

            let gun = armament.gun();
            let mut per_gun = gun.hits_per_gun(volley.range, rules.to_hit)
                * shot.distribution
                * shot.modifier
                * readiness;
            if volley.opening {
                per_gun *= rules.opening_fire_factor(volley.range, self.status);
            }
            if rules.size_modifiers {
                per_gun *= size_modifier(gun.mount, target.category());
            }

            let hits = roll.hits(per_gun, guns);
            if hits <= 0.0 {
                continue;
            }
            target.record_hits(gun.caliber, hits);
            let damage = hit_damage(armament, target, hits, volley, rules);
            target.damage(damage);

            tracing::trace!(
                firer = %self.name,
                target = %target.name,
                gun = %gun.designation,
                guns,
                hits,
                damage,
                "shot"
            );
            outcome += ShotOutcome { hits, damage };
        }
        outcome
    }

    fn guns_firing(&self, armament: &Armament, shot: &Shot<'_>, rules: &RuleSet) -> u32 {
        let role = armament.role();
        match rules.mount_allocation {
            MountAllocation::FullSalvoPerEvent => shot
                .volley()
                .map_or(0, |volley| armament.salvo_guns(volley.salvo)),
            MountAllocation::SplitAcrossTargets => {
                let mut salvos: Vec<Salvo> = Vec::with_capacity(shot.concurrent.len());
                let mut position = None;
                for (i, volley) in shot.concurrent.iter().enumerate() {
                    if volley.batteries.contains(&role) {
                        if i == shot.index {
                            position = Some(salvos.len());
                        }
                        salvos.push(volley.salvo);
                    }
                }
                position.map_or(0, |p| armament.allocated_guns(&salvos, p))
            }
        }
    }
}

/// Standard damage points for `hits` from one battery
fn hit_damage(armament: &Armament, target: &Ship, hits: f64, volley: &Volley, rules: &RuleSet) -> f64 {
    let gun = armament.gun();
    let category = target.category();

    if gun.is_heavy() && category == HullCategory::Flotilla {
        return match rules.flotilla_knockout {
            FlotillaKnockout::AnyHit => target.staying_power,
            FlotillaKnockout::PerHit => hits * target.staying_power,
        };
    }

    if rules.hit_value == HitValueRule::Penetration {
        if let (Some(values), Some(tables)) = (&gun.hit_values, &gun.penetration) {
            let penetrates = tables.penetrates(gun.caliber, target.protection, volley.incidence, volley.range);
            return hits * values.value(penetrates);
        }
    }

    if gun.is_heavy() && category == HullCategory::Cruiser {
        hits * target.staying_power * table_b_fraction(target.main_armament().caliber())
    } else if gun.caliber >= target.hull.minimum_caliber_to_damage() {
        hits * gun.conversion_factor()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gunnery::{HitValues, PenetrationTables, SidePenetrationRow};
    use crate::roll::ExpectedHits;
    use crate::ship::tests::{battery, light_cruiser};
    use crate::ship::HullClass;
    use crate::types::{BatteryRole, MountKind, Protection};

    fn volley(range: f64) -> Volley {
        Volley::new(range)
    }

    fn destroyer(name: &str) -> Ship {
        Ship::new(
            name,
            HullClass::Destroyer,
            vec![battery("4 in", MountKind::Destroyer, 4.0, BatteryRole::Primary, 3)],
        )
        .unwrap()
    }

    fn battle_cruiser(name: &str) -> Ship {
        Ship::new(
            name,
            HullClass::BattleCruiser,
            vec![
                battery("12 in", MountKind::Capital, 12.0, BatteryRole::Primary, 8),
                battery("4 in sec", MountKind::Secondary, 4.0, BatteryRole::Secondary, 8),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_basic_hits_and_conversion() {
        let firer = light_cruiser("Sydney");
        let mut target = light_cruiser("Emden");
        let v = volley(8_000.0);
        let outcome = firer.fire(&mut target, &Shot::single(&v), &RuleSet::default(), &mut ExpectedHits);
        // 0.05 to-hit x 5 guns, 6 in converts 1:1
        assert!((outcome.hits - 0.25).abs() < 1e-12);
        assert!((outcome.damage - 0.25).abs() < 1e-12);
        assert!((target.hit_points() - 39.75).abs() < 1e-12);
    }

    #[test]
    fn test_status_scales_fire() {
        let mut firer = light_cruiser("Sydney");
        firer.damage(20.0);
        firer.update();
        let mut target = light_cruiser("Emden");
        let v = volley(8_000.0);
        let outcome = firer.fire(&mut target, &Shot::single(&v), &RuleSet::default(), &mut ExpectedHits);
        assert!((outcome.hits - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_does_nothing() {
        let firer = light_cruiser("Sydney");
        let mut target = light_cruiser("Emden");
        let v = volley(30_000.0);
        let outcome = firer.fire(&mut target, &Shot::single(&v), &RuleSet::default(), &mut ExpectedHits);
        assert_eq!(outcome, ShotOutcome::default());
        assert!(target.hits_received().is_empty());
    }

    #[test]
    fn test_heavy_guns_knock_out_destroyers() {
        let firer = battle_cruiser("Invincible");
        let mut target = destroyer("V27");
        let v = volley(12_000.0);
        firer.fire(&mut target, &Shot::single(&v), &RuleSet::default(), &mut ExpectedHits);
        assert_eq!(target.hit_points(), 0.0);
    }

    #[test]
    fn test_heavy_guns_per_hit_on_destroyers() {
        let firer = battle_cruiser("Invincible");
        let mut target = destroyer("V27");
        let rules = RuleSet::default().with_flotilla_knockout(FlotillaKnockout::PerHit);
        let v = volley(12_000.0);
        let outcome = firer.fire(&mut target, &Shot::single(&v), &rules, &mut ExpectedHits);
        // 0.025 x 8 guns x 0.125 size modifier = 0.025 hits, each worth 3 staying power
        assert!((outcome.hits - 0.025).abs() < 1e-12);
        assert!((outcome.damage - 0.075).abs() < 1e-12);
    }

    #[test]
    fn test_table_b_against_cruisers() {
        let firer = battle_cruiser("Invincible");
        let mut target = light_cruiser("Nürnberg");
        let v = volley(12_000.0);
        let outcome = firer.fire(&mut target, &Shot::single(&v), &RuleSet::default(), &mut ExpectedHits);
        // 0.025 x 8 x 1/3 hits; each removes a third of 40
        let hits = 0.025 * 8.0 / 3.0;
        assert!((outcome.hits - hits).abs() < 1e-12);
        assert!((outcome.damage - hits * 40.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_guns_cannot_hurt_capital_ships() {
        let firer = light_cruiser("Sydney");
        let mut target = battle_cruiser("Invincible");
        let v = volley(4_000.0);
        let outcome = firer.fire(&mut target, &Shot::single(&v), &RuleSet::default(), &mut ExpectedHits);
        assert!(outcome.hits > 0.0);
        assert_eq!(outcome.damage, 0.0);
        assert_eq!(target.hit_points(), target.staying_power());
        assert_eq!(target.hits_received().len(), 1);
    }

    #[test]
    fn test_battery_selection() {
        let firer = battle_cruiser("Invincible");
        let mut target = destroyer("V27");
        let v = Volley {
            batteries: vec![BatteryRole::Secondary],
            ..volley(4_000.0)
        };
        let rules = RuleSet::default();
        let outcome = firer.fire(&mut target, &Shot::single(&v), &rules, &mut ExpectedHits);
        // secondary 4 in: 0.1 x 8 x 0.2 against a destroyer
        assert!((outcome.hits - 0.16).abs() < 1e-12);
        assert!(target.hit_points() > 0.0);
    }

    #[test]
    fn test_penetration_hit_values() {
        let gun = crate::ship::tests::gun("6 in pen", MountKind::Cruiser, 6.0);
        let mut spec = (*gun).clone();
        spec.hit_values = Some(HitValues {
            penetrative: 2.0,
            non_penetrative: 0.5,
        });
        spec.penetration = Some(PenetrationTables {
            side: vec![SidePenetrationRow {
                armor: 3.0,
                at_90: Some(6_000.0),
                at_75: Some(5_000.0),
                at_60: Some(4_000.0),
                at_45: Some(3_000.0),
            }],
            deck: vec![],
        });
        let armament = crate::armament::Armament::new(
            std::sync::Arc::new(spec),
            BatteryRole::Primary,
            crate::armament::MountCounts {
                total: 4,
                bow: 1,
                broadside: 4,
                stern: 1,
            },
            30.0,
            1,
        )
        .unwrap();
        let firer = Ship::new("Pen", HullClass::LightCruiser, vec![armament]).unwrap();
        let rules = RuleSet::maneuver_rules_1922();

        let mut close = light_cruiser("A").with_protection(Protection { side: 3.0, deck: 1.0 });
        let near = volley(4_000.0);
        let out = firer.fire(&mut close, &Shot::single(&near), &rules, &mut ExpectedHits);
        // 0.1 x 4 guns penetrating at 2.0 each
        assert!((out.damage - 0.8).abs() < 1e-12);

        let mut far = light_cruiser("B").with_protection(Protection { side: 3.0, deck: 1.0 });
        let long = volley(8_000.0);
        let out = firer.fire(&mut far, &Shot::single(&long), &rules, &mut ExpectedHits);
        assert!((out.damage - 0.05 * 4.0 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_split_mounts_across_targets() {
        let firer = light_cruiser("Sydney");
        let rules = RuleSet::maneuver_rules_1922();
        let volleys = vec![volley(4_000.0), volley(4_000.0)];
        let mut first = light_cruiser("A");
        let mut second = light_cruiser("B");
        let shot = |index| Shot {
            concurrent: &volleys,
            index,
            distribution: 1.0,
            modifier: 1.0,
        };
        let a = firer.fire(&mut first, &shot(0), &rules, &mut ExpectedHits);
        let b = firer.fire(&mut second, &shot(1), &rules, &mut ExpectedHits);
        // 5 broadside mounts split 3 and 2
        assert!((a.hits - 0.3).abs() < 1e-12);
        assert!((b.hits - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_opening_fire_reduction() {
        let firer = light_cruiser("Sydney");
        let rules = RuleSet::maneuver_rules_1922();
        let opening = Volley {
            opening: true,
            ..volley(12_000.0)
        };
        let mut target = light_cruiser("Emden");
        let out = firer.fire(&mut target, &Shot::single(&opening), &rules, &mut ExpectedHits);
        // 0.025 x 5 guns, rate cut by four tenths
        assert!((out.hits - 0.025 * 5.0 * 0.6).abs() < 1e-12);
    }
}
