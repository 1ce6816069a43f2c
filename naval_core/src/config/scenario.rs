//! Battle scenario loading
//!
//! A scenario file holds the gun tables, both fleets, their groups and the
//! fire events, and builds a ready-to-resolve [`Battle`].

use super::ConfigError;
use crate::armament::{Armament, MountCounts};
use crate::battle::{Battle, ClockTime, ProcessingOrder};
use crate::error::FleetError;
use crate::gunnery::{GunneryTable, GunneryWarning, GunnerySpec, ToHitPolicy};
use crate::group::Group;
use crate::rules::{
    ConcentrationRule, FireDegradation, FlotillaKnockout, HitValueRule, MountAllocation,
    OpeningFireRule, RuleProfile, RuleSet,
};
use crate::ship::{HullClass, Ship, ShipRegistry};
use crate::side::{FireEvent, Side};
use crate::types::{BatteryRole, FiringArc, GroupKind, Protection, Salvo, SideLabel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

fn default_role() -> BatteryRole {
    BatteryRole::Primary
}

fn default_end_arc() -> f64 {
    30.0
}

fn default_guns_per_mount() -> u32 {
    1
}

fn default_modifier() -> f64 {
    1.0
}

fn default_incidence() -> f64 {
    90.0
}

fn default_batteries() -> Vec<BatteryRole> {
    vec![BatteryRole::Primary]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSection {
    pub name: String,
    #[serde(default)]
    pub start: ClockTime,
    #[serde(default)]
    pub profile: RuleProfile,
    #[serde(default)]
    pub processing_order: ProcessingOrder,
}

/// Knobs to change after the profile is built
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleOverrides {
    pub to_hit: Option<ToHitPolicy>,
    pub concentration: Option<ConcentrationRule>,
    pub opening_fire: Option<OpeningFireRule>,
    pub mount_allocation: Option<MountAllocation>,
    pub hit_value: Option<HitValueRule>,
    pub flotilla_knockout: Option<FlotillaKnockout>,
    pub fire_degradation: Option<FireDegradation>,
    pub size_modifiers: Option<bool>,
}

impl RuleOverrides {
    /// Apply these overrides to a rule set
    pub fn apply(&self, mut rules: RuleSet) -> RuleSet {
        if let Some(v) = self.to_hit {
            rules.to_hit = v;
        }
        if let Some(v) = self.concentration {
            rules.concentration = v;
        }
        if let Some(v) = self.opening_fire {
            rules.opening_fire = v;
        }
        if let Some(v) = self.mount_allocation {
            rules.mount_allocation = v;
        }
        if let Some(v) = self.hit_value {
            rules.hit_value = v;
        }
        if let Some(v) = self.flotilla_knockout {
            rules.flotilla_knockout = v;
        }
        if let Some(v) = self.fire_degradation {
            rules.fire_degradation = v;
        }
        if let Some(v) = self.size_modifiers {
            rules.size_modifiers = v;
        }
        rules
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmamentConfig {
    /// Gun designation from `[[guns]]`
    pub gun: String,
    #[serde(default = "default_role")]
    pub role: BatteryRole,
    pub mounts: MountCounts,
    #[serde(default = "default_end_arc")]
    pub end_arc: f64,
    #[serde(default = "default_guns_per_mount")]
    pub guns_per_mount: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
    pub name: String,
    /// Hull tag ("BB", "CL", ...) or long name
    pub hull: String,
    pub armaments: Vec<ArmamentConfig>,
    #[serde(default)]
    pub armor: Protection,
    /// Replaces the staying power computed from hull and guns
    pub staying_power: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub kind: GroupKind,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub firer: String,
    pub target: String,
    pub range: f64,
    pub start: u32,
    pub duration: u32,
    /// Give at most one of `bearing`, `arc` and `guns`
    pub bearing: Option<f64>,
    pub arc: Option<FiringArc>,
    pub guns: Option<u32>,
    #[serde(default = "default_modifier")]
    pub modifier: f64,
    #[serde(default = "default_incidence")]
    pub incidence: f64,
    #[serde(default = "default_batteries")]
    pub batteries: Vec<BatteryRole>,
}

impl EventConfig {
    fn salvo(&self) -> Result<Salvo, ConfigError> {
        match (self.bearing, self.arc, self.guns) {
            (None, None, None) => Ok(Salvo::default()),
            (Some(bearing), None, None) => Ok(Salvo::Bearing(bearing)),
            (None, Some(arc), None) => Ok(Salvo::Arc(arc)),
            (None, None, Some(guns)) => Ok(Salvo::Guns(guns)),
            _ => Err(ConfigError::ValidationError(format!(
                "event {} -> {} sets more than one of bearing, arc and guns",
                self.firer, self.target
            ))),
        }
    }

    fn to_event(&self) -> Result<FireEvent, ConfigError> {
        Ok(FireEvent {
            firer: self.firer.clone(),
            target: self.target.clone(),
            range: self.range,
            start: self.start,
            duration: self.duration,
            salvo: self.salvo()?,
            modifier: self.modifier,
            incidence: self.incidence,
            batteries: self.batteries.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideConfig {
    pub name: String,
    #[serde(default)]
    pub ships: Vec<ShipConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub events: Vec<EventConfig>,
}

/// A complete scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub battle: BattleSection,
    #[serde(default)]
    pub rules: RuleOverrides,
    #[serde(default)]
    pub guns: Vec<GunnerySpec>,
    pub side_a: SideConfig,
    pub side_b: SideConfig,
}

/// A built battle and the gunnery warnings raised while building it
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    pub battle: Battle,
    pub warnings: Vec<GunneryWarning>,
}

impl ScenarioConfig {
    /// Profile rule set with the scenario overrides applied
    pub fn rules(&self) -> RuleSet {
        self.rules.apply(RuleSet::from_profile(self.battle.profile))
    }

    /// Resolve every name and build the battle
    pub fn build(&self) -> Result<LoadedScenario, ConfigError> {
        let mut table = GunneryTable::new();
        for spec in &self.guns {
            if table.get(&spec.designation).is_some() {
                return Err(ConfigError::ValidationError(format!(
                    "gun {:?} is defined twice",
                    spec.designation
                )));
            }
            table.register(spec.clone());
        }
        let rules = self.rules();
        let mut warnings = table.validate();
        warnings.extend(profile_warnings(&self.guns, &rules));

        let mut ships = ShipRegistry::new();
        let roster_a = add_ships(&self.side_a, &table, &mut ships)?;
        let roster_b = add_ships(&self.side_b, &table, &mut ships)?;

        let side_a = build_side(SideLabel::A, &self.side_a, &roster_a, &ships)?;
        let side_b = build_side(SideLabel::B, &self.side_b, &roster_b, &ships)?;

        let battle = Battle::new(self.battle.name.clone(), ships, side_a, side_b, rules)?
            .with_start_clock(self.battle.start)
            .with_processing_order(self.battle.processing_order);

        Ok(LoadedScenario { battle, warnings })
    }
}

fn profile_warnings(guns: &[GunnerySpec], rules: &RuleSet) -> Vec<GunneryWarning> {
    let mut warnings = Vec::new();
    for spec in guns {
        if rules.to_hit == ToHitPolicy::Continuous && spec.curve.is_none() {
            warnings.push(GunneryWarning::MissingCurve {
                designation: spec.designation.clone(),
            });
        }
        if rules.hit_value == HitValueRule::Penetration
            && (spec.hit_values.is_none() || spec.penetration.is_none())
        {
            warnings.push(GunneryWarning::MissingPenetrationData {
                designation: spec.designation.clone(),
            });
        }
    }
    for warning in &warnings {
        tracing::warn!(profile = %rules.profile, "{}", warning);
    }
    warnings
}

fn add_ships(
    side: &SideConfig,
    table: &GunneryTable,
    ships: &mut ShipRegistry,
) -> Result<HashSet<String>, ConfigError> {
    let mut roster = HashSet::new();
    for config in &side.ships {
        let hull: HullClass = config.hull.parse()?;
        let armaments = config
            .armaments
            .iter()
            .map(|a| {
                Armament::new(
                    table.resolve(&a.gun)?,
                    a.role,
                    a.mounts,
                    a.end_arc,
                    a.guns_per_mount,
                )
            })
            .collect::<Result<Vec<_>, FleetError>>()?;

        let mut ship = Ship::new(config.name.clone(), hull, armaments)?.with_protection(config.armor);
        if let Some(staying_power) = config.staying_power {
            ship = ship.with_staying_power(staying_power)?;
        }
        ships.add(ship)?;
        roster.insert(config.name.clone());
    }
    Ok(roster)
}

fn build_side(
    label: SideLabel,
    config: &SideConfig,
    roster: &HashSet<String>,
    ships: &ShipRegistry,
) -> Result<Side, ConfigError> {
    let mut side = Side::new(label, config.name.clone());
    for group in &config.groups {
        let members = group
            .members
            .iter()
            .map(|name| {
                if roster.contains(name) {
                    ships.resolve(name)
                } else {
                    Err(FleetError::UnknownShip(name.clone()))
                }
            })
            .collect::<Result<Vec<_>, FleetError>>()?;
        side.add_group(Group::new(group.name.clone(), group.kind, members, ships)?)?;
    }
    for event in &config.events {
        side.register_fire_event(event.to_event()?)?;
    }
    Ok(side)
}

/// Load a scenario file and build its battle
pub fn load_scenario(path: &Path) -> Result<LoadedScenario, ConfigError> {
    let config: ScenarioConfig = super::load_toml(path)?;
    config.build()
}

/// Build a battle from scenario TOML text
pub fn parse_scenario(content: &str) -> Result<LoadedScenario, ConfigError> {
    let config: ScenarioConfig = super::parse_toml(content)?;
    config.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COCOS: &str = r#"
[battle]
name = "Cocos"
start = "09:40"

[[guns]]
designation = "6 in BL XI"
mount = "cruiser"
caliber = 6.0
max_range = 14000

[guns.brackets]
long_to_hit = 0.02
long_min = 10000
effective_to_hit = 0.04
effective_min = 6000
short_to_hit = 0.08

[[guns]]
designation = "10.5 cm SK L/40"
mount = "cruiser"
caliber = 4.1
max_range = 12000

[guns.brackets]
long_to_hit = 0.015
long_min = 9000
effective_to_hit = 0.03
effective_min = 5000
short_to_hit = 0.06

[side_a]
name = "Australia"

[[side_a.ships]]
name = "Sydney"
hull = "CL"

[[side_a.ships.armaments]]
gun = "6 in BL XI"
mounts = { total = 8, bow = 3, broadside = 5, stern = 3 }

[[side_a.groups]]
name = "Sydney"
kind = "light"
members = ["Sydney"]

[[side_a.events]]
firer = "Sydney"
target = "Emden"
range = 9500
start = 0
duration = 20

[side_b]
name = "Germany"

[[side_b.ships]]
name = "Emden"
hull = "light cruiser"
armor = { side = 0.0, deck = 0.8 }

[[side_b.ships.armaments]]
gun = "10.5 cm SK L/40"
mounts = { total = 10, bow = 2, broadside = 5, stern = 2 }

[[side_b.groups]]
name = "Emden"
kind = "light"
members = ["Emden"]

[[side_b.events]]
firer = "Emden"
target = "Sydney"
range = 9500
start = 0
duration = 15
bearing = 100
"#;

    #[test]
    fn test_parse_cocos() {
        let loaded = parse_scenario(COCOS).unwrap();
        let battle = &loaded.battle;
        assert_eq!(battle.name(), "Cocos");
        assert_eq!(battle.start_clock().to_string(), "09:40");
        assert_eq!(battle.length(), 20);
        assert_eq!(battle.ships().len(), 2);
        // 8 x 6 in on a light cruiser: 8 x 8
        let sydney = battle.ships().resolve("Sydney").unwrap();
        assert_eq!(battle.ships()[sydney].staying_power(), 64.0);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_resolves_after_loading() {
        let mut loaded = parse_scenario(COCOS).unwrap();
        let outcome = loaded.battle.resolve().unwrap();
        assert!(outcome.side_b.losses > 0.0);
        assert!(outcome.side_a.losses > 0.0);
    }

    #[test]
    fn test_unknown_hull_is_fatal() {
        let broken = COCOS.replace(r#"hull = "CL""#, r#"hull = "Q-ship""#);
        let err = parse_scenario(&broken).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::FleetError(FleetError::UnknownHullClass(_))
        ));
    }

    #[test]
    fn test_unknown_gun_is_fatal() {
        let broken = COCOS.replace(r#"gun = "6 in BL XI""#, r#"gun = "6 in BL VII""#);
        let err = parse_scenario(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::FleetError(FleetError::UnknownGun(_))));
    }

    #[test]
    fn test_group_member_from_other_side_rejected() {
        let broken = COCOS.replace(r#"members = ["Sydney"]"#, r#"members = ["Emden"]"#);
        let err = parse_scenario(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::FleetError(FleetError::UnknownShip(_))));
    }

    #[test]
    fn test_conflicting_salvo_fields() {
        let broken = COCOS.replace("bearing = 100", "bearing = 100\narc = \"bow\"");
        let err = parse_scenario(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_profile_and_overrides() {
        let text = COCOS.replace(
            r#"start = "09:40""#,
            "start = \"09:40\"\nprofile = \"maneuver_rules_1922\"\n\n[rules]\nsize_modifiers = true",
        );
        let loaded = parse_scenario(&text).unwrap();
        let rules = loaded.battle.rules();
        assert_eq!(rules.profile, RuleProfile::ManeuverRules1922);
        assert!(rules.size_modifiers);
        // neither gun carries penetration data
        assert_eq!(loaded.warnings.len(), 2);
        assert!(loaded
            .warnings
            .iter()
            .all(|w| matches!(w, GunneryWarning::MissingPenetrationData { .. })));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            parse_scenario("[battle"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
