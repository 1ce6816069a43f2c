//! Rule editions and the knobs that distinguish them
//!
//! A `RuleSet` is built once from a named `RuleProfile` and passed by
//! reference into every fire call. Profiles are never merged or inferred.

mod corrections;

pub use corrections::{ranging_reduction, size_modifier, table_b_fraction};

use crate::gunnery::ToHitPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named rule editions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RuleProfile {
    /// Royal Navy Instructions for Tactical Exercises, 1921 (canonical)
    #[default]
    #[serde(rename = "instructions_1921")]
    Instructions1921,
    /// 1921 rules with to-hit read from fitted curves
    #[serde(rename = "instructions_1921_interpolated")]
    Instructions1921Interpolated,
    /// Naval War College Maneuver Rules, 1922
    #[serde(rename = "maneuver_rules_1922")]
    ManeuverRules1922,
}

impl fmt::Display for RuleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleProfile::Instructions1921 => "instructions_1921",
            RuleProfile::Instructions1921Interpolated => "instructions_1921_interpolated",
            RuleProfile::ManeuverRules1922 => "maneuver_rules_1922",
        };
        f.write_str(name)
    }
}

/// Accuracy penalty for a formation firing on a smaller one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationRule {
    /// Superiority r counts as r/2 + 1 ships: multiplier (r/2 + 1) / r
    EquivalentFirers,
    None,
}

/// Rate-of-fire reduction when a group opens fire on a new target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningFireRule {
    Ignore,
    /// Range-dependent tenths lost on the first minute of fire
    RangingCorrection,
}

/// How guns are shared when a group engages several targets in one minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountAllocation {
    /// Every engagement gets the full salvo of its arc
    FullSalvoPerEvent,
    /// Mounts are divided among the simultaneous engagements
    SplitAcrossTargets,
}

/// What a hit is worth in standard damage units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitValueRule {
    /// 6-inch / 15-inch equivalents by caliber
    CaliberConversion,
    /// Penetrative or non-penetrative hit values from the gun's tables
    Penetration,
}

/// Heavy guns against destroyers and flotilla leaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlotillaKnockout {
    /// Any nonzero hit puts the target out of action
    AnyHit,
    /// Each hit removes the target's whole staying power, scaled by the hit count
    PerHit,
}

/// Whether damage taken reduces a ship's own fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireDegradation {
    /// Fire is scaled by the pre-pulse status
    Proportional,
    /// Full fire until the ship is out of action
    None,
}

/// The complete, immutable rule configuration for a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub profile: RuleProfile,
    pub to_hit: ToHitPolicy,
    pub concentration: ConcentrationRule,
    pub opening_fire: OpeningFireRule,
    pub mount_allocation: MountAllocation,
    pub hit_value: HitValueRule,
    pub flotilla_knockout: FlotillaKnockout,
    pub fire_degradation: FireDegradation,
    /// Apply the mount-versus-hull accuracy modifiers
    pub size_modifiers: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::instructions_1921()
    }
}

impl RuleSet {
    /// Rule set for a named profile
    pub fn from_profile(profile: RuleProfile) -> Self {
        match profile {
            RuleProfile::Instructions1921 => Self::instructions_1921(),
            RuleProfile::Instructions1921Interpolated => Self::instructions_1921_interpolated(),
            RuleProfile::ManeuverRules1922 => Self::maneuver_rules_1922(),
        }
    }

    /// Bracketed to-hit, concentration penalty and any-hit flotilla knockout
    pub fn instructions_1921() -> Self {
        RuleSet {
            profile: RuleProfile::Instructions1921,
            to_hit: ToHitPolicy::Bracketed,
            concentration: ConcentrationRule::EquivalentFirers,
            opening_fire: OpeningFireRule::Ignore,
            mount_allocation: MountAllocation::FullSalvoPerEvent,
            hit_value: HitValueRule::CaliberConversion,
            flotilla_knockout: FlotillaKnockout::AnyHit,
            fire_degradation: FireDegradation::Proportional,
            size_modifiers: true,
        }
    }

    /// The 1921 rules with to-hit interpolated between brackets
    pub fn instructions_1921_interpolated() -> Self {
        RuleSet {
            profile: RuleProfile::Instructions1921Interpolated,
            to_hit: ToHitPolicy::Continuous,
            ..Self::instructions_1921()
        }
    }

    /// Ranging correction, split salvos and penetration-based hit values
    pub fn maneuver_rules_1922() -> Self {
        RuleSet {
            profile: RuleProfile::ManeuverRules1922,
            to_hit: ToHitPolicy::Bracketed,
            concentration: ConcentrationRule::None,
            opening_fire: OpeningFireRule::RangingCorrection,
            mount_allocation: MountAllocation::SplitAcrossTargets,
            hit_value: HitValueRule::Penetration,
            flotilla_knockout: FlotillaKnockout::PerHit,
            fire_degradation: FireDegradation::Proportional,
            size_modifiers: false,
        }
    }

    /// Set the to-hit model
    pub fn with_to_hit(mut self, policy: ToHitPolicy) -> Self {
        self.to_hit = policy;
        self
    }

    /// Set the concentration penalty
    pub fn with_concentration(mut self, rule: ConcentrationRule) -> Self {
        self.concentration = rule;
        self
    }

    /// Set how damage degrades fire
    pub fn with_fire_degradation(mut self, rule: FireDegradation) -> Self {
        self.fire_degradation = rule;
        self
    }

    /// Set how hits put flotilla craft out of action
    pub fn with_flotilla_knockout(mut self, rule: FlotillaKnockout) -> Self {
        self.flotilla_knockout = rule;
        self
    }

    /// Toggle target size modifiers
    pub fn with_size_modifiers(mut self, enabled: bool) -> Self {
        self.size_modifiers = enabled;
        self
    }

    /// Multiplier applied to the fire of `firers` ships aimed at `targets` ships
    pub fn concentration_multiplier(&self, firers: usize, targets: usize) -> f64 {
        match self.concentration {
            ConcentrationRule::None => 1.0,
            ConcentrationRule::EquivalentFirers => {
                if targets == 0 || firers <= targets {
                    return 1.0;
                }
                let ratio = firers as f64 / targets as f64;
                (ratio / 2.0 + 1.0) / ratio
            }
        }
    }

    /// Rate-of-fire factor for the first minute of an engagement
    pub fn opening_fire_factor(&self, range: f64, firer_status: f64) -> f64 {
        match self.opening_fire {
            OpeningFireRule::Ignore => 1.0,
            OpeningFireRule::RangingCorrection => {
                (1.0 + firer_status * ranging_reduction(range)).max(0.0)
            }
        }
    }

    /// Readiness of a firer with the given status
    pub fn readiness(&self, status: f64) -> f64 {
        match self.fire_degradation {
            FireDegradation::Proportional => status.clamp(0.0, 1.0),
            FireDegradation::None if status > 0.0 => 1.0,
            FireDegradation::None => 0.0,
        }
    }
}
