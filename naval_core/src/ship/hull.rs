//! Hull classes and the staying-power rules attached to them

use crate::error::FleetError;
use crate::types::DamageScale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad size category used by the size and heavy-gun rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HullCategory {
    /// Battleships and battle cruisers
    Capital,
    /// Armored and light cruisers
    Cruiser,
    /// Flotilla leaders, destroyers and minelayers
    Flotilla,
}

/// Hull class of a ship, parsed from its roster tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HullClass {
    Battleship,
    OldBattleship,
    BattleCruiser,
    OldBattleCruiser,
    ArmoredCruiser,
    OldArmoredCruiser,
    LightCruiser,
    OldLightCruiser,
    FlotillaLeader,
    Destroyer,
    OldDestroyer,
    DestroyerMinelayer,
}

impl HullClass {
    /// Short hull tag used in scenario files
    pub fn tag(self) -> &'static str {
        match self {
            HullClass::Battleship => "BB",
            HullClass::OldBattleship => "OBB",
            HullClass::BattleCruiser => "CC",
            HullClass::OldBattleCruiser => "OCC",
            HullClass::ArmoredCruiser => "CA",
            HullClass::OldArmoredCruiser => "OCA",
            HullClass::LightCruiser => "CL",
            HullClass::OldLightCruiser => "OCL",
            HullClass::FlotillaLeader => "DL",
            HullClass::Destroyer => "DD",
            HullClass::OldDestroyer => "ODD",
            HullClass::DestroyerMinelayer => "DM",
        }
    }

    /// Broad hull category
    pub fn category(self) -> HullCategory {
        match self {
            HullClass::Battleship
            | HullClass::OldBattleship
            | HullClass::BattleCruiser
            | HullClass::OldBattleCruiser => HullCategory::Capital,
            HullClass::ArmoredCruiser
            | HullClass::OldArmoredCruiser
            | HullClass::LightCruiser
            | HullClass::OldLightCruiser => HullCategory::Cruiser,
            HullClass::FlotillaLeader
            | HullClass::Destroyer
            | HullClass::OldDestroyer
            | HullClass::DestroyerMinelayer => HullCategory::Flotilla,
        }
    }

    /// Unit the ship's staying power is counted in
    pub fn damage_scale(self) -> DamageScale {
        match self.category() {
            HullCategory::Capital => DamageScale::FifteenInch,
            HullCategory::Cruiser | HullCategory::Flotilla => DamageScale::SixInch,
        }
    }

    /// Staying power per main-battery gun for a main caliber in inches
    pub fn staying_power_multiplier(self, main_caliber: f64) -> f64 {
        match self {
            HullClass::Battleship | HullClass::OldBattleship => {
                if main_caliber <= 12.0 {
                    1.0
                } else if main_caliber <= 14.0 {
                    2.0
                } else if main_caliber <= 15.0 {
                    3.0
                } else {
                    3.25
                }
            }
            HullClass::BattleCruiser | HullClass::OldBattleCruiser => {
                if main_caliber <= 12.0 {
                    0.75
                } else if main_caliber <= 13.5 {
                    1.75
                } else if main_caliber <= 15.0 {
                    2.5
                } else {
                    2.75
                }
            }
            HullClass::ArmoredCruiser
            | HullClass::OldArmoredCruiser
            | HullClass::LightCruiser
            | HullClass::OldLightCruiser => {
                if main_caliber <= 4.0 {
                    4.0
                } else if main_caliber <= 6.0 {
                    8.0
                } else {
                    9.0
                }
            }
            HullClass::FlotillaLeader
            | HullClass::Destroyer
            | HullClass::OldDestroyer
            | HullClass::DestroyerMinelayer => 1.0,
        }
    }

    /// Smallest caliber (inches) that can damage the hull
    pub fn minimum_caliber_to_damage(self) -> f64 {
        match self.category() {
            HullCategory::Capital => 12.0,
            HullCategory::Cruiser | HullCategory::Flotilla => 4.0,
        }
    }
}

impl FromStr for HullClass {
    type Err = FleetError;

    /// Accepts roster tags ("BB", "CL") and long names ("battle cruiser")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        let hull = match normalized.as_str() {
            "bb" | "battleship" => HullClass::Battleship,
            "obb" | "old battleship" => HullClass::OldBattleship,
            "cc" | "battle cruiser" | "battlecruiser" => HullClass::BattleCruiser,
            "occ" | "old battle cruiser" => HullClass::OldBattleCruiser,
            "ca" | "armored cruiser" | "armoured cruiser" => HullClass::ArmoredCruiser,
            "oca" | "old armored cruiser" | "old armoured cruiser" => HullClass::OldArmoredCruiser,
            "cl" | "light cruiser" => HullClass::LightCruiser,
            "ocl" | "old light cruiser" => HullClass::OldLightCruiser,
            "dl" | "flotilla leader" => HullClass::FlotillaLeader,
            "dd" | "destroyer" => HullClass::Destroyer,
            "odd" | "old destroyer" => HullClass::OldDestroyer,
            "dm" | "destroyer minelayer" | "minelayer" => HullClass::DestroyerMinelayer,
            _ => return Err(FleetError::UnknownHullClass(s.to_string())),
        };
        Ok(hull)
    }
}

impl TryFrom<String> for HullClass {
    type Error = FleetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HullClass> for String {
    fn from(hull: HullClass) -> Self {
        hull.tag().to_string()
    }
}

impl fmt::Display for HullClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
