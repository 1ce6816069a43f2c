//! Core identifiers and small shared enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a ship in the battle's ship registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub usize);

/// Index of a group within its side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub usize);

/// One of the two belligerents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideLabel {
    A,
    B,
}

impl SideLabel {
    /// The other side
    pub fn opponent(self) -> SideLabel {
        match self {
            SideLabel::A => SideLabel::B,
            SideLabel::B => SideLabel::A,
        }
    }
}

impl fmt::Display for SideLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideLabel::A => write!(f, "A"),
            SideLabel::B => write!(f, "B"),
        }
    }
}

/// Sector a target lies in, relative to the firing ship's bow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringArc {
    Bow,
    Broadside,
    Stern,
}

impl FiringArc {
    /// Pick the arc for a relative bearing in degrees
    ///
    /// The bearing is folded into [0, 180] (port and starboard are symmetric).
    /// Bearings closer to the bow than `end_arc` are `Bow`, closer to the stern
    /// than `end_arc` are `Stern`, anything else is `Broadside`.
    pub fn from_bearing(bearing: f64, end_arc: f64) -> FiringArc {
        let mut folded = bearing.rem_euclid(360.0);
        if folded > 180.0 {
            folded = 360.0 - folded;
        }

        if folded < end_arc {
            FiringArc::Bow
        } else if folded > 180.0 - end_arc {
            FiringArc::Stern
        } else {
            FiringArc::Broadside
        }
    }

    /// Every variant
    pub fn all() -> &'static [FiringArc] {
        &[FiringArc::Bow, FiringArc::Broadside, FiringArc::Stern]
    }
}

/// How many guns of a battery bear on a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Salvo {
    /// Relative bearing of the target in degrees; the arc follows from it
    Bearing(f64),
    /// A firing arc given directly
    Arc(FiringArc),
    /// A fixed number of guns per battery, capped at the battery's total
    Guns(u32),
}

impl Default for Salvo {
    /// Target on the beam: full broadside
    fn default() -> Self {
        Salvo::Bearing(90.0)
    }
}

/// Battery category on a ship; fire events select which categories fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryRole {
    Primary,
    Secondary,
    Tertiary,
}

/// Gun mounting category from the gunnery tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountKind {
    /// Heavy turret guns of battleships and battle cruisers
    Capital,
    /// Secondary guns of capital ships
    Secondary,
    Cruiser,
    Destroyer,
}

/// Standard damage unit a hit is converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageScale {
    /// 6-inch hit equivalents (cruisers and flotilla craft)
    SixInch,
    /// 15-inch hit equivalents (battleships and battle cruisers)
    FifteenInch,
}

impl DamageScale {
    /// Caliber the scale is expressed in
    pub fn reference_caliber(self) -> f64 {
        match self {
            DamageScale::SixInch => 6.0,
            DamageScale::FifteenInch => 15.0,
        }
    }
}

/// Tactical type of a group; firepower is only comparable within one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Capital,
    Light,
}

impl GroupKind {
    /// Damage scale for this category
    pub fn damage_scale(self) -> DamageScale {
        match self {
            GroupKind::Capital => DamageScale::FifteenInch,
            GroupKind::Light => DamageScale::SixInch,
        }
    }
}

/// Armor protection amidships, in inches
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Protection {
    #[serde(default)]
    pub side: f64,
    #[serde(default)]
    pub deck: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_from_bearing() {
        assert_eq!(FiringArc::from_bearing(10.0, 30.0), FiringArc::Bow);
        assert_eq!(FiringArc::from_bearing(90.0, 30.0), FiringArc::Broadside);
        assert_eq!(FiringArc::from_bearing(160.0, 30.0), FiringArc::Stern);
    }

    #[test]
    fn test_arc_folds_port_side() {
        // 350 is 10 degrees off the bow to port
        assert_eq!(FiringArc::from_bearing(350.0, 30.0), FiringArc::Bow);
        // 200 is 20 degrees off the stern to port
        assert_eq!(FiringArc::from_bearing(200.0, 30.0), FiringArc::Stern);
        assert_eq!(FiringArc::from_bearing(270.0, 30.0), FiringArc::Broadside);
        assert_eq!(FiringArc::from_bearing(360.0, 30.0), FiringArc::Bow);
    }

    #[test]
    fn test_arc_boundaries_are_broadside() {
        assert_eq!(FiringArc::from_bearing(30.0, 30.0), FiringArc::Broadside);
        assert_eq!(FiringArc::from_bearing(150.0, 30.0), FiringArc::Broadside);
    }
}
