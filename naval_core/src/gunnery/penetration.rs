//! Armor penetration thresholds and hit values

use crate::types::Protection;
use serde::{Deserialize, Serialize};

/// Guns smaller than this never penetrate deck armor
pub const DECK_PENETRATION_MIN_CALIBER: f64 = 5.5;

/// Conversion factors to standard hits, split by whether the shell penetrates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitValues {
    pub penetrative: f64,
    pub non_penetrative: f64,
}

impl HitValues {
    /// Penetration multiplier for this outcome
    pub fn value(&self, penetrates: bool) -> f64 {
        if penetrates {
            self.penetrative
        } else {
            self.non_penetrative
        }
    }
}

/// Incidence classes of the side penetration table
///
/// Incidence is measured between the line of fire and the target's course.
/// Each class covers an angle and its complement, in 15 degree steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidenceClass {
    Deg90,
    Deg75,
    Deg60,
    Deg45,
}

impl IncidenceClass {
    /// Incidence from an angle in degrees
    pub fn from_degrees(incidence: f64) -> IncidenceClass {
        let folded = incidence.abs().rem_euclid(90.0);
        let rounded = (folded / 15.0).round() * 15.0;
        match rounded as u32 {
            0 | 90 => IncidenceClass::Deg90,
            15 | 75 => IncidenceClass::Deg75,
            30 | 60 => IncidenceClass::Deg60,
            _ => IncidenceClass::Deg45,
        }
    }
}

/// One armor thickness row of the side penetration table
///
/// Each column is the longest range (yards) at which the belt is pierced.
/// A missing value means the belt is pierced at every range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidePenetrationRow {
    pub armor: f64,
    #[serde(default)]
    pub at_90: Option<f64>,
    #[serde(default)]
    pub at_75: Option<f64>,
    #[serde(default)]
    pub at_60: Option<f64>,
    #[serde(default)]
    pub at_45: Option<f64>,
}

impl SidePenetrationRow {
    fn limit(&self, class: IncidenceClass) -> Option<f64> {
        match class {
            IncidenceClass::Deg90 => self.at_90,
            IncidenceClass::Deg75 => self.at_75,
            IncidenceClass::Deg60 => self.at_60,
            IncidenceClass::Deg45 => self.at_45,
        }
    }
}

/// One armor thickness row of the deck penetration table
///
/// `min_range` is the shortest range (yards) at which plunging fire pierces
/// the deck. A missing value means the deck is never pierced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckPenetrationRow {
    pub armor: f64,
    #[serde(default)]
    pub min_range: Option<f64>,
}

/// Per-gun penetration tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PenetrationTables {
    #[serde(default)]
    pub side: Vec<SidePenetrationRow>,
    #[serde(default)]
    pub deck: Vec<DeckPenetrationRow>,
}

impl PenetrationTables {
    /// Whether a shell pierces belt armor of `armor` inches
    pub fn side_penetrates(&self, armor: f64, incidence: f64, range: f64) -> bool {
        let thickest = self.side.iter().map(|r| r.armor).fold(f64::NEG_INFINITY, f64::max);
        if self.side.is_empty() || armor > thickest {
            return false;
        }

        let row = match nearest_row(&self.side, armor, |r| r.armor) {
            Some(row) => row,
            None => return false,
        };
        match row.limit(IncidenceClass::from_degrees(incidence)) {
            None => true,
            Some(limit) => range <= limit,
        }
    }

    /// Whether a shell of `caliber` inches pierces deck armor of `armor` inches
    pub fn deck_penetrates(&self, caliber: f64, armor: f64, range: f64) -> bool {
        if caliber < DECK_PENETRATION_MIN_CALIBER || self.deck.is_empty() {
            return false;
        }

        let thickest = self.deck.iter().map(|r| r.armor).fold(f64::NEG_INFINITY, f64::max);
        let thinnest = self.deck.iter().map(|r| r.armor).fold(f64::INFINITY, f64::min);
        if armor > thickest {
            return false;
        }
        if armor < thinnest {
            return true;
        }

        match nearest_row(&self.deck, armor, |r| r.armor).and_then(|r| r.min_range) {
            None => false,
            Some(min_range) => range >= min_range,
        }
    }

    /// A hit counts as penetrative if it pierces either the belt or the deck
    pub fn penetrates(&self, caliber: f64, protection: Protection, incidence: f64, range: f64) -> bool {
        self.side_penetrates(protection.side, incidence, range)
            || self.deck_penetrates(caliber, protection.deck, range)
    }
}

fn nearest_row<T>(rows: &[T], armor: f64, thickness: impl Fn(&T) -> f64) -> Option<&T> {
    rows.iter()
        .min_by(|a, b| (thickness(a) - armor).abs().total_cmp(&(thickness(b) - armor).abs()))
}
