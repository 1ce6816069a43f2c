//! Gunnery data - per gun type to-hit, rate of fire, conversion and penetration

pub mod conversion;
mod penetration;
mod to_hit;

pub use conversion::{damage_conversion_factor, HEAVY_CALIBER_THRESHOLD};
pub use penetration::{
    DeckPenetrationRow, HitValues, IncidenceClass, PenetrationTables, SidePenetrationRow,
};
pub use to_hit::{HitCurve, RangeBrackets, RateOfFireTable, RatePoint, ToHitPolicy};

use crate::error::FleetError;
use crate::types::{DamageScale, MountKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Immutable data for one gun designation
///
/// Shared by reference between every armament carrying the gun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GunnerySpec {
    /// Table designation, e.g. "13.5 in V" or "6-in-50"
    pub designation: String,
    pub mount: MountKind,
    /// Caliber in inches
    pub caliber: f64,
    /// Maximum range in yards
    pub max_range: f64,
    pub brackets: RangeBrackets,
    #[serde(default)]
    pub curve: Option<HitCurve>,
    #[serde(default)]
    pub rate_of_fire: Option<RateOfFireTable>,
    #[serde(default)]
    pub hit_values: Option<HitValues>,
    #[serde(default)]
    pub penetration: Option<PenetrationTables>,
}

impl GunnerySpec {
    /// Create a bracket-only gun
    pub fn new(
        designation: impl Into<String>,
        mount: MountKind,
        caliber: f64,
        max_range: f64,
        brackets: RangeBrackets,
    ) -> Self {
        GunnerySpec {
            designation: designation.into(),
            mount,
            caliber: caliber.max(0.0),
            max_range,
            brackets,
            curve: None,
            rate_of_fire: None,
            hit_values: None,
            penetration: None,
        }
    }

    /// Use a fitted to-hit curve instead of brackets
    pub fn with_curve(mut self, curve: HitCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    /// Set rounds per gun per minute
    pub fn with_rate_of_fire(mut self, table: RateOfFireTable) -> Self {
        self.rate_of_fire = Some(table);
        self
    }

    /// Set per-caliber hit conversion values
    pub fn with_hit_values(mut self, values: HitValues) -> Self {
        self.hit_values = Some(values);
        self
    }

    /// Set the penetration table
    pub fn with_penetration(mut self, tables: PenetrationTables) -> Self {
        self.penetration = Some(tables);
        self
    }

    /// Whether the target range is within reach
    pub fn in_range(&self, range: f64) -> bool {
        range >= 0.0 && range <= self.max_range
    }

    /// Chance to hit per round at `range`; zero out of range
    pub fn to_hit(&self, range: f64, policy: ToHitPolicy) -> f64 {
        if !self.in_range(range) {
            return 0.0;
        }
        match (policy, &self.curve) {
            (ToHitPolicy::Continuous, Some(curve)) => curve.rate(range),
            _ => self.brackets.rate(range),
        }
    }

    /// Rounds per gun per minute at `range`; 1 when no table is given
    pub fn rate_of_fire(&self, range: f64) -> f64 {
        if !self.in_range(range) {
            return 0.0;
        }
        self.rate_of_fire.as_ref().map_or(1.0, |t| t.rounds(range))
    }

    /// Expected hits per gun per minute
    pub fn hits_per_gun(&self, range: f64, policy: ToHitPolicy) -> f64 {
        self.to_hit(range, policy) * self.rate_of_fire(range)
    }

    /// Scale this gun's hits are expressed in
    pub fn damage_scale(&self) -> DamageScale {
        conversion::damage_scale(self.caliber)
    }

    /// Hits-to-damage multiplier
    pub fn conversion_factor(&self) -> f64 {
        damage_conversion_factor(self.caliber)
    }

    /// Heavy gun by caliber
    pub fn is_heavy(&self) -> bool {
        self.caliber > HEAVY_CALIBER_THRESHOLD
    }

    /// Check the data for values the engine cannot use faithfully
    pub fn validate(&self) -> Vec<GunneryWarning> {
        let mut warnings = Vec::new();
        if !conversion::within_fit_domain(self.caliber) {
            warnings.push(GunneryWarning::CaliberOutsideFit {
                designation: self.designation.clone(),
                caliber: self.caliber,
            });
        }
        if !self.brackets.is_well_formed() || !(self.max_range.is_finite() && self.max_range >= 0.0) {
            warnings.push(GunneryWarning::MalformedBrackets {
                designation: self.designation.clone(),
            });
        }
        warnings
    }
}

/// Recoverable problems found while loading gun data
#[derive(Debug, Clone, PartialEq)]
pub enum GunneryWarning {
    /// Conversion factor is extrapolated (clamped) outside calibers 4 to 16
    CaliberOutsideFit { designation: String, caliber: f64 },
    /// Negative rates, non-nesting brackets or an unusable maximum range
    MalformedBrackets { designation: String },
    /// Continuous to-hit requested but the gun has no curve; brackets are used
    MissingCurve { designation: String },
    /// Penetration hit values requested but the gun lacks tables; caliber conversion is used
    MissingPenetrationData { designation: String },
}

impl fmt::Display for GunneryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GunneryWarning::CaliberOutsideFit { designation, caliber } => write!(
                f,
                "{designation}: caliber {caliber} in is outside the supported 4-16 in conversion fit"
            ),
            GunneryWarning::MalformedBrackets { designation } => {
                write!(f, "{designation}: range brackets are malformed")
            }
            GunneryWarning::MissingCurve { designation } => {
                write!(f, "{designation}: no to-hit curve, falling back to brackets")
            }
            GunneryWarning::MissingPenetrationData { designation } => write!(
                f,
                "{designation}: no penetration data, falling back to caliber conversion"
            ),
        }
    }
}

/// Gun designation registry
#[derive(Debug, Clone, Default)]
pub struct GunneryTable {
    specs: HashMap<String, Arc<GunnerySpec>>,
}

impl GunneryTable {
    pub fn new() -> Self {
        GunneryTable {
            specs: HashMap::new(),
        }
    }

    /// Register a gun, replacing any previous entry with the same designation
    pub fn register(&mut self, spec: GunnerySpec) -> Arc<GunnerySpec> {
        let spec = Arc::new(spec);
        self.specs.insert(spec.designation.clone(), Arc::clone(&spec));
        spec
    }

    /// Gun by name
    pub fn get(&self, designation: &str) -> Option<&Arc<GunnerySpec>> {
        self.specs.get(designation)
    }

    /// Look up a designation, failing on unknown guns
    pub fn resolve(&self, designation: &str) -> Result<Arc<GunnerySpec>, FleetError> {
        self.get(designation)
            .cloned()
            .ok_or_else(|| FleetError::UnknownGun(designation.to_string()))
    }

    /// Number of guns
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// True when the catalogue has no guns
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Validate every gun, logging each warning
    pub fn validate(&self) -> Vec<GunneryWarning> {
        let mut designations: Vec<&String> = self.specs.keys().collect();
        designations.sort();

        let mut warnings = Vec::new();
        for designation in designations {
            if let Some(spec) = self.specs.get(designation) {
                warnings.extend(spec.validate());
            }
        }
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        warnings
    }
}
