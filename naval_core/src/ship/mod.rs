//! Ships: staying power, pending damage and per-pulse status

mod fire;
mod hull;
mod registry;

pub use fire::{Shot, ShotOutcome};
pub use hull::{HullCategory, HullClass};
pub use registry::ShipRegistry;

use crate::armament::Armament;
use crate::error::FleetError;
use crate::gunnery::ToHitPolicy;
use crate::types::{BatteryRole, FiringArc, Protection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw hits received from one caliber
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaliberHits {
    pub caliber: f64,
    pub hits: f64,
}

/// A ship taking part in a battle
///
/// `hit_points` is only lowered by [`Ship::damage`]. `status` and
/// `starting_hit_points` only change in [`Ship::update`], so every shot fired
/// within one pulse sees the same pre-pulse state.
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    name: String,
    hull: HullClass,
    armaments: Vec<Armament>,
    /// Index of the main battery in `armaments`
    main: usize,
    protection: Protection,
    staying_power: f64,
    hit_points: f64,
    starting_hit_points: f64,
    status: f64,
    /// Keyed by caliber in hundredths of an inch
    hits_received: BTreeMap<u32, f64>,
}

impl Ship {
    /// Create a ship; the first primary battery is its main armament
    ///
    /// Staying power is the main battery's gun count times the hull
    /// multiplier for the main caliber.
    pub fn new(
        name: impl Into<String>,
        hull: HullClass,
        armaments: Vec<Armament>,
    ) -> Result<Self, FleetError> {
        let name = name.into();
        let main = armaments
            .iter()
            .position(|a| a.role() == BatteryRole::Primary)
            .ok_or_else(|| FleetError::NoPrimaryArmament(name.clone()))?;

        let main_battery = &armaments[main];
        let staying_power =
            main_battery.total_guns() as f64 * hull.staying_power_multiplier(main_battery.caliber());

        Ok(Ship {
            name,
            hull,
            armaments,
            main,
            protection: Protection::default(),
            staying_power,
            hit_points: staying_power,
            starting_hit_points: staying_power,
            status: 1.0,
            hits_received: BTreeMap::new(),
        })
    }

    /// Replace the computed staying power, resetting the ship to undamaged
    pub fn with_staying_power(mut self, staying_power: f64) -> Result<Self, FleetError> {
        if !staying_power.is_finite() || staying_power <= 0.0 {
            return Err(FleetError::InvalidStayingPower(self.name));
        }
        self.staying_power = staying_power;
        self.hit_points = staying_power;
        self.starting_hit_points = staying_power;
        self.status = 1.0;
        Ok(self)
    }

    /// Set belt protection
    pub fn with_protection(mut self, protection: Protection) -> Self {
        self.protection = protection;
        self
    }

    /// Ship name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hull class
    pub fn hull(&self) -> HullClass {
        self.hull
    }

    /// Hull category
    pub fn category(&self) -> HullCategory {
        self.hull.category()
    }

    /// Belt protection
    pub fn protection(&self) -> Protection {
        self.protection
    }

    /// Every battery aboard
    pub fn armaments(&self) -> &[Armament] {
        &self.armaments
    }

    /// Heaviest primary battery
    pub fn main_armament(&self) -> &Armament {
        &self.armaments[self.main]
    }

    /// Hit points when undamaged
    pub fn staying_power(&self) -> f64 {
        self.staying_power
    }

    /// Hit points committed at the end of the last pulse
    pub fn hit_points(&self) -> f64 {
        self.hit_points
    }

    /// Hit points at the start of the current pulse
    pub fn starting_hit_points(&self) -> f64 {
        self.starting_hit_points
    }

    /// Hit points as a fraction of staying power
    pub fn status(&self) -> f64 {
        self.status
    }

    /// True once hit points reach zero
    pub fn is_sunk(&self) -> bool {
        self.hit_points <= 0.0
    }

    /// Remove hit points; never drops below zero and leaves `status` alone
    pub fn damage(&mut self, points: f64) {
        if points.is_nan() || points <= 0.0 {
            return;
        }
        self.hit_points -= points.min(self.hit_points);
    }

    /// Commit the pulse's damage
    pub fn update(&mut self) {
        self.starting_hit_points = self.hit_points;
        self.status = (self.hit_points / self.staying_power).clamp(0.0, 1.0);
    }

    /// Tally raw hits by firing caliber; ignored once the ship was out of action
    pub fn record_hits(&mut self, caliber: f64, hits: f64) {
        if self.starting_hit_points <= 0.0 || hits.is_nan() || hits <= 0.0 {
            return;
        }
        let key = (caliber * 100.0).round() as u32;
        *self.hits_received.entry(key).or_insert(0.0) += hits;
    }

    /// Hits received so far, smallest caliber first
    pub fn hits_received(&self) -> Vec<CaliberHits> {
        self.hits_received
            .iter()
            .map(|(key, hits)| CaliberHits {
                caliber: *key as f64 / 100.0,
                hits: *hits,
            })
            .collect()
    }

    /// Put a battery out of action; returns false if there is no such battery
    pub fn knock_out_armament(&mut self, index: usize) -> bool {
        match self.armaments.get_mut(index) {
            Some(armament) => {
                armament.knock_out();
                true
            }
            None => false,
        }
    }

    /// Standard hits per minute from the primary batteries at `range` on `arc`
    ///
    /// Undamaged, unpenalised figure used to compare fleets before battle.
    pub fn firepower(&self, range: f64, arc: FiringArc, policy: ToHitPolicy) -> f64 {
        self.armaments
            .iter()
            .filter(|a| a.role() == BatteryRole::Primary)
            .map(|a| a.firepower(range, arc, policy))
            .sum()
    }

    /// Longest range of any primary battery
    pub fn max_range(&self) -> f64 {
        self.armaments
            .iter()
            .filter(|a| a.role() == BatteryRole::Primary)
            .map(|a| a.gun().max_range)
            .fold(0.0, f64::max)
    }
}
