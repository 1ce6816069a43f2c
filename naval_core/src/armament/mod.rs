//! Gun batteries mounted on a ship

mod allocation;

use crate::error::FleetError;
use crate::gunnery::{GunnerySpec, ToHitPolicy};
use crate::types::{BatteryRole, FiringArc, Salvo};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Mounts of one battery bearing on each firing arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MountCounts {
    pub total: u32,
    #[serde(default)]
    pub bow: u32,
    pub broadside: u32,
    #[serde(default)]
    pub stern: u32,
}

impl MountCounts {
    /// Guns that bear on the given arc
    pub fn bearing(&self, arc: FiringArc) -> u32 {
        match arc {
            FiringArc::Bow => self.bow,
            FiringArc::Broadside => self.broadside,
            FiringArc::Stern => self.stern,
        }
    }
}

/// A battery of identical mounts sharing one gun type
#[derive(Debug, Clone, PartialEq)]
pub struct Armament {
    gun: Arc<GunnerySpec>,
    role: BatteryRole,
    mounts: MountCounts,
    /// Angle from bow or stern (degrees) where the end arcs give way to the broadside
    end_arc: f64,
    guns_per_mount: u32,
    active: bool,
}

impl Armament {
    /// Create a battery, checking that no arc has more mounts than the ship carries
    pub fn new(
        gun: Arc<GunnerySpec>,
        role: BatteryRole,
        mounts: MountCounts,
        end_arc: f64,
        guns_per_mount: u32,
    ) -> Result<Self, FleetError> {
        if guns_per_mount == 0 {
            return Err(FleetError::InvalidArmament(format!(
                "{}: guns per mount must be at least 1",
                gun.designation
            )));
        }
        if mounts.total == 0 {
            return Err(FleetError::InvalidArmament(format!(
                "{}: battery has no mounts",
                gun.designation
            )));
        }
        for arc in FiringArc::all() {
            if mounts.bearing(*arc) > mounts.total {
                return Err(FleetError::InvalidArmament(format!(
                    "{}: {} mounts bear on {:?} but only {} are carried",
                    gun.designation,
                    mounts.bearing(*arc),
                    arc,
                    mounts.total
                )));
            }
        }
        if !(gun.max_range.is_finite() && gun.max_range >= 0.0) {
            return Err(FleetError::InvalidArmament(format!(
                "{}: maximum range {} is not a distance",
                gun.designation, gun.max_range
            )));
        }
        if !(0.0..=90.0).contains(&end_arc) {
            return Err(FleetError::InvalidArmament(format!(
                "{}: end arc {} is outside 0-90 degrees",
                gun.designation, end_arc
            )));
        }

        Ok(Armament {
            gun,
            role,
            mounts,
            end_arc,
            guns_per_mount,
            active: true,
        })
    }

    /// Gun fitted in this battery
    pub fn gun(&self) -> &GunnerySpec {
        &self.gun
    }

    /// Bore of the battery's gun in inches
    pub fn caliber(&self) -> f64 {
        self.gun.caliber
    }

    /// Primary or secondary battery
    pub fn role(&self) -> BatteryRole {
        self.role
    }

    /// Mount counts per arc
    pub fn mounts(&self) -> MountCounts {
        self.mounts
    }

    /// Half-width of the bow and stern arcs in degrees
    pub fn end_arc(&self) -> f64 {
        self.end_arc
    }

    /// Barrels in each mount
    pub fn guns_per_mount(&self) -> u32 {
        self.guns_per_mount
    }

    /// Every gun in the battery regardless of bearing
    pub fn total_guns(&self) -> u32 {
        self.mounts.total * self.guns_per_mount
    }

    /// Arc a target bearing falls into
    pub fn firing_arc(&self, bearing: f64) -> FiringArc {
        FiringArc::from_bearing(bearing, self.end_arc)
    }

    /// Mounts bearing on an arc
    pub fn mounts_bearing(&self, arc: FiringArc) -> u32 {
        self.mounts.bearing(arc)
    }

    /// Guns bearing on an arc
    pub fn salvo_size(&self, arc: FiringArc) -> u32 {
        self.mounts_bearing(arc) * self.guns_per_mount
    }

    /// The arc a salvo is fired on, if it is described by bearing or arc
    pub fn arc_for(&self, salvo: Salvo) -> Option<FiringArc> {
        match salvo {
            Salvo::Bearing(bearing) => Some(self.firing_arc(bearing)),
            Salvo::Arc(arc) => Some(arc),
            Salvo::Guns(_) => None,
        }
    }

    /// Guns firing a salvo when the battery engages a single target
    pub fn salvo_guns(&self, salvo: Salvo) -> u32 {
        match salvo {
            Salvo::Guns(guns) => guns.min(self.total_guns()),
            _ => self
                .arc_for(salvo)
                .map_or(0, |arc| self.salvo_size(arc)),
        }
    }

    /// Whether the battery still fires
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Put the battery out of action for the rest of the battle
    pub fn knock_out(&mut self) {
        self.active = false;
    }

    /// Standard hits per minute the battery would deliver at `range` on `arc`
    ///
    /// Ignores damage, formation penalties and target size.
    pub fn firepower(&self, range: f64, arc: FiringArc, policy: ToHitPolicy) -> f64 {
        if !self.active {
            return 0.0;
        }
        self.gun.hits_per_gun(range, policy) * self.salvo_size(arc) as f64 * self.gun.conversion_factor()
    }
}
