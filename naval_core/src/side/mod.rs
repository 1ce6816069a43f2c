//! Sides: a belligerent's groups and its schedule of fire

mod event;

pub use event::{FireEvent, MAX_EVENT_END};

use crate::error::FleetError;
use crate::group::{ratio, Group};
use crate::ship::ShipRegistry;
use crate::types::{GroupId, ShipId, SideLabel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Aggregate strength of a side at one moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideSnapshot {
    pub hit_points: f64,
    pub status: f64,
}

#[derive(Debug, Clone)]
pub struct Side {
    label: SideLabel,
    name: String,
    groups: Vec<Group>,
    group_index: HashMap<String, GroupId>,
    fire_events: Vec<FireEvent>,
    /// End minute of the latest registered event
    latest_event: u32,
    staying_power: f64,
    hit_points: f64,
    status: f64,
}

impl Side {
    /// Empty side
    pub fn new(label: SideLabel, name: impl Into<String>) -> Self {
        Side {
            label,
            name: name.into(),
            groups: Vec::new(),
            group_index: HashMap::new(),
            fire_events: Vec::new(),
            latest_event: 0,
            staying_power: 0.0,
            hit_points: 0.0,
            status: 1.0,
        }
    }

    /// Side label
    pub fn label(&self) -> SideLabel {
        self.label
    }

    /// Side name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a group, rejecting duplicate names
    pub fn add_group(&mut self, group: Group) -> Result<GroupId, FleetError> {
        if self.group_index.contains_key(group.name()) {
            return Err(FleetError::DuplicateGroup(group.name().to_string()));
        }
        let id = GroupId(self.groups.len());
        self.group_index.insert(group.name().to_string(), id);
        self.groups.push(group);
        Ok(id)
    }

    /// Groups in insertion order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group by id
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    /// Mutable group by id
    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.0)
    }

    /// Id of a named group
    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.group_index.get(name).copied()
    }

    /// Id of a named group, or an error
    pub fn resolve_group(&self, name: &str) -> Result<GroupId, FleetError> {
        self.group_id(name).ok_or_else(|| FleetError::UnknownGroup {
            side: self.label,
            name: name.to_string(),
        })
    }

    /// Add a fire event, checking it and its firing group
    pub fn register_fire_event(&mut self, event: FireEvent) -> Result<(), FleetError> {
        event.validate()?;
        self.resolve_group(&event.firer)?;
        self.latest_event = self.latest_event.max(event.end());
        self.fire_events.push(event);
        Ok(())
    }

    /// Registered fire events
    pub fn fire_events(&self) -> &[FireEvent] {
        &self.fire_events
    }

    /// Minute the last fire event ends
    pub fn latest_event(&self) -> u32 {
        self.latest_event
    }

    /// Every ship in any of the side's groups, each once
    pub fn members(&self) -> BTreeSet<ShipId> {
        self.groups
            .iter()
            .flat_map(|g| g.members().iter().copied())
            .collect()
    }

    /// Summed staying power of every member
    pub fn staying_power(&self) -> f64 {
        self.staying_power
    }

    /// Summed hit points of every member
    pub fn hit_points(&self) -> f64 {
        self.hit_points
    }

    /// Hit points as a fraction of staying power
    pub fn status(&self) -> f64 {
        self.status
    }

    /// Hit points and status at this moment
    pub fn snapshot(&self) -> SideSnapshot {
        SideSnapshot {
            hit_points: self.hit_points,
            status: self.status,
        }
    }

    /// Commit pending damage on every ship, then refresh groups and totals
    pub fn update(&mut self, ships: &mut ShipRegistry) {
        ships.update(self.members());
        self.refresh(ships);
    }

    /// Recompute group and side totals from the ships as they stand
    pub fn refresh(&mut self, ships: &ShipRegistry) {
        for group in &mut self.groups {
            group.refresh(ships);
        }
        let (staying_power, hit_points) = self
            .members()
            .into_iter()
            .filter_map(|id| ships.get(id))
            .fold((0.0, 0.0), |(sp, hp), ship| {
                (sp + ship.staying_power(), hp + ship.hit_points())
            });
        self.staying_power = staying_power;
        self.hit_points = hit_points;
        self.status = ratio(hit_points, staying_power);
    }
}
