//! The single owner of every ship in a battle

use super::Ship;
use crate::error::FleetError;
use crate::types::ShipId;
use std::collections::HashMap;
use std::ops::Index;

/// Ships indexed by [`ShipId`]
///
/// Groups hold ids into this registry, so a ship placed in several groups is
/// one ship: damage taken through one group shows in all of them.
#[derive(Debug, Clone, Default)]
pub struct ShipRegistry {
    ships: Vec<Ship>,
    names: HashMap<String, ShipId>,
}

impl ShipRegistry {
    /// Empty registry
    pub fn new() -> Self {
        ShipRegistry {
            ships: Vec::new(),
            names: HashMap::new(),
        }
    }

    /// Add a ship; names must be unique
    pub fn add(&mut self, ship: Ship) -> Result<ShipId, FleetError> {
        if self.names.contains_key(ship.name()) {
            return Err(FleetError::DuplicateShip(ship.name().to_string()));
        }
        let id = ShipId(self.ships.len());
        self.names.insert(ship.name().to_string(), id);
        self.ships.push(ship);
        Ok(id)
    }

    /// Ship by id
    pub fn get(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(id.0)
    }

    /// Mutable ship by id
    pub fn get_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.get_mut(id.0)
    }

    /// Id of a named ship
    pub fn id_of(&self, name: &str) -> Option<ShipId> {
        self.names.get(name).copied()
    }

    /// Id of a named ship, or an error
    pub fn resolve(&self, name: &str) -> Result<ShipId, FleetError> {
        self.id_of(name)
            .ok_or_else(|| FleetError::UnknownShip(name.to_string()))
    }

    /// Whether the id is known
    pub fn contains(&self, id: ShipId) -> bool {
        id.0 < self.ships.len()
    }

    /// Number of ships
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    /// True when no ship was added
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Ships with their ids in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ShipId, &Ship)> {
        self.ships.iter().enumerate().map(|(i, ship)| (ShipId(i), ship))
    }

    /// Borrow a firer and a distinct target at once
    ///
    /// Returns `None` if either id is unknown or both are the same ship.
    pub fn pair_mut(&mut self, firer: ShipId, target: ShipId) -> Option<(&Ship, &mut Ship)> {
        let (f, t) = (firer.0, target.0);
        if f == t || f >= self.ships.len() || t >= self.ships.len() {
            return None;
        }
        if f < t {
            let (left, right) = self.ships.split_at_mut(t);
            Some((&left[f], &mut right[0]))
        } else {
            let (left, right) = self.ships.split_at_mut(f);
            Some((&right[0], &mut left[t]))
        }
    }

    /// Commit pending damage on the given ships, once each
    pub fn update<I: IntoIterator<Item = ShipId>>(&mut self, ids: I) {
        for id in ids {
            if let Some(ship) = self.ships.get_mut(id.0) {
                ship.update();
            }
        }
    }
}

impl Index<ShipId> for ShipRegistry {
    type Output = Ship;

    fn index(&self, id: ShipId) -> &Ship {
        &self.ships[id.0]
    }
}
