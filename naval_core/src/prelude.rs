//! Prelude module for convenient imports
//!
//! ```rust
//! use naval_core::prelude::*;
//! ```

// Fleet construction
pub use crate::armament::{Armament, MountCounts};
pub use crate::group::Group;
pub use crate::gunnery::{GunneryTable, GunnerySpec, RangeBrackets};
pub use crate::ship::{HullClass, Ship, ShipRegistry};
pub use crate::side::{FireEvent, Side};
pub use crate::types::{BatteryRole, FiringArc, GroupKind, MountKind, Salvo, SideLabel};

// Battle
pub use crate::battle::{Battle, BattleOutcome, Termination};
pub use crate::roll::{ExpectedHits, HitRoll, SampledHits};
pub use crate::rules::{RuleProfile, RuleSet};

// Config
pub use crate::config::{load_scenario, parse_scenario};

// Errors
pub use crate::error::{BattleError, FleetError};
