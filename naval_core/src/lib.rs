//! naval_core - Battle-resolution engine for naval gunnery rule sets
//!
//! This library provides:
//! - Gunnery data: to-hit brackets and curves, hit conversion, penetration
//! - Ships and their armaments, owned by a single `ShipRegistry`
//! - Groups, sides and fire events
//! - Battle: the minute-by-minute pulse loop and its reports
//! - Rule profiles for the 1921 Instructions and the 1922 Maneuver Rules

pub mod armament;
pub mod battle;
pub mod config;
pub mod error;
pub mod group;
pub mod gunnery;
pub mod prelude;
pub mod roll;
pub mod rules;
pub mod ship;
pub mod side;
pub mod types;

// Re-export core types for convenience
pub use armament::{Armament, MountCounts};
pub use battle::{
    Battle, BattleOutcome, BattleReport, BattleState, ClockTime, FirepowerComparison,
    ProcessingOrder, PulseSnapshot, SideResult, Termination,
};
pub use config::{load_scenario, parse_scenario, ConfigError, LoadedScenario, ScenarioConfig};
pub use error::{BattleError, FleetError, ReportError};
pub use group::{Group, Volley};
pub use gunnery::{GunneryTable, GunneryWarning, GunnerySpec, RangeBrackets, ToHitPolicy};
pub use roll::{ExpectedHits, HitRoll, SampledHits};
pub use rules::{RuleProfile, RuleSet};
pub use ship::{HullCategory, HullClass, Ship, ShipRegistry};
pub use side::{FireEvent, Side};
pub use types::{
    BatteryRole, DamageScale, FiringArc, GroupId, GroupKind, MountKind, Protection, Salvo, ShipId,
    SideLabel,
};
