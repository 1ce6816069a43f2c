//! Battle history and outcome types

use crate::side::SideSnapshot;
use crate::types::SideLabel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleState {
    /// Timelines built, no pulse fought yet
    Building,
    Running,
    Resolved,
}

/// Why resolution stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every scheduled minute was fought
    TimelineExhausted,
    /// One side has no hit points left
    SideEliminated(SideLabel),
    /// Both sides went out of action in the same pulse
    MutualDestruction,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::TimelineExhausted => write!(f, "all fire events fought"),
            Termination::SideEliminated(side) => write!(f, "side {side} eliminated"),
            Termination::MutualDestruction => write!(f, "both sides eliminated"),
        }
    }
}

/// Strength of both sides after a pulse (minute 0 is before any fire)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseSnapshot {
    pub minute: u32,
    pub side_a: SideSnapshot,
    pub side_b: SideSnapshot,
}

/// Final state of one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideResult {
    pub name: String,
    pub staying_power: f64,
    pub hit_points: f64,
    pub status: f64,
    /// Percentage of staying power lost
    pub losses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub pulses: u32,
    pub termination: Termination,
    pub side_a: SideResult,
    pub side_b: SideResult,
}

impl BattleOutcome {
    /// Outcome for one side
    pub fn side(&self, label: SideLabel) -> &SideResult {
        match label {
            SideLabel::A => &self.side_a,
            SideLabel::B => &self.side_b,
        }
    }
}
