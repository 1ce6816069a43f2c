//! Error types for fleet construction and battle resolution

use crate::types::SideLabel;
use thiserror::Error;

/// Fleet or scenario construction error
///
/// Raised before any battle starts. Nothing in the pulse loop returns this.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FleetError {
    #[error("Unknown hull class tag: {0:?}")]
    UnknownHullClass(String),
    #[error("Unknown gun designation: {0:?}")]
    UnknownGun(String),
    #[error("Unknown ship: {0:?}")]
    UnknownShip(String),
    #[error("Unknown group {name:?} on side {side}")]
    UnknownGroup { side: SideLabel, name: String },
    #[error("Duplicate ship name: {0:?}")]
    DuplicateShip(String),
    #[error("Duplicate group name: {0:?}")]
    DuplicateGroup(String),
    #[error("Group {0:?} has no members")]
    EmptyGroup(String),
    #[error("Ship {0:?} is registered on both sides")]
    ShipOnBothSides(String),
    #[error("Ship {0:?} has no primary armament")]
    NoPrimaryArmament(String),
    #[error("Invalid armament: {0}")]
    InvalidArmament(String),
    #[error("Invalid fire event: {0}")]
    InvalidEvent(String),
    #[error("Invalid staying power for {0:?}")]
    InvalidStayingPower(String),
    #[error("Cannot compare firepower of capital and light groups")]
    MixedGroupKinds,
    #[error("Side {0} was built with the other side's label")]
    SideMismatch(SideLabel),
    #[error("Invalid clock time {0:?}, expected HH:MM")]
    InvalidClock(String),
}

/// Battle state-machine error
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleError {
    #[error("Battle is already resolved")]
    AlreadyResolved,
    #[error("No fire events remain after pulse {0}")]
    TimelineExhausted(u32),
}

/// Failure rendering a battle report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
