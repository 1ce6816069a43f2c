//! Battle reports for downstream tools

use super::{Battle, Termination};
use crate::error::{FleetError, ReportError};
use crate::rules::RuleProfile;
use crate::ship::{CaliberHits, HullClass};
use crate::side::Side;
use crate::types::SideLabel;
use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CLOCK_FORMAT: &str = "%H:%M";

/// Time of day on a 24-hour clock, to the minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Clock time from hour and minute
    pub fn new(hour: u32, minute: u32) -> Result<Self, FleetError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(ClockTime)
            .ok_or_else(|| FleetError::InvalidClock(format!("{hour:02}:{minute:02}")))
    }

    /// Hour of day
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    /// Minute of hour
    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    /// Clock time `minutes` later, wrapping past midnight
    pub fn plus_minutes(self, minutes: u32) -> ClockTime {
        let (time, _) = self
            .0
            .overflowing_add_signed(Duration::minutes(i64::from(minutes)));
        ClockTime(time)
    }
}

impl FromStr for ClockTime {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), CLOCK_FORMAT)
            .map(ClockTime)
            .map_err(|_| FleetError::InvalidClock(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = FleetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(clock: ClockTime) -> Self {
        clock.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CLOCK_FORMAT))
    }
}

/// Strength of both sides at one minute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub time: ClockTime,
    pub a_staying_power: f64,
    pub a_status: f64,
    pub b_staying_power: f64,
    pub b_status: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSummary {
    pub name: String,
    pub hull: HullClass,
    pub staying_power: f64,
    pub hit_points: f64,
    pub status: f64,
    pub hits_received: Vec<CaliberHits>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    pub name: String,
    pub staying_power: f64,
    pub hit_points: f64,
    /// Percentage of staying power lost
    pub losses: f64,
    pub ships: Vec<ShipSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub name: String,
    pub profile: RuleProfile,
    pub pulses: u32,
    /// None while the battle is still being fought
    pub termination: Option<Termination>,
    pub rows: Vec<ReportRow>,
    pub side_a: SideSummary,
    pub side_b: SideSummary,
}

impl BattleReport {
    /// Pretty JSON rendering of the whole report
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Strength table, one line per minute under a header row
    pub fn to_csv(&self) -> Result<String, ReportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &self.rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl Battle {
    /// Report on the battle as it stands
    pub fn report(&self) -> BattleReport {
        let rows = self
            .history
            .iter()
            .map(|snapshot| ReportRow {
                time: self.start_clock.plus_minutes(snapshot.minute),
                a_staying_power: snapshot.side_a.hit_points,
                a_status: snapshot.side_a.status,
                b_staying_power: snapshot.side_b.hit_points,
                b_status: snapshot.side_b.status,
            })
            .collect();

        BattleReport {
            name: self.name.clone(),
            profile: self.rules.profile,
            pulses: self.pulse,
            termination: self.termination,
            rows,
            side_a: self.side_summary(SideLabel::A),
            side_b: self.side_summary(SideLabel::B),
        }
    }

    fn side_summary(&self, label: SideLabel) -> SideSummary {
        let side: &Side = self.side(label);
        let ships = side
            .members()
            .into_iter()
            .filter_map(|id| self.ships.get(id))
            .map(|ship| ShipSummary {
                name: ship.name().to_string(),
                hull: ship.hull(),
                staying_power: ship.staying_power(),
                hit_points: ship.hit_points(),
                status: ship.status(),
                hits_received: ship.hits_received(),
            })
            .collect();

        SideSummary {
            name: side.name().to_string(),
            staying_power: side.staying_power(),
            hit_points: side.hit_points(),
            losses: super::losses(side),
            ships,
        }
    }
}
