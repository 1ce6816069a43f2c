//! To-hit rates by range and rate of fire

use serde::{Deserialize, Serialize};

/// How a gun's chance to hit is read from its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToHitPolicy {
    /// Discrete short / effective / long brackets
    #[default]
    Bracketed,
    /// A fitted curve over range; guns without a curve fall back to brackets
    Continuous,
}

/// Hits per gun per minute in each range bracket
///
/// Ranges are in yards. A target further than `long_min` is at long range,
/// further than `effective_min` at effective range, anything closer is short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBrackets {
    pub long_to_hit: f64,
    pub long_min: f64,
    pub effective_to_hit: f64,
    pub effective_min: f64,
    pub short_to_hit: f64,
}

impl RangeBrackets {
    /// To-hit probability at the given range
    pub fn rate(&self, range: f64) -> f64 {
        if range > self.long_min {
            self.long_to_hit
        } else if range > self.effective_min {
            self.effective_to_hit
        } else {
            self.short_to_hit
        }
    }

    /// Brackets must nest (effective inside long) and rates must be non-negative
    pub fn is_well_formed(&self) -> bool {
        self.effective_min <= self.long_min
            && [self.long_to_hit, self.effective_to_hit, self.short_to_hit]
                .iter()
                .all(|r| r.is_finite() && *r >= 0.0)
    }
}

/// Regression curve of hits per gun per minute against range in yards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum HitCurve {
    /// `a * r^2 + b * r + c`
    Quadratic { a: f64, b: f64, c: f64 },
    /// `slope * ln(r) + intercept`
    Logarithmic { slope: f64, intercept: f64 },
    /// `scale * e^(rate * r)`
    Exponential { scale: f64, rate: f64 },
}

impl HitCurve {
    /// Evaluate the curve, never returning a negative rate
    pub fn rate(&self, range: f64) -> f64 {
        let value = match *self {
            HitCurve::Quadratic { a, b, c } => a * range * range + b * range + c,
            // ln is undefined at zero range; point blank reads as one yard
            HitCurve::Logarithmic { slope, intercept } => slope * range.max(1.0).ln() + intercept,
            HitCurve::Exponential { scale, rate } => scale * (rate * range).exp(),
        };

        if value.is_finite() {
            value.max(0.0)
        } else {
            0.0
        }
    }
}

/// Rounds per gun per minute, stepped by range
///
/// Each point gives the rate from its range (yards) up to the next point.
/// Ranges closer than the first point use the first rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateOfFireTable {
    pub points: Vec<RatePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub range: f64,
    pub rounds: f64,
}

impl RateOfFireTable {
    /// Table from range points, in any order
    pub fn new(mut points: Vec<RatePoint>) -> Self {
        points.sort_by(|a, b| a.range.total_cmp(&b.range));
        RateOfFireTable { points }
    }

    /// Rounds per gun per minute at `range`
    pub fn rounds(&self, range: f64) -> f64 {
        let mut rounds = match self.points.first() {
            Some(first) => first.rounds,
            None => return 1.0,
        };
        for point in &self.points {
            if point.range <= range {
                rounds = point.rounds;
            } else {
                break;
            }
        }
        rounds.max(0.0)
    }
}
