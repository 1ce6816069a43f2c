//! Scheduled fire between two groups

use crate::error::FleetError;
use crate::group::Volley;
use crate::types::{BatteryRole, FiringArc, Salvo};
use serde::{Deserialize, Serialize};

/// Latest minute a fire event may reach (one week of battle)
pub const MAX_EVENT_END: u32 = 7 * 24 * 60;

/// One group firing on an enemy group for a span of minutes
///
/// Groups are named; the firer is resolved when the event is registered on
/// its side and the target when the battle is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireEvent {
    pub firer: String,
    pub target: String,
    /// Range in yards
    pub range: f64,
    /// First minute of fire
    pub start: u32,
    /// Minutes of fire
    pub duration: u32,
    pub salvo: Salvo,
    pub modifier: f64,
    pub incidence: f64,
    pub batteries: Vec<BatteryRole>,
}

impl FireEvent {
    /// Full broadside from the primary batteries, no modifier
    pub fn new(
        firer: impl Into<String>,
        target: impl Into<String>,
        range: f64,
        start: u32,
        duration: u32,
    ) -> Self {
        FireEvent {
            firer: firer.into(),
            target: target.into(),
            range,
            start,
            duration,
            salvo: Salvo::default(),
            modifier: 1.0,
            incidence: 90.0,
            batteries: vec![BatteryRole::Primary],
        }
    }

    /// Target at a relative bearing; the arc follows from each battery's end arc
    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.salvo = Salvo::Bearing(bearing);
        self
    }

    /// Fire from a fixed arc
    pub fn with_arc(mut self, arc: FiringArc) -> Self {
        self.salvo = Salvo::Arc(arc);
        self
    }

    /// Fire a fixed number of guns per battery
    pub fn with_salvo_size(mut self, guns: u32) -> Self {
        self.salvo = Salvo::Guns(guns);
        self
    }

    /// Set the umpire's effectiveness multiplier
    pub fn with_modifier(mut self, modifier: f64) -> Self {
        self.modifier = modifier;
        self
    }

    /// Set the angle of incidence on the target, in degrees
    pub fn with_incidence(mut self, incidence: f64) -> Self {
        self.incidence = incidence;
        self
    }

    /// Select which battery roles fire
    pub fn with_batteries(mut self, batteries: Vec<BatteryRole>) -> Self {
        self.batteries = batteries;
        self
    }

    /// Minute after the last minute of fire
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.duration)
    }

    /// Check if the event fires during `minute`
    pub fn is_active_at(&self, minute: u32) -> bool {
        minute >= self.start && minute < self.end()
    }

    /// Reject events the battle cannot schedule or fire
    pub fn validate(&self) -> Result<(), FleetError> {
        let fail = |reason: &str| {
            Err(FleetError::InvalidEvent(format!(
                "{} -> {}: {}",
                self.firer, self.target, reason
            )))
        };
        if self.duration == 0 {
            return fail("duration must be at least one minute");
        }
        if self.start.checked_add(self.duration).map_or(true, |end| end > MAX_EVENT_END) {
            return fail("event runs past the longest schedulable battle");
        }
        if !self.range.is_finite() || self.range < 0.0 {
            return fail("range must be a non-negative number of yards");
        }
        if !self.modifier.is_finite() || self.modifier < 0.0 {
            return fail("modifier must be a non-negative number");
        }
        if !self.incidence.is_finite() {
            return fail("incidence must be finite");
        }
        if let Salvo::Bearing(bearing) = self.salvo {
            if !bearing.is_finite() {
                return fail("bearing must be finite");
            }
        }
        if self.batteries.is_empty() {
            return fail("no batteries selected");
        }
        Ok(())
    }

    /// Volley fired in one minute of this event
    pub fn volley(&self, opening: bool) -> Volley {
        Volley {
            range: self.range,
            salvo: self.salvo,
            modifier: self.modifier,
            incidence: self.incidence,
            batteries: self.batteries.clone(),
            opening,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let event = FireEvent::new("Sydney", "Emden", 9_500.0, 0, 20);
        assert_eq!(event.salvo, Salvo::Bearing(90.0));
        assert_eq!(event.modifier, 1.0);
        assert_eq!(event.batteries, vec![BatteryRole::Primary]);
        assert_eq!(event.end(), 20);
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_active_window_is_half_open() {
        let event = FireEvent::new("A", "B", 5_000.0, 3, 2);
        assert!(!event.is_active_at(2));
        assert!(event.is_active_at(3));
        assert!(event.is_active_at(4));
        assert!(!event.is_active_at(5));
    }

    #[test]
    fn test_validation_failures() {
        assert!(FireEvent::new("A", "B", 5_000.0, 0, 0).validate().is_err());
        assert!(FireEvent::new("A", "B", -1.0, 0, 1).validate().is_err());
        assert!(FireEvent::new("A", "B", 5_000.0, 0, 1)
            .with_modifier(f64::NAN)
            .validate()
            .is_err());
        assert!(FireEvent::new("A", "B", 5_000.0, 0, 1)
            .with_batteries(vec![])
            .validate()
            .is_err());
    }

    #[test]
    fn test_far_future_event_rejected() {
        let late = FireEvent::new("A", "B", 5_000.0, 4_000_000_000, 1);
        assert!(matches!(late.validate(), Err(FleetError::InvalidEvent(_))));
        assert!(FireEvent::new("A", "B", 5_000.0, u32::MAX, 1).validate().is_err());
        assert!(FireEvent::new("A", "B", 5_000.0, MAX_EVENT_END - 1, 1).validate().is_ok());
    }

    #[test]
    fn test_volley_carries_overrides() {
        let event = FireEvent::new("A", "B", 7_000.0, 0, 1)
            .with_arc(FiringArc::Bow)
            .with_modifier(0.5)
            .with_incidence(45.0);
        let volley = event.volley(true);
        assert_eq!(volley.salvo, Salvo::Arc(FiringArc::Bow));
        assert_eq!(volley.modifier, 0.5);
        assert_eq!(volley.incidence, 45.0);
        assert!(volley.opening);
    }
}
