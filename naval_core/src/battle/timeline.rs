//! Per-minute expansion of a side's fire events

use crate::error::FleetError;
use crate::side::Side;
use crate::types::GroupId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    /// Index of the event in the firing side's event list
    pub event: usize,
    pub firer: GroupId,
    pub target: GroupId,
    /// The firer was not engaging this target in the previous minute
    pub opening: bool,
}

/// Fire entries for each minute of the battle, in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    minutes: Vec<Vec<TimelineEntry>>,
}

impl Timeline {
    /// Expand `firing`'s events against the groups of `enemy`
    pub fn build(firing: &Side, enemy: &Side, length: u32) -> Result<Self, FleetError> {
        let mut minutes: Vec<Vec<TimelineEntry>> = vec![Vec::new(); length as usize];

        for (index, event) in firing.fire_events().iter().enumerate() {
            let firer = firing.resolve_group(&event.firer)?;
            let target = enemy.resolve_group(&event.target)?;
            for minute in event.start..event.end().min(length) {
                minutes[minute as usize].push(TimelineEntry {
                    event: index,
                    firer,
                    target,
                    opening: false,
                });
            }
        }

        for minute in 0..minutes.len() {
            let (before, rest) = minutes.split_at_mut(minute);
            let previous = before.last();
            for entry in &mut rest[0] {
                let (firer, target) = (entry.firer, entry.target);
                entry.opening = !previous
                    .is_some_and(|prev| prev.iter().any(|p| p.firer == firer && p.target == target));
            }
        }

        Ok(Timeline { minutes })
    }

    /// Minutes in the timeline
    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    /// True when no event was scheduled
    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }

    /// Entries for a minute; empty past the end
    pub fn at(&self, minute: u32) -> &[TimelineEntry] {
        self.minutes
            .get(minute as usize)
            .map_or(&[], |entries| entries.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use crate::ship::tests::light_cruiser;
    use crate::ship::ShipRegistry;
    use crate::side::FireEvent;
    use crate::types::{GroupKind, SideLabel};

    fn sides() -> (Side, Side) {
        let mut ships = ShipRegistry::new();
        let a = ships.add(light_cruiser("A")).unwrap();
        let b = ships.add(light_cruiser("B")).unwrap();
        let c = ships.add(light_cruiser("C")).unwrap();
        let mut blue = Side::new(SideLabel::A, "Blue");
        blue.add_group(Group::new("A", GroupKind::Light, vec![a], &ships).unwrap())
            .unwrap();
        let mut red = Side::new(SideLabel::B, "Red");
        red.add_group(Group::new("B", GroupKind::Light, vec![b], &ships).unwrap())
            .unwrap();
        red.add_group(Group::new("C", GroupKind::Light, vec![c], &ships).unwrap())
            .unwrap();
        (blue, red)
    }

    #[test]
    fn test_events_expand_over_half_open_window() {
        let (mut blue, red) = sides();
        blue.register_fire_event(FireEvent::new("A", "B", 5_000.0, 1, 3)).unwrap();
        let timeline = Timeline::build(&blue, &red, blue.latest_event()).unwrap();
        assert_eq!(timeline.len(), 4);
        assert!(timeline.at(0).is_empty());
        assert_eq!(timeline.at(1).len(), 1);
        assert_eq!(timeline.at(3).len(), 1);
        assert!(timeline.at(4).is_empty());
    }

    #[test]
    fn test_opening_flag() {
        let (mut blue, red) = sides();
        blue.register_fire_event(FireEvent::new("A", "B", 5_000.0, 0, 2)).unwrap();
        blue.register_fire_event(FireEvent::new("A", "C", 5_000.0, 1, 1)).unwrap();
        blue.register_fire_event(FireEvent::new("A", "B", 5_000.0, 3, 1)).unwrap();
        let timeline = Timeline::build(&blue, &red, blue.latest_event()).unwrap();

        assert!(timeline.at(0)[0].opening);
        let minute_one = timeline.at(1);
        assert!(!minute_one[0].opening, "still on B");
        assert!(minute_one[1].opening, "switched to C");
        assert!(timeline.at(3)[0].opening, "fire was interrupted");
    }

    #[test]
    fn test_unknown_target_fails_at_build() {
        let (mut blue, red) = sides();
        blue.register_fire_event(FireEvent::new("A", "Z", 5_000.0, 0, 2)).unwrap();
        let err = Timeline::build(&blue, &red, 2).unwrap_err();
        assert_eq!(
            err,
            FleetError::UnknownGroup {
                side: SideLabel::B,
                name: "Z".to_string()
            }
        );
    }
}
