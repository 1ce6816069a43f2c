//! Battle resolution: the pulse loop over both sides' timelines

mod firepower;
mod report;
mod result;
mod timeline;

pub use firepower::{FirepowerComparison, FirepowerRow, MAX_COMPARISON_RANGE};
pub use report::{BattleReport, ClockTime, ReportRow, ShipSummary, SideSummary};
pub use result::{BattleOutcome, BattleState, PulseSnapshot, SideResult, Termination};
pub use timeline::{Timeline, TimelineEntry};

use crate::error::{BattleError, FleetError};
use crate::group::Volley;
use crate::roll::{ExpectedHits, HitRoll};
use crate::rules::RuleSet;
use crate::ship::{ShipRegistry, ShotOutcome};
use crate::side::Side;
use crate::types::{GroupId, SideLabel};
use serde::{Deserialize, Serialize};

/// Which side's fire is computed first within a pulse
///
/// Both sides read pre-pulse snapshots, so the order does not change the
/// deterministic result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingOrder {
    #[default]
    SideAFirst,
    SideBFirst,
}

impl ProcessingOrder {
    /// Both sides in processing order
    pub fn sides(self) -> [SideLabel; 2] {
        match self {
            ProcessingOrder::SideAFirst => [SideLabel::A, SideLabel::B],
            ProcessingOrder::SideBFirst => [SideLabel::B, SideLabel::A],
        }
    }
}

/// A battle between two sides
///
/// Owns every ship. Timelines are built once in [`Battle::new`]; after that
/// ships change only through [`Battle::advance_pulse`].
#[derive(Debug, Clone)]
pub struct Battle {
    name: String,
    start_clock: ClockTime,
    rules: RuleSet,
    ships: ShipRegistry,
    side_a: Side,
    side_b: Side,
    timeline_a: Timeline,
    timeline_b: Timeline,
    length: u32,
    pulse: u32,
    order: ProcessingOrder,
    history: Vec<PulseSnapshot>,
    state: BattleState,
    termination: Option<Termination>,
}

impl Battle {
    /// Build a battle, checking the rosters and expanding both timelines
    pub fn new(
        name: impl Into<String>,
        ships: ShipRegistry,
        mut side_a: Side,
        mut side_b: Side,
        rules: RuleSet,
    ) -> Result<Self, FleetError> {
        if side_a.label() != SideLabel::A {
            return Err(FleetError::SideMismatch(SideLabel::A));
        }
        if side_b.label() != SideLabel::B {
            return Err(FleetError::SideMismatch(SideLabel::B));
        }

        let members_a = side_a.members();
        let members_b = side_b.members();
        for id in members_a.iter().chain(members_b.iter()) {
            if !ships.contains(*id) {
                return Err(FleetError::UnknownShip(format!("#{}", id.0)));
            }
        }
        if let Some(shared) = members_a.intersection(&members_b).next() {
            return Err(FleetError::ShipOnBothSides(ships[*shared].name().to_string()));
        }

        let length = side_a.latest_event().max(side_b.latest_event());
        let timeline_a = Timeline::build(&side_a, &side_b, length)?;
        let timeline_b = Timeline::build(&side_b, &side_a, length)?;

        side_a.refresh(&ships);
        side_b.refresh(&ships);
        let initial = PulseSnapshot {
            minute: 0,
            side_a: side_a.snapshot(),
            side_b: side_b.snapshot(),
        };

        let name = name.into();
        tracing::debug!(
            battle = %name,
            ships = ships.len(),
            minutes = length,
            profile = %rules.profile,
            "battle built"
        );

        Ok(Battle {
            name,
            start_clock: ClockTime::default(),
            rules,
            ships,
            side_a,
            side_b,
            timeline_a,
            timeline_b,
            length,
            pulse: 0,
            order: ProcessingOrder::default(),
            history: vec![initial],
            state: BattleState::Building,
            termination: None,
        })
    }

    /// Set which side fires first each pulse
    pub fn with_processing_order(mut self, order: ProcessingOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the clock time of minute zero
    pub fn with_start_clock(mut self, clock: ClockTime) -> Self {
        self.start_clock = clock;
        self
    }

    /// Scenario name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule set in force
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Every ship in the battle
    pub fn ships(&self) -> &ShipRegistry {
        &self.ships
    }

    /// Side by label
    pub fn side(&self, label: SideLabel) -> &Side {
        match label {
            SideLabel::A => &self.side_a,
            SideLabel::B => &self.side_b,
        }
    }

    /// First side
    pub fn side_a(&self) -> &Side {
        &self.side_a
    }

    /// Second side
    pub fn side_b(&self) -> &Side {
        &self.side_b
    }

    /// Per-minute fire schedule of one side
    pub fn timeline(&self, label: SideLabel) -> &Timeline {
        match label {
            SideLabel::A => &self.timeline_a,
            SideLabel::B => &self.timeline_b,
        }
    }

    /// Minutes scheduled: the latest event end over both sides
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Pulses fought so far
    pub fn pulse(&self) -> u32 {
        self.pulse
    }

    /// Clock time of minute zero
    pub fn start_clock(&self) -> ClockTime {
        self.start_clock
    }

    /// Current lifecycle state
    pub fn state(&self) -> BattleState {
        self.state
    }

    /// True once the battle has been resolved
    pub fn is_finished(&self) -> bool {
        self.state == BattleState::Resolved
    }

    /// Why the battle stopped, once resolved
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Initial snapshot followed by one per pulse
    pub fn history(&self) -> &[PulseSnapshot] {
        &self.history
    }

    /// Fight one pulse with expected-value hits
    pub fn advance_pulse(&mut self) -> Result<(), BattleError> {
        self.advance_pulse_with(&mut ExpectedHits)
    }

    /// Fight one pulse: fire in processing order, then commit damage on
    /// side A and side B and record their strength
    pub fn advance_pulse_with(&mut self, roll: &mut dyn HitRoll) -> Result<(), BattleError> {
        if self.state == BattleState::Resolved {
            return Err(BattleError::AlreadyResolved);
        }
        if self.pulse >= self.length {
            return Err(BattleError::TimelineExhausted(self.pulse));
        }

        self.state = BattleState::Running;
        for label in self.order.sides() {
            self.fire_side(label, roll);
        }
        self.side_a.update(&mut self.ships);
        self.side_b.update(&mut self.ships);
        self.pulse += 1;
        self.history.push(PulseSnapshot {
            minute: self.pulse,
            side_a: self.side_a.snapshot(),
            side_b: self.side_b.snapshot(),
        });

        if let Some(termination) = self.pending_termination() {
            self.finish(termination);
        }
        Ok(())
    }

    /// Fight until the timeline runs out or a side is eliminated
    pub fn resolve(&mut self) -> Result<BattleOutcome, BattleError> {
        self.resolve_with(&mut ExpectedHits)
    }

    /// Run every pulse drawing hits from `roll`
    pub fn resolve_with(&mut self, roll: &mut dyn HitRoll) -> Result<BattleOutcome, BattleError> {
        if self.state == BattleState::Resolved {
            return Err(BattleError::AlreadyResolved);
        }
        while self.state != BattleState::Resolved {
            match self.pending_termination() {
                Some(termination) => self.finish(termination),
                None => self.advance_pulse_with(roll)?,
            }
        }
        self.outcome().ok_or(BattleError::AlreadyResolved)
    }

    /// Final result, once resolved
    pub fn outcome(&self) -> Option<BattleOutcome> {
        let termination = self.termination?;
        Some(BattleOutcome {
            pulses: self.pulse,
            termination,
            side_a: side_result(&self.side_a),
            side_b: side_result(&self.side_b),
        })
    }

    /// Add a ship of the same side to one of its groups mid-battle
    pub fn add_ship_to_group(
        &mut self,
        label: SideLabel,
        group: &str,
        ship: &str,
    ) -> Result<(), FleetError> {
        let id = self.ships.resolve(ship)?;
        let (own, enemy) = match label {
            SideLabel::A => (&mut self.side_a, &self.side_b),
            SideLabel::B => (&mut self.side_b, &self.side_a),
        };
        if enemy.members().contains(&id) {
            return Err(FleetError::ShipOnBothSides(ship.to_string()));
        }
        let group_id = own.resolve_group(group)?;
        if let Some(group) = own.group_mut(group_id) {
            group.add_ship(id, &self.ships)?;
        }
        own.refresh(&self.ships);
        Ok(())
    }

    /// Put one of a ship's batteries out of action
    pub fn knock_out_armament(&mut self, ship: &str, index: usize) -> Result<(), FleetError> {
        let id = self.ships.resolve(ship)?;
        let knocked_out = self
            .ships
            .get_mut(id)
            .is_some_and(|s| s.knock_out_armament(index));
        if knocked_out {
            Ok(())
        } else {
            Err(FleetError::InvalidArmament(format!("{ship} has no battery #{index}")))
        }
    }

    fn pending_termination(&self) -> Option<Termination> {
        let a_out = self.side_a.hit_points() <= 0.0;
        let b_out = self.side_b.hit_points() <= 0.0;
        match (a_out, b_out) {
            (true, true) => Some(Termination::MutualDestruction),
            (true, false) => Some(Termination::SideEliminated(SideLabel::A)),
            (false, true) => Some(Termination::SideEliminated(SideLabel::B)),
            (false, false) if self.pulse >= self.length => Some(Termination::TimelineExhausted),
            (false, false) => None,
        }
    }

    fn finish(&mut self, termination: Termination) {
        self.state = BattleState::Resolved;
        self.termination = Some(termination);
        tracing::info!(
            battle = %self.name,
            pulses = self.pulse,
            termination = %termination,
            losses_a = losses(&self.side_a),
            losses_b = losses(&self.side_b),
            "battle resolved"
        );
    }

    fn fire_side(&mut self, label: SideLabel, roll: &mut dyn HitRoll) {
        let (timeline, firing, enemy) = match label {
            SideLabel::A => (&self.timeline_a, &self.side_a, &self.side_b),
            SideLabel::B => (&self.timeline_b, &self.side_b, &self.side_a),
        };
        let entries = timeline.at(self.pulse);

        // Volleys fired by each group this minute, in registration order
        let mut by_firer: Vec<(GroupId, Vec<Volley>, Vec<GroupId>)> = Vec::new();
        for entry in entries {
            let event = match firing.fire_events().get(entry.event) {
                Some(event) => event,
                None => continue,
            };
            let volley = event.volley(entry.opening);
            match by_firer.iter_mut().find(|(firer, _, _)| *firer == entry.firer) {
                Some((_, volleys, targets)) => {
                    volleys.push(volley);
                    targets.push(entry.target);
                }
                None => by_firer.push((entry.firer, vec![volley], vec![entry.target])),
            }
        }

        for (firer, volleys, targets) in &by_firer {
            let firing_group = match firing.group(*firer) {
                Some(group) => group,
                None => continue,
            };
            for (index, target) in targets.iter().enumerate() {
                let target_group = match enemy.group(*target) {
                    Some(group) => group,
                    None => continue,
                };
                let outcome: ShotOutcome = firing_group.fire_concurrent(
                    target_group,
                    &mut self.ships,
                    volleys,
                    index,
                    &self.rules,
                    roll,
                );
                tracing::debug!(
                    minute = self.pulse,
                    side = %label,
                    firer = firing_group.name(),
                    target = target_group.name(),
                    hits = outcome.hits,
                    damage = outcome.damage,
                    "fire event resolved"
                );
            }
        }
    }
}

fn losses(side: &Side) -> f64 {
    if side.staying_power() > 0.0 {
        (1.0 - side.hit_points() / side.staying_power()) * 100.0
    } else {
        0.0
    }
}

fn side_result(side: &Side) -> SideResult {
    SideResult {
        name: side.name().to_string(),
        staying_power: side.staying_power(),
        hit_points: side.hit_points(),
        status: side.status(),
        losses: losses(side),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use crate::ship::tests::light_cruiser;
    use crate::side::FireEvent;
    use crate::types::GroupKind;

    fn duel(events_a: Vec<FireEvent>, events_b: Vec<FireEvent>) -> Battle {
        let mut ships = ShipRegistry::new();
        let sydney = ships.add(light_cruiser("Sydney")).unwrap();
        let emden = ships.add(light_cruiser("Emden")).unwrap();

        let mut side_a = Side::new(SideLabel::A, "Australia");
        side_a
            .add_group(Group::new("Sydney", GroupKind::Light, vec![sydney], &ships).unwrap())
            .unwrap();
        let mut side_b = Side::new(SideLabel::B, "Germany");
        side_b
            .add_group(Group::new("Emden", GroupKind::Light, vec![emden], &ships).unwrap())
            .unwrap();
        for event in events_a {
            side_a.register_fire_event(event).unwrap();
        }
        for event in events_b {
            side_b.register_fire_event(event).unwrap();
        }
        Battle::new("Cocos", ships, side_a, side_b, RuleSet::default()).unwrap()
    }

    #[test]
    fn test_state_machine() {
        let mut battle = duel(vec![FireEvent::new("Sydney", "Emden", 8_000.0, 0, 2)], vec![]);
        assert_eq!(battle.state(), BattleState::Building);
        battle.advance_pulse().unwrap();
        assert_eq!(battle.state(), BattleState::Running);
        battle.advance_pulse().unwrap();
        assert_eq!(battle.state(), BattleState::Resolved);
        assert_eq!(battle.termination(), Some(Termination::TimelineExhausted));
        assert_eq!(battle.advance_pulse(), Err(BattleError::AlreadyResolved));
        assert_eq!(battle.resolve(), Err(BattleError::AlreadyResolved));
    }

    #[test]
    fn test_history_has_initial_snapshot() {
        let mut battle = duel(vec![FireEvent::new("Sydney", "Emden", 8_000.0, 0, 3)], vec![]);
        let outcome = battle.resolve().unwrap();
        assert_eq!(outcome.pulses, 3);
        assert_eq!(battle.history().len(), 4);
        assert_eq!(battle.history()[0].side_b.hit_points, 40.0);
        assert!(battle.history()[3].side_b.hit_points < 40.0);
        assert_eq!(battle.history()[3].side_a.hit_points, 40.0);
    }

    #[test]
    fn test_unknown_target_fails_at_construction() {
        let mut ships = ShipRegistry::new();
        let a = ships.add(light_cruiser("A")).unwrap();
        let b = ships.add(light_cruiser("B")).unwrap();
        let mut side_a = Side::new(SideLabel::A, "Blue");
        side_a.add_group(Group::new("A", GroupKind::Light, vec![a], &ships).unwrap()).unwrap();
        side_a.register_fire_event(FireEvent::new("A", "Nowhere", 5_000.0, 0, 1)).unwrap();
        let mut side_b = Side::new(SideLabel::B, "Red");
        side_b.add_group(Group::new("B", GroupKind::Light, vec![b], &ships).unwrap()).unwrap();

        let err = Battle::new("X", ships, side_a, side_b, RuleSet::default()).unwrap_err();
        assert!(matches!(err, FleetError::UnknownGroup { side: SideLabel::B, .. }));
    }

    #[test]
    fn test_ship_on_both_sides_rejected() {
        let mut ships = ShipRegistry::new();
        let a = ships.add(light_cruiser("A")).unwrap();
        let mut side_a = Side::new(SideLabel::A, "Blue");
        side_a.add_group(Group::new("A", GroupKind::Light, vec![a], &ships).unwrap()).unwrap();
        let mut side_b = Side::new(SideLabel::B, "Red");
        side_b.add_group(Group::new("Turncoat", GroupKind::Light, vec![a], &ships).unwrap()).unwrap();

        let err = Battle::new("X", ships, side_a, side_b, RuleSet::default()).unwrap_err();
        assert_eq!(err, FleetError::ShipOnBothSides("A".to_string()));
    }

    #[test]
    fn test_swapped_labels_rejected() {
        let ships = ShipRegistry::new();
        let err = Battle::new(
            "X",
            ships,
            Side::new(SideLabel::B, "Red"),
            Side::new(SideLabel::A, "Blue"),
            RuleSet::default(),
        )
        .unwrap_err();
        assert_eq!(err, FleetError::SideMismatch(SideLabel::A));
    }

    #[test]
    fn test_knock_out_silences_ship() {
        let mut battle = duel(vec![FireEvent::new("Sydney", "Emden", 8_000.0, 0, 2)], vec![]);
        battle.knock_out_armament("Sydney", 0).unwrap();
        assert!(battle.knock_out_armament("Sydney", 4).is_err());
        let outcome = battle.resolve().unwrap();
        assert_eq!(outcome.side_b.hit_points, 40.0);
    }

    #[test]
    fn test_add_ship_to_group() {
        let mut battle = duel(vec![], vec![]);
        assert_eq!(
            battle.add_ship_to_group(SideLabel::A, "Sydney", "Emden").unwrap_err(),
            FleetError::ShipOnBothSides("Emden".to_string())
        );
        assert!(battle.add_ship_to_group(SideLabel::A, "Ghost", "Sydney").is_err());
    }
}
