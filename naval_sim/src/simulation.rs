//! Seeded Monte-Carlo batches over one scenario

use naval_core::{Battle, BattleError, SampledHits, SideLabel, Termination};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Spread of one side's losses (percent of staying power) across trials
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LossSpread {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl LossSpread {
    fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return LossSpread {
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        LossSpread {
            mean,
            std_dev: variance.sqrt(),
            min: samples.iter().copied().fold(f64::INFINITY, f64::min),
            max: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSummary {
    pub trials: u32,
    pub seed: u64,
    pub side_a: LossSpread,
    pub side_b: LossSpread,
    pub side_a_eliminated: u32,
    pub side_b_eliminated: u32,
    pub mutual_destruction: u32,
    pub mean_pulses: f64,
}

/// Resolve `trials` copies of `battle`, trial `i` seeded with `seed + i`
pub fn run_trials(battle: &Battle, trials: u32, seed: u64) -> Result<TrialSummary, BattleError> {
    let mut losses_a = Vec::with_capacity(trials as usize);
    let mut losses_b = Vec::with_capacity(trials as usize);
    let mut side_a_eliminated = 0;
    let mut side_b_eliminated = 0;
    let mut mutual_destruction = 0;
    let mut pulses = 0u64;

    for trial in 0..trials {
        let mut copy = battle.clone();
        let mut roll = SampledHits::new(ChaCha8Rng::seed_from_u64(seed.wrapping_add(trial as u64)));
        let outcome = copy.resolve_with(&mut roll)?;

        match outcome.termination {
            Termination::SideEliminated(SideLabel::A) => side_a_eliminated += 1,
            Termination::SideEliminated(SideLabel::B) => side_b_eliminated += 1,
            Termination::MutualDestruction => mutual_destruction += 1,
            Termination::TimelineExhausted => {}
        }
        pulses += outcome.pulses as u64;
        losses_a.push(outcome.side_a.losses);
        losses_b.push(outcome.side_b.losses);
        tracing::debug!(
            trial,
            losses_a = outcome.side_a.losses,
            losses_b = outcome.side_b.losses,
            "trial resolved"
        );
    }

    Ok(TrialSummary {
        trials,
        seed,
        side_a: LossSpread::from_samples(&losses_a),
        side_b: LossSpread::from_samples(&losses_b),
        side_a_eliminated,
        side_b_eliminated,
        mutual_destruction,
        mean_pulses: if trials > 0 {
            pulses as f64 / trials as f64
        } else {
            0.0
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use naval_core::parse_scenario;

    const SKIRMISH: &str = r#"
[battle]
name = "Skirmish"

[[guns]]
designation = "6 in"
mount = "cruiser"
caliber = 6.0
max_range = 14000

[guns.brackets]
long_to_hit = 0.05
long_min = 10000
effective_to_hit = 0.1
effective_min = 5000
short_to_hit = 0.3

[side_a]
name = "Blue"

[[side_a.ships]]
name = "Alpha"
hull = "CL"

[[side_a.ships.armaments]]
gun = "6 in"
mounts = { total = 6, broadside = 6 }

[[side_a.groups]]
name = "Alpha"
kind = "light"
members = ["Alpha"]

[[side_a.events]]
firer = "Alpha"
target = "Bravo"
range = 4000
start = 0
duration = 30

[side_b]
name = "Red"

[[side_b.ships]]
name = "Bravo"
hull = "CL"

[[side_b.ships.armaments]]
gun = "6 in"
mounts = { total = 6, broadside = 6 }

[[side_b.groups]]
name = "Bravo"
kind = "light"
members = ["Bravo"]

[[side_b.events]]
firer = "Bravo"
target = "Alpha"
range = 4000
start = 0
duration = 30
"#;

    #[test]
    fn test_spread_of_samples() {
        let spread = LossSpread::from_samples(&[10.0, 20.0, 30.0]);
        assert!((spread.mean - 20.0).abs() < 1e-12);
        assert_eq!(spread.min, 10.0);
        assert_eq!(spread.max, 30.0);
        assert!((spread.std_dev - (200.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(LossSpread::from_samples(&[]).mean, 0.0);
    }

    #[test]
    fn test_trials_repeat_for_a_seed() {
        let battle = parse_scenario(SKIRMISH).unwrap().battle;
        let first = run_trials(&battle, 20, 42).unwrap();
        let second = run_trials(&battle, 20, 42).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.trials, 20);
        assert!(first.side_a.max >= first.side_a.min);
        // the template battle is never advanced
        assert_eq!(battle.pulse(), 0);
    }
}
