//! Sharing a battery's mounts among simultaneous targets

use super::Armament;
use crate::types::{FiringArc, Salvo};

impl Armament {
    /// Mounts given to each target, in target order
    ///
    /// Engaging the bow or stern arc takes one mount away from the broadside
    /// for each end engaged. Mounts on an arc are split evenly among the
    /// targets on that arc; the remainder goes one at a time to the earliest
    /// targets.
    pub fn allocate_mounts(&self, arcs: &[FiringArc]) -> Vec<u32> {
        let count = |wanted: FiringArc| arcs.iter().filter(|arc| **arc == wanted).count() as u32;
        let bow_targets = count(FiringArc::Bow);
        let stern_targets = count(FiringArc::Stern);
        let broadside_targets = count(FiringArc::Broadside);

        let mut broadside_mounts = self.mounts.broadside;
        if bow_targets > 0 {
            broadside_mounts = broadside_mounts.saturating_sub(1);
        }
        if stern_targets > 0 {
            broadside_mounts = broadside_mounts.saturating_sub(1);
        }

        let split = |mounts: u32, targets: u32| -> (u32, u32) {
            if targets == 0 {
                (0, 0)
            } else {
                (mounts / targets, mounts % targets)
            }
        };
        let (bow_each, mut bow_left) = split(self.mounts.bow, bow_targets);
        let (stern_each, mut stern_left) = split(self.mounts.stern, stern_targets);
        let (broadside_each, mut broadside_left) = split(broadside_mounts, broadside_targets);

        arcs.iter()
            .map(|arc| {
                let (each, left) = match arc {
                    FiringArc::Bow => (bow_each, &mut bow_left),
                    FiringArc::Stern => (stern_each, &mut stern_left),
                    FiringArc::Broadside => (broadside_each, &mut broadside_left),
                };
                if *left > 0 {
                    *left -= 1;
                    each + 1
                } else {
                    each
                }
            })
            .collect()
    }

    /// Guns firing the salvo at `index` when all of `salvos` are fired this minute
    pub fn allocated_guns(&self, salvos: &[Salvo], index: usize) -> u32 {
        let current = match salvos.get(index) {
            Some(salvo) => *salvo,
            None => return 0,
        };
        if let Salvo::Guns(guns) = current {
            return guns.min(self.total_guns());
        }

        let mut arcs = Vec::with_capacity(salvos.len());
        let mut position = None;
        for (i, salvo) in salvos.iter().enumerate() {
            if let Some(arc) = self.arc_for(*salvo) {
                if i == index {
                    position = Some(arcs.len());
                }
                arcs.push(arc);
            }
        }

        position
            .and_then(|p| self.allocate_mounts(&arcs).get(p).copied())
            .map_or(0, |mounts| mounts * self.guns_per_mount)
    }
}

#[cfg(test)]
mod tests {
    use crate::armament::{Armament, MountCounts};
    use crate::gunnery::{GunnerySpec, RangeBrackets};
    use crate::types::{BatteryRole, FiringArc, MountKind, Salvo};
    use std::sync::Arc;

    fn battery(bow: u32, broadside: u32, stern: u32) -> Armament {
        let gun = GunnerySpec::new(
            "14 in I",
            MountKind::Capital,
            14.0,
            22_000.0,
            RangeBrackets {
                long_to_hit: 0.02,
                long_min: 14_000.0,
                effective_to_hit: 0.05,
                effective_min: 8_000.0,
                short_to_hit: 0.1,
            },
        );
        Armament::new(
            Arc::new(gun),
            BatteryRole::Primary,
            MountCounts {
                total: 7,
                bow,
                broadside,
                stern,
            },
            30.0,
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_single_target_gets_whole_arc() {
        let b = battery(2, 7, 2);
        assert_eq!(b.allocate_mounts(&[FiringArc::Broadside]), vec![7]);
        assert_eq!(b.allocate_mounts(&[FiringArc::Bow]), vec![2]);
    }

    #[test]
    fn test_remainder_goes_to_earliest_targets() {
        let b = battery(2, 7, 2);
        let arcs = [FiringArc::Broadside; 5];
        assert_eq!(b.allocate_mounts(&arcs), vec![2, 2, 1, 1, 1]);
    }

    #[test]
    fn test_more_targets_than_mounts() {
        let b = battery(0, 2, 0);
        let arcs = [FiringArc::Broadside; 3];
        assert_eq!(b.allocate_mounts(&arcs), vec![1, 1, 0]);
    }

    #[test]
    fn test_end_arcs_take_from_broadside() {
        let b = battery(2, 7, 2);
        let arcs = [FiringArc::Bow, FiringArc::Broadside, FiringArc::Stern];
        assert_eq!(b.allocate_mounts(&arcs), vec![2, 5, 2]);
    }

    #[test]
    fn test_allocated_guns() {
        let b = battery(2, 7, 2);
        let salvos = [Salvo::Bearing(90.0), Salvo::Bearing(100.0), Salvo::Guns(3)];
        // two broadside targets share 7 mounts as 4 and 3
        assert_eq!(b.allocated_guns(&salvos, 0), 8);
        assert_eq!(b.allocated_guns(&salvos, 1), 6);
        assert_eq!(b.allocated_guns(&salvos, 2), 3);
        assert_eq!(b.allocated_guns(&salvos, 5), 0);
    }
}
