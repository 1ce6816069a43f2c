//! Fixed correction tables shared by the rule editions

use crate::ship::HullCategory;
use crate::types::MountKind;

/// Accuracy multiplier for a mount type firing on a hull category
///
/// Heavy turret guns struggle to hit small, fast targets, while destroyer
/// guns do better against the larger cruiser silhouette.
pub fn size_modifier(mount: MountKind, target: HullCategory) -> f64 {
    match (mount, target) {
        (MountKind::Capital, HullCategory::Cruiser) => 1.0 / 3.0,
        (MountKind::Capital, HullCategory::Flotilla) => 0.125,
        (MountKind::Cruiser, HullCategory::Flotilla) => 0.2,
        (MountKind::Secondary, HullCategory::Flotilla) => 0.2,
        (MountKind::Destroyer, HullCategory::Cruiser) => 2.0,
        _ => 1.0,
    }
}

/// Fraction of a cruiser's staying power removed by one heavy-gun hit
///
/// Depends on the cruiser's own main caliber.
pub fn table_b_fraction(target_main_caliber: f64) -> f64 {
    if target_main_caliber >= 7.5 {
        0.25
    } else if target_main_caliber >= 6.0 {
        1.0 / 3.0
    } else {
        0.5
    }
}

/// Rate-of-fire reduction (in tenths, negative) when opening fire at `range` yards
pub fn ranging_reduction(range: f64) -> f64 {
    let kyd = range / 1000.0;
    if kyd > 25.0 {
        -1.0
    } else if kyd >= 21.0 {
        -0.8
    } else if kyd >= 16.0 {
        -0.6
    } else if kyd >= 11.0 {
        -0.4
    } else if kyd >= 6.0 {
        -0.2
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_modifiers() {
        assert!((size_modifier(MountKind::Capital, HullCategory::Cruiser) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(size_modifier(MountKind::Capital, HullCategory::Flotilla), 0.125);
        assert_eq!(size_modifier(MountKind::Capital, HullCategory::Capital), 1.0);
        assert_eq!(size_modifier(MountKind::Destroyer, HullCategory::Cruiser), 2.0);
        assert_eq!(size_modifier(MountKind::Secondary, HullCategory::Flotilla), 0.2);
        assert_eq!(size_modifier(MountKind::Cruiser, HullCategory::Cruiser), 1.0);
    }

    #[test]
    fn test_table_b() {
        assert_eq!(table_b_fraction(8.0), 0.25);
        assert!((table_b_fraction(6.0) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(table_b_fraction(4.1), 0.5);
        assert_eq!(table_b_fraction(3.0), 0.5);
    }

    #[test]
    fn test_ranging_steps() {
        assert_eq!(ranging_reduction(26_000.0), -1.0);
        assert_eq!(ranging_reduction(25_000.0), -0.8);
        assert_eq!(ranging_reduction(16_000.0), -0.6);
        assert_eq!(ranging_reduction(11_000.0), -0.4);
        assert_eq!(ranging_reduction(6_000.0), -0.2);
        assert_eq!(ranging_reduction(5_999.0), 0.0);
    }
}
