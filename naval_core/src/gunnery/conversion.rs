//! Caliber to standard-hit conversion
//!
//! Light guns (up to 9.5 in) are expressed in 6-inch hits, heavy guns in
//! 15-inch hits. The two scales are not comparable with each other.
//!
//! Canonical calibers use the exact values from the rule tables. Other
//! calibers come from fitted curves:
//! - light: `0.0025 * caliber^3.4419` (power fit, R² = 0.9751)
//! - heavy: `1 / (6 - caliber / 3)` (linear in hits per 15-inch hit)
//!
//! Both fits are only supported for calibers 4 to 16 inches. Calibers outside
//! that domain are clamped to its edge, and gun tables holding them are
//! flagged when validated (the heavy fit diverges at 18 inches).

use crate::types::DamageScale;

/// Calibers above this fire heavy (15-inch scale) shell
pub const HEAVY_CALIBER_THRESHOLD: f64 = 9.5;

/// Caliber range the fitted curves are valid over
pub const FIT_DOMAIN: (f64, f64) = (4.0, 16.0);

/// Exact 6-inch equivalents stated in the rules
const CANONICAL_LIGHT: [(f64, f64); 4] = [(4.0, 1.0 / 3.0), (4.7, 0.5), (6.0, 1.0), (7.5, 3.0)];

/// Scale hits are converted to
pub fn damage_scale(caliber: f64) -> DamageScale {
    if caliber > HEAVY_CALIBER_THRESHOLD {
        DamageScale::FifteenInch
    } else {
        DamageScale::SixInch
    }
}

/// Multiplier converting one hit of `caliber` into standard hits of its scale
pub fn damage_conversion_factor(caliber: f64) -> f64 {
    match damage_scale(caliber) {
        DamageScale::SixInch => CANONICAL_LIGHT
            .iter()
            .find(|(c, _)| (c - caliber).abs() < 1e-9)
            .map(|(_, factor)| *factor)
            .unwrap_or_else(|| light_fit(clamp_to_domain(caliber))),
        DamageScale::FifteenInch => heavy_fit(clamp_to_domain(caliber)),
    }
}

/// Whether the caliber lies inside the fitted range
pub fn within_fit_domain(caliber: f64) -> bool {
    caliber >= FIT_DOMAIN.0 && caliber <= FIT_DOMAIN.1
}

fn clamp_to_domain(caliber: f64) -> f64 {
    caliber.clamp(FIT_DOMAIN.0, FIT_DOMAIN.1)
}

fn light_fit(caliber: f64) -> f64 {
    0.0025 * caliber.powf(3.4419)
}

fn heavy_fit(caliber: f64) -> f64 {
    1.0 / (6.0 - caliber / 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_light_values() {
        assert!((damage_conversion_factor(4.0) - 1.0 / 3.0).abs() < 1e-12);
        assert!((damage_conversion_factor(4.7) - 0.5).abs() < 1e-12);
        assert!((damage_conversion_factor(6.0) - 1.0).abs() < 1e-12);
        assert!((damage_conversion_factor(7.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_light_fit_between_canonical_points() {
        // 5.5 in sits between the 4.7 and 6 in values
        let factor = damage_conversion_factor(5.5);
        assert!(factor > 0.5 && factor < 1.0);
    }

    #[test]
    fn test_heavy_fit() {
        assert!((damage_conversion_factor(15.0) - 1.0).abs() < 1e-12);
        assert!((damage_conversion_factor(12.0) - 0.5).abs() < 1e-12);
        assert!((damage_conversion_factor(13.5) - 1.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_extrapolation_is_clamped() {
        // 18 in would divide by zero without the clamp
        let factor = damage_conversion_factor(18.0);
        assert!(factor.is_finite());
        assert!((factor - damage_conversion_factor(16.0)).abs() < 1e-12);
        assert!(!within_fit_domain(18.0));
        assert!(!within_fit_domain(3.0));
    }

    #[test]
    fn test_scale_threshold() {
        assert_eq!(damage_scale(9.2), DamageScale::SixInch);
        assert_eq!(damage_scale(9.5), DamageScale::SixInch);
        assert_eq!(damage_scale(11.0), DamageScale::FifteenInch);
    }
}
