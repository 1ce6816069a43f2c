//! Hit resolution: expected values or seeded random trials

use rand::Rng;

/// Turns an expected hit rate into the hits actually scored
///
/// The deterministic rules use [`ExpectedHits`]. Stochastic runs use
/// [`SampledHits`] with an explicitly seeded generator.
pub trait HitRoll {
    /// Hits scored by `guns` guns, each expecting `per_gun` hits
    fn hits(&mut self, per_gun: f64, guns: u32) -> f64;
}

/// Expected-value resolution; fractional hits are kept
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectedHits;

impl HitRoll for ExpectedHits {
    fn hits(&mut self, per_gun: f64, guns: u32) -> f64 {
        per_gun.max(0.0) * guns as f64
    }
}

/// One random trial per gun
///
/// Each gun scores the whole part of its expected hits plus one more with
/// probability equal to the fractional part.
#[derive(Debug, Clone)]
pub struct SampledHits<R: Rng> {
    rng: R,
}

impl<R: Rng> SampledHits<R> {
    /// Sampler drawing from `rng`
    pub fn new(rng: R) -> Self {
        SampledHits { rng }
    }

    /// Give back the random source
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> HitRoll for SampledHits<R> {
    fn hits(&mut self, per_gun: f64, guns: u32) -> f64 {
        if !per_gun.is_finite() || per_gun <= 0.0 {
            return 0.0;
        }
        let whole = per_gun.floor();
        let fraction = per_gun - whole;

        let mut total = 0.0;
        for _ in 0..guns {
            total += whole;
            if self.rng.gen::<f64>() < fraction {
                total += 1.0;
            }
        }
        total
    }
}
