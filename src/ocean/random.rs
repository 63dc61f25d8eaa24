//! Reproducible per-cell random draws.
//!
//! Every spectral cell seeds a fresh linear-congruential engine from its
//! wavenumber and the user seed, so draws depend only on `(ki, kj, seed)`
//! and the synthesis is bit-identical for any thread count or tiling.

use cgmath::Vector2;

use crate::math::{tau, Real};
use crate::ocean::params::Parameters;

const MINSTD_MULTIPLIER: u64 = 48271;
const MINSTD_MODULUS: u64 = 0x7fff_ffff; // 2^31 - 1

/// minstd linear-congruential engine.
#[derive(Debug, Clone, Copy)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn seeded(seed: u32) -> Self {
        let state = seed % MINSTD_MODULUS as u32;
        Lcg {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn next(&mut self) -> u32 {
        self.state = (u64::from(self.state) * MINSTD_MULTIPLIER % MINSTD_MODULUS) as u32;
        self.state
    }

    /// Uniform draw in `[0, 1)`.
    fn canonical<T: Real>(&mut self) -> T {
        T::new(self.next() - 1) / T::new(MINSTD_MODULUS - 1)
    }
}

/// Box-Muller standard normal. Two canonical draws per sample keeps the
/// engine advance rate fixed, which the reseeding contract depends on.
fn standard_normal<T: Real>(lcg: &mut Lcg) -> T {
    let u1: T = lcg.canonical();
    let u2: T = lcg.canonical();
    let r = (-T::new(2.0) * (T::one() - u1).ln()).sqrt();
    r * (tau::<T>() * u2).cos()
}

/// Spatial-hash mix of the quantized wavenumber and the user seed.
pub fn seed_from_wavenumber<T: Real>(k: Vector2<T>, seed: u32) -> u32 {
    const P1: u32 = 73_856_093;
    const P2: u32 = 19_349_663;
    const P3: u32 = 83_492_791;

    let quantized = |x: T| (x * T::new(10000.0)).round().to_i64().unwrap_or(0) as u32;

    (quantized(k.x).wrapping_mul(P1))
        ^ (quantized(k.y).wrapping_mul(P2))
        ^ seed.wrapping_mul(P3)
}

/// One cell's worth of draws, consumed in the fixed order: amplitude(+),
/// amplitude(-), phase(+), phase(-).
#[derive(Debug, Clone, Copy)]
pub struct CellDraws<T> {
    pub amp_pos: T,
    pub amp_neg: T,
    pub phase_pos: T,
    pub phase_neg: T,
}

pub trait Random<T: Real>: Sync {
    fn draws(&self, k: Vector2<T>) -> CellDraws<T>;
}

fn cell_engine<T: Real>(k: Vector2<T>, seed: u32) -> Lcg {
    Lcg::seeded(seed_from_wavenumber(k, seed).wrapping_add(seed))
}

fn next_phase<T: Real>(lcg: &mut Lcg) -> T {
    tau::<T>() * lcg.canonical()
}

/// Amplitudes ~ N(0, 1), phases ~ U[0, tau).
pub struct NormalRandom {
    seed: u32,
}

impl NormalRandom {
    pub fn new<T: Real>(params: &Parameters<T>) -> Self {
        NormalRandom {
            seed: params.random.seed,
        }
    }
}

impl<T: Real> Random<T> for NormalRandom {
    fn draws(&self, k: Vector2<T>) -> CellDraws<T> {
        let mut lcg = cell_engine(k, self.seed);
        CellDraws {
            amp_pos: standard_normal(&mut lcg),
            amp_neg: standard_normal(&mut lcg),
            phase_pos: next_phase(&mut lcg),
            phase_neg: next_phase(&mut lcg),
        }
    }
}

/// Amplitudes ~ LogNormal(1, 1), phases ~ U[0, tau).
pub struct LogNormalRandom {
    seed: u32,
}

impl LogNormalRandom {
    pub fn new<T: Real>(params: &Parameters<T>) -> Self {
        LogNormalRandom {
            seed: params.random.seed,
        }
    }
}

impl<T: Real> Random<T> for LogNormalRandom {
    fn draws(&self, k: Vector2<T>) -> CellDraws<T> {
        let mut lcg = cell_engine(k, self.seed);
        let log_normal = |lcg: &mut Lcg| (T::one() + standard_normal::<T>(lcg)).exp();
        CellDraws {
            amp_pos: log_normal(&mut lcg),
            amp_neg: log_normal(&mut lcg),
            phase_pos: next_phase(&mut lcg),
            phase_neg: next_phase(&mut lcg),
        }
    }
}

/// One Gaussian draw from a throwaway engine; used for the JONSWAP peak
/// sharpening coefficient.
pub fn gaussian_draw<T: Real>(seed: u32, mean: T, std_dev: T) -> T {
    let mut lcg = Lcg::seeded(seed);
    mean + std_dev * standard_normal::<T>(&mut lcg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec2;

    #[test]
    fn identical_cells_draw_identically() {
        let params = Parameters::<f64>::default();
        let rng = NormalRandom::new(&params);
        let k = vec2(0.37, -1.21);
        let a = rng.draws(k);
        let b = rng.draws(k);
        assert_eq!(a.amp_pos, b.amp_pos);
        assert_eq!(a.amp_neg, b.amp_neg);
        assert_eq!(a.phase_pos, b.phase_pos);
        assert_eq!(a.phase_neg, b.phase_neg);
    }

    #[test]
    fn seed_change_changes_draws() {
        let mut params = Parameters::<f64>::default();
        let rng_a = NormalRandom::new(&params);
        params.random.seed = 12345;
        let rng_b = NormalRandom::new(&params);
        let k = vec2(0.37, -1.21);
        let a: CellDraws<f64> = rng_a.draws(k);
        let b: CellDraws<f64> = rng_b.draws(k);
        assert_ne!(a.amp_pos, b.amp_pos);
    }

    #[test]
    fn nearby_cells_decorrelate() {
        let params = Parameters::<f64>::default();
        let rng = NormalRandom::new(&params);
        let a: CellDraws<f64> = rng.draws(vec2(0.2, 0.4));
        let b: CellDraws<f64> = rng.draws(vec2(0.2, 0.4006));
        assert_ne!(a.amp_pos, b.amp_pos);
    }

    #[test]
    fn phases_are_in_range() {
        let params = Parameters::<f64>::default();
        let rng = NormalRandom::new(&params);
        for i in 0..1000 {
            let k = vec2(0.01 * i as f64, -0.003 * i as f64);
            let d: CellDraws<f64> = rng.draws(k);
            assert!(d.phase_pos >= 0.0 && d.phase_pos < std::f64::consts::TAU);
            assert!(d.phase_neg >= 0.0 && d.phase_neg < std::f64::consts::TAU);
        }
    }

    #[test]
    fn normal_amplitudes_have_unit_spread() {
        let params = Parameters::<f64>::default();
        let rng = NormalRandom::new(&params);
        let n = 20000;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for i in 0..n {
            let k = vec2(0.005 * i as f64 + 0.01, 0.002 * i as f64 - 7.0);
            let d: CellDraws<f64> = rng.draws(k);
            sum += d.amp_pos;
            sum_sq += d.amp_pos * d.amp_pos;
        }
        let mean = sum / n as f64;
        let var = sum_sq / n as f64 - mean * mean;
        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.1, "var {}", var);
    }

    #[test]
    fn log_normal_amplitudes_are_positive() {
        let params = Parameters::<f64>::default();
        let rng = LogNormalRandom::new(&params);
        for i in 0..1000 {
            let k = vec2(0.02 * i as f64 + 0.3, 0.05 * i as f64);
            let d: CellDraws<f64> = rng.draws(k);
            assert!(d.amp_pos > 0.0 && d.amp_neg > 0.0);
        }
    }

    #[test]
    fn gamma_draw_is_deterministic() {
        let a: f64 = gaussian_draw(54321 + 191819, 3.30, 0.67f64.sqrt());
        let b: f64 = gaussian_draw(54321 + 191819, 3.30, 0.67f64.sqrt());
        assert_eq!(a, b);
    }
}
