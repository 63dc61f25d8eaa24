//! Omni-directional wave energy spectra.
//!
//! [Horvath15] Section 5.1; formulations after Ochi, "Ocean Waves: The
//! Stochastic Approach".

use crate::math::{tau, Real};
use crate::ocean::params::Parameters;
use crate::ocean::random::gaussian_draw;

/// Spectral energy density as a function of angular frequency. Only the
/// non-directional component; directional spreading is applied separately.
pub trait Spectrum<T: Real>: Sync {
    fn evaluate(&self, omega: T) -> T;
}

/// The spectra share this envelope. A, B are constants, `wm` is the peak
/// angular frequency, computed differently per spectrum.
fn alpha_beta_spectrum<T: Real>(a: T, b: T, g: T, w: T, wm: T) -> T {
    if w < T::default_epsilon() {
        return T::zero();
    }
    (a * g.powi(2) / w.powi(5)) * (-b * (wm / w).powi(4)).exp()
}

/// Fully-developed sea. A = 8.1e-3, B = 1.291, peak at 0.87 g / U.
pub struct PiersonMoskowitzSpectrum<T> {
    gravity: T,
    peak_omega: T,
}

impl<T: Real> PiersonMoskowitzSpectrum<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        PiersonMoskowitzSpectrum {
            gravity: params.gravity,
            peak_omega: T::new(0.87) * params.gravity / params.wind_speed,
        }
    }
}

impl<T: Real> Spectrum<T> for PiersonMoskowitzSpectrum<T> {
    fn evaluate(&self, omega: T) -> T {
        alpha_beta_spectrum(
            T::new(8.1e-3),
            T::new(1.291),
            self.gravity,
            omega,
            self.peak_omega,
        )
    }
}

/// Fetch-limited sea ([Horvath15] Eq. 28). The peak-sharpening coefficient
/// gamma is a clamped Gaussian draw, reproducible from the user seed.
pub struct SpectrumJONSWAP<T> {
    gravity: T,
    gamma: T,
    peak_omega: T,
    alpha: T,
}

impl<T: Real> SpectrumJONSWAP<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        let gamma = crate::math::clamp(
            gaussian_draw(
                params.random.seed.wrapping_add(191819),
                T::new(3.30),
                T::new(0.67).sqrt(),
            ),
            T::one(),
            T::new(6.0),
        );

        let fetch_m = params.fetch * T::new(1000.0);
        let dimensionless_fetch = (params.gravity * fetch_m / params.wind_speed.powi(2)).abs();

        SpectrumJONSWAP {
            gravity: params.gravity,
            gamma,
            peak_omega: tau::<T>()
                * T::new(3.5)
                * (params.gravity / params.wind_speed).abs()
                * dimensionless_fetch.powf(T::new(-0.33)),
            alpha: T::new(0.076) * dimensionless_fetch.powf(T::new(-0.22)),
        }
    }

    fn peak_sharpening(&self, omega: T) -> T {
        let sigma = if omega <= self.peak_omega {
            T::new(0.07)
        } else {
            T::new(0.09)
        };
        let r = ((omega - self.peak_omega) / (sigma * self.peak_omega)).powi(2) / T::new(2.0);
        self.gamma.powf((-r).exp())
    }
}

impl<T: Real> Spectrum<T> for SpectrumJONSWAP<T> {
    fn evaluate(&self, omega: T) -> T {
        self.peak_sharpening(omega)
            * alpha_beta_spectrum(
                self.alpha,
                T::new(1.25),
                self.gravity,
                omega,
                self.peak_omega,
            )
    }
}

/// Texel-Marsen-Arsloe: JONSWAP with the Kitaigorodskii finite-depth
/// attenuation ([Horvath15] Section 5.1.5).
pub struct SpectrumTMA<T> {
    jonswap: SpectrumJONSWAP<T>,
    kd_gain: T,
}

impl<T: Real> SpectrumTMA<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        SpectrumTMA {
            jonswap: SpectrumJONSWAP::new(params),
            kd_gain: (params.depth / params.gravity).sqrt(),
        }
    }

    fn kitaigorodskii_depth(&self, omega: T) -> T {
        let wh = omega * self.kd_gain;
        T::new(0.5) + T::new(0.5) * (T::new(1.8) * (wh - T::new(1.125))).tanh()
    }
}

impl<T: Real> Spectrum<T> for SpectrumTMA<T> {
    fn evaluate(&self, omega: T) -> T {
        self.kitaigorodskii_depth(omega) * self.jonswap.evaluate(omega)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Parameters<f64> {
        let mut p = Parameters::default();
        p.wind_speed = 12.0;
        p.fetch = 100.0;
        p.depth = 10.0;
        p
    }

    #[test]
    fn pierson_moskowitz_peaks_near_modal_frequency() {
        let p = params();
        let pm = PiersonMoskowitzSpectrum::new(&p);
        let wm = 0.87 * p.gravity / p.wind_speed;
        let at_peak = pm.evaluate(wm);
        assert!(at_peak > pm.evaluate(0.5 * wm));
        assert!(at_peak > pm.evaluate(2.0 * wm));
        assert!(at_peak.is_finite() && at_peak > 0.0);
    }

    #[test]
    fn jonswap_gamma_is_clamped_and_reproducible() {
        for seed in [0u32, 1, 54321, 999_999] {
            let mut p = params();
            p.random.seed = seed;
            let a = SpectrumJONSWAP::new(&p);
            let b = SpectrumJONSWAP::new(&p);
            assert_eq!(a.gamma, b.gamma);
            assert!(a.gamma >= 1.0 && a.gamma <= 6.0);
        }
    }

    #[test]
    fn jonswap_sharpens_the_peak() {
        let p = params();
        let j = SpectrumJONSWAP::new(&p);
        // Away from the peak the sharpening factor decays to 1.
        assert!((j.peak_sharpening(10.0 * j.peak_omega) - 1.0).abs() < 1.0e-6);
        assert!(j.peak_sharpening(j.peak_omega) > 1.0);
    }

    #[test]
    fn tma_attenuates_jonswap() {
        let p = params();
        let j = SpectrumJONSWAP::new(&p);
        let tma = SpectrumTMA::new(&p);
        for &w in &[0.2, 0.5, 1.0, 2.0, 4.0] {
            let sj = j.evaluate(w);
            let st = tma.evaluate(w);
            assert!(st <= sj);
            assert!(st >= 0.0);
            assert!(st.is_finite());
        }
    }

    #[test]
    fn spectra_vanish_at_zero_frequency() {
        let p = params();
        assert_eq!(PiersonMoskowitzSpectrum::new(&p).evaluate(0.0), 0.0);
        assert_eq!(SpectrumJONSWAP::new(&p).evaluate(0.0), 0.0);
        assert_eq!(SpectrumTMA::new(&p).evaluate(0.0), 0.0);
    }
}
