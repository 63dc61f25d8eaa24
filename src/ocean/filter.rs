//! Wavelength filters applied to the spectral amplitudes.

use crate::math::{clamp, smoothstep, wavelength_from_wavenumber, Real};
use crate::ocean::params::Parameters;

pub trait Filter<T: Real>: Sync {
    fn evaluate(&self, k_mag: T) -> T;
}

pub struct NullFilter;

impl NullFilter {
    pub fn new<T: Real>(_params: &Parameters<T>) -> Self {
        NullFilter
    }
}

impl<T: Real> Filter<T> for NullFilter {
    fn evaluate(&self, _k_mag: T) -> T {
        T::one()
    }
}

/// Smooth band that protects the wavelengths between `small_wavelength` and
/// `big_wavelength`. Filtering is by wavelength rather than frequency
/// because wavelengths are easier for artists to reason about. Because the
/// response is applied outside the amplitude square root, `f` and `1 - f`
/// split a spectrum exactly, which makes the filter invertible.
pub struct SmoothInvertibleBandPassFilter<T> {
    edge0: T,
    edge1: T,
    edge2: T,
    edge3: T,
    min: T,
    invert: bool,
}

impl<T: Real> SmoothInvertibleBandPassFilter<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        SmoothInvertibleBandPassFilter {
            edge0: params.filter.small_wavelength - params.filter.soft_width,
            edge1: params.filter.small_wavelength,
            edge2: params.filter.big_wavelength,
            edge3: params.filter.big_wavelength + params.filter.soft_width,
            min: params.filter.min,
            invert: params.filter.invert,
        }
    }

    pub fn with_edges(edge0: T, edge1: T, edge2: T, edge3: T, min: T, invert: bool) -> Self {
        SmoothInvertibleBandPassFilter {
            edge0,
            edge1,
            edge2,
            edge3,
            min,
            invert,
        }
    }
}

impl<T: Real> Filter<T> for SmoothInvertibleBandPassFilter<T> {
    fn evaluate(&self, k_mag: T) -> T {
        let wavelength = wavelength_from_wavenumber(k_mag);
        let t = smoothstep(self.edge0, self.edge1, wavelength)
            - smoothstep(self.edge2, self.edge3, wavelength);
        let f = clamp(
            self.min + (T::one() - self.min) * t,
            T::zero(),
            T::one(),
        );
        if self.invert {
            T::one() - f
        } else {
            f
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::wavenumber_from_wavelength;

    #[test]
    fn null_filter_passes_everything() {
        let p = Parameters::<f64>::default();
        let f = NullFilter::new(&p);
        assert_eq!(f.evaluate(0.01), 1.0);
        assert_eq!(f.evaluate(100.0), 1.0);
    }

    #[test]
    fn band_pass_protects_the_band() {
        let f = SmoothInvertibleBandPassFilter::with_edges(1.0f64, 2.0, 10.0, 12.0, 0.0, false);
        // Inside the protected band.
        assert!((f.evaluate(wavenumber_from_wavelength(5.0)) - 1.0).abs() < 1.0e-12);
        // Far outside on both sides.
        assert!(f.evaluate(wavenumber_from_wavelength(0.5)).abs() < 1.0e-12);
        assert!(f.evaluate(wavenumber_from_wavelength(50.0)).abs() < 1.0e-12);
    }

    #[test]
    fn response_stays_in_unit_range() {
        let f = SmoothInvertibleBandPassFilter::with_edges(0.0, 1.0, 4.0, 6.0, 0.25, false);
        for i in 1..200 {
            let k = 0.05 * i as f64;
            let v = f.evaluate(k);
            assert!((0.0..=1.0).contains(&v), "k {}: {}", k, v);
            assert!(v >= 0.25 - 1.0e-12);
        }
    }

    #[test]
    fn inverted_filter_complements() {
        let band = SmoothInvertibleBandPassFilter::with_edges(1.0, 2.0, 10.0, 12.0, 0.0, false);
        let inverse = SmoothInvertibleBandPassFilter::with_edges(1.0, 2.0, 10.0, 12.0, 0.0, true);
        for i in 1..300 {
            let k = 0.02 * i as f64;
            let sum: f64 = band.evaluate(k) + inverse.evaluate(k);
            assert!((sum - 1.0).abs() < 1.0e-12, "k {}: {}", k, sum);
        }
    }
}
