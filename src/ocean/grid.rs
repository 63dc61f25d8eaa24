//! Wavenumber geometry of the Hermitian half-spectrum.
//!
//! Spectral stages iterate the `(N/2 + 1) x N` grid in parallel with
//! `ndarray::Zip::indexed(..).par_for_each(..)`; this type maps each
//! `(j, i)` cell to its wavenumber vector. Rows past `N/2` fold to negative
//! wavenumbers, and the `(0, 0)` cell is the DC term every stage writes as
//! zero.

use cgmath::{vec2, Vector2};

use crate::math::{tau, Real};

#[derive(Debug, Clone, Copy)]
pub struct SpectralGrid<T> {
    resolution: usize,
    domain: T,
}

impl<T: Real> SpectralGrid<T> {
    pub fn new(resolution: usize, domain: T) -> Self {
        SpectralGrid { resolution, domain }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn width(&self) -> usize {
        self.resolution / 2 + 1
    }

    pub fn height(&self) -> usize {
        self.resolution
    }

    /// Wavenumber spacing of the periodic domain.
    pub fn dk(&self) -> T {
        tau::<T>() / self.domain
    }

    pub fn is_dc(&self, j: usize, i: usize) -> bool {
        i == 0 && j == 0
    }

    /// Wavenumber vector `(ki, kj)` of cell `(j, i)`.
    pub fn wavenumber(&self, j: usize, i: usize) -> Vector2<T> {
        let n = self.resolution;
        let j_real = if j <= n / 2 {
            j as isize
        } else {
            j as isize - n as isize
        };
        vec2(
            T::new(i) * self.dk(),
            T::new(j_real) * self.dk(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn wavenumbers_fold_past_the_nyquist_row() {
        let grid = SpectralGrid::new(8, 100.0f64);
        let dk = std::f64::consts::TAU / 100.0;

        assert_eq!(grid.wavenumber(0, 0), vec2(0.0, 0.0));
        assert!((grid.wavenumber(4, 0).y - 4.0 * dk).abs() < 1.0e-15);
        assert!((grid.wavenumber(5, 0).y + 3.0 * dk).abs() < 1.0e-15);
        assert!((grid.wavenumber(7, 0).y + dk).abs() < 1.0e-15);
        assert!((grid.wavenumber(3, 2).x - 2.0 * dk).abs() < 1.0e-15);
    }

    #[test]
    fn only_the_origin_is_dc() {
        let grid = SpectralGrid::new(8, 100.0f64);
        assert!(grid.is_dc(0, 0));
        assert!(!grid.is_dc(0, 1));
        assert!(!grid.is_dc(1, 0));
        assert!(!grid.is_dc(4, 4));
        assert!(grid.wavenumber(3, 1).magnitude() > 0.0);
    }
}
