//! Dense periodic 2D grids backed by `ndarray`, shaped for the Hermitian
//! half-spectrum transforms: spatial fields are `N x N` (plus an optional
//! one-element wrap border on the right/bottom), spectral fields hold the
//! `(N/2 + 1) x N` half-spectrum of a real signal.

use std::ops::{Deref, DerefMut};

use ndarray::Array2;
use num_traits::Zero;

use crate::error::Error;
use crate::math::wrap;

const MAX_POWER_OF_TWO: u32 = 30;

fn checked_resolution(power_of_two: u32) -> Result<usize, Error> {
    if power_of_two < 1 || power_of_two > MAX_POWER_OF_TWO {
        let bad = 1usize
            .checked_shl(power_of_two)
            .unwrap_or(usize::MAX);
        return Err(Error::InvalidShape {
            width: bad,
            height: bad,
        });
    }
    Ok(1usize << power_of_two)
}

/// Real-valued spatial grid, `N x N` logical cells plus `pad` extra
/// columns/rows holding a copy of column/row zero so that triangulation can
/// read an `(N+1) x (N+1)` vertex lattice without copying.
#[derive(Debug, Clone)]
pub struct SpatialField2D<T> {
    data: Array2<T>,
    pad: usize,
}

impl<T: Copy + Zero> SpatialField2D<T> {
    pub fn new(power_of_two: u32, pad: usize) -> Result<Self, Error> {
        let n = checked_resolution(power_of_two)? + pad;
        Ok(SpatialField2D {
            data: Array2::zeros((n, n)),
            pad,
        })
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn unpadded_width(&self) -> usize {
        self.width() - self.pad
    }

    pub fn unpadded_height(&self) -> usize {
        self.height() - self.pad
    }

    pub fn padding(&self) -> usize {
        self.pad
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `(x mod W, y mod H)`, defined for any signed index.
    pub fn at(&self, x: isize, y: isize) -> T {
        self.data[(wrap(y, self.height()), wrap(x, self.width()))]
    }

    /// Same wrap, but over the unpadded `N x N` domain. The border copy
    /// never participates in periodic lookups.
    pub fn at_unpadded(&self, x: isize, y: isize) -> T {
        self.data[(
            wrap(y, self.unpadded_height()),
            wrap(x, self.unpadded_width()),
        )]
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice().expect("field storage is contiguous")
    }

    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.data
            .as_slice_mut()
            .expect("field storage is contiguous")
    }
}

impl<T> Deref for SpatialField2D<T> {
    type Target = Array2<T>;
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for SpatialField2D<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

/// Hermitian half-spectrum of an `N x N` real signal: width `N/2 + 1`,
/// height `N`. Rows `j > N/2` hold the negative wavenumbers `j - N`.
#[derive(Debug, Clone)]
pub struct SpectralField2D<E> {
    data: Array2<E>,
}

impl<E: Copy + Zero> SpectralField2D<E> {
    pub fn new(power_of_two: u32) -> Result<Self, Error> {
        let n = checked_resolution(power_of_two)?;
        Ok(SpectralField2D {
            data: Array2::zeros((n, n / 2 + 1)),
        })
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Side length `N` of the spatial signal this spectrum transforms to.
    pub fn resolution(&self) -> usize {
        self.height()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn at(&self, x: isize, y: isize) -> E {
        self.data[(wrap(y, self.height()), wrap(x, self.width()))]
    }

    pub fn as_slice(&self) -> &[E] {
        self.data.as_slice().expect("field storage is contiguous")
    }

    pub fn as_slice_mut(&mut self) -> &mut [E] {
        self.data
            .as_slice_mut()
            .expect("field storage is contiguous")
    }
}

impl<E> Deref for SpectralField2D<E> {
    type Target = Array2<E>;
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<E> DerefMut for SpectralField2D<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_dimensions() {
        let f = SpatialField2D::<f64>::new(4, 1).unwrap();
        assert_eq!(f.width(), 17);
        assert_eq!(f.height(), 17);
        assert_eq!(f.unpadded_width(), 16);
        assert_eq!(f.padding(), 1);

        let g = SpatialField2D::<f64>::new(4, 0).unwrap();
        assert_eq!(g.width(), 16);
        assert_eq!(g.unpadded_width(), 16);
    }

    #[test]
    fn spectral_dimensions() {
        let f = SpectralField2D::<f64>::new(5).unwrap();
        assert_eq!(f.width(), 17);
        assert_eq!(f.height(), 32);
        assert_eq!(f.resolution(), 32);
    }

    #[test]
    fn rejects_bad_power() {
        assert!(matches!(
            SpatialField2D::<f64>::new(0, 0),
            Err(Error::InvalidShape { .. })
        ));
        assert!(matches!(
            SpatialField2D::<f64>::new(31, 1),
            Err(Error::InvalidShape { .. })
        ));
        assert!(matches!(
            SpectralField2D::<f64>::new(40),
            Err(Error::InvalidShape { .. })
        ));
    }

    #[test]
    fn wrapped_indexing() {
        let mut f = SpatialField2D::<f64>::new(2, 0).unwrap();
        f[(0, 0)] = 1.0;
        f[(3, 2)] = 7.0;
        assert_eq!(f.at(0, 0), 1.0);
        assert_eq!(f.at(4, 4), 1.0);
        assert_eq!(f.at(-4, -4), 1.0);
        assert_eq!(f.at(2, 3), 7.0);
        assert_eq!(f.at(-2, -1), 7.0);
    }
}
