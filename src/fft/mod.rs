//! Planned Hermitian complex-to-real 2D inverse transforms.
//!
//! The half-spectrum is transformed in two passes: a complex inverse FFT
//! down each of the `N/2 + 1` stored columns, then a per-row Hermitian
//! expansion to the full `N` bins and a complex inverse FFT along each row,
//! keeping the real parts. rustfft's inverse is unnormalized, matching the
//! backward-transform convention the spectral synthesis is scaled for.

use std::sync::Arc;

use ndarray::parallel::prelude::*;
use ndarray::{s, Array2, ArrayViewMut2, Axis};
use num_traits::Zero;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::Error;
use crate::field::{SpatialField2D, SpectralField2D};
use crate::math::Real;

fn shape_error(width: usize, height: usize) -> Error {
    Error::FftFailure {
        width,
        height,
        reason: "mismatched spectral and spatial sizes".into(),
    }
}

/// One planned inverse of side `N`, with the column-pass intermediate kept
/// between executions.
struct InversePlan<T: Real> {
    resolution: usize,
    fft: Arc<dyn Fft<T>>,
    stage: Array2<Complex<T>>,
}

impl<T: Real> InversePlan<T> {
    fn new(resolution: usize) -> Result<Self, Error> {
        if resolution < 2 || !resolution.is_power_of_two() {
            return Err(shape_error(resolution / 2 + 1, resolution));
        }
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_inverse(resolution);
        Ok(InversePlan {
            resolution,
            fft,
            stage: Array2::zeros((resolution, resolution / 2 + 1)),
        })
    }

    /// Transform `spectral` into the `N x N` view `out`.
    fn run(&mut self, spectral: &SpectralField2D<Complex<T>>, mut out: ArrayViewMut2<T>) {
        let n = self.resolution;
        let half = n / 2 + 1;
        let fft = &self.fft;
        let scratch_len = fft.get_inplace_scratch_len();

        // Column pass over the stored half-spectrum.
        self.stage
            .axis_iter_mut(Axis(1))
            .into_par_iter()
            .zip(spectral.axis_iter(Axis(1)).into_par_iter())
            .for_each_init(
                || (vec![Complex::zero(); n], vec![Complex::zero(); scratch_len]),
                |(buf, scratch), (mut stage_col, spec_col)| {
                    for (b, s) in buf.iter_mut().zip(spec_col.iter()) {
                        *b = *s;
                    }
                    fft.process_with_scratch(buf, scratch);
                    for (d, b) in stage_col.iter_mut().zip(buf.iter()) {
                        *d = *b;
                    }
                },
            );

        // Row pass: mirror the missing bins with conjugate symmetry, then
        // transform and keep the real parts.
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(self.stage.axis_iter(Axis(0)).into_par_iter())
            .for_each_init(
                || (vec![Complex::zero(); n], vec![Complex::zero(); scratch_len]),
                |(buf, scratch), (mut out_row, stage_row)| {
                    for i in 0..half {
                        buf[i] = stage_row[i];
                    }
                    for i in half..n {
                        buf[i] = stage_row[n - i].conj();
                    }
                    fft.process_with_scratch(buf, scratch);
                    for (o, b) in out_row.iter_mut().zip(buf.iter()) {
                        *o = b.re;
                    }
                },
            );
    }
}

/// Plain transform: `(N/2 + 1) x N` half-spectrum to an `N x N` field.
pub struct SpectralToSpatial2D<T: Real> {
    plan: InversePlan<T>,
}

impl<T: Real> SpectralToSpatial2D<T> {
    pub fn new(
        spectral: &SpectralField2D<Complex<T>>,
        spatial: &SpatialField2D<T>,
    ) -> Result<Self, Error> {
        let n = spectral.resolution();
        if spatial.width() != n || spatial.height() != n || spectral.width() != n / 2 + 1 {
            return Err(shape_error(spatial.width(), spatial.height()));
        }
        Ok(SpectralToSpatial2D {
            plan: InversePlan::new(n)?,
        })
    }

    pub fn execute(
        &mut self,
        spectral: &SpectralField2D<Complex<T>>,
        spatial: &mut SpatialField2D<T>,
    ) -> Result<(), Error> {
        let n = self.plan.resolution;
        if spectral.resolution() != n || spatial.width() != n || spatial.height() != n {
            return Err(shape_error(spatial.width(), spatial.height()));
        }
        self.plan.run(spectral, spatial.view_mut());
        Ok(())
    }
}

/// Padded transform: same input, `(N+1) x (N+1)` output whose last column
/// and row repeat column and row zero.
pub struct SpectralToPaddedSpatial2D<T: Real> {
    plan: InversePlan<T>,
}

impl<T: Real> SpectralToPaddedSpatial2D<T> {
    pub fn new(
        spectral: &SpectralField2D<Complex<T>>,
        spatial: &SpatialField2D<T>,
    ) -> Result<Self, Error> {
        let n = spectral.resolution();
        if spatial.width() != n + 1 || spatial.height() != n + 1 || spectral.width() != n / 2 + 1 {
            return Err(shape_error(spatial.width(), spatial.height()));
        }
        Ok(SpectralToPaddedSpatial2D {
            plan: InversePlan::new(n)?,
        })
    }

    pub fn execute(
        &mut self,
        spectral: &SpectralField2D<Complex<T>>,
        spatial: &mut SpatialField2D<T>,
    ) -> Result<(), Error> {
        let n = self.plan.resolution;
        if spectral.resolution() != n || spatial.width() != n + 1 || spatial.height() != n + 1 {
            return Err(shape_error(spatial.width(), spatial.height()));
        }
        self.plan.run(spectral, spatial.slice_mut(s![..n, ..n]));
        copy_wrapped_border(spatial);
        Ok(())
    }
}

/// Refresh the repeated border: column `N` = column 0, row `N` = row 0,
/// corner `(N, N)` = `(0, 0)`.
pub fn copy_wrapped_border<T: Real>(spatial: &mut SpatialField2D<T>) {
    let n = spatial.unpadded_width();
    if spatial.padding() == 0 {
        return;
    }
    for y in 0..n {
        let first = spatial[(y, 0)];
        spatial[(y, n)] = first;
    }
    let (top, mut bottom) = spatial.view_mut().split_at(Axis(0), n);
    bottom.row_mut(0).assign(&top.row(0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tau;

    #[test]
    fn dc_bin_gives_constant_field() {
        let mut spec = SpectralField2D::<Complex<f64>>::new(3).unwrap();
        let mut out = SpatialField2D::<f64>::new(3, 0).unwrap();
        spec[(0, 0)] = Complex::new(0.5, 0.0);

        let mut fft = SpectralToSpatial2D::new(&spec, &out).unwrap();
        fft.execute(&spec, &mut out).unwrap();

        for &v in out.as_slice() {
            assert!((v - 0.5).abs() < 1.0e-12);
        }
    }

    #[test]
    fn single_bin_is_a_cosine() {
        let n = 8;
        let mut spec = SpectralField2D::<Complex<f64>>::new(3).unwrap();
        let mut out = SpatialField2D::<f64>::new(3, 0).unwrap();
        // One positive-x bin; its Hermitian mirror makes 2 cos(k x).
        spec[(0, 1)] = Complex::new(1.0, 0.0);

        let mut fft = SpectralToSpatial2D::new(&spec, &out).unwrap();
        fft.execute(&spec, &mut out).unwrap();

        for y in 0..n {
            for x in 0..n {
                let expected = 2.0 * (tau::<f64>() * x as f64 / n as f64).cos();
                assert!(
                    (out[(y, x)] - expected).abs() < 1.0e-10,
                    "({}, {}): {} vs {}",
                    x,
                    y,
                    out[(y, x)],
                    expected
                );
            }
        }
    }

    #[test]
    fn mixed_bin_phase_and_direction() {
        let n = 8;
        let mut spec = SpectralField2D::<Complex<f64>>::new(3).unwrap();
        let mut out = SpatialField2D::<f64>::new(3, 0).unwrap();
        // Negative j row, complex amplitude: 2 Re(c e^{i(x - y) k}).
        let c = Complex::new(0.3, -0.4);
        spec[(n - 1, 1)] = c;

        let mut fft = SpectralToSpatial2D::new(&spec, &out).unwrap();
        fft.execute(&spec, &mut out).unwrap();

        for y in 0..n {
            for x in 0..n {
                let angle = tau::<f64>() * (x as f64 - y as f64) / n as f64;
                let expected = 2.0 * (c * Complex::new(0.0, angle).exp()).re;
                assert!(
                    (out[(y, x)] - expected).abs() < 1.0e-10,
                    "({}, {}): {} vs {}",
                    x,
                    y,
                    out[(y, x)],
                    expected
                );
            }
        }
    }

    #[test]
    fn padded_output_wraps() {
        let n = 16;
        let mut spec = SpectralField2D::<Complex<f64>>::new(4).unwrap();
        let mut out = SpatialField2D::<f64>::new(4, 1).unwrap();
        spec[(0, 1)] = Complex::new(0.7, 0.2);
        spec[(3, 2)] = Complex::new(-0.1, 0.9);
        spec[(n - 2, 3)] = Complex::new(0.4, 0.4);

        let mut fft = SpectralToPaddedSpatial2D::new(&spec, &out).unwrap();
        fft.execute(&spec, &mut out).unwrap();

        for i in 0..=n {
            assert_eq!(out[(i, n)], out[(i, 0)], "column wrap at y = {}", i);
            assert_eq!(out[(n, i)], out[(0, i)], "row wrap at x = {}", i);
        }
        assert_eq!(out[(n, n)], out[(0, 0)]);
    }

    #[test]
    fn rejects_mismatched_sizes() {
        let spec = SpectralField2D::<Complex<f64>>::new(3).unwrap();
        let padded = SpatialField2D::<f64>::new(3, 1).unwrap();
        assert!(matches!(
            SpectralToSpatial2D::new(&spec, &padded),
            Err(Error::FftFailure { .. })
        ));

        let plain = SpatialField2D::<f64>::new(3, 0).unwrap();
        assert!(matches!(
            SpectralToPaddedSpatial2D::new(&spec, &plain),
            Err(Error::FftFailure { .. })
        ));
    }
}
