//! Time evolution of the initial spectrum and transform back to space.
//!
//! Each frame evolves the spectral amplitudes to time `t`, derives the
//! displacement and crest-indicator spectra, and inverse-transforms them to
//! the padded spatial fields. With trough damping enabled, a band-limited
//! copy of the surface is blended into regions the crest indicator flags.

use cgmath::{InnerSpace, Vector2};
use log::debug;
use ndarray::Zip;
use num_traits::Zero;
use rustfft::num_complex::Complex;

use crate::error::Error;
use crate::fft::SpectralToPaddedSpatial2D;
use crate::field::{SpatialField2D, SpectralField2D};
use crate::math::{mix, smoothstep, Real};
use crate::ocean::filter::{Filter, SmoothInvertibleBandPassFilter};
use crate::ocean::grid::SpectralGrid;
use crate::ocean::initial::InitialState;
use crate::ocean::params::Parameters;
use crate::ocean::stats::Stats;

/// Spatial output of one propagated frame: height, horizontal displacement
/// and the crest indicator, each `(N+1) x (N+1)` with a wrap border.
pub struct PropagatedState<T: Real> {
    pub height: SpatialField2D<T>,
    pub dx: SpatialField2D<T>,
    pub dy: SpatialField2D<T>,
    pub min_e: SpatialField2D<T>,
}

impl<T: Real> PropagatedState<T> {
    pub fn new(params: &Parameters<T>) -> Result<Self, Error> {
        Self::with_resolution_power(params.resolution_power_of_two)
    }

    pub fn with_resolution_power(power_of_two: u32) -> Result<Self, Error> {
        Ok(PropagatedState {
            height: SpatialField2D::new(power_of_two, 1)?,
            dx: SpatialField2D::new(power_of_two, 1)?,
            dy: SpatialField2D::new(power_of_two, 1)?,
            min_e: SpatialField2D::new(power_of_two, 1)?,
        })
    }

    pub fn resolution(&self) -> usize {
        self.height.unpadded_width()
    }
}

/// Scratch spectra, filtered scratch fields and the planned transform for a
/// fixed resolution. Built once, reused every frame.
pub struct Propagation<T: Real> {
    h_spec: SpectralField2D<Complex<T>>,
    temp_spec: SpectralField2D<Complex<T>>,
    h_filt_spec: SpectralField2D<Complex<T>>,
    filt_height: SpatialField2D<T>,
    filt_dx: SpatialField2D<T>,
    filt_dy: SpatialField2D<T>,
    filt_min_e: SpatialField2D<T>,
    converter: SpectralToPaddedSpatial2D<T>,
    grid: SpectralGrid<T>,

    /// Clip window of the crest-indicator interpolant, in standardized
    /// units. Tunable; see DESIGN.md for the choice of defaults.
    pub min_clip_e: T,
    pub max_clip_e: T,
}

/// Pinch used by the crest indicator itself, independent of the display
/// pinch in `Parameters`.
fn min_e_pinch<T: Real>() -> T {
    T::new(1.25)
}

impl<T: Real> Propagation<T> {
    pub fn new(params: &Parameters<T>) -> Result<Self, Error> {
        params.validate()?;
        let power = params.resolution_power_of_two;
        let h_spec = SpectralField2D::new(power)?;
        let filt_height = SpatialField2D::new(power, 1)?;
        let converter = SpectralToPaddedSpatial2D::new(&h_spec, &filt_height)?;
        Ok(Propagation {
            temp_spec: SpectralField2D::new(power)?,
            h_filt_spec: SpectralField2D::new(power)?,
            filt_dx: SpatialField2D::new(power, 1)?,
            filt_dy: SpatialField2D::new(power, 1)?,
            filt_min_e: SpatialField2D::new(power, 1)?,
            grid: SpectralGrid::new(1 << power, params.domain),
            h_spec,
            filt_height,
            converter,
            min_clip_e: T::zero(),
            max_clip_e: T::new(1.1),
        })
    }

    /// Advance the initial state to `time` and fill `pstate`. Idempotent
    /// for a fixed `time`.
    pub fn propagate(
        &mut self,
        params: &Parameters<T>,
        istate: &InitialState<T>,
        pstate: &mut PropagatedState<T>,
        time: T,
    ) -> Result<(), Error> {
        let n = self.grid.resolution();
        if istate.resolution() != n || pstate.resolution() != n {
            return Err(Error::InvalidShape {
                width: pstate.height.width(),
                height: pstate.height.height(),
            });
        }
        let grid = self.grid;

        evolve_spectrum(grid, istate, time, &mut self.h_spec);

        // Second derivatives, reusing the output fields as scratch until
        // their real content arrives: Dxx lands in dx, Dyy in dy, Dxy in
        // min_e, then the three combine in place.
        scaled_spectrum(grid, &self.h_spec, &mut self.temp_spec, dxx_factor);
        self.converter.execute(&self.temp_spec, &mut pstate.dx)?;

        scaled_spectrum(grid, &self.h_spec, &mut self.temp_spec, dyy_factor);
        self.converter.execute(&self.temp_spec, &mut pstate.dy)?;

        scaled_spectrum(grid, &self.h_spec, &mut self.temp_spec, dxy_factor);
        self.converter.execute(&self.temp_spec, &mut pstate.min_e)?;

        compute_min_e(&pstate.dx, &pstate.dy, &mut pstate.min_e);

        // First derivatives.
        scaled_spectrum(grid, &self.h_spec, &mut self.temp_spec, dx_factor);
        self.converter.execute(&self.temp_spec, &mut pstate.dx)?;

        scaled_spectrum(grid, &self.h_spec, &mut self.temp_spec, dy_factor);
        self.converter.execute(&self.temp_spec, &mut pstate.dy)?;

        if params.trough_damping == T::zero() {
            self.converter.execute(&self.h_spec, &mut pstate.height)?;
            return Ok(());
        }

        // Band-limit the spectrum: the inverted band removes the
        // wavelengths between the two damping edges.
        let filter = SmoothInvertibleBandPassFilter::with_edges(
            T::zero(),
            params.trough_damping_small_wavelength,
            params.trough_damping_big_wavelength,
            params.trough_damping_big_wavelength + params.trough_damping_soft_width,
            T::zero(),
            true,
        );
        scaled_spectrum(grid, &self.h_spec, &mut self.h_filt_spec, |_, k_mag| {
            Complex::new(filter.evaluate(k_mag), T::zero())
        });

        // The unfiltered height is needed before blending.
        self.converter.execute(&self.h_spec, &mut pstate.height)?;

        scaled_spectrum(grid, &self.h_filt_spec, &mut self.temp_spec, dxx_factor);
        self.converter.execute(&self.temp_spec, &mut self.filt_dx)?;

        scaled_spectrum(grid, &self.h_filt_spec, &mut self.temp_spec, dyy_factor);
        self.converter.execute(&self.temp_spec, &mut self.filt_dy)?;

        scaled_spectrum(grid, &self.h_filt_spec, &mut self.temp_spec, dxy_factor);
        self.converter.execute(&self.temp_spec, &mut self.filt_min_e)?;

        compute_min_e(&self.filt_dx, &self.filt_dy, &mut self.filt_min_e);

        scaled_spectrum(grid, &self.h_filt_spec, &mut self.temp_spec, dx_factor);
        self.converter.execute(&self.temp_spec, &mut self.filt_dx)?;

        scaled_spectrum(grid, &self.h_filt_spec, &mut self.temp_spec, dy_factor);
        self.converter.execute(&self.temp_spec, &mut self.filt_dy)?;

        self.converter
            .execute(&self.h_filt_spec, &mut self.filt_height)?;

        let stats = Stats::new(&self.filt_height, &self.filt_min_e);
        debug!(
            "filtered height (min, max, mean): ({:?}, {:?}, {:?}); \
             crest indicator (mean, stddev): ({:?}, {:?})",
            stats.min_height,
            stats.max_height,
            stats.mean_height,
            stats.mean_min_e,
            stats.std_dev_min_e
        );

        // Standardize the filtered crest indicator and turn it, in place,
        // into the blend interpolant: 1 keeps the full surface, lower
        // values pull toward the band-limited one.
        let two = T::new(2.0);
        let (gain, bias) = if stats.std_dev_min_e > T::zero() {
            (
                T::one() / (two * stats.std_dev_min_e),
                -stats.mean_min_e / (two * stats.std_dev_min_e),
            )
        } else {
            // Degenerate field; standardized indicator pins at zero.
            (T::zero(), T::zero())
        };
        let min_clip_e = self.min_clip_e;
        let max_clip_e = self.max_clip_e;
        let min_interpolant = T::one() - params.trough_damping;
        Zip::from(&mut *self.filt_min_e).par_for_each(|t| {
            let standardized = *t * gain + bias;
            let s = smoothstep(min_clip_e, max_clip_e, standardized);
            *t = mix(min_interpolant, T::one(), s);
        });

        blend_fields(&self.filt_height, &mut pstate.height, &self.filt_min_e);
        blend_fields(&self.filt_dx, &mut pstate.dx, &self.filt_min_e);
        blend_fields(&self.filt_dy, &mut pstate.dy, &self.filt_min_e);

        Ok(())
    }
}

fn evolve_spectrum<T: Real>(
    grid: SpectralGrid<T>,
    istate: &InitialState<T>,
    time: T,
    out: &mut SpectralField2D<Complex<T>>,
) {
    Zip::indexed(&mut **out)
        .and(&*istate.h_spectral_pos)
        .and(&*istate.h_spectral_neg)
        .and(&*istate.omega)
        .par_for_each(|(j, i), h, &pos, &neg, &omega| {
            if grid.is_dc(j, i) {
                *h = Complex::zero();
                return;
            }
            let (sin_wt, cos_wt) = (omega * time).sin_cos();
            let fwd = Complex::new(cos_wt, -sin_wt);
            let bkwd = Complex::new(cos_wt, sin_wt);
            *h = pos * fwd + neg * bkwd;
        });
}

/// Multiply every non-DC cell by a wavenumber-dependent factor.
fn scaled_spectrum<T, F>(
    grid: SpectralGrid<T>,
    src: &SpectralField2D<Complex<T>>,
    out: &mut SpectralField2D<Complex<T>>,
    factor: F,
) where
    T: Real,
    F: Fn(Vector2<T>, T) -> Complex<T> + Sync + Send,
{
    Zip::indexed(&mut **out)
        .and(&**src)
        .par_for_each(|(j, i), d, &s| {
            if grid.is_dc(j, i) {
                *d = Complex::zero();
                return;
            }
            let k = grid.wavenumber(j, i);
            *d = factor(k, k.magnitude()) * s;
        });
}

// Derivative spectra are scaled by 1 / |k|, so these are not the raw
// derivatives but the displacement-map terms of the choppy-wave model.
fn dx_factor<T: Real>(k: Vector2<T>, k_mag: T) -> Complex<T> {
    Complex::new(T::zero(), -k.x / k_mag)
}

fn dy_factor<T: Real>(k: Vector2<T>, k_mag: T) -> Complex<T> {
    Complex::new(T::zero(), -k.y / k_mag)
}

fn dxx_factor<T: Real>(k: Vector2<T>, k_mag: T) -> Complex<T> {
    Complex::new(k.x * k.x / k_mag, T::zero())
}

fn dyy_factor<T: Real>(k: Vector2<T>, k_mag: T) -> Complex<T> {
    Complex::new(k.y * k.y / k_mag, T::zero())
}

fn dxy_factor<T: Real>(k: Vector2<T>, k_mag: T) -> Complex<T> {
    Complex::new(k.x * k.y / k_mag, T::zero())
}

/// Negated smaller eigenvalue of the displacement Jacobian. `dxy_and_min_e`
/// holds Dxy on entry and the crest indicator on exit.
fn compute_min_e<T: Real>(
    dxx: &SpatialField2D<T>,
    dyy: &SpatialField2D<T>,
    dxy_and_min_e: &mut SpatialField2D<T>,
) {
    let pinch = min_e_pinch::<T>();
    let two = T::new(2.0);
    Zip::from(&mut **dxy_and_min_e)
        .and(&**dxx)
        .and(&**dyy)
        .par_for_each(|m, &xx, &yy| {
            let jxx = T::one() - pinch * xx;
            let jyy = T::one() - pinch * yy;
            let jxy = -pinch * *m;

            let a = (jxx + jyy) / two;
            let b = ((jxx - jyy).powi(2) + T::new(4.0) * jxy.powi(2)).sqrt() / two;

            *m = -(a - b);
        });
}

/// `b = mix(a, b, t)` per cell.
fn blend_fields<T: Real>(
    a: &SpatialField2D<T>,
    b: &mut SpatialField2D<T>,
    interpolant: &SpatialField2D<T>,
) {
    Zip::from(&mut **b)
        .and(&**a)
        .and(&**interpolant)
        .par_for_each(|b, &a, &t| {
            *b = mix(a, *b, t);
        });
}
