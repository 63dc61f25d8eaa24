//! One-shot spectral synthesis of the wave field.
//!
//! For every non-DC cell of the half-spectrum the selected dispersion,
//! spectrum, spreading, filter and random kernels combine into two complex
//! amplitudes (positive- and negative-travelling waves) and the angular
//! frequency that advances them in time.

use cgmath::InnerSpace;
use log::info;
use ndarray::Zip;
use num_traits::Zero;
use parking_lot::Mutex;
use rustfft::num_complex::Complex;

use crate::error::Error;
use crate::field::SpectralField2D;
use crate::math::Real;
use crate::ocean::dispersion::{
    CapillaryDispersion, DeepDispersion, Dispersion, FiniteDepthDispersion,
};
use crate::ocean::filter::{Filter, NullFilter, SmoothInvertibleBandPassFilter};
use crate::ocean::grid::SpectralGrid;
use crate::ocean::params::{
    DirectionalSpreadingType, DispersionType, FilterType, Parameters, RandomType, SpectrumType,
};
use crate::ocean::random::{LogNormalRandom, NormalRandom, Random};
use crate::ocean::spectrum::{
    PiersonMoskowitzSpectrum, Spectrum, SpectrumJONSWAP, SpectrumTMA,
};
use crate::ocean::spreading::{
    DirectionalSpreading, DonelanBannerDirectionalSpreading, HasselmannDirectionalSpreading,
    MitsuyasuDirectionalSpreading, PosCosSquaredDirectionalSpreading,
};

/// Spectral amplitudes and angular frequencies of one simulation setup.
/// Built once; read-only afterwards.
pub struct InitialState<T: Real> {
    pub h_spectral_pos: SpectralField2D<Complex<T>>,
    pub h_spectral_neg: SpectralField2D<Complex<T>>,
    pub omega: SpectralField2D<T>,
}

impl<T: Real> InitialState<T> {
    pub fn new(params: &Parameters<T>) -> Result<Self, Error> {
        params.validate()?;

        let mut state = InitialState {
            h_spectral_pos: SpectralField2D::new(params.resolution_power_of_two)?,
            h_spectral_neg: SpectralField2D::new(params.resolution_power_of_two)?,
            omega: SpectralField2D::new(params.resolution_power_of_two)?,
        };

        // Kernel selection happens once, out here; the per-cell loop pays
        // one virtual call per kernel.
        let dispersion: Box<dyn Dispersion<T>> = match params.dispersion {
            DispersionType::Deep => {
                info!("deep dispersion");
                Box::new(DeepDispersion::new(params))
            }
            DispersionType::FiniteDepth => {
                info!("finite-depth dispersion");
                Box::new(FiniteDepthDispersion::new(params))
            }
            DispersionType::Capillary => {
                info!("capillary dispersion");
                Box::new(CapillaryDispersion::new(params))
            }
        };

        let spectrum: Box<dyn Spectrum<T>> = match params.spectrum {
            SpectrumType::PiersonMoskowitz => {
                info!("Pierson-Moskowitz spectrum");
                Box::new(PiersonMoskowitzSpectrum::new(params))
            }
            SpectrumType::JONSWAP => {
                info!("JONSWAP spectrum");
                Box::new(SpectrumJONSWAP::new(params))
            }
            SpectrumType::TMA => {
                info!("Texel-Marsen-Arsloe (TMA) spectrum");
                Box::new(SpectrumTMA::new(params))
            }
        };

        let spreading: Box<dyn DirectionalSpreading<T>> = match params.directional_spreading.kind
        {
            DirectionalSpreadingType::PosCosSquared => {
                info!("positive cos^2 directional spreading");
                Box::new(PosCosSquaredDirectionalSpreading::new(params))
            }
            DirectionalSpreadingType::Mitsuyasu => {
                info!("Mitsuyasu directional spreading");
                Box::new(MitsuyasuDirectionalSpreading::new(params))
            }
            DirectionalSpreadingType::Hasselmann => {
                info!("Hasselmann directional spreading");
                Box::new(HasselmannDirectionalSpreading::new(params))
            }
            DirectionalSpreadingType::DonelanBanner => {
                info!("Donelan-Banner directional spreading");
                Box::new(DonelanBannerDirectionalSpreading::new(params))
            }
        };

        let filter: Box<dyn Filter<T>> = match params.filter.kind {
            FilterType::Null => {
                info!("null filter");
                Box::new(NullFilter::new(params))
            }
            FilterType::SmoothInvertibleBandPass => {
                info!("smooth invertible band-pass filter");
                Box::new(SmoothInvertibleBandPassFilter::new(params))
            }
        };

        let random: Box<dyn Random<T>> = match params.random.kind {
            RandomType::Normal => {
                info!("normal random distribution");
                Box::new(NormalRandom::new(params))
            }
            RandomType::LogNormal => {
                info!("log-normal random distribution");
                Box::new(LogNormalRandom::new(params))
            }
        };

        build(
            params,
            dispersion.as_ref(),
            spectrum.as_ref(),
            spreading.as_ref(),
            filter.as_ref(),
            random.as_ref(),
            &mut state,
        )?;

        Ok(state)
    }

    pub fn resolution(&self) -> usize {
        self.h_spectral_pos.resolution()
    }
}

/// Entry point per the engine contract; identical to `InitialState::new`.
pub fn build_initial_state<T: Real>(params: &Parameters<T>) -> Result<InitialState<T>, Error> {
    InitialState::new(params)
}

fn build<T: Real>(
    params: &Parameters<T>,
    dispersion: &dyn Dispersion<T>,
    spectrum: &dyn Spectrum<T>,
    spreading: &dyn DirectionalSpreading<T>,
    filter: &dyn Filter<T>,
    random: &dyn Random<T>,
    state: &mut InitialState<T>,
) -> Result<(), Error> {
    let grid = SpectralGrid::new(state.h_spectral_pos.resolution(), params.domain);
    let dk = grid.dk();
    let two = T::new(2.0);

    // First offending cell wins; synthesis elsewhere continues unharmed.
    let failure: Mutex<Option<Error>> = Mutex::new(None);
    let fail = |i: usize, j: usize, quantity: &'static str| {
        let mut slot = failure.lock();
        if slot.is_none() {
            *slot = Some(Error::NumericalInstability { i, j, quantity });
        }
    };

    Zip::indexed(&mut *state.h_spectral_pos)
        .and(&mut *state.h_spectral_neg)
        .and(&mut *state.omega)
        .par_for_each(|(j, i), h_pos, h_neg, omega_out| {
            if grid.is_dc(j, i) {
                *h_pos = Complex::zero();
                *h_neg = Complex::zero();
                *omega_out = T::zero();
                return;
            }

            let k = grid.wavenumber(j, i);
            let k_mag = k.magnitude();

            // Two opposing travel directions share each wavenumber.
            let theta_pos = (-k.y).atan2(k.x);
            let theta_neg = k.y.atan2(-k.x);

            let (omega, d_omega_dk) = dispersion.evaluate(k_mag);
            if !(omega.is_finite() && d_omega_dk.is_finite()) {
                fail(i, j, "dispersion");
            }

            let energy = spectrum.evaluate(omega);
            if !energy.is_finite() {
                fail(i, j, "spectrum");
            }

            // The cell integrates energy over dki * dkj, while the spectrum
            // lives in (omega, theta) space. Changing variables through
            // (kMag, theta) multiplies by |dOmega/dk| / kMag.
            let d_theta = dk.atan2(k_mag).abs();
            let change = dk * dk * d_omega_dk / k_mag;
            let delta_s_pos = energy * spreading.evaluate(omega, theta_pos, k_mag, d_theta) * change;
            let delta_s_neg = energy * spreading.evaluate(omega, theta_neg, k_mag, d_theta) * change;
            if !(delta_s_pos.is_finite() && delta_s_neg.is_finite()) {
                fail(i, j, "directional spreading");
            }

            // The filter stays outside the square root so that it is
            // exactly invertible.
            let draws = random.draws(k);
            let filt = filter.evaluate(k_mag);
            let amp_pos = draws.amp_pos * (delta_s_pos * two).abs().sqrt() * filt;
            let amp_neg = draws.amp_neg * (delta_s_neg * two).abs().sqrt() * filt;
            if !(amp_pos.is_finite() && amp_neg.is_finite()) {
                fail(i, j, "amplitude");
            }
            if !(draws.phase_pos.is_finite() && draws.phase_neg.is_finite()) {
                fail(i, j, "phase");
            }

            *h_pos = Complex::new(draws.phase_pos.cos(), -draws.phase_pos.sin()) * amp_pos;
            *h_neg = Complex::new(draws.phase_neg.cos(), -draws.phase_neg.sin()) * amp_neg;
            *omega_out = omega;
        });

    match failure.into_inner() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
