//! Dispersion relations: angular frequency and its wavenumber derivative.
//!
//! Each relation reduces to the previous one in its limit: capillary turns
//! into finite-depth for long waves, finite-depth turns into deep for deep
//! water, so the capillary form is a safe default.

use crate::math::Real;
use crate::ocean::params::Parameters;

/// omega(k) and d omega / dk for a wavenumber magnitude `k >= 0`.
pub trait Dispersion<T: Real>: Sync {
    fn evaluate(&self, k: T) -> (T, T);
}

/// omega^2 = g k
pub struct DeepDispersion<T> {
    gravity: T,
}

impl<T: Real> DeepDispersion<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        DeepDispersion {
            gravity: params.gravity,
        }
    }
}

impl<T: Real> Dispersion<T> for DeepDispersion<T> {
    fn evaluate(&self, k: T) -> (T, T) {
        if k == T::zero() {
            return (T::zero(), T::zero());
        }
        let omega = (self.gravity * k).abs().sqrt();
        (omega, self.gravity / (T::new(2.0) * omega))
    }
}

/// omega^2 = g k tanh(k h)
pub struct FiniteDepthDispersion<T> {
    gravity: T,
    depth: T,
}

impl<T: Real> FiniteDepthDispersion<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        FiniteDepthDispersion {
            gravity: params.gravity,
            depth: params.depth,
        }
    }
}

impl<T: Real> Dispersion<T> for FiniteDepthDispersion<T> {
    fn evaluate(&self, k: T) -> (T, T) {
        if k == T::zero() {
            return (T::zero(), T::zero());
        }
        let sech = |x: T| T::one() / x.cosh();
        let hk = k * self.depth;
        let omega = (self.gravity * k * hk.tanh()).abs().sqrt();
        let d_omega_dk =
            self.gravity * (hk.tanh() + hk * sech(hk).powi(2)) / (T::new(2.0) * omega);
        (omega, d_omega_dk)
    }
}

/// omega^2 = (g k + (sigma/rho) k^3) tanh(k h)
pub struct CapillaryDispersion<T> {
    gravity: T,
    depth: T,
    sigma_over_rho: T,
}

impl<T: Real> CapillaryDispersion<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        CapillaryDispersion {
            gravity: params.gravity,
            depth: params.depth,
            sigma_over_rho: params.surface_tension / params.density,
        }
    }
}

impl<T: Real> Dispersion<T> for CapillaryDispersion<T> {
    fn evaluate(&self, k: T) -> (T, T) {
        if k == T::zero() {
            return (T::zero(), T::zero());
        }
        let sech = |x: T| T::one() / x.cosh();
        let hk = k * self.depth;
        let k2s = k.powi(2) * self.sigma_over_rho;
        let gpk2s = self.gravity + k2s;

        let omega = (k * gpk2s * hk.tanh()).abs().sqrt();
        let numer = (gpk2s + k2s + k2s) * hk.tanh() + hk * gpk2s * sech(hk).powi(2);
        (omega, numer.abs() / (T::new(2.0) * omega))
    }
}
