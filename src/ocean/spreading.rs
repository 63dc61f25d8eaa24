//! Directional spreading: the share of energy at angular frequency omega
//! travelling at angle theta from the wind.
//!
//! [Horvath15] Section 5.2. The swell control elongates the spreading along
//! the wind axis for positive values and relaxes toward an omni-directional
//! sea for negative values.

use crate::math::{clamp, mix, pi, pi_2, tau, trapezoidal_quadrature, Real};
use crate::ocean::params::Parameters;

pub trait DirectionalSpreading<T: Real>: Sync {
    /// `d_theta` is the angular width of the queried cell; present for
    /// kernels that want band-limited evaluation.
    fn evaluate(&self, omega: T, theta: T, k_mag: T, d_theta: T) -> T;
}

/// Modal angular frequency of the JONSWAP spectrum. All spreading kernels
/// use this peak, whatever omni-directional spectrum is selected.
pub fn modal_angular_frequency_jonswap<T: Real>(gravity: T, wind_speed: T, fetch_km: T) -> T {
    let fetch_m = fetch_km * T::new(1000.0);
    let dimensionless_fetch = gravity * fetch_m / wind_speed.powi(2);
    tau::<T>() * T::new(3.5) * (gravity / wind_speed) * dimensionless_fetch.powf(T::new(-0.33))
}

fn sech<T: Real>(x: T) -> T {
    T::one() / x.cosh()
}

fn tgamma<T: Real>(x: T) -> T {
    T::new(libm::tgamma(x.to_f64().unwrap_or(f64::NAN)))
}

/// Shape exponent of the swell elongation window.
fn swell_shape<T: Real>(omega: T, modal_omega: T, swell: T) -> T {
    T::new(16.1) * (modal_omega / omega).tanh() * swell.powi(2)
}

/// The window itself: |cos(theta/2)| ^ (2 shape).
fn swell_window<T: Real>(theta: T, omega: T, modal_omega: T, swell: T) -> T {
    let shape = swell_shape(omega, modal_omega, swell);
    (theta / T::new(2.0)).cos().abs().powf(T::new(2.0) * shape)
}

/// Product of the native shape with the swell window, renormalized by
/// 36-step trapezoidal quadrature over [-pi/2, pi/2].
fn normalized_swell_product<T, A, B>(theta: T, a: A, b: B) -> T
where
    T: Real,
    A: Fn(T) -> T,
    B: Fn(T) -> T,
{
    let product = |x: T| a(x) * b(x);
    let denom = trapezoidal_quadrature((-pi_2::<T>(), pi_2::<T>()), 36, &product);
    product(theta) / denom
}

/// cos^2(theta) on [-pi/2, pi/2], zero elsewhere.
pub struct PosCosSquaredDirectionalSpreading<T> {
    modal_angular_frequency: T,
    swell: T,
}

impl<T: Real> PosCosSquaredDirectionalSpreading<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        PosCosSquaredDirectionalSpreading {
            modal_angular_frequency: modal_angular_frequency_jonswap(
                params.gravity,
                params.wind_speed,
                params.fetch,
            ),
            swell: params.directional_spreading.swell,
        }
    }
}

impl<T: Real> DirectionalSpreading<T> for PosCosSquaredDirectionalSpreading<T> {
    fn evaluate(&self, omega: T, theta: T, _k_mag: T, _d_theta: T) -> T {
        let b = |x: T| {
            if x < -pi_2::<T>() || x > pi_2::<T>() {
                T::zero()
            } else {
                x.cos().powi(2)
            }
        };

        if self.swell >= T::zero() {
            let a = |x: T| swell_window(x, omega, self.modal_angular_frequency, self.swell);
            normalized_swell_product(theta, a, b)
        } else {
            let d = normalized_swell_product(theta, |_| T::one(), b);
            mix(d, T::one() / tau::<T>(), clamp(-self.swell, T::zero(), T::one()))
        }
    }
}

/// Gamma-normalized |cos(theta/2)|^(2s) with the Mitsuyasu shape exponent.
pub struct MitsuyasuDirectionalSpreading<T> {
    modal_angular_frequency: T,
    modal_shape: T,
    swell: T,
}

impl<T: Real> MitsuyasuDirectionalSpreading<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        let modal_angular_frequency =
            modal_angular_frequency_jonswap(params.gravity, params.wind_speed, params.fetch);
        MitsuyasuDirectionalSpreading {
            modal_angular_frequency,
            modal_shape: T::new(11.5)
                * (modal_angular_frequency * params.wind_speed / params.gravity)
                    .powf(T::new(-2.5)),
            swell: params.directional_spreading.swell,
        }
    }
}

/// The Longuet-Higgins normalization shared by the Mitsuyasu and
/// Hasselmann forms: D = A_s |cos(theta/2)|^(2s) with
/// A_s = 2^(2s-1) Gamma(s+1)^2 / (pi Gamma(2s+1)).
fn cos_half_power_spreading<T: Real>(shape: T, theta: T, swell: T) -> T {
    let two = T::new(2.0);
    let factor_a = two.powf(two * shape - T::one()) / pi::<T>();
    let factor_b = tgamma(shape + T::one()).powi(2) / tgamma(two * shape + T::one());
    let factor_c = (theta / two).cos().abs().powf(two * shape);
    let d = factor_a * factor_b * factor_c;
    if swell < T::zero() {
        mix(d, T::one() / tau::<T>(), clamp(-swell, T::zero(), T::one()))
    } else {
        d
    }
}

impl<T: Real> DirectionalSpreading<T> for MitsuyasuDirectionalSpreading<T> {
    fn evaluate(&self, omega: T, theta: T, _k_mag: T, _d_theta: T) -> T {
        let shape_bias = if self.swell >= T::zero() {
            swell_shape(omega, self.modal_angular_frequency, self.swell)
        } else {
            T::zero()
        };

        let shape_exp = if omega <= self.modal_angular_frequency {
            T::new(5.0)
        } else {
            T::new(-2.5)
        };
        let shape = self.modal_shape * (omega / self.modal_angular_frequency).powf(shape_exp)
            + shape_bias;

        cos_half_power_spreading(shape, theta, self.swell)
    }
}

/// Same family as Mitsuyasu with the shape exponents refit against the
/// JONSWAP measurements.
pub struct HasselmannDirectionalSpreading<T> {
    modal_angular_frequency: T,
    wind_speed_over_celerity: T,
    swell: T,
}

impl<T: Real> HasselmannDirectionalSpreading<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        let modal_angular_frequency =
            modal_angular_frequency_jonswap(params.gravity, params.wind_speed, params.fetch);
        let modal_celerity = params.gravity / modal_angular_frequency;
        HasselmannDirectionalSpreading {
            modal_angular_frequency,
            wind_speed_over_celerity: params.wind_speed / modal_celerity,
            swell: params.directional_spreading.swell,
        }
    }
}

impl<T: Real> DirectionalSpreading<T> for HasselmannDirectionalSpreading<T> {
    fn evaluate(&self, omega: T, theta: T, _k_mag: T, _d_theta: T) -> T {
        let shape_bias = if self.swell >= T::zero() {
            swell_shape(omega, self.modal_angular_frequency, self.swell)
        } else {
            T::zero()
        };

        let ratio = omega / self.modal_angular_frequency;
        let shape = if omega > self.modal_angular_frequency {
            T::new(9.77)
                * ratio.powf(
                    T::new(-2.33)
                        - T::new(1.45) * (self.wind_speed_over_celerity - T::new(1.17)),
                )
        } else {
            T::new(6.97) * ratio.powf(T::new(4.06))
        } + shape_bias;

        cos_half_power_spreading(shape, theta, self.swell)
    }
}

/// sech^2(beta_s theta) with the piecewise Donelan-Banner width
/// ([Horvath15] Eq. 38).
pub struct DonelanBannerDirectionalSpreading<T> {
    modal_angular_frequency: T,
    swell: T,
}

impl<T: Real> DonelanBannerDirectionalSpreading<T> {
    pub fn new(params: &Parameters<T>) -> Self {
        DonelanBannerDirectionalSpreading {
            modal_angular_frequency: modal_angular_frequency_jonswap(
                params.gravity,
                params.wind_speed,
                params.fetch,
            ),
            swell: params.directional_spreading.swell,
        }
    }
}

impl<T: Real> DirectionalSpreading<T> for DonelanBannerDirectionalSpreading<T> {
    fn evaluate(&self, omega: T, theta: T, _k_mag: T, _d_theta: T) -> T {
        let ratio = omega / self.modal_angular_frequency;
        let beta_s = if ratio < T::new(0.95) {
            T::new(2.61) * ratio.powf(T::new(1.3))
        } else if ratio < T::new(1.6) {
            T::new(2.28) * ratio.powf(T::new(-1.3))
        } else {
            let expo = T::new(-0.4)
                + T::new(0.8393) * (T::new(-0.567) * ratio.powi(2).ln()).exp();
            T::new(10.0).powf(expo)
        };

        let b = |x: T| sech(beta_s * x).powi(2);

        if self.swell > T::zero() {
            let a = |x: T| swell_window(x, omega, self.modal_angular_frequency, self.swell);
            normalized_swell_product(theta, a, b)
        } else {
            let integral =
                ((beta_s * pi::<T>()).tanh() - (-beta_s * pi::<T>()).tanh()) / beta_s;
            let d = b(theta) / integral;
            if self.swell < T::zero() {
                mix(d, T::one() / tau::<T>(), clamp(-self.swell, T::zero(), T::one()))
            } else {
                d
            }
        }
    }
}
