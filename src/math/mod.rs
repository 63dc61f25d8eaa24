use cgmath::BaseFloat;
use num_traits::NumCast;
use rustfft::FftNum;

pub mod integration;

pub use self::integration::trapezoidal_quadrature;

/// Scalar type of every field and kernel. The `FftNum` bound keeps any
/// `Real` acceptable to the transform planner.
pub trait Real: BaseFloat + FftNum + 'static + Send + Sync {
    fn new<U: NumCast>(other: U) -> Self {
        NumCast::from(other).unwrap()
    }
}

impl<T> Real for T where T: BaseFloat + FftNum + 'static + Send + Sync {}

/// Wave arithmetic reads better with tau (2 pi) than with pi.
pub fn tau<T: Real>() -> T {
    T::new(std::f64::consts::TAU)
}

pub fn pi<T: Real>() -> T {
    T::new(std::f64::consts::PI)
}

pub fn pi_2<T: Real>() -> T {
    T::new(std::f64::consts::FRAC_PI_2)
}

/// k = tau / lambda
pub fn wavenumber_from_wavelength<T: Real>(lambda: T) -> T {
    tau::<T>() / lambda
}

/// lambda = tau / k
pub fn wavelength_from_wavenumber<T: Real>(k: T) -> T {
    tau::<T>() / k
}

/// Periodic wrap of a signed index into `[0, n)`.
pub fn wrap(x: isize, n: usize) -> usize {
    x.rem_euclid(n as isize) as usize
}

pub fn clamp<T: Real>(x: T, lo: T, hi: T) -> T {
    num_traits::clamp(x, lo, hi)
}

/// Hermite step, clamped to [0, 1] outside the edge interval.
pub fn smoothstep<T: Real>(edge0: T, edge1: T, x: T) -> T {
    let t = clamp((x - edge0) / (edge1 - edge0), T::zero(), T::one());
    t * t * (T::new(3.0) - T::new(2.0) * t)
}

pub fn mix<T: Real>(a: T, b: T, t: T) -> T {
    a * (T::one() - t) + b * t
}
