use super::Real;

/// Trapezoidal quadrature of `func` over the closed interval, with the
/// endpoints half-weighted.
pub fn trapezoidal_quadrature<F, T>(interval: (T, T), substeps: usize, func: F) -> T
where
    F: Fn(T) -> T,
    T: Real,
{
    let (a, b) = interval;
    let n = T::new(substeps);
    let h = (b - a) / n;

    let interior = (1..substeps).fold(T::zero(), |sum, k| sum + func(a + T::new(k) * h));

    h * ((func(a) + func(b)) / T::new(2.0) + interior)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrates_cosine() {
        // int_0^{pi/2} cos = 1
        let integral = trapezoidal_quadrature((0.0, std::f64::consts::FRAC_PI_2), 128, f64::cos);
        assert!((integral - 1.0).abs() < 1.0e-4, "{}", integral);
    }

    #[test]
    fn integrates_constant_exactly() {
        let integral = trapezoidal_quadrature((-2.0f64, 3.0), 7, |_| 4.0);
        assert!((integral - 20.0).abs() < 1.0e-12);
    }
}
