//! Parallel reductions over spatial fields.

use rayon::prelude::*;

use crate::field::SpatialField2D;
use crate::math::Real;

#[derive(Debug, Clone, Copy)]
pub struct MinMaxSum<T> {
    pub min: T,
    pub max: T,
    pub sum: T,
}

impl<T: Real> MinMaxSum<T> {
    fn identity() -> Self {
        MinMaxSum {
            min: T::max_value(),
            max: -T::max_value(),
            sum: T::zero(),
        }
    }

    fn accumulate(mut self, value: T) -> Self {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.sum = self.sum + value;
        self
    }

    fn join(self, rhs: Self) -> Self {
        MinMaxSum {
            min: if rhs.min < self.min { rhs.min } else { self.min },
            max: if rhs.max > self.max { rhs.max } else { self.max },
            sum: self.sum + rhs.sum,
        }
    }
}

pub fn parallel_min_max_sum<T: Real>(values: &[T]) -> MinMaxSum<T> {
    values
        .par_iter()
        .fold(MinMaxSum::identity, |acc, &v| acc.accumulate(v))
        .reduce(MinMaxSum::identity, MinMaxSum::join)
}

pub fn parallel_sum<T: Real>(values: &[T]) -> T {
    values
        .par_iter()
        .fold(T::zero, |acc, &v| acc + v)
        .reduce(T::zero, |a, b| a + b)
}

pub fn parallel_mean<T: Real>(values: &[T]) -> T {
    parallel_sum(values) / T::new(values.len())
}

/// Two-pass standard deviation around a precomputed mean.
pub fn parallel_std_dev<T: Real>(mean: T, values: &[T]) -> T {
    let variance_sum = values
        .par_iter()
        .fold(T::zero, |acc, &v| acc + (v - mean).powi(2))
        .reduce(T::zero, |a, b| a + b);
    (variance_sum / T::new(values.len())).abs().sqrt()
}

/// Field statistics driving the trough-damping interpolant.
#[derive(Debug, Clone, Copy)]
pub struct Stats<T> {
    pub min_height: T,
    pub max_height: T,
    pub mean_height: T,
    pub mean_min_e: T,
    pub std_dev_min_e: T,
}

impl<T: Real> Stats<T> {
    pub fn new(height: &SpatialField2D<T>, min_e: &SpatialField2D<T>) -> Self {
        let mms = parallel_min_max_sum(height.as_slice());
        let mean_min_e = parallel_mean(min_e.as_slice());
        Stats {
            min_height: mms.min,
            max_height: mms.max,
            mean_height: mms.sum / T::new(height.len()),
            mean_min_e,
            std_dev_min_e: parallel_std_dev(mean_min_e, min_e.as_slice()),
        }
    }
}
