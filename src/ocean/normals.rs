//! Central-difference surface normals over the displaced grid.

use cgmath::{InnerSpace, Vector3};
use rayon::prelude::*;

use crate::error::Error;
use crate::math::{wrap, Real};
use crate::ocean::params::Parameters;
use crate::ocean::propagation::PropagatedState;

struct DisplacedSurface<'a, T> {
    height: &'a [T],
    dx: &'a [T],
    dy: &'a [T],
    n: usize,
    spacing: T,
    amp_gain: T,
    pinch: T,
}

impl<'a, T: Real> DisplacedSurface<'a, T> {
    fn index(&self, x: usize, y: usize) -> usize {
        y * (self.n + 1) + x
    }

    /// Displaced position of a neighbor, expressed relative to the center
    /// vertex in grid steps.
    fn point(&self, x_offset: T, y_offset: T, index: usize) -> Vector3<T> {
        Vector3::new(
            x_offset * self.spacing - self.pinch * self.dx[index],
            y_offset * self.spacing - self.pinch * self.dy[index],
            self.amp_gain * self.height[index],
        )
    }

    fn normal(&self, x: isize, y: isize) -> Vector3<T> {
        let left = self.index(wrap(x - 1, self.n), wrap(y, self.n));
        let right = self.index(wrap(x + 1, self.n), wrap(y, self.n));
        let down = self.index(wrap(x, self.n), wrap(y - 1, self.n));
        let up = self.index(wrap(x, self.n), wrap(y + 1, self.n));

        let d_p_du = self.point(T::one(), T::zero(), right) - self.point(-T::one(), T::zero(), left);
        let d_p_dv = self.point(T::zero(), T::one(), up) - self.point(T::zero(), -T::one(), down);

        d_p_du.cross(d_p_dv).normalize()
    }
}

/// Normals of the pinched surface at every vertex of the `(N+1) x (N+1)`
/// lattice. All neighbor lookups wrap periodically.
pub fn compute_normals<T: Real>(
    params: &Parameters<T>,
    waves: &PropagatedState<T>,
    normals: &mut [Vector3<T>],
) -> Result<(), Error> {
    let n = waves.height.unpadded_width();
    let vertices = (n + 1) * (n + 1);
    if normals.len() != vertices {
        return Err(Error::InvalidShape {
            width: normals.len(),
            height: vertices,
        });
    }

    let surface = DisplacedSurface {
        height: waves.height.as_slice(),
        dx: waves.dx.as_slice(),
        dy: waves.dy.as_slice(),
        n,
        spacing: params.domain / T::new(n),
        amp_gain: params.amplitude_gain,
        pinch: params.pinch,
    };

    normals
        .par_chunks_mut(n + 1)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, normal) in row.iter_mut().enumerate() {
                *normal = surface.normal(x as isize, y as isize);
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tau;

    fn flat_state(power: u32) -> PropagatedState<f64> {
        PropagatedState::with_resolution_power(power).unwrap()
    }

    #[test]
    fn flat_surface_points_up() {
        let p = {
            let mut p = Parameters::<f64>::default();
            p.resolution_power_of_two = 4;
            p
        };
        let waves = flat_state(4);
        let mut normals = vec![Vector3::new(0.0, 0.0, 0.0); 17 * 17];
        compute_normals(&p, &waves, &mut normals).unwrap();
        for normal in &normals {
            assert_eq!(normal.x, 0.0);
            assert_eq!(normal.y, 0.0);
            assert!((normal.z - 1.0).abs() < 1.0e-12);
        }
    }

    #[test]
    fn sinusoid_tilts_against_the_slope() {
        let mut p = Parameters::<f64>::default();
        p.resolution_power_of_two = 5;
        p.domain = 64.0;
        p.pinch = 0.0;
        p.amplitude_gain = 1.0;

        let n: usize = 32;
        let mut waves = flat_state(5);
        for y in 0..=n {
            for x in 0..=n {
                waves.height[(y, x)] = (tau::<f64>() * x as f64 / n as f64).sin();
            }
        }

        let mut normals = vec![Vector3::new(0.0, 0.0, 0.0); (n + 1) * (n + 1)];
        compute_normals(&p, &waves, &mut normals).unwrap();

        for y in 0..=n {
            for x in 0..=n {
                let normal = normals[y * (n + 1) + x];
                assert!((normal.magnitude() - 1.0).abs() < 1.0e-9);
                assert!(normal.z > 0.0);
                // Upward slope leans the normal backward along x.
                let slope = (tau::<f64>() * x as f64 / n as f64).cos();
                if slope.abs() > 1.0e-9 {
                    assert!(
                        (normal.x * slope) < 0.0,
                        "({}, {}): normal.x {} against slope {}",
                        x,
                        y,
                        normal.x,
                        slope
                    );
                }
                assert!(normal.y.abs() < 1.0e-9);
            }
        }
    }

    #[test]
    fn border_vertices_repeat_the_first_row_and_column() {
        let mut p = Parameters::<f64>::default();
        p.resolution_power_of_two = 4;
        let n: usize = 16;

        let mut waves = flat_state(4);
        for y in 0..=n {
            for x in 0..=n {
                waves.height[(y, x)] = (tau::<f64>() * (x % n) as f64 / n as f64).sin()
                    * (tau::<f64>() * (y % n) as f64 / n as f64).cos();
            }
        }

        let mut normals = vec![Vector3::new(0.0, 0.0, 0.0); (n + 1) * (n + 1)];
        compute_normals(&p, &waves, &mut normals).unwrap();

        for i in 0..=n {
            assert_eq!(normals[i * (n + 1) + n], normals[i * (n + 1)]);
            assert_eq!(normals[n * (n + 1) + i], normals[i]);
        }
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        let p = Parameters::<f64>::default();
        let waves = flat_state(4);
        let mut normals = vec![Vector3::new(0.0, 0.0, 0.0); 16 * 16];
        assert!(matches!(
            compute_normals(&p, &waves, &mut normals),
            Err(Error::InvalidShape { .. })
        ));
    }
}
