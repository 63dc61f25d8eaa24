//! Anisotropic 4x4 box downsampling for LOD chains.

use ndarray::parallel::prelude::*;
use ndarray::{s, Axis};

use crate::error::Error;
use crate::fft::copy_wrapped_border;
use crate::field::SpatialField2D;
use crate::math::Real;
use crate::ocean::propagation::PropagatedState;

const CENTER_4X4: f64 = 0.185622;
const EDGE_4X4: f64 = 0.029797;
const CORNER_4X4: f64 = 0.004783;

/// Halve the resolution of `src` into `dst` with the 4x4 kernel, then
/// refresh the wrap border. Row taps are (corner, edge, edge, corner) for
/// the outer source rows and (edge, center, center, edge) for the inner
/// pair.
pub fn downsample<T: Real>(
    src: &SpatialField2D<T>,
    dst: &mut SpatialField2D<T>,
) -> Result<(), Error> {
    let src_n = src.unpadded_width();
    let dst_n = dst.unpadded_width();
    if src_n != 2 * dst_n || src.unpadded_height() != 2 * dst.unpadded_height() {
        return Err(Error::InvalidShape {
            width: dst.width(),
            height: dst.height(),
        });
    }

    let edge_taps = [
        T::new(CORNER_4X4),
        T::new(EDGE_4X4),
        T::new(EDGE_4X4),
        T::new(CORNER_4X4),
    ];
    let center_taps = [
        T::new(EDGE_4X4),
        T::new(CENTER_4X4),
        T::new(CENTER_4X4),
        T::new(EDGE_4X4),
    ];
    let row_taps = [&edge_taps, &center_taps, &center_taps, &edge_taps];

    let mut region = dst.slice_mut(s![..dst_n, ..dst_n]);
    region
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(j, mut dst_row)| {
            let src_j = 2 * j as isize;
            for (x, value) in dst_row.iter_mut().enumerate() {
                let src_x = 2 * x as isize;
                let mut sum = T::zero();
                for (dy, taps) in row_taps.iter().enumerate() {
                    let y = src_j - 1 + dy as isize;
                    for (dx, &tap) in taps.iter().enumerate() {
                        sum = sum + tap * src.at_unpadded(src_x - 1 + dx as isize, y);
                    }
                }
                *value = sum;
            }
        });

    copy_wrapped_border(dst);
    Ok(())
}

/// Downsample all four fields of a propagated state.
pub fn downsample_state<T: Real>(
    src: &PropagatedState<T>,
    dst: &mut PropagatedState<T>,
) -> Result<(), Error> {
    downsample(&src.height, &mut dst.height)?;
    downsample(&src.dx, &mut dst.dx)?;
    downsample(&src.dy, &mut dst.dy)?;
    downsample(&src.min_e, &mut dst.min_e)?;
    Ok(())
}
