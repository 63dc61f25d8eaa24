use thiserror::Error;

/// Failures surfaced by field construction, initial-state synthesis and
/// transform planning. Per-cell propagation code never raises; it relies on
/// the checks performed while the initial state is built.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid field shape: {width} x {height}")]
    InvalidShape { width: usize, height: usize },

    #[error("numerical instability: non-finite {quantity} at cell ({i}, {j})")]
    NumericalInstability {
        i: usize,
        j: usize,
        quantity: &'static str,
    },

    #[error("fft failure for {width} x {height}: {reason}")]
    FftFailure {
        width: usize,
        height: usize,
        reason: String,
    },
}
