//! Synthesis and propagation of empirical directional ocean wave spectra.
//!
//! Reference:
//!     [Horvath15] Christopher J. Horvath, 2015,
//!                 Empirical directional wave spectra for computer graphics,
//!                 In Proceedings of the 2015 Symposium on Digital Production
//!                 (DigiPro '15), ACM, New York, NY, USA, 29-39.
//!
//! The spectral formulation follows the Tessendorf FFT ocean construction:
//! wave amplitudes are drawn once per wavenumber from an empirical
//! directional spectrum, advanced in time by the dispersion relation, and
//! inverse-transformed to spatial height, horizontal displacement and
//! crest-indicator fields.

pub mod error;
pub mod fft;
pub mod field;
pub mod math;
pub mod ocean;

pub use error::Error;
pub use field::{SpatialField2D, SpectralField2D};
pub use ocean::initial::{build_initial_state, InitialState};
pub use ocean::mip::{downsample, downsample_state};
pub use ocean::normals::compute_normals;
pub use ocean::params::Parameters;
pub use ocean::propagation::{PropagatedState, Propagation};
pub use ocean::stats::Stats;
