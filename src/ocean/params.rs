use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::math::Real;

/// Integer-tag round trips for the kernel enums. Hosts drive kernel choice
/// with small integers; the conversions must preserve identity both ways.
macro_rules! enum_tags {
    ($name:ident { $($variant:ident = $tag:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)+
        }

        impl From<$name> for i32 {
            fn from(v: $name) -> i32 {
                match v {
                    $($name::$variant => $tag,)+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = Error;
            fn try_from(tag: i32) -> Result<Self, Error> {
                match tag {
                    $($tag => Ok($name::$variant),)+
                    other => Err(Error::InvalidParameters(format!(
                        "unknown {} tag: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

enum_tags!(DispersionType {
    Deep = 0,
    FiniteDepth = 1,
    Capillary = 2,
});

enum_tags!(SpectrumType {
    PiersonMoskowitz = 0,
    JONSWAP = 1,
    TMA = 2,
});

enum_tags!(DirectionalSpreadingType {
    PosCosSquared = 0,
    Mitsuyasu = 1,
    Hasselmann = 2,
    DonelanBanner = 3,
});

enum_tags!(FilterType {
    Null = 0,
    SmoothInvertibleBandPass = 1,
});

enum_tags!(RandomType {
    Normal = 0,
    LogNormal = 1,
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DirectionalSpreadingParams<T> {
    pub kind: DirectionalSpreadingType,
    /// Mix between a wind-driven local sea and swell from a distant storm,
    /// in `[-1, 2]`.
    pub swell: T,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterParams<T> {
    pub kind: FilterType,
    pub soft_width: T,
    pub small_wavelength: T,
    pub big_wavelength: T,
    pub min: T,
    pub invert: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RandomParams {
    pub kind: RandomType,
    pub seed: u32,
}

/// Immutable inputs of one simulation. Units are meters, seconds and
/// kilograms throughout, except `fetch`, which is in kilometers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters<T> {
    pub resolution_power_of_two: u32,

    /// World-space size of the periodic tile, in meters.
    pub domain: T,

    pub gravity: T,         // m/s^2
    pub surface_tension: T, // N/m
    pub density: T,         // kg/m^3
    pub depth: T,           // m

    /// Wind is assumed to blow along +X; the fields can be rotated
    /// externally.
    pub wind_speed: T, // m/s
    pub fetch: T, // KILOMETERS

    /// Lateral displacement gain.
    pub pinch: T,
    /// Vertical displacement gain.
    pub amplitude_gain: T,

    pub trough_damping: T,
    pub trough_damping_small_wavelength: T,
    pub trough_damping_big_wavelength: T,
    pub trough_damping_soft_width: T,

    pub dispersion: DispersionType,
    pub spectrum: SpectrumType,
    pub directional_spreading: DirectionalSpreadingParams<T>,
    pub filter: FilterParams<T>,
    pub random: RandomParams,
}

impl<T: Real> Default for Parameters<T> {
    fn default() -> Self {
        Parameters {
            resolution_power_of_two: 9,
            domain: T::new(100.0),
            gravity: T::new(9.81),
            surface_tension: T::new(0.074),
            density: T::new(1000.0),
            depth: T::new(100.0),
            wind_speed: T::new(17.0),
            fetch: T::new(300.0),
            pinch: T::new(0.75),
            amplitude_gain: T::one(),
            trough_damping: T::zero(),
            trough_damping_small_wavelength: T::one(),
            trough_damping_big_wavelength: T::new(4.0),
            trough_damping_soft_width: T::new(2.0),
            dispersion: DispersionType::Capillary,
            spectrum: SpectrumType::TMA,
            directional_spreading: DirectionalSpreadingParams {
                kind: DirectionalSpreadingType::Hasselmann,
                swell: T::zero(),
            },
            filter: FilterParams {
                kind: FilterType::Null,
                soft_width: T::zero(),
                small_wavelength: T::zero(),
                big_wavelength: T::new(1.0e6),
                min: T::zero(),
                invert: false,
            },
            random: RandomParams {
                kind: RandomType::Normal,
                seed: 54321,
            },
        }
    }
}

impl<T: Real> Parameters<T> {
    pub fn resolution(&self) -> usize {
        1 << self.resolution_power_of_two
    }

    /// Reject finite-but-out-of-range inputs before any field or plan is
    /// built. Non-finite intermediates that slip past these checks are
    /// caught per cell during initial-state synthesis.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |what: &str| Err(Error::InvalidParameters(what.to_string()));

        if self.resolution_power_of_two < 1 || self.resolution_power_of_two > 30 {
            return invalid("resolution_power_of_two must be in [1, 30]");
        }

        let finite: [(&str, T); 13] = [
            ("domain", self.domain),
            ("gravity", self.gravity),
            ("surface_tension", self.surface_tension),
            ("density", self.density),
            ("depth", self.depth),
            ("wind_speed", self.wind_speed),
            ("fetch", self.fetch),
            ("pinch", self.pinch),
            ("amplitude_gain", self.amplitude_gain),
            ("trough_damping", self.trough_damping),
            (
                "trough_damping_small_wavelength",
                self.trough_damping_small_wavelength,
            ),
            (
                "trough_damping_big_wavelength",
                self.trough_damping_big_wavelength,
            ),
            ("trough_damping_soft_width", self.trough_damping_soft_width),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidParameters(format!("{} is not finite", name)));
            }
        }
        for (name, value) in [
            ("directional_spreading.swell", self.directional_spreading.swell),
            ("filter.soft_width", self.filter.soft_width),
            ("filter.small_wavelength", self.filter.small_wavelength),
            ("filter.big_wavelength", self.filter.big_wavelength),
            ("filter.min", self.filter.min),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidParameters(format!("{} is not finite", name)));
            }
        }

        if self.domain <= T::zero() {
            return invalid("domain must be positive");
        }
        if self.gravity <= T::zero() {
            return invalid("gravity must be positive");
        }
        if self.density <= T::zero() {
            return invalid("density must be positive");
        }
        if self.depth <= T::zero() {
            return invalid("depth must be positive");
        }
        if self.surface_tension < T::zero() {
            return invalid("surface_tension must not be negative");
        }
        if self.wind_speed < T::zero() {
            return invalid("wind_speed must not be negative");
        }
        if self.fetch <= T::zero() {
            return invalid("fetch must be positive");
        }
        if self.directional_spreading.swell < T::new(-1.0)
            || self.directional_spreading.swell > T::new(2.0)
        {
            return invalid("directional_spreading.swell must be in [-1, 2]");
        }
        if self.trough_damping < T::zero() || self.trough_damping > T::one() {
            return invalid("trough_damping must be in [0, 1]");
        }
        if self.filter.min < T::zero() || self.filter.min > T::one() {
            return invalid("filter.min must be in [0, 1]");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference() {
        let p = Parameters::<f64>::default();
        assert_eq!(p.resolution(), 512);
        assert_eq!(p.domain, 100.0);
        assert_eq!(p.wind_speed, 17.0);
        assert_eq!(p.fetch, 300.0);
        assert_eq!(p.pinch, 0.75);
        assert_eq!(p.dispersion, DispersionType::Capillary);
        assert_eq!(p.spectrum, SpectrumType::TMA);
        assert_eq!(
            p.directional_spreading.kind,
            DirectionalSpreadingType::Hasselmann
        );
        assert_eq!(p.filter.kind, FilterType::Null);
        assert_eq!(p.random.kind, RandomType::Normal);
        assert_eq!(p.random.seed, 54321);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn enum_tags_round_trip() {
        for tag in 0..3 {
            assert_eq!(i32::from(DispersionType::try_from(tag).unwrap()), tag);
            assert_eq!(i32::from(SpectrumType::try_from(tag).unwrap()), tag);
        }
        for tag in 0..4 {
            assert_eq!(
                i32::from(DirectionalSpreadingType::try_from(tag).unwrap()),
                tag
            );
        }
        for tag in 0..2 {
            assert_eq!(i32::from(FilterType::try_from(tag).unwrap()), tag);
            assert_eq!(i32::from(RandomType::try_from(tag).unwrap()), tag);
        }
        assert!(DispersionType::try_from(3).is_err());
        assert!(SpectrumType::try_from(-1).is_err());
        assert!(DirectionalSpreadingType::try_from(4).is_err());
    }

    #[test]
    fn validation_rejects_out_of_range() {
        let mut p = Parameters::<f64>::default();
        p.resolution_power_of_two = 31;
        assert!(matches!(p.validate(), Err(Error::InvalidParameters(_))));

        let mut p = Parameters::<f64>::default();
        p.wind_speed = -1.0;
        assert!(p.validate().is_err());

        let mut p = Parameters::<f64>::default();
        p.domain = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = Parameters::<f64>::default();
        p.trough_damping = 1.5;
        assert!(p.validate().is_err());

        let mut p = Parameters::<f64>::default();
        p.directional_spreading.swell = -2.0;
        assert!(p.validate().is_err());
    }
}
