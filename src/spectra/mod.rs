//! Solar absorption-line depth model
//!
//! Sunlight scattered by the lunar exosphere is measured inside the solar
//! Na D and K absorption lines. How much of the line core is filled depends
//! on the Doppler shift between the Sun and the scattering atoms, so the
//! fractional line depth is tabulated against the Sun-Moon radial velocity.
//! Lookups interpolate linearly between the tabulated breakpoints and never
//! extrapolate past the fitted range.

use std::str::FromStr;

use crate::constants::SOLAR_REDSHIFT;
use crate::{Result, SelenofieldError};

/// Na D line depth, (velocity km/s, depth)
const SODIUM_BREAKPOINTS: &[(f64, f64)] = &[
    (-4.69523302, 0.1653),
    (-4.33894020, 0.1445),
    (-3.97755748, 0.1225),
    (-3.61617477, 0.1062),
    (-3.25988195, 0.0918),
    (-2.89849923, 0.0799),
    (-2.53711652, 0.0710),
    (-2.18082370, 0.0643),
    (-1.81944098, 0.0586),
    (-1.45805827, 0.0544),
    (-1.10176545, 0.0517),
    (-0.74038273, 0.0502),
    (-0.37900002, 0.0505),
    (-0.02270720, 0.0506),
    (0.33867552, 0.0500),
    (0.70005823, 0.0504),
    (1.05635105, 0.0517),
    (1.41773377, 0.0547),
    (1.77911648, 0.0595),
    (2.13540930, 0.0640),
    (2.49679202, 0.0697),
    (2.85817473, 0.0786),
    (3.21955745, 0.0887),
    (3.57585027, 0.1053),
    (3.93723298, 0.1214),
    (4.29861570, 0.1410),
    (4.65490852, 0.1641),
];

/// K line depth, (velocity km/s, depth)
const POTASSIUM_BREAKPOINTS: &[(f64, f64)] = &[
    (-4.97679434, 0.7927),
    (-4.61855258, 0.7499),
    (-4.26031083, 0.7090),
    (-3.89817515, 0.6515),
    (-3.53993339, 0.5963),
    (-3.17779771, 0.5385),
    (-2.81955595, 0.4794),
    (-2.46131420, 0.4203),
    (-2.09917851, 0.3639),
    (-1.74093676, 0.3120),
    (-1.37880108, 0.2694),
    (-1.02055932, 0.2380),
    (-0.66231757, 0.2143),
    (-0.30018188, 0.1989),
    (0.05805987, 0.1933),
    (0.41630162, 0.1978),
    (0.77843731, 0.2115),
    (1.13667906, 0.2357),
    (1.49881475, 0.2705),
    (1.85705650, 0.3138),
    (2.21529826, 0.3721),
    (2.57743394, 0.4350),
    (2.93567569, 0.4980),
    (3.29781138, 0.5631),
    (3.65605313, 0.6253),
    (4.01429489, 0.6806),
    (4.37643057, 0.7303),
    (4.73467233, 0.7737),
];

/// The absorption lines with tabulated depth curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectralLine {
    /// Sodium D line
    Sodium,
    /// Potassium line
    Potassium,
}

impl SpectralLine {
    /// Chemical symbol of the line
    pub fn symbol(&self) -> &'static str {
        match self {
            SpectralLine::Sodium => "Na",
            SpectralLine::Potassium => "K",
        }
    }
}

impl FromStr for SpectralLine {
    type Err = SelenofieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "na" | "na d" | "nad" | "sodium" => Ok(SpectralLine::Sodium),
            "k" | "potassium" => Ok(SpectralLine::Potassium),
            _ => Err(SelenofieldError::UnknownSpectralLine(s.to_string())),
        }
    }
}

/// Ascending (velocity, depth) breakpoints of one line
#[derive(Debug, Clone, Copy)]
pub struct SpectralCurve {
    breakpoints: &'static [(f64, f64)],
}

impl SpectralCurve {
    /// Lowest tabulated velocity
    pub fn min_velocity(&self) -> f64 {
        self.breakpoints[0].0
    }

    /// Highest tabulated velocity
    pub fn max_velocity(&self) -> f64 {
        self.breakpoints[self.breakpoints.len() - 1].0
    }

    /// The tabulated breakpoints
    pub fn breakpoints(&self) -> &'static [(f64, f64)] {
        self.breakpoints
    }

    /// Depth at a tabulated-frame velocity (already redshift corrected)
    ///
    /// Exact breakpoint velocities return the breakpoint depth unchanged.
    pub fn interpolate(&self, velocity: f64) -> Result<f64> {
        let out_of_range = || SelenofieldError::OutOfRange {
            velocity,
            min: self.min_velocity(),
            max: self.max_velocity(),
        };

        if !(velocity >= self.min_velocity() && velocity <= self.max_velocity()) {
            return Err(out_of_range());
        }

        for pair in self.breakpoints.windows(2) {
            let (v0, d0) = pair[0];
            let (v1, d1) = pair[1];

            if velocity == v0 {
                return Ok(d0);
            }
            if velocity == v1 {
                return Ok(d1);
            }
            if velocity > v0 && velocity < v1 {
                let slope = (d1 - d0) / (v1 - v0);
                return Ok(d0 + slope * (velocity - v0));
            }
        }

        Err(out_of_range())
    }
}

/// Line-depth lookup for both tabulated lines
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralLineModel;

impl SpectralLineModel {
    /// Create the model with the built-in curves
    pub fn new() -> Self {
        Self
    }

    /// The breakpoint curve of a line
    pub fn curve(&self, line: SpectralLine) -> SpectralCurve {
        let breakpoints = match line {
            SpectralLine::Sodium => SODIUM_BREAKPOINTS,
            SpectralLine::Potassium => POTASSIUM_BREAKPOINTS,
        };
        SpectralCurve { breakpoints }
    }

    /// Line depth for an observed Sun-Moon radial velocity in km/s
    ///
    /// The solar gravitational redshift is added before the lookup, so the
    /// accepted input range is `[min - SOLAR_REDSHIFT, max - SOLAR_REDSHIFT]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use selenofield::constants::SOLAR_REDSHIFT;
    /// use selenofield::spectra::{SpectralLine, SpectralLineModel};
    ///
    /// let model = SpectralLineModel::new();
    /// let depth = model.depth(SpectralLine::Sodium, -4.69523302 - SOLAR_REDSHIFT).unwrap();
    /// assert_eq!(depth, 0.1653);
    /// ```
    pub fn depth(&self, line: SpectralLine, moon_sun_velocity: f64) -> Result<f64> {
        self.curve(line)
            .interpolate(moon_sun_velocity + SOLAR_REDSHIFT)
            .map_err(|err| match err {
                SelenofieldError::OutOfRange { min, max, .. } => SelenofieldError::OutOfRange {
                    velocity: moon_sun_velocity,
                    min: min - SOLAR_REDSHIFT,
                    max: max - SOLAR_REDSHIFT,
                },
                other => other,
            })
    }

    /// Line depth by line name (`"Na"`, `"K"`, ...)
    pub fn depth_by_name(&self, line: &str, moon_sun_velocity: f64) -> Result<f64> {
        self.depth(line.parse()?, moon_sun_velocity)
    }
}
