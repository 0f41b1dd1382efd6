//! Selenofield: selenographic coordinates from geocentric lunar ephemerides
//!
//! This crate turns time-stepped geocentric observations of the Moon into
//! body-fixed (selenographic) coordinates, accounting for libration, and
//! provides the solar absorption-line depth model used for lunar exosphere
//! photometry.
//!
//! Each time step is handled the same way:
//! 1. The four ephemerides (target, body center, equator reference point and
//!    pole reference point) are advanced together by an [`ephemeris::EphemerisSet`].
//! 2. The current records are copied into value snapshots.
//! 3. A [`libration::LibrationFrame`] is rebuilt from the three axis samples.
//! 4. An [`observation::ObservationFrame`] answers feature, limb and
//!    field-of-view queries against that step only.

use thiserror::Error;

pub mod catalogs;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod data;
pub mod ephemeris;
pub mod libration;
pub mod observation;
pub mod spectra;

// Re-export commonly used types
pub use catalogs::{FeatureKind, SurfaceFeature, SurfaceFeatureCatalog};
pub use config::GeometryConfig;
pub use coordinates::{Cartesian3, Matrix33, SkyPosition, SurfacePoint};
pub use libration::{AxisSample, LibrationFrame};
pub use observation::{LimbDirection, ObservationFrame, ObservationSample, OriginSpec};
pub use spectra::{SpectralLine, SpectralLineModel};

/// Main error type for the selenofield library
#[derive(Debug, Error)]
pub enum SelenofieldError {
    #[error("Missing field {column} at ephemeris line {line}")]
    DataMissing { column: String, line: usize },

    #[error("Cannot parse {column} value {value:?} at ephemeris line {line}")]
    DataParse {
        column: String,
        value: String,
        line: usize,
    },

    #[error("Unknown surface feature: {0}")]
    UnknownFeature(String),

    #[error("Unrecognized offset origin: {0:?}")]
    BadOriginSpec(String),

    #[error("Unknown spectral line: {0:?}")]
    UnknownSpectralLine(String),

    #[error("Velocity {velocity} km/s outside supported range ({min}..{max})")]
    OutOfRange { velocity: f64, min: f64, max: f64 },

    #[error("Limb not bracketed moving {direction} after {steps} steps")]
    RootNotBracketed { direction: String, steps: usize },

    #[error("Limb bisection did not converge after {iterations} iterations (residual {residual:e})")]
    LimbNotConverged { iterations: usize, residual: f64 },

    #[error("Degenerate libration frame: {0}")]
    DegenerateFrame(String),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Download error: {0}")]
    DownloadError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for selenofield operations
pub type Result<T> = std::result::Result<T, SelenofieldError>;
