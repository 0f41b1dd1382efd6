//! Constants module for lunar geometry and line-depth calculations

// Angles
/// Arcseconds in a degree
pub const ASEC_PER_DEG: f64 = 3_600.0;
/// Arcminutes in a degree
pub const AMIN_PER_DEG: f64 = 60.0;
/// Seconds of time per degree of right ascension (86400 s / 360 deg)
pub const TIME_SEC_PER_DEG: f64 = 240.0;

// Moon
/// Mean lunar radius in kilometers (IAU WGCCRE)
pub const MOON_RADIUS_KM: f64 = 1_737.4;

// Limb solver
/// Coarse bracketing step in degrees
pub const LIMB_STEP_DEG: f64 = 0.125;
/// Absolute residual tolerance for the bisection phase
pub const LIMB_TOLERANCE: f64 = 1e-10;
/// Bracket expansion steps before giving up (90 degrees of sky)
pub const MAX_BRACKET_STEPS: usize = 720;
/// Bisection iterations before giving up
pub const MAX_BISECTIONS: usize = 60;

// Instrument fields of view used by aperture/eyepiece offset origins
/// Spectrograph aperture field of view in arcseconds
pub const APERTURE_FOV_ARCSEC: f64 = 10.0;
/// Guiding eyepiece field of view in arcseconds
pub const EYEPIECE_FOV_ARCSEC: f64 = 600.0;

// Spectroscopy
/// Gravitational redshift of solar absorption lines in km/s
pub const SOLAR_REDSHIFT: f64 = 0.636;
