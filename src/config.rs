//! Tunable geometry parameters
//!
//! The defaults reproduce the reference computations exactly; a JSON file
//! only needs the keys it wants to change.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    APERTURE_FOV_ARCSEC, EYEPIECE_FOV_ARCSEC, LIMB_STEP_DEG, LIMB_TOLERANCE, MAX_BISECTIONS,
    MAX_BRACKET_STEPS, MOON_RADIUS_KM,
};
use crate::{Result, SelenofieldError};

/// Parameters shared by the observation frame and the limb solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Radius of the reference sphere in kilometers
    pub moon_radius_km: f64,
    /// Coarse bracketing step of the limb solver in degrees
    pub limb_step_deg: f64,
    /// Absolute residual at which bisection stops
    pub limb_tolerance: f64,
    /// Bracket expansion steps before the limb is declared unreachable
    pub max_bracket_steps: usize,
    /// Bisection iterations before the solver gives up
    pub max_bisections: usize,
    /// Field of view used by aperture-relative origins, arcseconds
    pub aperture_fov_arcsec: f64,
    /// Field of view used by eyepiece-relative origins, arcseconds
    pub eyepiece_fov_arcsec: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            moon_radius_km: MOON_RADIUS_KM,
            limb_step_deg: LIMB_STEP_DEG,
            limb_tolerance: LIMB_TOLERANCE,
            max_bracket_steps: MAX_BRACKET_STEPS,
            max_bisections: MAX_BISECTIONS,
            aperture_fov_arcsec: APERTURE_FOV_ARCSEC,
            eyepiece_fov_arcsec: EYEPIECE_FOV_ARCSEC,
        }
    }
}

impl GeometryConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SelenofieldError::ConfigError(format!("Invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if !(self.moon_radius_km > 0.0) {
            return Err(SelenofieldError::ConfigError(format!(
                "moon_radius_km must be positive, got {}",
                self.moon_radius_km
            )));
        }
        if !(self.limb_step_deg > 0.0) || !(self.limb_tolerance > 0.0) {
            return Err(SelenofieldError::ConfigError(
                "limb_step_deg and limb_tolerance must be positive".to_string(),
            ));
        }
        if self.max_bracket_steps == 0 || self.max_bisections == 0 {
            return Err(SelenofieldError::ConfigError(
                "solver iteration limits must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_constants() {
        let config = GeometryConfig::default();
        assert_eq!(config.limb_step_deg, 0.125);
        assert_eq!(config.limb_tolerance, 1e-10);
        assert_eq!(config.moon_radius_km, 1737.4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GeometryConfig::from_json_str(r#"{ "moon_radius_km": 1738.0 }"#).unwrap();
        assert_eq!(config.moon_radius_km, 1738.0);
        assert_eq!(config.max_bisections, MAX_BISECTIONS);
        assert_eq!(config.aperture_fov_arcsec, APERTURE_FOV_ARCSEC);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = GeometryConfig::from_json_str(r#"{ "limb_step_deg": 0.0 }"#);
        assert!(matches!(result, Err(SelenofieldError::ConfigError(_))));

        let result = GeometryConfig::from_json_str("not json");
        assert!(matches!(result, Err(SelenofieldError::ConfigError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "eyepiece_fov_arcsec": 300.0 }}"#).unwrap();
        let config = GeometryConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.eyepiece_fov_arcsec, 300.0);
    }
}
