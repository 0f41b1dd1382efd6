//! Vectors, matrices and the value types exchanged by the lunar transforms

pub mod cartesian;
pub mod matrix;

pub use cartesian::Cartesian3;
pub use matrix::Matrix33;

use serde::{Deserialize, Serialize};

/// A geocentric sky position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    /// Right ascension in degrees, `[0, 360)`
    pub ra_deg: f64,
    /// Declination in degrees
    pub dec_deg: f64,
}

impl SkyPosition {
    /// Creates a sky position, wrapping right ascension into `[0, 360)`
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra_deg: ra_deg.rem_euclid(360.0),
            dec_deg,
        }
    }

    /// Direction from the geocenter as a unit vector
    pub fn unit_vector(&self) -> Cartesian3 {
        Cartesian3::from_radec_degrees(self.ra_deg, self.dec_deg)
    }

    /// Direction of a geocentric Cartesian vector
    pub fn from_cartesian(v: &Cartesian3) -> Self {
        let (ra, dec, _) = v.to_spherical();
        Self::new(ra.to_degrees(), dec.to_degrees())
    }

    /// Angular distance to another sky position in radians
    pub fn angular_distance(&self, other: &SkyPosition) -> f64 {
        self.unit_vector().angle_between(&other.unit_vector())
    }
}

/// A selenographic position with height above the reference sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    /// East longitude in degrees, `(-180, 180]`
    pub longitude_deg: f64,
    /// Latitude in degrees
    pub latitude_deg: f64,
    /// Height above the mean lunar radius in kilometers
    pub altitude_km: f64,
}

impl SurfacePoint {
    /// Builds a surface point from a body-fixed offset vector in kilometers
    pub fn from_body_fixed(offset: &Cartesian3, radius_km: f64) -> Self {
        let (_, lat, norm) = offset.to_spherical();
        Self {
            longitude_deg: offset.y.atan2(offset.x).to_degrees(),
            latitude_deg: lat.to_degrees(),
            altitude_km: norm - radius_km,
        }
    }
}
