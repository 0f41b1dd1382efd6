//! Per-step lunar observation geometry
//!
//! An [`ObservationFrame`] pairs one step's target snapshot with the step's
//! [`LibrationFrame`] and answers every geometric question about that instant:
//! where a named feature sits on the sky, which selenographic point lies
//! under a sky position, where the limb is, and where an offset slit points.

pub mod limb;
pub mod origin;

pub use limb::LimbSolution;
pub use origin::{LimbDirection, OriginSpec};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::catalogs::SurfaceFeatureCatalog;
use crate::config::GeometryConfig;
use crate::constants::{AMIN_PER_DEG, TIME_SEC_PER_DEG};
use crate::coordinates::{Cartesian3, SkyPosition, SurfacePoint};
use crate::ephemeris::{Column, EphemerisRecord};
use crate::libration::LibrationFrame;
use crate::spectra::{SpectralLine, SpectralLineModel};
use crate::{Result, SelenofieldError};

/// Snapshot of the target table at one time step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSample {
    /// UTC time of the step, if the record carried a readable one
    pub epoch: Option<NaiveDateTime>,
    /// Right ascension of the lunar center in degrees
    pub ra_deg: f64,
    /// Declination of the lunar center in degrees
    pub dec_deg: f64,
    /// Observer-Moon distance in kilometers
    pub range_km: f64,
    /// Apparent angular diameter of the Moon in arcseconds
    pub angular_width_arcsec: f64,
    /// Sun-Moon range rate in km/s
    pub solar_range_rate_km_s: Option<f64>,
    /// Input line the sample was read from, 0 when built directly
    #[serde(default)]
    pub line: usize,
}

impl ObservationSample {
    /// Create a sample with no epoch or solar range rate
    pub fn new(ra_deg: f64, dec_deg: f64, range_km: f64, angular_width_arcsec: f64) -> Self {
        Self {
            epoch: None,
            ra_deg,
            dec_deg,
            range_km,
            angular_width_arcsec,
            solar_range_rate_km_s: None,
            line: 0,
        }
    }

    /// Snapshot an observer-table record
    ///
    /// A record without date and time tokens gives no epoch; a malformed
    /// date is a `DataParse` error.
    pub fn from_record(record: &EphemerisRecord) -> Result<Self> {
        let epoch = match record.epoch() {
            Ok(epoch) => Some(epoch),
            Err(SelenofieldError::DataMissing { .. }) => None,
            Err(err) => return Err(err),
        };

        Ok(Self {
            epoch,
            ra_deg: record.number(Column::RightAscension)?,
            dec_deg: record.number(Column::Declination)?,
            range_km: record.number(Column::TargetRange)?,
            angular_width_arcsec: record.number(Column::AngularWidth)?,
            solar_range_rate_km_s: record.optional_number(Column::SolarRangeRate)?,
            line: record.line(),
        })
    }

    /// Geocentric position of the lunar center in kilometers
    pub fn position(&self) -> Cartesian3 {
        Cartesian3::from_radec_degrees(self.ra_deg, self.dec_deg).scale(self.range_km)
    }
}

/// Geometry of the Moon at a single time step
#[derive(Debug, Clone)]
pub struct ObservationFrame<'a> {
    sample: ObservationSample,
    libration: LibrationFrame,
    catalog: &'a SurfaceFeatureCatalog,
    config: &'a GeometryConfig,
}

impl<'a> ObservationFrame<'a> {
    pub fn new(
        sample: ObservationSample,
        libration: LibrationFrame,
        catalog: &'a SurfaceFeatureCatalog,
        config: &'a GeometryConfig,
    ) -> Self {
        Self {
            sample,
            libration,
            catalog,
            config,
        }
    }

    pub fn sample(&self) -> &ObservationSample {
        &self.sample
    }

    pub fn libration(&self) -> &LibrationFrame {
        &self.libration
    }

    pub fn catalog(&self) -> &'a SurfaceFeatureCatalog {
        self.catalog
    }

    pub fn config(&self) -> &'a GeometryConfig {
        self.config
    }

    /// Geocentric position of a named feature on the reference sphere
    pub fn feature_position(&self, name: &str) -> Result<Cartesian3> {
        let (lon, lat) = self.catalog.coordinates(name)?;
        let body_fixed = Cartesian3::from_elevation_azimuth(lat.to_radians(), lon.to_radians())
            .scale(self.config.moon_radius_km);
        Ok(self.libration.to_geocentric(&body_fixed) + self.sample.position())
    }

    /// Sky position of a named feature
    pub fn geocentric_of(&self, name: &str) -> Result<SkyPosition> {
        Ok(SkyPosition::from_cartesian(&self.feature_position(name)?))
    }

    /// Selenographic point under a sky position
    ///
    /// A sightline that pierces the reference sphere lands on its near-side
    /// intercept, so features round-trip to zero altitude. A sightline that
    /// misses the Moon uses its closest approach to the center, which gives a
    /// positive altitude equal to the miss distance minus the radius.
    pub fn surface_of(&self, ra_deg: f64, dec_deg: f64) -> SurfacePoint {
        let radius = self.config.moon_radius_km;
        let center = self.sample.position();
        let sightline = Cartesian3::from_radec_degrees(ra_deg, dec_deg);

        let along = sightline.dot(&center);
        let foot = sightline.scale(along);
        let miss = (foot - center).norm();

        let point = if along > 0.0 && miss < radius {
            let half_chord = (radius * radius - miss * miss).sqrt();
            sightline.scale(along - half_chord)
        } else {
            foot
        };

        let body_fixed = self.libration.to_body_fixed(&(point - center));
        SurfacePoint::from_body_fixed(&body_fixed, radius)
    }

    /// Sky position of the slit for an offset from `origin`
    ///
    /// `ew_seconds` is in seconds of time of right ascension and `ns_arcmin`
    /// in arcminutes of declination.
    pub fn fov_position(
        &self,
        origin: &OriginSpec,
        name: &str,
        ew_seconds: f64,
        ns_arcmin: f64,
        fov_arcsec: f64,
    ) -> Result<SkyPosition> {
        let base = match origin.direction() {
            None => self.geocentric_of(name)?,
            Some(direction) => {
                let fov = origin.field_of_view(fov_arcsec, self.config);
                self.limb_of(name, direction, fov)?.position
            }
        };

        Ok(SkyPosition::new(
            base.ra_deg + ew_seconds / TIME_SEC_PER_DEG,
            base.dec_deg + ns_arcmin / AMIN_PER_DEG,
        ))
    }

    /// Selenographic point under an offset slit
    pub fn lunar_coords(
        &self,
        name: &str,
        ew_seconds: f64,
        ns_arcmin: f64,
        origin: &OriginSpec,
        fov_arcsec: f64,
    ) -> Result<SurfacePoint> {
        let position = self.fov_position(origin, name, ew_seconds, ns_arcmin, fov_arcsec)?;
        Ok(self.surface_of(position.ra_deg, position.dec_deg))
    }

    /// Solar line depth for this step's Sun-Moon range rate
    pub fn line_depth(&self, model: &SpectralLineModel, line: SpectralLine) -> Result<f64> {
        let velocity =
            self.sample
                .solar_range_rate_km_s
                .ok_or_else(|| SelenofieldError::DataMissing {
                    column: Column::SolarRangeRate.to_string(),
                    line: self.sample.line,
                })?;
        model.depth(line, velocity)
    }
}
