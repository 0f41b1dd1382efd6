//! Body-fixed lunar frame from three geocentric samples
//!
//! Horizons can report the geocentric position of any body-fixed point on the
//! Moon. Sampling the center, the point at selenographic (0°E, 0°N) and the
//! north pole at the same instant fixes the orientation of the body, and so
//! the optical libration, without any rotation model.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::coordinates::{Cartesian3, Matrix33, SkyPosition};
use crate::ephemeris::{Column, EphemerisRecord};
use crate::{Result, SelenofieldError};

/// Geocentric position of one point at one time step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSample {
    /// Right ascension in degrees
    pub ra_deg: f64,
    /// Declination in degrees
    pub dec_deg: f64,
    /// Distance from the geocenter in kilometers
    pub range_km: f64,
    /// Rate of change of the range in km/s, when the table carries it
    pub range_rate_km_s: Option<f64>,
}

impl AxisSample {
    /// Create a sample without a range rate
    pub fn new(ra_deg: f64, dec_deg: f64, range_km: f64) -> Self {
        Self {
            ra_deg,
            dec_deg,
            range_km,
            range_rate_km_s: None,
        }
    }

    /// Snapshot the position columns of a record
    pub fn from_record(record: &EphemerisRecord) -> Result<Self> {
        Ok(Self {
            ra_deg: record.number(Column::RightAscension)?,
            dec_deg: record.number(Column::Declination)?,
            range_km: record.number(Column::TargetRange)?,
            range_rate_km_s: record.optional_number(Column::TargetRangeRate)?,
        })
    }

    /// Sample for a geocentric Cartesian position in kilometers
    pub fn from_position(position: &Cartesian3) -> Self {
        let sky = SkyPosition::from_cartesian(position);
        Self::new(sky.ra_deg, sky.dec_deg, position.norm())
    }

    /// Geocentric Cartesian position in kilometers
    pub fn position(&self) -> Cartesian3 {
        Cartesian3::from_radec_degrees(self.ra_deg, self.dec_deg).scale(self.range_km)
    }

    /// Direction on the sky
    pub fn sky_position(&self) -> SkyPosition {
        SkyPosition::new(self.ra_deg, self.dec_deg)
    }
}

/// Orientation of the lunar body-fixed axes at one time step
///
/// The rotation matrix has the body X (toward 0°E, 0°N), Y (toward 90°E) and
/// Z (north pole) axes as its columns, expressed in geocentric equatorial
/// coordinates. Multiplying a body-fixed vector by it gives the geocentric
/// offset from the lunar center.
#[derive(Debug, Clone, PartialEq)]
pub struct LibrationFrame {
    rotation: Matrix33,
}

impl LibrationFrame {
    /// Build the frame from simultaneous center, equator-point and pole samples
    ///
    /// The axes are taken as measured; no re-orthogonalization is applied.
    /// Fails with `DegenerateFrame` when a reference point coincides with the
    /// center.
    pub fn from_samples(
        center: &AxisSample,
        equator: &AxisSample,
        pole: &AxisSample,
    ) -> Result<Self> {
        let center_position = center.position();

        let x_hat = (equator.position() - center_position)
            .normalize()
            .ok_or_else(|| {
                SelenofieldError::DegenerateFrame(
                    "equator reference coincides with the body center".to_string(),
                )
            })?;
        let z_hat = (pole.position() - center_position)
            .normalize()
            .ok_or_else(|| {
                SelenofieldError::DegenerateFrame(
                    "pole reference coincides with the body center".to_string(),
                )
            })?;
        let y_hat = z_hat.cross(&x_hat);

        let frame = Self::from_rotation(Matrix33::from_columns([x_hat, y_hat, z_hat]));
        debug!(
            "Libration frame built, orthogonality error {:.3e}",
            frame.orthogonality_error()
        );
        Ok(frame)
    }

    /// Wrap an existing body-to-geocentric rotation
    pub fn from_rotation(rotation: Matrix33) -> Self {
        Self { rotation }
    }

    /// Body-to-geocentric rotation matrix
    pub fn rotation(&self) -> &Matrix33 {
        &self.rotation
    }

    /// Body X axis (prime meridian on the equator)
    pub fn x_axis(&self) -> Cartesian3 {
        self.rotation.column(0)
    }

    /// Body Y axis (90°E on the equator)
    pub fn y_axis(&self) -> Cartesian3 {
        self.rotation.column(1)
    }

    /// Body Z axis (north pole)
    pub fn z_axis(&self) -> Cartesian3 {
        self.rotation.column(2)
    }

    /// Largest absolute dot product between two distinct axes
    pub fn orthogonality_error(&self) -> f64 {
        let [x, y, z] = self.rotation.columns();
        x.dot(&y).abs().max(x.dot(&z).abs()).max(y.dot(&z).abs())
    }

    /// Rotate a body-fixed vector into geocentric axes
    pub fn to_geocentric(&self, body_fixed: &Cartesian3) -> Cartesian3 {
        self.rotation.times(body_fixed)
    }

    /// Rotate a geocentric offset from the lunar center into body-fixed axes
    pub fn to_body_fixed(&self, geocentric_offset: &Cartesian3) -> Cartesian3 {
        self.rotation.transpose().times(geocentric_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::Rotation3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const RADIUS: f64 = 1_737.4;

    /// Samples of a Moon whose body axes are the columns of `rotation`
    fn samples_for(
        center: &Cartesian3,
        rotation: &Matrix33,
    ) -> (AxisSample, AxisSample, AxisSample) {
        (
            AxisSample::from_position(center),
            AxisSample::from_position(&(*center + rotation.column(0).scale(RADIUS))),
            AxisSample::from_position(&(*center + rotation.column(2).scale(RADIUS))),
        )
    }

    fn random_rotation(rng: &mut StdRng) -> Matrix33 {
        let rotation = Rotation3::from_euler_angles(
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-1.5..1.5),
            rng.gen_range(-3.0..3.0),
        );
        Matrix33::from(rotation.into_inner())
    }

    #[test]
    fn test_position_from_sample() {
        let sample = AxisSample::new(90.0, 0.0, 2.0);
        let position = sample.position();
        assert_abs_diff_eq!(position.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(position.y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(position.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scenario_axes_nearly_orthonormal() {
        let center = AxisSample::new(10.0, 5.0, 384_000.0);
        let equator = AxisSample::new(10.5, 5.0, 384_000.0);
        let pole = AxisSample::new(10.0, 5.5, 384_000.0);

        let frame = LibrationFrame::from_samples(&center, &equator, &pole).unwrap();
        for axis in frame.rotation().columns() {
            assert_abs_diff_eq!(axis.norm(), 1.0, epsilon = 1e-6);
        }
        assert!(frame.orthogonality_error() < 1e-3);
    }

    #[test]
    fn test_recovers_known_rotation() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let rotation = random_rotation(&mut rng);
            let center = Cartesian3::from_radec_degrees(
                rng.gen_range(0.0..360.0),
                rng.gen_range(-28.0..28.0),
            )
            .scale(rng.gen_range(356_000.0..407_000.0));

            let (c, e, p) = samples_for(&center, &rotation);
            let frame = LibrationFrame::from_samples(&c, &e, &p).unwrap();

            for i in 0..3 {
                for j in 0..3 {
                    assert_abs_diff_eq!(
                        frame.rotation().get(i, j),
                        rotation.get(i, j),
                        epsilon = 1e-9
                    );
                }
            }
            assert!(frame.orthogonality_error() < 1e-9);
        }
    }

    #[test]
    fn test_columns_unit_norm_and_right_handed() {
        let mut rng = StdRng::seed_from_u64(7);
        let rotation = random_rotation(&mut rng);
        let center = Cartesian3::from_radec_degrees(200.0, -10.0).scale(380_000.0);
        let (c, e, p) = samples_for(&center, &rotation);
        let frame = LibrationFrame::from_samples(&c, &e, &p).unwrap();

        for axis in frame.rotation().columns() {
            assert_relative_eq!(axis.norm(), 1.0, epsilon = 1e-9);
        }
        let handedness = frame.x_axis().cross(&frame.y_axis()).dot(&frame.z_axis());
        assert_relative_eq!(handedness, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_body_geocentric_round_trip() {
        let mut rng = StdRng::seed_from_u64(3);
        let frame = LibrationFrame::from_rotation(random_rotation(&mut rng));
        let v = Cartesian3::new(100.0, -250.0, 1_500.0);
        let back = frame.to_body_fixed(&frame.to_geocentric(&v));
        assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-9);
        assert_abs_diff_eq!(back.z, v.z, epsilon = 1e-9);
    }

    #[test]
    fn test_coincident_reference_is_degenerate() {
        let center = AxisSample::new(10.0, 5.0, 384_000.0);
        let pole = AxisSample::new(10.0, 5.5, 384_000.0);
        let result = LibrationFrame::from_samples(&center, &center, &pole);
        assert!(matches!(result, Err(SelenofieldError::DegenerateFrame(_))));

        let equator = AxisSample::new(10.5, 5.0, 384_000.0);
        let result = LibrationFrame::from_samples(&center, &equator, &center);
        assert!(matches!(result, Err(SelenofieldError::DegenerateFrame(_))));
    }

    #[test]
    fn test_from_record() {
        use crate::ephemeris::ColumnLayout;

        let line = "2015-Mar-20 04:15 *m 10.5 5.0 384000.0 -0.25";
        let record = EphemerisRecord::parse(line, &ColumnLayout::axis_table(), 1);
        let sample = AxisSample::from_record(&record).unwrap();
        assert_eq!(sample.ra_deg, 10.5);
        assert_eq!(sample.range_rate_km_s, Some(-0.25));

        let short = "2015-Mar-20 04:15 *m 10.5 5.0 384000.0";
        let record = EphemerisRecord::parse(short, &ColumnLayout::axis_table(), 2);
        assert_eq!(AxisSample::from_record(&record).unwrap().range_rate_km_s, None);

        let truncated = "2015-Mar-20 04:15 *m 10.5";
        let record = EphemerisRecord::parse(truncated, &ColumnLayout::axis_table(), 3);
        assert!(matches!(
            AxisSample::from_record(&record),
            Err(SelenofieldError::DataMissing { line: 3, .. })
        ));
    }
}
