//! # Cartesian Coordinate System Module
//!
//! Three-dimensional vectors used as the intermediate format for every
//! transformation in this crate: geocentric positions of the Moon and its
//! reference points, body-fixed feature offsets, and sightline directions.
//!
//! ## Coordinate System Convention
//!
//! Geocentric vectors follow the equatorial convention:
//! - **X-axis**: Toward RA = 0°, Dec = 0°
//! - **Y-axis**: Toward RA = 90°, Dec = 0°
//! - **Z-axis**: Toward the north celestial pole
//!
//! Body-fixed (selenographic) vectors use the same construction with
//! longitude in place of right ascension and latitude in place of declination.
//!
//! ## Examples
//!
//! ```rust
//! use selenofield::coordinates::cartesian::Cartesian3;
//!
//! let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
//! let z_axis = Cartesian3::new(0.0, 0.0, 1.0);
//! assert_eq!(x_axis.dot(&z_axis), 0.0);
//! ```

use nalgebra::Vector3;
use std::f64::consts::PI;

/// Three-dimensional Cartesian vector
///
/// Represents either a unit direction or a position in kilometers. All
/// operations return new values; nothing is mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cartesian3 {
    /// X-component
    pub x: f64,
    /// Y-component
    pub y: f64,
    /// Z-component
    pub z: f64,
}

impl Cartesian3 {
    /// Creates a new Cartesian vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian3 { x, y, z }
    }

    /// Creates a unit vector from an elevation and an azimuth in radians
    ///
    /// The elevation is measured from the XY plane (declination or latitude,
    /// in `[-π/2, π/2]`) and the azimuth counter-clockwise from +X (right
    /// ascension or longitude). The result always has unit norm; callers scale
    /// it by a range to obtain a position.
    ///
    /// # Mathematical Conversion
    ///
    /// - `x = cos(azi) * cos(el)`
    /// - `y = sin(azi) * cos(el)`
    /// - `z = sin(el)`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use selenofield::coordinates::cartesian::Cartesian3;
    /// use std::f64::consts::PI;
    ///
    /// let pole = Cartesian3::from_elevation_azimuth(PI / 2.0, 0.0);
    /// assert!(pole.x.abs() < 1e-15);
    /// assert!((pole.z - 1.0).abs() < 1e-15);
    /// ```
    pub fn from_elevation_azimuth(el: f64, azi: f64) -> Self {
        let cos_el = el.cos();
        Cartesian3 {
            x: azi.cos() * cos_el,
            y: azi.sin() * cos_el,
            z: el.sin(),
        }
    }

    /// Creates a unit vector from right ascension and declination in degrees
    pub fn from_radec_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Self::from_elevation_azimuth(dec_deg.to_radians(), ra_deg.to_radians())
    }

    /// Converts to spherical coordinates
    ///
    /// Returns `(azimuth, elevation, norm)` in radians, with the azimuth
    /// normalized to `[0, 2π)`. The zero vector maps to `(0, 0, 0)`.
    pub fn to_spherical(&self) -> (f64, f64, f64) {
        let distance = self.norm();

        if distance == 0.0 {
            return (0.0, 0.0, 0.0);
        }

        let el = (self.z / distance).clamp(-1.0, 1.0).asin();
        let azi = if self.x == 0.0 && self.y == 0.0 {
            0.0 // Arbitrary choice at poles
        } else {
            let mut azi = self.y.atan2(self.x);
            if azi < 0.0 {
                azi += 2.0 * PI;
            }
            azi
        };

        (azi, el, distance)
    }

    /// Euclidean norm of the vector
    ///
    /// # Examples
    ///
    /// ```rust
    /// use selenofield::coordinates::cartesian::Cartesian3;
    ///
    /// assert_eq!(Cartesian3::new(3.0, 4.0, 0.0).norm(), 5.0);
    /// ```
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns the unit vector in the same direction, or `None` for the zero vector
    pub fn normalize(&self) -> Option<Cartesian3> {
        let mag = self.norm();
        if mag == 0.0 {
            None
        } else {
            Some(self.scale(1.0 / mag))
        }
    }

    /// Multiplies every component by `scalar`
    pub fn scale(&self, scalar: f64) -> Cartesian3 {
        Cartesian3 {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }

    /// Component-wise sum
    pub fn plus(&self, other: &Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// The vector pointing the opposite way
    pub fn negative(&self) -> Cartesian3 {
        Cartesian3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Cartesian3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product, `self × other`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use selenofield::coordinates::cartesian::Cartesian3;
    ///
    /// let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
    /// let y_axis = Cartesian3::new(0.0, 1.0, 0.0);
    /// assert_eq!(x_axis.cross(&y_axis), Cartesian3::new(0.0, 0.0, 1.0));
    /// ```
    pub fn cross(&self, other: &Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Angle between two vectors in radians, `[0, π]`
    ///
    /// The cosine is clamped to `[-1, 1]` before `acos`, so nearly parallel
    /// vectors never produce NaN. A zero vector yields an angle of zero.
    pub fn angle_between(&self, other: &Cartesian3) -> f64 {
        let mag_product = self.norm() * other.norm();

        if mag_product == 0.0 {
            return 0.0;
        }

        (self.dot(other) / mag_product).clamp(-1.0, 1.0).acos()
    }

    /// Converts to nalgebra Vector3 for linear algebra operations
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Creates from nalgebra Vector3
    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        Cartesian3 {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
    }

    /// Component by index (0 = x, 1 = y, 2 = z)
    ///
    /// # Panics
    ///
    /// Panics if `i > 2`.
    pub fn get(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => panic!("Cartesian3 index out of range: {}", i),
        }
    }
}

impl From<Vector3<f64>> for Cartesian3 {
    fn from(vec: Vector3<f64>) -> Self {
        Cartesian3::from_vector3(vec)
    }
}

impl From<Cartesian3> for Vector3<f64> {
    fn from(vec: Cartesian3) -> Self {
        vec.to_vector3()
    }
}

// Arithmetic operations for convenience
impl std::ops::Add for Cartesian3 {
    type Output = Cartesian3;

    fn add(self, other: Cartesian3) -> Cartesian3 {
        self.plus(&other)
    }
}

impl std::ops::Sub for Cartesian3 {
    type Output = Cartesian3;

    fn sub(self, other: Cartesian3) -> Cartesian3 {
        self.plus(&other.negative())
    }
}

impl std::ops::Neg for Cartesian3 {
    type Output = Cartesian3;

    fn neg(self) -> Cartesian3 {
        self.negative()
    }
}

impl std::ops::Mul<f64> for Cartesian3 {
    type Output = Cartesian3;

    fn mul(self, scalar: f64) -> Cartesian3 {
        self.scale(scalar)
    }
}

impl std::ops::Div<f64> for Cartesian3 {
    type Output = Cartesian3;

    fn div(self, scalar: f64) -> Cartesian3 {
        Cartesian3 {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    fn random_vector(rng: &mut StdRng) -> Cartesian3 {
        Cartesian3::new(
            rng.gen_range(-1000.0..1000.0),
            rng.gen_range(-1000.0..1000.0),
            rng.gen_range(-1000.0..1000.0),
        )
    }

    #[test]
    fn test_norm_and_normalize() {
        let coord = Cartesian3::new(3.0, 4.0, 0.0);
        assert_eq!(coord.norm(), 5.0);

        let unit = coord.normalize().unwrap();
        assert!((unit.norm() - 1.0).abs() < 1e-15);
        assert!((unit.x - 0.6).abs() < 1e-15);
        assert!((unit.y - 0.8).abs() < 1e-15);

        assert!(Cartesian3::default().normalize().is_none());
    }

    #[test]
    fn test_elevation_azimuth_is_unit() {
        let mut rng = StdRng::seed_from_u64(424242);
        for _ in 0..1000 {
            let el = rng.gen_range(-PI / 2.0..=PI / 2.0);
            let azi = rng.gen_range(0.0..2.0 * PI);
            let v = Cartesian3::from_elevation_azimuth(el, azi);
            assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_elevation_azimuth_axes() {
        let v = Cartesian3::from_elevation_azimuth(0.0, 0.0);
        assert_abs_diff_eq!(v.x, 1.0, epsilon = 1e-15);

        let v = Cartesian3::from_elevation_azimuth(0.0, PI / 2.0);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-15);

        let v = Cartesian3::from_elevation_azimuth(-PI / 2.0, 1.0);
        assert_abs_diff_eq!(v.z, -1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_cross_product_properties() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = random_vector(&mut rng);
            let b = random_vector(&mut rng);

            let ab = a.cross(&b);
            let ba = b.cross(&a);
            assert_abs_diff_eq!(ab.x, -ba.x, epsilon = 1e-9);
            assert_abs_diff_eq!(ab.y, -ba.y, epsilon = 1e-9);
            assert_abs_diff_eq!(ab.z, -ba.z, epsilon = 1e-9);

            // Orthogonality relative to the magnitudes involved
            let scale = a.norm() * ab.norm();
            assert!(a.dot(&ab).abs() / scale < 1e-10);
            assert!(b.dot(&ab).abs() / (b.norm() * ab.norm()) < 1e-10);
        }
    }

    #[test]
    fn test_right_handed_cross() {
        let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
        let y_axis = Cartesian3::new(0.0, 1.0, 0.0);
        let z_axis = Cartesian3::new(0.0, 0.0, 1.0);

        assert_eq!(x_axis.cross(&y_axis), z_axis);
        assert_eq!(y_axis.cross(&z_axis), x_axis);
        assert_eq!(z_axis.cross(&x_axis), y_axis);
    }

    #[test]
    fn test_angle_between_clamps() {
        let a = Cartesian3::new(1.0, 1e-9, 0.0);
        let b = Cartesian3::new(1.0, 1e-9, 0.0).scale(3.0);
        let angle = a.angle_between(&b);
        assert!(!angle.is_nan());
        assert!(angle.abs() < 1e-7);

        let opposite = a.negative();
        assert_abs_diff_eq!(a.angle_between(&opposite), PI, epsilon = 1e-7);

        let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
        let y_axis = Cartesian3::new(0.0, 2.0, 0.0);
        assert_abs_diff_eq!(x_axis.angle_between(&y_axis), PI / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_spherical_round_trip() {
        let test_cases = vec![
            (0.0, 0.0),
            (PI / 2.0, 0.0),
            (PI, 0.3),
            (3.0 * PI / 2.0, -0.4),
            (PI / 3.0, PI / 6.0),
        ];

        for (azi, el) in test_cases {
            let v = Cartesian3::from_elevation_azimuth(el, azi).scale(384_000.0);
            let (azi2, el2, dist) = v.to_spherical();
            assert_abs_diff_eq!(azi2, azi, epsilon = 1e-12);
            assert_abs_diff_eq!(el2, el, epsilon = 1e-12);
            assert_abs_diff_eq!(dist, 384_000.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_operators_match_methods() {
        let a = Cartesian3::new(1.0, 2.0, 3.0);
        let b = Cartesian3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, a.plus(&b));
        assert_eq!(b - a, Cartesian3::new(3.0, 3.0, 3.0));
        assert_eq!(-a, a.negative());
        assert_eq!(a * 2.0, a.scale(2.0));
        assert_eq!(a / 2.0, Cartesian3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn test_vector3_conversions() {
        let coord = Cartesian3::new(1.0, 2.0, 3.0);
        let vec: Vector3<f64> = coord.into();
        assert_eq!(vec.x, 1.0);
        assert_eq!(Cartesian3::from(vec), coord);
        assert_eq!(coord.get(2), 3.0);
    }
}
