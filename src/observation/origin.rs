//! Offset origins for field-of-view pointing
//!
//! Observers give slit positions as time-second / arcminute offsets from a
//! reference: either a feature itself, or a point on the limb reached by
//! sliding from the feature in one cardinal direction.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::GeometryConfig;
use crate::{Result, SelenofieldError};

lazy_static! {
    static ref LIMB_ORIGIN: Regex = Regex::new(
        r"(?i)^\s*(n|s|e|w|north|south|east|west)[\s_-]*(limb|aperture|eyepiece)\s*$"
    )
    .expect("limb origin pattern compiles");
}

/// Cardinal direction on the sky
///
/// North increases declination and East increases right ascension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimbDirection {
    North,
    South,
    East,
    West,
}

impl LimbDirection {
    /// `+1` for North/East, `-1` for South/West
    pub fn sign(&self) -> f64 {
        match self {
            LimbDirection::North | LimbDirection::East => 1.0,
            LimbDirection::South | LimbDirection::West => -1.0,
        }
    }

    /// Whether moving this way changes declination (as opposed to RA)
    pub fn varies_declination(&self) -> bool {
        matches!(self, LimbDirection::North | LimbDirection::South)
    }
}

impl fmt::Display for LimbDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LimbDirection::North => "North",
            LimbDirection::South => "South",
            LimbDirection::East => "East",
            LimbDirection::West => "West",
        };
        f.write_str(name)
    }
}

impl FromStr for LimbDirection {
    type Err = SelenofieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "n" | "north" => Ok(LimbDirection::North),
            "s" | "south" => Ok(LimbDirection::South),
            "e" | "east" => Ok(LimbDirection::East),
            "w" | "west" => Ok(LimbDirection::West),
            _ => Err(SelenofieldError::BadOriginSpec(s.to_string())),
        }
    }
}

/// Where FOV offsets are measured from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OriginSpec {
    /// The feature position itself
    Feature,
    /// The limb, with the field of view supplied per row
    Limb(LimbDirection),
    /// The limb, as seen through the spectrograph aperture
    Aperture(LimbDirection),
    /// The limb, as seen through the guiding eyepiece
    Eyepiece(LimbDirection),
}

impl OriginSpec {
    /// Field of view used to place the limb for this origin
    ///
    /// Aperture and eyepiece origins ignore the row's value and use the
    /// configured instrument field.
    pub fn field_of_view(&self, row_fov_arcsec: f64, config: &GeometryConfig) -> f64 {
        match self {
            OriginSpec::Feature | OriginSpec::Limb(_) => row_fov_arcsec,
            OriginSpec::Aperture(_) => config.aperture_fov_arcsec,
            OriginSpec::Eyepiece(_) => config.eyepiece_fov_arcsec,
        }
    }

    /// Limb direction, if the origin is limb-relative
    pub fn direction(&self) -> Option<LimbDirection> {
        match self {
            OriginSpec::Feature => None,
            OriginSpec::Limb(d) | OriginSpec::Aperture(d) | OriginSpec::Eyepiece(d) => Some(*d),
        }
    }
}

impl FromStr for OriginSpec {
    type Err = SelenofieldError;

    /// Accepts `crater`/`feature`, or a direction followed by
    /// `limb`, `aperture` or `eyepiece` (`"N limb"`, `"west-aperture"`)
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        if lowered == "crater" || lowered == "feature" {
            return Ok(OriginSpec::Feature);
        }

        let caps = LIMB_ORIGIN
            .captures(s)
            .ok_or_else(|| SelenofieldError::BadOriginSpec(s.to_string()))?;
        let direction: LimbDirection = caps[1].parse()?;

        match caps[2].to_lowercase().as_str() {
            "limb" => Ok(OriginSpec::Limb(direction)),
            "aperture" => Ok(OriginSpec::Aperture(direction)),
            "eyepiece" => Ok(OriginSpec::Eyepiece(direction)),
            _ => Err(SelenofieldError::BadOriginSpec(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("crater", OriginSpec::Feature)]
    #[case("Feature", OriginSpec::Feature)]
    #[case("N limb", OriginSpec::Limb(LimbDirection::North))]
    #[case("south-limb", OriginSpec::Limb(LimbDirection::South))]
    #[case("Elimb", OriginSpec::Limb(LimbDirection::East))]
    #[case("W Aperture", OriginSpec::Aperture(LimbDirection::West))]
    #[case("east_eyepiece", OriginSpec::Eyepiece(LimbDirection::East))]
    fn test_parse_origin(#[case] text: &str, #[case] expected: OriginSpec) {
        assert_eq!(text.parse::<OriginSpec>().unwrap(), expected);
    }

    #[rstest]
    #[case("term")]
    #[case("")]
    #[case("NE limb")]
    #[case("limb")]
    #[case("north pole")]
    fn test_bad_origin(#[case] text: &str) {
        assert!(matches!(
            text.parse::<OriginSpec>(),
            Err(SelenofieldError::BadOriginSpec(_))
        ));
    }

    #[test]
    fn test_field_of_view() {
        let config = GeometryConfig::default();
        assert_eq!(OriginSpec::Feature.field_of_view(30.0, &config), 30.0);
        assert_eq!(
            OriginSpec::Limb(LimbDirection::North).field_of_view(30.0, &config),
            30.0
        );
        assert_eq!(
            OriginSpec::Aperture(LimbDirection::North).field_of_view(30.0, &config),
            10.0
        );
        assert_eq!(
            OriginSpec::Eyepiece(LimbDirection::West).field_of_view(30.0, &config),
            600.0
        );
    }

    #[test]
    fn test_direction_signs() {
        assert_eq!(LimbDirection::North.sign(), 1.0);
        assert_eq!(LimbDirection::West.sign(), -1.0);
        assert!(LimbDirection::South.varies_declination());
        assert!(!LimbDirection::East.varies_declination());
        assert_eq!(LimbDirection::East.to_string(), "East");
    }
}
