//! Selenographic catalog of named lunar surface features
//!
//! This module provides the named targets used to place a spectrograph slit
//! on the Moon, including:
//! - Prominent craters
//! - Maria
//! - Reference landmarks such as the mean sub-Earth point
//!
//! Names are stored in the conventional English spelling used on lunar maps
//! (`Tycho`, `Mare Crisium`, `Moon Center`) and lookups are exact-match.

use std::collections::HashMap;

use crate::{Result, SelenofieldError};

/// A named point on the lunar surface
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFeature {
    /// Name of the feature
    pub name: String,
    /// Type of feature
    pub kind: FeatureKind,
    /// East longitude in degrees
    pub longitude_deg: f64,
    /// Latitude in degrees
    pub latitude_deg: f64,
}

/// Types of lunar surface features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// An impact crater
    Crater,
    /// A mare, oceanus or sinus
    Mare,
    /// A reference point that is not a geological feature
    Landmark,
}

impl SurfaceFeature {
    /// Create a new surface feature
    pub fn new(name: &str, kind: FeatureKind, longitude_deg: f64, latitude_deg: f64) -> Self {
        Self {
            name: name.to_string(),
            kind,
            longitude_deg,
            latitude_deg,
        }
    }
}

/// Catalog of named lunar surface features
///
/// The catalog is an ordinary value: build it once and pass it by reference
/// to every frame that needs it. Tests substitute their own fixtures with
/// [`SurfaceFeatureCatalog::new`] and [`SurfaceFeatureCatalog::add_feature`].
#[derive(Debug, Clone)]
pub struct SurfaceFeatureCatalog {
    features: HashMap<String, SurfaceFeature>,
}

impl Default for SurfaceFeatureCatalog {
    /// The built-in table of craters, maria and landmarks
    fn default() -> Self {
        let mut catalog = Self::new();

        for feature in create_landmark_features()
            .into_iter()
            .chain(create_crater_features())
            .chain(create_mare_features())
        {
            catalog.add_feature(feature);
        }

        catalog
    }
}

impl SurfaceFeatureCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            features: HashMap::new(),
        }
    }

    /// Add a feature, replacing any feature with the same name
    pub fn add_feature(&mut self, feature: SurfaceFeature) {
        self.features.insert(feature.name.clone(), feature);
    }

    /// Get a feature by its exact name
    pub fn get_feature(&self, name: &str) -> Option<&SurfaceFeature> {
        self.features.get(name)
    }

    /// Look up a feature, failing with `UnknownFeature` if absent
    pub fn lookup(&self, name: &str) -> Result<&SurfaceFeature> {
        self.get_feature(name)
            .ok_or_else(|| SelenofieldError::UnknownFeature(name.to_string()))
    }

    /// `(longitude, latitude)` of a feature in degrees
    pub fn coordinates(&self, name: &str) -> Result<(f64, f64)> {
        self.lookup(name)
            .map(|feature| (feature.longitude_deg, feature.latitude_deg))
    }

    /// Get all features of a specific kind
    pub fn get_features_by_kind(&self, kind: FeatureKind) -> Vec<&SurfaceFeature> {
        self.features.values().filter(|f| f.kind == kind).collect()
    }

    /// Feature names in alphabetical order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.features.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get count of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Name of the mean sub-Earth point, treated specially by drivers
pub const MOON_CENTER: &str = "Moon Center";

fn create_landmark_features() -> Vec<SurfaceFeature> {
    vec![SurfaceFeature::new(
        MOON_CENTER,
        FeatureKind::Landmark,
        0.0,
        0.0,
    )]
}

fn create_crater_features() -> Vec<SurfaceFeature> {
    vec![
        SurfaceFeature::new("Aristarchus", FeatureKind::Crater, -47.49, 23.73),
        SurfaceFeature::new("Censorinus", FeatureKind::Crater, 32.68, -0.38),
        SurfaceFeature::new("Clavius", FeatureKind::Crater, -14.06, -58.62),
        SurfaceFeature::new("Copernicus", FeatureKind::Crater, -20.08, 9.62),
        SurfaceFeature::new("Dionysius", FeatureKind::Crater, 17.29, 2.77),
        SurfaceFeature::new("Endymion", FeatureKind::Crater, 56.50, 53.60),
        SurfaceFeature::new("Grimaldi", FeatureKind::Crater, -68.33, -5.51),
        SurfaceFeature::new("Kepler", FeatureKind::Crater, -38.01, 8.12),
        SurfaceFeature::new("Langrenus", FeatureKind::Crater, 60.93, -8.86),
        SurfaceFeature::new("Manilius", FeatureKind::Crater, 9.06, 14.45),
        SurfaceFeature::new("Menelaus", FeatureKind::Crater, 15.97, 16.27),
        SurfaceFeature::new("Mosting A", FeatureKind::Crater, -5.20, -3.20),
        SurfaceFeature::new("Petavius", FeatureKind::Crater, 60.40, -25.30),
        SurfaceFeature::new("Plato", FeatureKind::Crater, -9.38, 51.62),
        SurfaceFeature::new("Posidonius", FeatureKind::Crater, 29.92, 31.88),
        SurfaceFeature::new("Proclus", FeatureKind::Crater, 46.84, 16.11),
        SurfaceFeature::new("Theophilus", FeatureKind::Crater, 26.40, -11.40),
        SurfaceFeature::new("Tycho", FeatureKind::Crater, -11.36, -43.31),
    ]
}

fn create_mare_features() -> Vec<SurfaceFeature> {
    vec![
        SurfaceFeature::new("Mare Crisium", FeatureKind::Mare, 59.10, 17.00),
        SurfaceFeature::new("Mare Imbrium", FeatureKind::Mare, -15.60, 32.80),
        SurfaceFeature::new("Mare Serenitatis", FeatureKind::Mare, 17.50, 28.00),
        SurfaceFeature::new("Mare Tranquillitatis", FeatureKind::Mare, 31.40, 8.50),
        SurfaceFeature::new("Oceanus Procellarum", FeatureKind::Mare, -57.40, 18.40),
        SurfaceFeature::new("Sinus Medii", FeatureKind::Mare, 1.70, 2.40),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_creation() {
        let catalog = SurfaceFeatureCatalog::default();
        assert!(!catalog.is_empty());

        let tycho = catalog.get_feature("Tycho").unwrap();
        assert_eq!(tycho.kind, FeatureKind::Crater);
        assert_eq!(tycho.latitude_deg, -43.31);

        let crisium = catalog.get_feature("Mare Crisium").unwrap();
        assert_eq!(crisium.kind, FeatureKind::Mare);
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let catalog = SurfaceFeatureCatalog::default();
        assert!(catalog.lookup("Copernicus").is_ok());
        assert!(matches!(
            catalog.lookup("copernicus"),
            Err(SelenofieldError::UnknownFeature(name)) if name == "copernicus"
        ));
    }

    #[test]
    fn test_coordinates_within_bounds() {
        let catalog = SurfaceFeatureCatalog::default();
        for name in catalog.names() {
            let (lon, lat) = catalog.coordinates(name).unwrap();
            assert!((-180.0..=180.0).contains(&lon), "{} longitude", name);
            assert!((-90.0..=90.0).contains(&lat), "{} latitude", name);
        }
    }

    #[test]
    fn test_moon_center_is_origin() {
        let catalog = SurfaceFeatureCatalog::default();
        assert_eq!(catalog.coordinates(MOON_CENTER).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn test_fixture_substitution() {
        let mut catalog = SurfaceFeatureCatalog::new();
        catalog.add_feature(SurfaceFeature::new("Test", FeatureKind::Landmark, 10.0, -5.0));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.coordinates("Test").unwrap(), (10.0, -5.0));
        assert!(catalog.lookup("Tycho").is_err());
        assert_eq!(catalog.get_features_by_kind(FeatureKind::Landmark).len(), 1);
    }
}
