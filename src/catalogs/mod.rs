//! Catalogs module
//!
//! Named lunar surface features with fixed selenographic coordinates.

pub mod features;

pub use features::{FeatureKind, SurfaceFeature, SurfaceFeatureCatalog, MOON_CENTER};
