//! Default world extents per spatial reference.
//!
//! When a `World` switches spatial reference it asks an [`ExtentProvider`] for
//! the extent to start from. The token is opaque: nothing here interprets it
//! beyond looking it up.

use std::collections::HashMap;

use crate::subset::Subset;

/// Lookup of the default world extent for a spatial-reference token.
pub trait ExtentProvider {
    fn default_extent(&self, spatial_reference: &str) -> Option<Subset>;
}

impl<F> ExtentProvider for F
where
    F: Fn(&str) -> Option<Subset>,
{
    fn default_extent(&self, spatial_reference: &str) -> Option<Subset> {
        self(spatial_reference)
    }
}

/// Geographic degrees, north-up.
pub const GEOGRAPHIC_EXTENT: Subset = Subset::new(-180.0, 90.0, 180.0, -90.0);

/// Web mercator metres, north-up.
pub const WEB_MERCATOR_EXTENT: Subset = Subset::new(
    -20_037_508.342_789_244,
    20_037_508.342_789_244,
    20_037_508.342_789_244,
    -20_037_508.342_789_244,
);

/// Table of token → extent.
#[derive(Debug, Clone)]
pub struct ExtentCatalog {
    extents: HashMap<String, Subset>,
}

impl ExtentCatalog {
    /// A catalog without any entries.
    pub fn empty() -> Self {
        ExtentCatalog {
            extents: HashMap::new(),
        }
    }

    pub fn insert(&mut self, spatial_reference: impl Into<String>, extent: Subset) -> Option<Subset> {
        self.extents.insert(spatial_reference.into(), extent)
    }

    pub fn with(mut self, spatial_reference: impl Into<String>, extent: Subset) -> Self {
        self.insert(spatial_reference, extent);
        self
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }
}

impl Default for ExtentCatalog {
    fn default() -> Self {
        ExtentCatalog::empty()
            .with("EPSG:4326", GEOGRAPHIC_EXTENT)
            .with("EPSG:3857", WEB_MERCATOR_EXTENT)
    }
}

impl ExtentProvider for ExtentCatalog {
    fn default_extent(&self, spatial_reference: &str) -> Option<Subset> {
        self.extents.get(spatial_reference).copied()
    }
}
