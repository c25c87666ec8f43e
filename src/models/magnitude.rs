//! Magnitude limits and magnitude-token parsing shared by all catalogs

use serde::{Deserialize, Serialize};

use super::{Band, Catalog};
use crate::error::{CatalogError, Result};

/// Marker the local search programs print for a missing measurement
pub const MISSING_MAGNITUDE: &str = "---";

/// Inclusive magnitude bounds for one band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MagnitudeRange {
    pub min: f64,
    pub max: f64,
}

impl MagnitudeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, magnitude: f64) -> bool {
        magnitude >= self.min && magnitude <= self.max
    }

    /// Argument form understood by the local search programs ("min,max")
    pub fn to_arg(&self) -> String {
        format!("{:.6},{:.6}", self.min, self.max)
    }
}

/// Magnitude limits keyed by band letter, in the order they were added.
///
/// Band letters are kept as given and only checked against a catalog in
/// [`MagnitudeFilter::resolve`], so an unknown letter is reported together with
/// the catalog that rejected it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MagnitudeFilter {
    limits: Vec<(String, MagnitudeRange)>,
}

impl MagnitudeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the limit for a band
    pub fn insert(&mut self, band: impl Into<String>, range: MagnitudeRange) {
        let band = band.into();
        match self.limits.iter_mut().find(|(name, _)| *name == band) {
            Some(entry) => entry.1 = range,
            None => self.limits.push((band, range)),
        }
    }

    pub fn with(mut self, band: impl Into<String>, min: f64, max: f64) -> Self {
        self.insert(band, MagnitudeRange::new(min, max));
        self
    }

    /// Validate every band against the catalog's supported set.
    ///
    /// Fails on the first band the catalog does not offer.
    pub fn resolve(&self, catalog: Catalog) -> Result<Vec<(Band, MagnitudeRange)>> {
        self.limits
            .iter()
            .map(|(name, range)| {
                Band::from_letter(name)
                    .filter(|band| catalog.supports(*band))
                    .map(|band| (band, *range))
                    .ok_or_else(|| CatalogError::InvalidBand {
                        catalog,
                        band: name.clone(),
                    })
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, MagnitudeRange)> for MagnitudeFilter {
    fn from_iter<I: IntoIterator<Item = (S, MagnitudeRange)>>(iter: I) -> Self {
        let mut filter = MagnitudeFilter::new();
        for (band, range) in iter {
            filter.insert(band, range);
        }
        filter
    }
}

/// Parse one magnitude column.
///
/// A token containing `---` is a missing measurement. Otherwise an optional
/// sign followed by the leading run of digits and decimal points is the value
/// and anything after it (quality flags, source annotations) is ignored.
/// Stars brighter than magnitude 0 carry a negative value.
pub fn parse_magnitude(token: &str) -> std::result::Result<Option<f64>, String> {
    if token.contains(MISSING_MAGNITUDE) {
        return Ok(None);
    }

    let token = token.trim_start();
    let sign = usize::from(token.starts_with(['-', '+']));
    let end = token[sign..]
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .map_or(token.len(), |end| sign + end);
    let number = &token[..end];

    if number.len() == sign {
        return Err(format!("no magnitude value in {:?}", token));
    }

    number
        .parse::<f64>()
        .map(Some)
        .map_err(|e| format!("invalid magnitude {:?}: {}", number, e))
}
