//! Cone query parameters and the position encodings each catalog expects

use super::MagnitudeFilter;

/// Result cap used when a query does not give one
pub const DEFAULT_MAX_STARS: usize = 1000;

/// Position + radius + optional limits, common to every catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ConeQuery {
    /// Right ascension in degrees (ICRS)
    pub ra: f64,
    /// Declination in degrees (ICRS)
    pub dec: f64,
    /// Search radius in arcseconds
    pub radius_arcsec: f64,
    /// Maximum number of stars to return
    pub max: Option<usize>,
    pub mag: MagnitudeFilter,
}

impl ConeQuery {
    pub fn new(ra: f64, dec: f64, radius_arcsec: f64) -> Self {
        Self {
            ra,
            dec,
            radius_arcsec,
            max: None,
            mag: MagnitudeFilter::new(),
        }
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Add a magnitude limit for one band
    pub fn with_magnitude(mut self, band: &str, min: f64, max: f64) -> Self {
        self.mag = self.mag.with(band, min, max);
        self
    }

    /// Star limit passed to the search programs; an unset or zero `max` means the default
    pub fn max_stars(&self) -> usize {
        self.max.filter(|&max| max > 0).unwrap_or(DEFAULT_MAX_STARS)
    }

    pub fn radius_degrees(&self) -> f64 {
        self.radius_arcsec / 3600.0
    }

    /// Position argument for the local search programs
    pub fn position_token(&self) -> String {
        position_token(self.ra, self.dec)
    }
}

/// `"{ra}+{dec}"` for northern positions; for southern ones the minus sign of
/// dec is the separator.
pub fn position_token(ra: f64, dec: f64) -> String {
    if dec >= 0.0 {
        format!("{:.6}+{:.6}", ra, dec)
    } else {
        format!("{:.6}{:.6}", ra, dec)
    }
}

/// RA and Dec as fixed-point fields with 8 decimals, no separator.
///
/// Each field is zero-padded to at least 11 characters, sign included, and
/// grows past that for larger values (`180.0` gives `"180.00000000"`).
pub fn gaia_radec(ra: f64, dec: f64) -> String {
    format!("{:011.8}{:011.8}", ra, dec)
}
