//! Cone searches against the Gaia DR3 archive

use serde::Deserialize;
use serde_json::Value;

use super::ConeSearch;
use crate::config::GaiaConfig;
use crate::error::{CatalogError, Result};
use crate::models::{gaia_radec, Band, Catalog, ConeQuery, GaiaStar, MagnitudeRange};

/// One row of a remote cone search
#[derive(Debug, Clone, PartialEq)]
pub struct GaiaRow {
    pub designation: String,
    pub ra: f64,
    pub dec: f64,
    pub phot_bp_mean_mag: Option<f64>,
    pub phot_rp_mean_mag: Option<f64>,
}

/// Remote service answering position + radius queries
pub trait ConeSearchService {
    /// `ra`, `dec` and `radius` are all in degrees
    fn cone_search(&self, ra: f64, dec: f64, radius: f64) -> Result<Vec<GaiaRow>>;
}

impl<S: ConeSearchService + ?Sized> ConeSearchService for &S {
    fn cone_search(&self, ra: f64, dec: f64, radius: f64) -> Result<Vec<GaiaRow>> {
        (**self).cone_search(ra, dec, radius)
    }
}

/// Synchronous TAP client for the ESA Gaia archive
pub struct GaiaTapService {
    config: GaiaConfig,
    client: reqwest::blocking::Client,
}

impl GaiaTapService {
    /// The client never times out: a slow archive blocks the caller until it answers.
    pub fn new(config: GaiaConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("catalogs/", env!("CARGO_PKG_VERSION")))
            .timeout(None)
            .build()?;
        Ok(Self { config, client })
    }

    /// ADQL for a cone search, nearest sources first
    pub fn adql(&self, ra: f64, dec: f64, radius: f64) -> String {
        format!(
            "SELECT DISTANCE(POINT('ICRS', ra, dec), POINT('ICRS', {ra}, {dec})) AS dist, \
             designation, ra, dec, phot_bp_mean_mag, phot_rp_mean_mag \
             FROM {table} \
             WHERE 1 = CONTAINS(POINT('ICRS', ra, dec), CIRCLE('ICRS', {ra}, {dec}, {radius})) \
             ORDER BY dist ASC",
            ra = ra,
            dec = dec,
            radius = radius,
            table = self.config.table,
        )
    }
}

impl ConeSearchService for GaiaTapService {
    fn cone_search(&self, ra: f64, dec: f64, radius: f64) -> Result<Vec<GaiaRow>> {
        let adql = self.adql(ra, dec, radius);
        tracing::debug!("Gaia ADQL: {}", adql);

        let params = [
            ("REQUEST", "doQuery"),
            ("LANG", "ADQL"),
            ("FORMAT", "json"),
            ("QUERY", adql.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.tap_url)
            .form(&params)
            .send()?
            .error_for_status()?;

        let body: TapResponse = response.json()?;
        body.into_rows()
    }
}

#[derive(Debug, Deserialize)]
struct TapColumn {
    name: String,
}

/// TAP `FORMAT=json` payload: column metadata plus row-major data
#[derive(Debug, Deserialize)]
struct TapResponse {
    metadata: Vec<TapColumn>,
    data: Vec<Vec<Value>>,
}

impl TapResponse {
    fn column(&self, name: &str) -> Result<usize> {
        self.metadata
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::RemoteFormat(format!("missing column {}", name)))
    }

    fn into_rows(self) -> Result<Vec<GaiaRow>> {
        let designation = self.column("designation")?;
        let ra = self.column("ra")?;
        let dec = self.column("dec")?;
        let bp = self.column("phot_bp_mean_mag")?;
        let rp = self.column("phot_rp_mean_mag")?;

        self.data
            .iter()
            .map(|row| -> Result<GaiaRow> {
                let cell = |index: usize| {
                    row.get(index).ok_or_else(|| {
                        CatalogError::RemoteFormat(format!(
                            "row has {} cells, expected at least {}",
                            row.len(),
                            index + 1
                        ))
                    })
                };
                let required = |index: usize, name: &str| -> Result<f64> {
                    cell(index)?
                        .as_f64()
                        .ok_or_else(|| CatalogError::RemoteFormat(format!("{} is not a number", name)))
                };

                Ok(GaiaRow {
                    designation: cell(designation)?
                        .as_str()
                        .ok_or_else(|| CatalogError::RemoteFormat("designation is not a string".into()))?
                        .to_string(),
                    ra: required(ra, "ra")?,
                    dec: required(dec, "dec")?,
                    phot_bp_mean_mag: cell(bp)?.as_f64(),
                    phot_rp_mean_mag: cell(rp)?.as_f64(),
                })
            })
            .collect()
    }
}

/// Gaia DR3 adapter
pub struct GaiaCatalog<S = GaiaTapService> {
    service: S,
}

impl GaiaCatalog<GaiaTapService> {
    pub fn new(config: GaiaConfig) -> Result<Self> {
        Ok(Self::with_service(GaiaTapService::new(config)?))
    }
}

impl<S: ConeSearchService> GaiaCatalog<S> {
    pub fn with_service(service: S) -> Self {
        Self { service }
    }
}

impl<S: ConeSearchService> ConeSearch for GaiaCatalog<S> {
    type Star = GaiaStar;

    fn catalog(&self) -> Catalog {
        Catalog::Gaia
    }

    /// The result cap is accepted for interface parity but not applied to the rows.
    fn query(&self, query: &ConeQuery) -> Result<Vec<GaiaStar>> {
        let limits = query.mag.resolve(Catalog::Gaia)?;

        let rows = self
            .service
            .cone_search(query.ra, query.dec, query.radius_degrees())?;
        let total = rows.len();

        let stars: Vec<GaiaStar> = rows
            .into_iter()
            .filter(|row| within_limits(row, &limits))
            .map(|row| GaiaStar {
                radec: gaia_radec(row.ra, row.dec),
                id: row.designation,
                bmag: row.phot_bp_mean_mag,
                rmag: row.phot_rp_mean_mag,
            })
            .collect();

        tracing::info!(
            "Gaia query returned {} stars ({} outside magnitude limits)",
            stars.len(),
            total - stars.len()
        );
        Ok(stars)
    }
}

// A row with no measurement in a limited band does not satisfy the limit
fn within_limits(row: &GaiaRow, limits: &[(Band, MagnitudeRange)]) -> bool {
    limits.iter().all(|(band, range)| {
        let magnitude = match band {
            Band::B => row.phot_bp_mean_mag,
            Band::R => row.phot_rp_mean_mag,
            _ => None,
        };
        magnitude.is_some_and(|m| range.contains(m))
    })
}
