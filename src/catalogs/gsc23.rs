//! Queries against a local copy of the GSC2.3 catalog

use super::local::{self, coordinate_token, split_fields, LocalOverrides};
use super::{CommandExecutor, ConeSearch, SystemExecutor};
use crate::config::LocalCatalogConfig;
use crate::error::Result;
use crate::models::{parse_magnitude, Catalog, ConeQuery, Gsc23Star};

/// GSC2.3 search program wrapper
pub struct Gsc23Catalog<E = SystemExecutor> {
    config: LocalCatalogConfig,
    executor: E,
}

impl Gsc23Catalog<SystemExecutor> {
    pub fn new(config: LocalCatalogConfig) -> Self {
        Self::with_executor(config, SystemExecutor)
    }
}

impl<E: CommandExecutor> Gsc23Catalog<E> {
    pub fn with_executor(config: LocalCatalogConfig, executor: E) -> Self {
        Self { config, executor }
    }

    /// Cone search, optionally overriding the search program or data directory
    pub fn query_with(&self, query: &ConeQuery, overrides: &LocalOverrides) -> Result<Vec<Gsc23Star>> {
        local::run_query(
            Catalog::Gsc23,
            &self.config,
            overrides,
            &self.executor,
            query,
            parse_line,
        )
    }
}

impl<E: CommandExecutor> ConeSearch for Gsc23Catalog<E> {
    type Star = Gsc23Star;

    fn catalog(&self) -> Catalog {
        Catalog::Gsc23
    }

    fn query(&self, query: &ConeQuery) -> Result<Vec<Gsc23Star>> {
        self.query_with(query, &LocalOverrides::default())
    }
}

/// One data line:
/// `num | coords | Fmag | Jmag | Vmag | Nmag | Umag | Bmag | class | size | R`
pub fn parse_line(line: &str) -> std::result::Result<Gsc23Star, String> {
    let [_num, coords, fmag, jmag, vmag, nmag, umag, bmag, _class, _size, r] =
        split_fields::<11>(line)?;

    Ok(Gsc23Star {
        radec: coordinate_token(coords)?,
        fmag: parse_magnitude(fmag)?,
        jmag: parse_magnitude(jmag)?,
        vmag: parse_magnitude(vmag)?,
        nmag: parse_magnitude(nmag)?,
        umag: parse_magnitude(umag)?,
        bmag: parse_magnitude(bmag)?,
        r: parse_distance(r)?,
    })
}

// The distance column carries a one-character flag before the value
fn parse_distance(field: &str) -> std::result::Result<f64, String> {
    let mut chars = field.chars();
    chars.next();
    let value = chars.as_str().trim();
    value
        .parse::<f64>()
        .map_err(|e| format!("invalid distance {:?}: {}", field, e))
}
