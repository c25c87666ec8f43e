//! Queries against a local copy of the NOMAD1 catalog

use super::local::{self, coordinate_token, split_fields, LocalOverrides};
use super::{CommandExecutor, ConeSearch, SystemExecutor};
use crate::config::LocalCatalogConfig;
use crate::error::Result;
use crate::models::{parse_magnitude, Catalog, ConeQuery, Nomad1Star};

/// NOMAD1 search program wrapper
pub struct Nomad1Catalog<E = SystemExecutor> {
    config: LocalCatalogConfig,
    executor: E,
}

impl Nomad1Catalog<SystemExecutor> {
    pub fn new(config: LocalCatalogConfig) -> Self {
        Self::with_executor(config, SystemExecutor)
    }
}

impl<E: CommandExecutor> Nomad1Catalog<E> {
    pub fn with_executor(config: LocalCatalogConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn query_with(&self, query: &ConeQuery, overrides: &LocalOverrides) -> Result<Vec<Nomad1Star>> {
        local::run_query(
            Catalog::Nomad1,
            &self.config,
            overrides,
            &self.executor,
            query,
            parse_line,
        )
    }
}

impl<E: CommandExecutor> ConeSearch for Nomad1Catalog<E> {
    type Star = Nomad1Star;

    fn catalog(&self) -> Catalog {
        Catalog::Nomad1
    }

    fn query(&self, query: &ConeQuery) -> Result<Vec<Nomad1Star>> {
        self.query_with(query, &LocalOverrides::default())
    }
}

/// One data line:
/// `id | flags | coords | flags | flags | B V R | J H K | R | flags`
pub fn parse_line(line: &str) -> std::result::Result<Nomad1Star, String> {
    let [_id, _, coords, _, _, bvr, jhk, r, _] = split_fields::<9>(line)?;

    let [bmag, vmag, rmag] = split_magnitudes(bvr, "B V R")?;
    let [jmag, hmag, kmag] = split_magnitudes(jhk, "J H K")?;

    let r = r.trim();
    let r = if r.is_empty() {
        None
    } else {
        Some(
            r.parse::<f64>()
                .map_err(|e| format!("invalid distance {:?}: {}", r, e))?,
        )
    };

    Ok(Nomad1Star {
        radec: coordinate_token(coords)?,
        bmag,
        vmag,
        rmag,
        jmag,
        hmag,
        kmag,
        r,
    })
}

fn split_magnitudes(group: &str, bands: &str) -> std::result::Result<[Option<f64>; 3], String> {
    let tokens: Vec<&str> = group.split_whitespace().collect();
    let [a, b, c] = tokens.as_slice() else {
        return Err(format!(
            "expected 3 magnitudes in {} group, found {}",
            bands,
            tokens.len()
        ));
    };
    Ok([parse_magnitude(a)?, parse_magnitude(b)?, parse_magnitude(c)?])
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::catalogs::executor::testing::StubExecutor;
    use crate::error::CatalogError;

    const LINE: &str = "0900-0012345|  |010.123456+20.654321 Tycho|  0.0   0.0|  |\
                        12.345T 11.800Y ---  |10.111 9.876 ---|  3.21|  ";

    fn config() -> LocalCatalogConfig {
        LocalCatalogConfig {
            exe: PathBuf::from("findnomad1"),
            data_dir: PathBuf::from("/cat/nomad1"),
        }
    }

    #[test]
    fn test_parse_line() {
        let star = parse_line(LINE).unwrap();
        assert_eq!(
            star,
            Nomad1Star {
                radec: "010.123456+20.654321".to_string(),
                bmag: Some(12.345),
                vmag: Some(11.8),
                rmag: None,
                jmag: Some(10.111),
                hmag: Some(9.876),
                kmag: None,
                r: Some(3.21),
            }
        );
    }

    #[test]
    fn test_blank_distance() {
        let line = "1|f|5.0-1.0|f|f|10.0 11.0 12.0|9.0 8.0 7.0|   |f";
        let star = parse_line(line).unwrap();
        assert_eq!(star.r, None);
        assert_eq!(star.radec, "5.0-1.0");
        assert_eq!(star.kmag, Some(7.0));
    }

    #[test]
    fn test_wrong_field_count() {
        assert!(parse_line("1|f|5.0-1.0|f|f|10.0 11.0 12.0|9.0 8.0 7.0|1.0").is_err());
    }

    #[test]
    fn test_short_magnitude_group() {
        let err = parse_line("1|f|5.0-1.0|f|f|10.0 11.0|9.0 8.0 7.0||f").unwrap_err();
        assert!(err.contains("B V R"));
    }

    #[test]
    fn test_query_end_to_end() {
        let output = format!("#NOMAD1 query\n#RA Dec\n{}\n", LINE);
        let executor = StubExecutor::replying(output);
        let catalog = Nomad1Catalog::with_executor(config(), &executor);

        let query = ConeQuery::new(10.0, -20.5, 120.0)
            .with_max(20)
            .with_magnitude("K", 5.0, 9.5)
            .with_magnitude("B", 10.0, 14.0);
        let stars = catalog.query(&query).unwrap();
        assert_eq!(stars.len(), 1);
        assert_eq!(stars[0].bmag, Some(12.345));

        let calls = executor.calls();
        assert_eq!(
            calls[0].1,
            vec![
                "-R",
                "/cat/nomad1",
                "-c",
                "10.000000-20.500000",
                "-rs",
                "120",
                "-m",
                "20",
                "-lcK",
                "5.000000,9.500000",
                "-lcB",
                "10.000000,14.000000",
            ]
        );
    }

    #[test]
    fn test_unsupported_band_never_runs_program() {
        let executor = StubExecutor::replying(LINE);
        let catalog = Nomad1Catalog::with_executor(config(), &executor);

        let err = catalog
            .query(&ConeQuery::new(10.0, 20.0, 60.0).with_magnitude("F", 10.0, 15.0))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Magnitude band F not available in NOMAD1 catalog"
        );
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn test_malformed_line_aborts_query() {
        let executor = StubExecutor::replying(format!("{}\n# trailer\nbroken line\n", LINE));
        let catalog = Nomad1Catalog::with_executor(config(), &executor);

        let err = catalog.query(&ConeQuery::new(10.0, 20.0, 60.0)).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Parse { catalog: Catalog::Nomad1, line_number: 3, .. }
        ));
    }
}
