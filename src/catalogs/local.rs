//! Plumbing shared by the locally installed catalogs: command line building,
//! output decoding and line-oriented parsing.

use std::path::{Path, PathBuf};

use super::CommandExecutor;
use crate::config::LocalCatalogConfig;
use crate::error::{CatalogError, Result};
use crate::models::{Catalog, ConeQuery};

/// Per-call replacements for the configured install location.
///
/// An empty path counts as unset and falls back to the configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalOverrides {
    pub catalog_dir: Option<PathBuf>,
    pub exefile: Option<PathBuf>,
}

impl LocalOverrides {
    pub fn program<'a>(&'a self, config: &'a LocalCatalogConfig) -> &'a Path {
        non_empty(&self.exefile).unwrap_or(&config.exe)
    }

    pub fn data_dir<'a>(&'a self, config: &'a LocalCatalogConfig) -> &'a Path {
        non_empty(&self.catalog_dir).unwrap_or(&config.data_dir)
    }
}

fn non_empty(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

/// Build the search program arguments:
/// `-R <dir> -c <pos> -rs <radius> -m <max>` followed by one flag pair per
/// magnitude limit. Bands are validated before anything is built.
pub fn build_args(catalog: Catalog, data_dir: &Path, query: &ConeQuery) -> Result<Vec<String>> {
    let limits = query.mag.resolve(catalog)?;

    let mut args = vec![
        "-R".to_string(),
        data_dir.display().to_string(),
        "-c".to_string(),
        query.position_token(),
        "-rs".to_string(),
        query.radius_arcsec.to_string(),
        "-m".to_string(),
        query.max_stars().to_string(),
    ];

    for (band, range) in limits {
        if let Some(flag) = catalog.filter_flag(band) {
            args.push(flag);
            args.push(range.to_arg());
        }
    }

    Ok(args)
}

/// Decode program output as ASCII, dropping any byte outside the ASCII range
pub fn decode_ascii(raw: &[u8]) -> String {
    let text: String = raw
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect();
    let dropped = raw.len() - text.len();
    if dropped > 0 {
        tracing::warn!("Dropped {} non-ASCII bytes from catalog output", dropped);
    }
    text
}

/// Parse every data line of the output, skipping blank lines and `#` comments.
/// The first malformed line aborts the whole parse.
pub fn parse_lines<T, F>(catalog: Catalog, output: &str, parse_line: F) -> Result<Vec<T>>
where
    F: Fn(&str) -> std::result::Result<T, String>,
{
    let mut stars = Vec::new();

    for (index, line) in output.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let star = parse_line(line).map_err(|reason| CatalogError::Parse {
            catalog,
            line_number: index + 1,
            line: line.to_string(),
            reason,
        })?;
        stars.push(star);
    }

    Ok(stars)
}

/// Split a line on `|`, requiring exactly `N` fields
pub fn split_fields<const N: usize>(line: &str) -> std::result::Result<[&str; N], String> {
    let fields: Vec<&str> = line.split('|').collect();
    let count = fields.len();
    fields
        .try_into()
        .map_err(|_| format!("expected {} fields, found {}", N, count))
}

/// First whitespace-delimited token of a coordinates column, taken verbatim
pub fn coordinate_token(field: &str) -> std::result::Result<String, String> {
    field
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| "empty coordinates column".to_string())
}

/// Resolve the install location, run the search program and parse its output
pub fn run_query<T, E, F>(
    catalog: Catalog,
    config: &LocalCatalogConfig,
    overrides: &LocalOverrides,
    executor: &E,
    query: &ConeQuery,
    parse_line: F,
) -> Result<Vec<T>>
where
    E: CommandExecutor + ?Sized,
    F: Fn(&str) -> std::result::Result<T, String>,
{
    let program = overrides.program(config);
    let args = build_args(catalog, overrides.data_dir(config), query)?;

    tracing::debug!("Running {} search: {} {}", catalog, program.display(), args.join(" "));

    let raw = executor.run(program, &args)?;
    let output = decode_ascii(&raw);
    let stars = parse_lines(catalog, &output, parse_line)?;

    tracing::info!("{} query returned {} stars", catalog, stars.len());
    Ok(stars)
}
