//! Error types shared by every catalog adapter

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::models::Catalog;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Magnitude band not offered by the catalog being queried
    #[error("Magnitude band {band} not available in {catalog} catalog")]
    InvalidBand { catalog: Catalog, band: String },

    #[error("Failed to launch {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {status}: {stderr}", .program.display())]
    ProcessFailed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    /// A data line that does not match the catalog's column layout
    #[error("Malformed {catalog} line {line_number} ({reason}): {line:?}")]
    Parse {
        catalog: Catalog,
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("Gaia archive request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Unexpected Gaia archive response: {0}")]
    RemoteFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
