//! Catalog locations: Gaia archive endpoint and local search program installs

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "CATALOGS_CONFIG";

const CONFIG_FILE: &str = "catalogs.json";

pub const DEFAULT_TAP_URL: &str = "https://gea.esac.esa.int/tap-server/tap/sync";
pub const DEFAULT_GAIA_TABLE: &str = "gaiadr3.gaia_source";

/// Gaia archive settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaiaConfig {
    /// Synchronous TAP endpoint
    pub tap_url: String,
    /// Source table queried by cone searches
    pub table: String,
}

impl Default for GaiaConfig {
    fn default() -> Self {
        Self {
            tap_url: DEFAULT_TAP_URL.to_string(),
            table: DEFAULT_GAIA_TABLE.to_string(),
        }
    }
}

/// Install location of a local catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCatalogConfig {
    /// Search program
    pub exe: PathBuf,
    /// Directory holding the catalog data files
    pub data_dir: PathBuf,
}

/// Catalog configuration injected into every adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub gaia: GaiaConfig,
    pub gsc23: LocalCatalogConfig,
    pub nomad1: LocalCatalogConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            gaia: GaiaConfig::default(),
            gsc23: LocalCatalogConfig {
                exe: PathBuf::from("gsc23"),
                data_dir: PathBuf::from("/data/catalogs/gsc23"),
            },
            nomad1: LocalCatalogConfig {
                exe: PathBuf::from("findnomad1"),
                data_dir: PathBuf::from("/data/catalogs/nomad1"),
            },
        }
    }
}

impl CatalogConfig {
    /// Load the configuration file, falling back to defaults when none exists.
    ///
    /// `CATALOGS_CONFIG` takes precedence over the platform config directory.
    pub fn load() -> Result<Self> {
        let path = match env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::info!("No catalog configuration file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::from_file(&path)
    }

    /// Read a configuration file. Missing sections keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&data).map_err(|e| match e {
            CatalogError::Config(msg) => {
                CatalogError::Config(format!("{} in {}", msg, path.display()))
            }
            other => other,
        })?;
        tracing::info!("Loaded catalog configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data)
            .map_err(|e| CatalogError::Config(format!("Failed to parse configuration: {}", e)))
    }

    /// Platform configuration file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "catalogs", "catalogs")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}
