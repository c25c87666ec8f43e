//! Catalogs - uniform cone searches over star catalogs
//!
//! Queries the Gaia DR3 archive and locally installed GSC2.3 and NOMAD1 search
//! programs by position, radius and magnitude limits, returning typed star
//! records. Also exposed as an MCP server.

pub mod catalogs;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

pub use catalogs::{ConeSearch, GaiaCatalog, Gsc23Catalog, LocalOverrides, Nomad1Catalog};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use server::CatalogServer;
