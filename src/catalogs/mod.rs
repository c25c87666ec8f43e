//! Catalog adapters
//!
//! Each adapter turns a [`ConeQuery`] into the catalog's own request (an ADQL
//! query for Gaia, a search program command line for the local catalogs) and
//! maps the response onto that catalog's star record.

pub mod executor;
pub mod gaia;
pub mod gsc23;
pub mod local;
pub mod nomad1;

pub use executor::{CommandExecutor, SystemExecutor};
pub use gaia::{ConeSearchService, GaiaCatalog, GaiaRow, GaiaTapService};
pub use gsc23::Gsc23Catalog;
pub use local::LocalOverrides;
pub use nomad1::Nomad1Catalog;

use crate::error::Result;
use crate::models::{Catalog, ConeQuery};

/// Position + radius search returning one catalog's records
pub trait ConeSearch {
    /// Star record type for this catalog
    type Star;

    fn catalog(&self) -> Catalog;

    /// Run the query. Every record is built fresh for this call.
    fn query(&self, query: &ConeQuery) -> Result<Vec<Self::Star>>;
}
