pub mod catalog;
pub mod magnitude;
pub mod query;
pub mod star;

pub use catalog::*;
pub use magnitude::*;
pub use query::*;
pub use star::*;
