pub mod catalog;
pub mod identity;
pub mod recommendations;
pub mod search;

pub use catalog::{MovieCatalog, TmdbClient};
pub use identity::{IdentityProvider, IdentityToolkitClient};
pub use recommendations::generate_recommendations;
