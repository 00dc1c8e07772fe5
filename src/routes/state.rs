use std::sync::Arc;

use crate::{
    db::UserStore,
    services::{IdentityProvider, MovieCatalog},
};

/// Shared application state handed to every handler
pub struct AppState {
    pub catalog: Arc<dyn MovieCatalog>,
    pub store: Arc<dyn UserStore>,
    pub identity: Arc<dyn IdentityProvider>,
    /// Recommendations returned when the caller gives no limit
    pub recommendation_limit: usize,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        store: Arc<dyn UserStore>,
        identity: Arc<dyn IdentityProvider>,
        recommendation_limit: usize,
    ) -> Self {
        Self {
            catalog,
            store,
            identity,
            recommendation_limit,
        }
    }
}
