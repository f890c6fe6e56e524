use std::sync::Arc;

use crate::middleware::IdentityProvider;
use crate::services::dispatcher::AnalysisDispatcher;
use crate::services::store::ResearchStore;

pub use crate::db::DbConn;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResearchStore>,
    pub dispatcher: AnalysisDispatcher,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ResearchStore>,
        dispatcher: AnalysisDispatcher,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            identity,
        }
    }
}
