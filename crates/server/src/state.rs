//! Application state shared across handlers.

use std::sync::Arc;

use advisory::AdvisoryGateway;
use database::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Database,
    /// External advisory providers.
    pub advisory: Arc<AdvisoryGateway>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, advisory: AdvisoryGateway) -> Self {
        Self {
            db,
            advisory: Arc::new(advisory),
        }
    }
}
