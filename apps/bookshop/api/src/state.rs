//! Shared application state handed to routers at startup.

use database::postgres::DatabaseConnection;

/// Configuration plus the PostgreSQL pool. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
}
