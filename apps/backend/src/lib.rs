#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod test_support;

// Re-exports for public API
pub use config::settings::Settings;
pub use db::connection::{BackendConn, ConnectionProvider, NetDialer, SharedConn};
pub use db::endpoint::{parse_endpoint, Endpoint};
pub use db::registry::{DbRegistry, PRIMARY_DB};
pub use error::AppError;
pub use extractors::db_conn::DbConn;
pub use extractors::db_session::DbSession;
pub use middleware::request_trace::RequestTrace;
pub use state::app_state::{build_state, AppState, StateBuilder};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
