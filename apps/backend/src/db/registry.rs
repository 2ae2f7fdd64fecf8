use std::collections::HashMap;

use tracing::info;

use crate::config::settings::{Settings, KEY_PASSWORD, KEY_USERNAME};
use crate::db::connection::{ConnectionProvider, SharedConn};
use crate::db::endpoint::parse_endpoint;
use crate::error::AppError;

/// Name of the primary (default) database.
pub const PRIMARY_DB: &str = "";

/// Process-wide mapping from database name to established connection.
///
/// Built exactly once during startup, before the server begins accepting
/// requests, and read-only afterwards. Steady-state lookups take no lock.
#[derive(Debug, Default)]
pub struct DbRegistry {
    databases: HashMap<String, SharedConn>,
}

impl DbRegistry {
    /// Registry holding a single pre-built primary connection.
    ///
    /// This is the injection seam for tests and embedded callers: no address
    /// parsing and no dialing happens on this path.
    pub fn with_primary(conn: SharedConn) -> Self {
        let mut databases = HashMap::new();
        databases.insert(PRIMARY_DB.to_string(), conn);
        Self { databases }
    }

    /// Establish the primary connection from settings.
    ///
    /// Validates configuration before any dial attempt: a missing or
    /// malformed address and a missing username or password are each distinct
    /// fatal errors. Dials exactly once on success.
    ///
    /// Call this at most once per process, at startup. Nothing ever removes
    /// entries from the returned registry.
    pub async fn ensure_primary(
        settings: &Settings,
        provider: &dyn ConnectionProvider,
    ) -> Result<Self, AppError> {
        let addr = settings.addr().unwrap_or_default();
        let endpoint = parse_endpoint(addr)?.ok_or(AppError::MissingEndpoint)?;
        let username = settings
            .username()
            .ok_or_else(|| AppError::missing_credential(KEY_USERNAME))?;
        let password = settings
            .password()
            .ok_or_else(|| AppError::missing_credential(KEY_PASSWORD))?;

        let conn = provider.connect(&endpoint, username, password).await?;
        info!(endpoint = %endpoint, "primary database registered");
        Ok(Self::with_primary(conn))
    }

    /// Connection for the primary database, if one was registered.
    pub fn primary(&self) -> Option<&SharedConn> {
        self.get(PRIMARY_DB)
    }

    /// Connection for a named database.
    pub fn get(&self, name: &str) -> Option<&SharedConn> {
        self.databases.get(name)
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}
