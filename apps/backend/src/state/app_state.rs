use std::sync::Arc;

use crate::config::settings::Settings;
use crate::db::connection::{ConnectionProvider, NetDialer, SharedConn};
use crate::db::registry::DbRegistry;
use crate::error::AppError;

/// Process-wide application state shared by all requests.
///
/// Built fully before the server starts accepting connections; after that it
/// is only ever read. The registry is optional so tests can exercise the
/// "startup never ran" failure path.
#[derive(Clone, Debug)]
pub struct AppState {
    registry: Option<Arc<DbRegistry>>,
}

impl AppState {
    /// State with an established database registry.
    pub fn new(registry: DbRegistry) -> Self {
        Self {
            registry: Some(Arc::new(registry)),
        }
    }

    /// State with no registry at all (for testing the unconfigured path).
    pub fn without_registry() -> Self {
        Self { registry: None }
    }

    pub fn registry(&self) -> Option<&DbRegistry> {
        self.registry.as_deref()
    }
}

/// Builder for [`AppState`], used by both `main` and tests.
///
/// Consuming `build` is what makes the registry single-shot: there is no way
/// to re-ensure the primary connection for an already-built state.
pub struct StateBuilder {
    settings: Option<Settings>,
    provider: Box<dyn ConnectionProvider>,
    conn: Option<SharedConn>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            settings: None,
            provider: Box::new(NetDialer),
            conn: None,
        }
    }

    /// Configure the backend from settings; the primary connection is dialed
    /// during `build`.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Replace the production dialer (tests substitute a fake here).
    pub fn with_provider(mut self, provider: impl ConnectionProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    /// Inject a pre-built connection, bypassing parsing and dialing entirely.
    pub fn with_conn(mut self, conn: SharedConn) -> Self {
        self.conn = Some(conn);
        self
    }

    /// Build the state, dialing the primary database if settings were given.
    ///
    /// This is the startup barrier: by the time it returns `Ok`, every
    /// request can resolve the primary connection without I/O.
    pub async fn build(self) -> Result<AppState, AppError> {
        if let Some(conn) = self.conn {
            return Ok(AppState::new(DbRegistry::with_primary(conn)));
        }
        match self.settings {
            Some(settings) => {
                let registry =
                    DbRegistry::ensure_primary(&settings, self.provider.as_ref()).await?;
                Ok(AppState::new(registry))
            }
            None => Ok(AppState::without_registry()),
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::settings::{KEY_ADDR, KEY_PASSWORD, KEY_USERNAME};
    use crate::test_support::{FakeConn, FakeDialer};

    #[tokio::test]
    async fn test_build_without_settings_has_no_registry() {
        let state = build_state().build().await.unwrap();
        assert!(state.registry().is_none());
    }

    #[tokio::test]
    async fn test_build_with_injected_conn_skips_settings_entirely() {
        let conn: SharedConn = Arc::new(FakeConn::named("injected"));
        let state = build_state().with_conn(conn.clone()).build().await.unwrap();

        let registry = state.registry().expect("registry built");
        let primary = registry.primary().expect("primary registered");
        assert!(Arc::ptr_eq(primary, &conn));
    }

    #[tokio::test]
    async fn test_build_with_settings_dials_through_provider() {
        let settings = Settings::from_pairs([
            (KEY_ADDR, "db.internal:8001"),
            (KEY_USERNAME, "svc"),
            (KEY_PASSWORD, "secret"),
        ]);
        let state = build_state()
            .with_settings(settings)
            .with_provider(FakeDialer::new())
            .build()
            .await
            .unwrap();

        let registry = state.registry().expect("registry built");
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_build_surfaces_configuration_errors() {
        let settings = Settings::from_pairs([(KEY_ADDR, "db.internal:8001")]);
        let err = build_state()
            .with_settings(settings)
            .with_provider(FakeDialer::new())
            .build()
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MISSING_CREDENTIAL");
    }
}
