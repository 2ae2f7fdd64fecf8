//! Fakes for the connection layer, shared by unit and integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::db::connection::{BackendConn, ConnectionProvider, SharedConn};
use crate::db::endpoint::Endpoint;
use crate::error::AppError;

/// In-memory stand-in for an established backend connection.
#[derive(Debug)]
pub struct FakeConn {
    label: String,
}

impl FakeConn {
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl BackendConn for FakeConn {
    fn describe(&self) -> String {
        format!("fake:{}", self.label)
    }
}

/// [`ConnectionProvider`] that records dial attempts instead of touching the
/// network. Optionally fails every dial with a fixed error.
pub struct FakeDialer {
    dials: AtomicUsize,
    failure: Option<String>,
}

impl FakeDialer {
    pub fn new() -> Self {
        Self {
            dials: AtomicUsize::new(0),
            failure: None,
        }
    }

    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            dials: AtomicUsize::new(0),
            failure: Some(detail.into()),
        }
    }

    /// How many times `connect` was invoked.
    pub fn dial_count(&self) -> usize {
        self.dials.load(Ordering::SeqCst)
    }
}

impl Default for FakeDialer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionProvider for FakeDialer {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        username: &str,
        _password: &str,
    ) -> Result<SharedConn, AppError> {
        self.dials.fetch_add(1, Ordering::SeqCst);
        if let Some(detail) = &self.failure {
            return Err(AppError::db(detail.clone()));
        }
        Ok(Arc::new(FakeConn::named(format!("{username}@{endpoint}"))))
    }
}
