//! Per-request resolution of the shared primary database connection.
//!
//! The first extraction in a request walks `AppState → registry → primary`
//! and caches the handle in request extensions; every later extraction in
//! the same request is a plain extensions lookup. No path here performs
//! network I/O — the connection was established once, at startup.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::db::connection::SharedConn;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Request-scoped handle to the primary database connection.
///
/// Cloning is cheap (one `Arc` clone); all clones within a request and
/// across requests point at the same underlying connection.
#[derive(Clone, Debug)]
pub struct DbConn(SharedConn);

impl DbConn {
    pub fn handle(&self) -> &SharedConn {
        &self.0
    }

    fn from_extensions(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<Self>().cloned()
    }

    fn insert_into_extensions(&self, req: &HttpRequest) {
        req.extensions_mut().insert(self.clone());
    }
}

/// Resolve the primary connection for this request, memoized in extensions.
///
/// The registry is consulted at most once per request; a cache hit returns
/// the stored handle unchanged, without re-validating liveness.
pub fn resolve_conn(req: &HttpRequest) -> Result<DbConn, AppError> {
    if let Some(cached) = DbConn::from_extensions(req) {
        return Ok(cached);
    }

    let registry = req
        .app_data::<web::Data<AppState>>()
        .and_then(|state| state.registry())
        .ok_or(AppError::RegistryUnavailable)?;
    let conn = registry.primary().ok_or(AppError::NoPrimaryDatabase)?;

    let resolved = DbConn(conn.clone());
    resolved.insert_into_extensions(req);
    Ok(resolved)
}

impl FromRequest for DbConn {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(resolve_conn(req))
    }
}
