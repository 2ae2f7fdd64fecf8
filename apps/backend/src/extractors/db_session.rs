use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::db::connection::SharedConn;
use crate::error::AppError;
use crate::extractors::db_conn::resolve_conn;

/// Request-scoped session over the primary database.
///
/// Built at most once per request (later extractions return the cached
/// session from request extensions) and discarded when the request ends.
/// Construction only clones the connection handle; no I/O.
#[derive(Clone)]
pub struct DbSession {
    conn: SharedConn,
}

impl DbSession {
    fn new(conn: SharedConn) -> Self {
        Self { conn }
    }

    /// The shared connection this session is bound to.
    pub fn conn(&self) -> &SharedConn {
        &self.conn
    }

    /// Where the underlying connection points, for status output.
    pub fn backend(&self) -> String {
        self.conn.describe()
    }

    fn from_extensions(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<Self>().cloned()
    }
}

/// Build the session for this request, memoized in extensions.
pub fn session_factory(req: &HttpRequest) -> Result<DbSession, AppError> {
    if let Some(cached) = DbSession::from_extensions(req) {
        return Ok(cached);
    }

    let conn = resolve_conn(req)?;
    let session = DbSession::new(conn.handle().clone());
    req.extensions_mut().insert(session.clone());
    Ok(session)
}

impl FromRequest for DbSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(session_factory(req))
    }
}
