use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::extractors::db_session::DbSession;

async fn health() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("ok"))
}

/// Reports which backend the primary connection points at. Resolution is a
/// cached lookup; this handler never dials.
async fn db_status(session: DbSession) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "database": "primary",
        "backend": session.backend(),
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/db/status", web::get().to(db_status));
}
