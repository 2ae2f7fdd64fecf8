use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

/// RFC-7807-style error body returned for every failed request.
#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Endpoint string is non-empty but neither a local socket path nor host:port.
    #[error("Invalid endpoint: {detail}")]
    InvalidEndpoint { detail: String },
    /// No endpoint configured and no pre-built connection injected.
    #[error("No database endpoint configured")]
    MissingEndpoint,
    /// Endpoint is configured but a credential is absent.
    #[error("Missing credential: {name}")]
    MissingCredential { name: &'static str },
    /// Request-time lookup found no registry at all; startup never ran.
    #[error("No database registry available")]
    RegistryUnavailable,
    /// Registry exists but holds no primary database entry.
    #[error("No primary database in registry")]
    NoPrimaryDatabase,
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn invalid_endpoint(detail: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            detail: detail.into(),
        }
    }

    pub fn missing_credential(name: &'static str) -> Self {
        Self::MissingCredential { name }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    /// Stable machine-readable code for each variant.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidEndpoint { .. } => "INVALID_ENDPOINT",
            AppError::MissingEndpoint => "MISSING_ENDPOINT",
            AppError::MissingCredential { .. } => "MISSING_CREDENTIAL",
            AppError::RegistryUnavailable => "REGISTRY_UNAVAILABLE",
            AppError::NoPrimaryDatabase => "NO_PRIMARY_DATABASE",
            AppError::Config { .. } => "CONFIG_ERROR",
            AppError::Db { .. } => "DB_ERROR",
            AppError::Internal { .. } => "INTERNAL",
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::InvalidEndpoint { detail } => detail.clone(),
            AppError::MissingEndpoint => "No database endpoint configured".to_string(),
            AppError::MissingCredential { name } => {
                format!("Required credential '{name}' is not configured")
            }
            AppError::RegistryUnavailable => "No database registry available".to_string(),
            AppError::NoPrimaryDatabase => "No primary database in registry".to_string(),
            AppError::Config { detail } => detail.clone(),
            AppError::Db { detail } => detail.clone(),
            AppError::Internal { detail } => detail.clone(),
        }
    }

    /// All variants in this layer are configuration/startup-class failures.
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let body = ProblemDetails {
            type_: "about:blank".to_string(),
            title: status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string(),
            status: status.as_u16(),
            detail: self.detail(),
            code: self.code().to_string(),
        };
        HttpResponse::build(status).json(body)
    }
}
