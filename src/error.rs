//! Error handling module
//!
//! Every adapter failure becomes an [`AppError`]; handlers return it with `?`
//! and the conversion below turns it into the uniform error envelope.
//! Logging is left to the diagnostics middleware, which reads the
//! [`ErrorDetail`] extension attached to the response.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use deadpool_postgres::PoolError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// Only timeouts waiting for or opening a connection
    #[error("Pool error: {0}")]
    Pool(PoolError),

    #[error("Connection pool saturated: {0}")]
    Saturated(String),

    #[error("Document store error: {0}")]
    Document(#[from] mongodb::error::Error),

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error response structure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// Short, caller-facing message
    pub error: String,
    pub code: String,
    /// Upstream detail, present for backend failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Full error text carried on failed responses for the diagnostics middleware
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::Json(e) => e.status(),
            AppError::Pool(_) | AppError::Saturated(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_)
            | AppError::Document(_)
            | AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn parts(&self) -> (&'static str, String, Option<String>) {
        match self {
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone(), None),
            AppError::BadRequest(msg) => ("BAD_REQUEST", msg.clone(), None),
            AppError::Multipart(e) => ("INVALID_MULTIPART", e.body_text(), None),
            AppError::Json(e) => ("INVALID_JSON", e.body_text(), None),
            AppError::Database(e) => (
                "DATABASE_ERROR",
                "Erro ao acessar o banco de dados.".to_string(),
                Some(e.to_string()),
            ),
            AppError::Pool(e) => (
                "POOL_EXHAUSTED",
                "Nenhuma conexão disponível com o banco de dados.".to_string(),
                Some(e.to_string()),
            ),
            AppError::Saturated(msg) => (
                "POOL_SATURATED",
                "Servidor ocupado, tente novamente.".to_string(),
                Some(msg.clone()),
            ),
            AppError::Document(e) => (
                "DOCUMENT_STORE_ERROR",
                "Erro ao acessar o MongoDB.".to_string(),
                Some(e.to_string()),
            ),
            AppError::Storage(msg) => (
                "STORAGE_ERROR",
                "Erro ao acessar o armazenamento de objetos.".to_string(),
                Some(msg.clone()),
            ),
            AppError::Internal(msg) => (
                "INTERNAL_ERROR",
                "Erro interno do servidor.".to_string(),
                Some(msg.clone()),
            ),
            AppError::Config(msg) => (
                "CONFIG_ERROR",
                "Erro de configuração do servidor.".to_string(),
                Some(msg.clone()),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, error, details) = self.parts();

        let body = Json(ErrorResponse {
            success: false,
            error,
            code: code.to_string(),
            details,
        });

        let mut response = (status, body).into_response();
        response
            .extensions_mut()
            .insert(ErrorDetail(self.to_string()));
        response
    }
}

impl From<PoolError> for AppError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Backend(e) => AppError::Database(e),
            timeout @ PoolError::Timeout(_) => AppError::Pool(timeout),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}
