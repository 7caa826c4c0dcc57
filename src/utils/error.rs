use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

use crate::services::NotificadorError;

#[derive(Debug)]
pub enum AppError {
    /// Parâmetros de recorrência malformados (intervalo zero, dia do mês fora de 1-31)
    RegraInvalida(String),
    /// Rótulo de papel fora do conjunto fechado master/proprietario/gestor/colaborador
    PapelInvalido(String),
    /// Contexto de autorização sem empresa ao filtrar tarefas de empresa
    ContextoEmpresaAusente,
    NotificacaoApi(String),
    ConfigError(String),
    JsonError(serde_json::Error),
    HttpError(reqwest::Error),
    ValidationError(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::RegraInvalida(msg) => write!(f, "Invalid recurrence rule: {}", msg),
            AppError::PapelInvalido(msg) => write!(f, "Invalid role: {}", msg),
            AppError::ContextoEmpresaAusente => write!(f, "Missing company context"),
            AppError::NotificacaoApi(msg) => write!(f, "Automation pipeline error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
            AppError::HttpError(err) => write!(f, "HTTP error: {}", err),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpError(err)
    }
}

impl From<NotificadorError> for AppError {
    fn from(err: NotificadorError) -> Self {
        AppError::NotificacaoApi(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::RegraInvalida(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PapelInvalido(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ContextoEmpresaAusente => {
                (StatusCode::BAD_REQUEST, "empresa_id ausente no contexto".to_string())
            }
            AppError::NotificacaoApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::JsonError(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::HttpError(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
