use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "taskzap-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn ready_check(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    log_integration_status_check();

    // O pipeline de automação é a única dependência externa; sem URL
    // configurada os webhooks de notificação não funcionam
    let automacao_status = if state.notificador.configurado() {
        "configured"
    } else {
        "not_configured"
    };

    let overall_ready = automacao_status == "configured";

    let response = json!({
        "ready": overall_ready,
        "service": "taskzap-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dependencies": {
            "automacao": {
                "status": automacao_status,
            }
        }
    });

    if overall_ready {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

pub async fn status_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_integration_status_check();

    Json(json!({
        "service": "taskzap-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "automacao": {
            "configured": state.notificador.configurado(),
            "timeout_seconds": state.settings.automacao.timeout_seconds,
        },
        "notificacoes": {
            "validate_signature": state.settings.notificacoes.validate_signature,
        }
    }))
}
