//! Webhooks de eventos do aplicativo → pipeline de automação.
//!
//! Os três handlers seguem o mesmo fluxo: validar a assinatura (quando
//! configurada), montar o payload do pipeline e responder Success na hora,
//! encaminhando em background para não segurar o chamador.

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Instant;

use crate::models::{EventoTarefaAtrasada, EventoTarefaCriada, EventoUsuario, PayloadAutomacao};
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

pub async fn handle_tarefa_criada(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request<Body>,
) -> Result<Json<Value>, AppError> {
    let start_time = Instant::now();
    log_request_received("/webhooks/tarefa-criada", "POST");

    let evento: EventoTarefaCriada = ler_evento(&state, &headers, request).await?;
    let payload = PayloadAutomacao::tarefa_criada(&evento);
    encaminhar_em_background(&state, payload);

    responder_sucesso("/webhooks/tarefa-criada", start_time)
}

pub async fn handle_tarefa_atrasada(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request<Body>,
) -> Result<Json<Value>, AppError> {
    let start_time = Instant::now();
    log_request_received("/webhooks/tarefa-atrasada", "POST");

    let evento: EventoTarefaAtrasada = ler_evento(&state, &headers, request).await?;
    let hoje = chrono::Local::now().date_naive();
    let payload = PayloadAutomacao::tarefa_atrasada(&evento, hoje);
    encaminhar_em_background(&state, payload);

    responder_sucesso("/webhooks/tarefa-atrasada", start_time)
}

pub async fn handle_usuario(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request<Body>,
) -> Result<Json<Value>, AppError> {
    let start_time = Instant::now();
    log_request_received("/webhooks/usuario", "POST");

    let evento: EventoUsuario = ler_evento(&state, &headers, request).await?;
    let payload = PayloadAutomacao::usuario(&evento);
    encaminhar_em_background(&state, payload);

    responder_sucesso("/webhooks/usuario", start_time)
}

/// Lê o body cru (necessário para a assinatura), valida e desserializa.
async fn ler_evento<T: serde::de::DeserializeOwned>(
    state: &AppState,
    headers: &HeaderMap,
    request: Request<Body>,
) -> AppResult<T> {
    let body_bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read request body: {}", e)))?;

    if state.settings.notificacoes.validate_signature {
        if let Some(ref secret) = state.settings.notificacoes.webhook_secret {
            verify_webhook_signature(headers, &body_bytes, secret)?;
        }
    }

    serde_json::from_slice(&body_bytes).map_err(|e| {
        log_validation_error("payload", &format!("Invalid JSON: {}", e));
        AppError::ValidationError(format!("Invalid JSON payload: {}", e))
    })
}

/// Encaminha ao pipeline sem bloquear a resposta do webhook.
fn encaminhar_em_background(state: &Arc<AppState>, payload: PayloadAutomacao) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        if let Err(e) = state.notificador.enviar(&payload).await {
            log_notificacao_erro(&payload.evento, &e.to_string());
        }
    });
}

fn responder_sucesso(endpoint: &str, start_time: Instant) -> Result<Json<Value>, AppError> {
    let processing_time = start_time.elapsed().as_millis() as u64;
    log_request_processed(endpoint, 200, processing_time);

    Ok(Json(json!({
        "message": "Success"
    })))
}

fn verify_webhook_signature(headers: &HeaderMap, body: &[u8], secret: &str) -> AppResult<()> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let signature_header = headers
        .get("X-TaskZap-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::ValidationError("Missing X-TaskZap-Signature header".to_string())
        })?;

    // Remove o prefixo "sha256=" se presente
    let signature = signature_header
        .strip_prefix("sha256=")
        .unwrap_or(signature_header);

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::ValidationError(format!("Invalid secret key: {}", e)))?;

    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    // Comparação de tempo constante para evitar timing attacks
    if !constant_time_eq(signature.as_bytes(), expected.as_bytes()) {
        log_validation_error("webhook_signature", "Invalid signature");
        return Err(AppError::ValidationError(
            "Invalid webhook signature".to_string(),
        ));
    }

    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
