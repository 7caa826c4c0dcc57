use axum::response::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{ContextoPapel, Tarefa};
use crate::services::dashboard;
use crate::utils::logging::*;
use crate::utils::AppError;

#[derive(Debug, Deserialize)]
pub struct ResumoRequest {
    pub contexto: ContextoPapel,
    /// Snapshot das tarefas da empresa já carregado pelo chamador
    pub tarefas: Vec<Tarefa>,
    /// Data de referência para o cálculo de atraso; ausente usa a data
    /// local do servidor
    #[serde(default)]
    pub hoje: Option<NaiveDate>,
}

/// Resumo do dashboard calculado sobre o conjunto visível ao contexto.
pub async fn resumo_dashboard(Json(req): Json<ResumoRequest>) -> Result<Json<Value>, AppError> {
    log_request_received("/dashboard/resumo", "POST");

    let hoje = req.hoje.unwrap_or_else(|| chrono::Local::now().date_naive());
    let resumo = dashboard::resumo(&req.contexto, &req.tarefas, hoje)?;

    Ok(Json(json!({
        "resumo": resumo,
        "hoje": hoje,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
