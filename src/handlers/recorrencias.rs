use axum::response::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::RegraRecorrencia;
use crate::services::{avaliar_modelos, proximas_ocorrencias, ModeloTarefa};
use crate::utils::logging::*;
use crate::utils::AppError;

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub regra: RegraRecorrencia,
    /// A UI mostra as próximas 5 datas por padrão
    #[serde(default = "quantidade_padrao")]
    pub quantidade: usize,
}

fn quantidade_padrao() -> usize {
    5
}

/// Preview das próximas datas de uma regra, usado pelo formulário de
/// tarefa recorrente.
pub async fn preview_recorrencia(
    Json(req): Json<PreviewRequest>,
) -> Result<Json<Value>, AppError> {
    log_request_received("/recorrencias/preview", "POST");

    let ocorrencias = proximas_ocorrencias(&req.regra, req.quantidade)?;

    Ok(Json(json!({
        "ocorrencias": ocorrencias,
        "quantidade": ocorrencias.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

#[derive(Debug, Deserialize)]
pub struct MaterializarRequest {
    pub modelos: Vec<ModeloTarefa>,
    /// Data de referência; ausente usa a data local do servidor
    #[serde(default)]
    pub hoje: Option<NaiveDate>,
}

/// Avalia os modelos recorrentes para a execução do job agendado. O gatilho
/// externo persiste as instâncias dos modelos marcados com `gerar_hoje`.
pub async fn materializar_recorrencias(
    Json(req): Json<MaterializarRequest>,
) -> Result<Json<Value>, AppError> {
    log_request_received("/recorrencias/materializar", "POST");

    let hoje = req.hoje.unwrap_or_else(|| chrono::Local::now().date_naive());
    let decisoes = avaliar_modelos(&req.modelos, hoje)?;
    let gerar_hoje = decisoes.iter().filter(|d| d.gerar_hoje).count();

    log_info(&format!(
        "Materialização avaliada: {} modelo(s), {} geram hoje",
        decisoes.len(),
        gerar_hoje
    ));

    Ok(Json(json!({
        "hoje": hoje,
        "decisoes": decisoes,
        "gerar_hoje": gerar_hoje,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
