use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Frequência de repetição de um modelo de tarefa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequencia {
    Diaria,
    Semanal,
    Mensal,
    Anual,
}

/// Regra de recorrência: descreve quando um modelo de tarefa deve gerar
/// novas instâncias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegraRecorrencia {
    pub frequencia: Frequencia,
    /// "A cada N unidades"; deve ser >= 1
    #[serde(default = "intervalo_padrao")]
    pub intervalo: u32,
    /// Dias da semana (0 = domingo ... 6 = sábado); usado apenas em Semanal
    #[serde(default)]
    pub dias_semana: BTreeSet<u8>,
    /// Dia do mês (1-31); obrigatório em Mensal
    #[serde(default)]
    pub dia_do_mes: Option<u32>,
    /// Limite inferior inclusivo
    pub data_inicio: NaiveDate,
    /// Limite superior inclusivo; ausente = sem fim
    #[serde(default)]
    pub data_fim: Option<NaiveDate>,
}

fn intervalo_padrao() -> u32 {
    1
}
