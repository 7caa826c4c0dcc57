//! Decisões do job de materialização de tarefas recorrentes.
//!
//! O gatilho externo chama este serviço uma vez por execução com os modelos
//! ativos; a resposta diz quais modelos geram instância hoje e qual a
//! próxima data de verificação. Copiar checklist e responsáveis do modelo
//! para a instância é responsabilidade da camada de persistência.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::RegraRecorrencia;
use crate::services::recorrencia;
use crate::utils::AppResult;

/// Modelo de tarefa recorrente como vem do aplicativo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeloTarefa {
    pub id: String,
    pub titulo: String,
    pub empresa_id: String,
    pub regra: RegraRecorrencia,
    #[serde(default = "ativo_padrao")]
    pub ativo: bool,
}

fn ativo_padrao() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisaoMaterializacao {
    pub modelo_id: String,
    /// Uma ocorrência da regra cai exatamente em `hoje`
    pub gerar_hoje: bool,
    /// Próxima ocorrência estritamente depois de hoje; `None` quando a
    /// regra terminou
    pub proxima_data: Option<NaiveDate>,
}

/// Avalia os modelos ativos para a data informada. Modelos inativos são
/// ignorados.
pub fn avaliar_modelos(
    modelos: &[ModeloTarefa],
    hoje: NaiveDate,
) -> AppResult<Vec<DecisaoMaterializacao>> {
    modelos
        .iter()
        .filter(|m| m.ativo)
        .map(|m| avaliar_modelo(m, hoje))
        .collect()
}

pub fn avaliar_modelo(modelo: &ModeloTarefa, hoje: NaiveDate) -> AppResult<DecisaoMaterializacao> {
    let gerar_hoje =
        recorrencia::primeira_ocorrencia_a_partir_de(&modelo.regra, hoje)? == Some(hoje);
    let proxima_data =
        recorrencia::primeira_ocorrencia_a_partir_de(&modelo.regra, hoje + Duration::days(1))?;

    Ok(DecisaoMaterializacao {
        modelo_id: modelo.id.clone(),
        gerar_hoje,
        proxima_data,
    })
}
