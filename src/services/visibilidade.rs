//! Filtro de visibilidade de tarefas por papel.
//!
//! O mesmo filtro vale para listas e para agregados: o dashboard calcula
//! estatísticas sempre sobre o conjunto já filtrado, nunca sobre o conjunto
//! completo da empresa com rótulo de papel aplicado depois.

use crate::models::{ContextoPapel, Papel, Responsavel, Tarefa};
use crate::utils::{AppError, AppResult};

/// Subconjunto de `tarefas` que o contexto pode ver.
///
/// - master: nada (impersonação vira proprietario antes de chegar aqui)
/// - proprietario/gestor: todas as tarefas não arquivadas da empresa
/// - colaborador: só tarefas em que ele ou uma de suas equipes é responsável
///
/// Tarefas arquivadas ficam invisíveis para todos os papéis.
pub fn tarefas_visiveis(contexto: &ContextoPapel, tarefas: &[Tarefa]) -> AppResult<Vec<Tarefa>> {
    let empresa = contexto
        .empresa_id
        .as_deref()
        .ok_or(AppError::ContextoEmpresaAusente)?;

    let visiveis = tarefas
        .iter()
        .filter(|t| !t.arquivada && t.empresa_id == empresa)
        .filter(|t| match contexto.papel {
            Papel::Master => false,
            Papel::Proprietario | Papel::Gestor => true,
            Papel::Colaborador => atribuida_ao_colaborador(contexto, t),
        })
        .cloned()
        .collect();

    Ok(visiveis)
}

fn atribuida_ao_colaborador(contexto: &ContextoPapel, tarefa: &Tarefa) -> bool {
    tarefa.responsaveis.iter().any(|r| match r {
        Responsavel::Usuario(id) => *id == contexto.usuario_id,
        Responsavel::Equipe(id) => contexto.equipes.contains(id),
    })
}
