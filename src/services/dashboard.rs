//! Agregados do dashboard: contagens, taxa de conclusão e ranking.
//!
//! Todos os números saem do conjunto pós-filtro de visibilidade. Um
//! colaborador vê a taxa de conclusão DAS SUAS tarefas, não da empresa.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ContextoPapel, Responsavel, StatusTarefa, Tarefa};
use crate::services::visibilidade::tarefas_visiveis;
use crate::utils::AppResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumoDashboard {
    pub total: usize,
    pub por_status: BTreeMap<StatusTarefa, usize>,
    pub concluidas: usize,
    pub atrasadas: usize,
    /// Percentual de tarefas finalizadas sobre o total visível (0 quando vazio)
    pub taxa_conclusao: f64,
    pub ranking_conclusoes: Vec<PosicaoRanking>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosicaoRanking {
    pub usuario_id: String,
    pub concluidas: usize,
}

/// Resumo do dashboard para o contexto informado, calculado estritamente
/// sobre as tarefas que o contexto pode ver.
pub fn resumo(
    contexto: &ContextoPapel,
    tarefas: &[Tarefa],
    hoje: NaiveDate,
) -> AppResult<ResumoDashboard> {
    let visiveis = tarefas_visiveis(contexto, tarefas)?;

    let mut por_status: BTreeMap<StatusTarefa, usize> = BTreeMap::new();
    let mut concluidas = 0;
    let mut atrasadas = 0;

    for tarefa in &visiveis {
        *por_status.entry(tarefa.status).or_insert(0) += 1;
        if tarefa.status.finalizada() {
            concluidas += 1;
        }
        if tarefa.esta_atrasada(hoje) {
            atrasadas += 1;
        }
    }

    let total = visiveis.len();
    let taxa_conclusao = if total == 0 {
        0.0
    } else {
        (concluidas as f64 / total as f64) * 100.0
    };

    Ok(ResumoDashboard {
        total,
        por_status,
        concluidas,
        atrasadas,
        taxa_conclusao,
        ranking_conclusoes: ranking_conclusoes(&visiveis),
    })
}

/// Ranking de conclusões por usuário: cada tarefa finalizada credita os
/// usuários diretamente responsáveis. Atribuições a equipes não creditam
/// indivíduos (o núcleo não conhece a composição das equipes).
fn ranking_conclusoes(tarefas: &[Tarefa]) -> Vec<PosicaoRanking> {
    let mut contagem: BTreeMap<&str, usize> = BTreeMap::new();
    for tarefa in tarefas.iter().filter(|t| t.status.finalizada()) {
        for responsavel in &tarefa.responsaveis {
            if let Responsavel::Usuario(id) = responsavel {
                *contagem.entry(id.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut ranking: Vec<PosicaoRanking> = contagem
        .into_iter()
        .map(|(usuario_id, concluidas)| PosicaoRanking {
            usuario_id: usuario_id.to_string(),
            concluidas,
        })
        .collect();
    // Mais conclusões primeiro; empate desempata por id para ordem estável
    ranking.sort_by(|a, b| b.concluidas.cmp(&a.concluidas).then(a.usuario_id.cmp(&b.usuario_id)));
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Papel;
    use std::collections::BTreeSet;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn tarefa(id: &str, status: StatusTarefa, entrega: NaiveDate, usuario: &str) -> Tarefa {
        Tarefa {
            id: id.to_string(),
            titulo: format!("Tarefa {}", id),
            status,
            data_entrega: entrega,
            data_conclusao: None,
            responsaveis: BTreeSet::from([Responsavel::Usuario(usuario.to_string())]),
            empresa_id: "emp1".to_string(),
            arquivada: false,
        }
    }

    fn contexto(papel: Papel, usuario: &str) -> ContextoPapel {
        ContextoPapel {
            papel,
            usuario_id: usuario.to_string(),
            empresa_id: Some("emp1".to_string()),
            equipes: BTreeSet::new(),
        }
    }

    #[test]
    fn test_resumo_do_gestor_cobre_a_empresa() {
        let hoje = data(2024, 6, 15);
        let tarefas = vec![
            tarefa("A", StatusTarefa::Concluida, data(2024, 6, 10), "U1"),
            tarefa("B", StatusTarefa::Executando, data(2024, 6, 10), "U1"), // atrasada
            tarefa("C", StatusTarefa::Aprovada, data(2024, 6, 20), "U2"),
            tarefa("D", StatusTarefa::Criada, data(2024, 6, 20), "U2"),
        ];

        let r = resumo(&contexto(Papel::Gestor, "U9"), &tarefas, hoje).unwrap();
        assert_eq!(r.total, 4);
        assert_eq!(r.concluidas, 2);
        assert_eq!(r.atrasadas, 1);
        assert_eq!(r.taxa_conclusao, 50.0);
        assert_eq!(r.por_status[&StatusTarefa::Criada], 1);
        assert_eq!(r.por_status[&StatusTarefa::Concluida], 1);
    }

    #[test]
    fn test_agregado_do_colaborador_sai_do_conjunto_filtrado() {
        let hoje = data(2024, 6, 15);
        let tarefas = vec![
            tarefa("A", StatusTarefa::Concluida, data(2024, 6, 10), "U1"),
            tarefa("B", StatusTarefa::Criada, data(2024, 6, 20), "U1"),
            tarefa("C", StatusTarefa::Concluida, data(2024, 6, 10), "U2"),
            tarefa("D", StatusTarefa::Concluida, data(2024, 6, 10), "U2"),
        ];

        // Empresa inteira: 75% concluídas. Para U1, só as dele contam: 50%.
        let do_colaborador = resumo(&contexto(Papel::Colaborador, "U1"), &tarefas, hoje).unwrap();
        assert_eq!(do_colaborador.total, 2);
        assert_eq!(do_colaborador.taxa_conclusao, 50.0);

        let da_empresa = resumo(&contexto(Papel::Gestor, "U9"), &tarefas, hoje).unwrap();
        assert_eq!(da_empresa.taxa_conclusao, 75.0);
        assert_ne!(do_colaborador.taxa_conclusao, da_empresa.taxa_conclusao);
    }

    #[test]
    fn test_ranking_ordena_por_conclusoes_e_desempata_por_id() {
        let hoje = data(2024, 6, 15);
        let tarefas = vec![
            tarefa("A", StatusTarefa::Concluida, data(2024, 6, 10), "U2"),
            tarefa("B", StatusTarefa::Concluida, data(2024, 6, 10), "U2"),
            tarefa("C", StatusTarefa::Aprovada, data(2024, 6, 10), "U1"),
            tarefa("D", StatusTarefa::Concluida, data(2024, 6, 10), "U3"),
            tarefa("E", StatusTarefa::Criada, data(2024, 6, 10), "U3"),
        ];

        let r = resumo(&contexto(Papel::Gestor, "U9"), &tarefas, hoje).unwrap();
        let ordem: Vec<(&str, usize)> = r
            .ranking_conclusoes
            .iter()
            .map(|p| (p.usuario_id.as_str(), p.concluidas))
            .collect();
        assert_eq!(ordem, vec![("U2", 2), ("U1", 1), ("U3", 1)]);
    }

    #[test]
    fn test_resumo_vazio_tem_taxa_zero() {
        let r = resumo(&contexto(Papel::Colaborador, "U1"), &[], data(2024, 6, 15)).unwrap();
        assert_eq!(r.total, 0);
        assert_eq!(r.taxa_conclusao, 0.0);
        assert!(r.ranking_conclusoes.is_empty());
    }
}
