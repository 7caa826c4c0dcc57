use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Status do ciclo de vida de uma tarefa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTarefa {
    Criada,
    Aceita,
    Executando,
    Concluida,
    Aprovada,
}

impl StatusTarefa {
    /// Concluída ou aprovada: a tarefa chegou ao fim do ciclo.
    pub fn finalizada(&self) -> bool {
        matches!(self, StatusTarefa::Concluida | StatusTarefa::Aprovada)
    }
}

/// Responsável por uma tarefa: um usuário individual ou uma equipe inteira.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "id", rename_all = "snake_case")]
pub enum Responsavel {
    Usuario(String),
    Equipe(String),
}

/// Linha de tarefa já carregada pelo chamador. O núcleo só lê.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tarefa {
    pub id: String,
    pub titulo: String,
    pub status: StatusTarefa,
    /// Data de entrega como data de calendário (sem hora)
    pub data_entrega: NaiveDate,
    #[serde(default)]
    pub data_conclusao: Option<NaiveDate>,
    #[serde(default)]
    pub responsaveis: BTreeSet<Responsavel>,
    pub empresa_id: String,
    #[serde(default)]
    pub arquivada: bool,
}

impl Tarefa {
    /// Uma tarefa está atrasada quando ainda não foi finalizada e a data de
    /// entrega é estritamente anterior a hoje. Entrega hoje não é atraso;
    /// tarefas concluídas/aprovadas nunca estão atrasadas.
    pub fn esta_atrasada(&self, hoje: NaiveDate) -> bool {
        !self.status.finalizada() && self.data_entrega < hoje
    }

    /// Entrega dentro do prazo: compara a data de conclusão com a data de
    /// entrega. `None` enquanto a tarefa não tiver data de conclusão.
    pub fn entregue_no_prazo(&self) -> Option<bool> {
        self.data_conclusao.map(|d| d <= self.data_entrega)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tarefa(status: StatusTarefa, entrega: NaiveDate) -> Tarefa {
        Tarefa {
            id: "t1".to_string(),
            titulo: "Enviar relatório".to_string(),
            status,
            data_entrega: entrega,
            data_conclusao: None,
            responsaveis: BTreeSet::new(),
            empresa_id: "emp1".to_string(),
            arquivada: false,
        }
    }

    #[test]
    fn test_atrasada_apos_data_entrega() {
        let t = tarefa(StatusTarefa::Executando, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert!(t.esta_atrasada(NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()));
    }

    #[test]
    fn test_entrega_hoje_nao_e_atraso() {
        let t = tarefa(StatusTarefa::Executando, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert!(!t.esta_atrasada(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()));
    }

    #[test]
    fn test_finalizada_nunca_atrasada() {
        let entrega = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let depois = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert!(!tarefa(StatusTarefa::Concluida, entrega).esta_atrasada(depois));
        assert!(!tarefa(StatusTarefa::Aprovada, entrega).esta_atrasada(depois));
    }

    #[test]
    fn test_entregue_no_prazo_compara_conclusao_com_entrega() {
        let mut t = tarefa(StatusTarefa::Concluida, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(t.entregue_no_prazo(), None);

        t.data_conclusao = NaiveDate::from_ymd_opt(2024, 6, 10);
        assert_eq!(t.entregue_no_prazo(), Some(true));

        t.data_conclusao = NaiveDate::from_ymd_opt(2024, 6, 12);
        assert_eq!(t.entregue_no_prazo(), Some(false));
    }
}
