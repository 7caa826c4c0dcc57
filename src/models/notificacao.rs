//! Eventos recebidos do aplicativo e payload enviado ao pipeline de automação.
//!
//! Os handlers de webhook recebem as linhas já relacionadas (tarefa +
//! destinatários) no corpo do evento; este módulo só monta o JSON que o
//! pipeline de automação usa para disparar as mensagens de WhatsApp.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::Tarefa;

/// Resumo de usuário como vem do aplicativo (linha já carregada).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsuarioResumo {
    pub id: String,
    pub nome: String,
    #[serde(default)]
    pub celular: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Evento de criação de tarefa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventoTarefaCriada {
    pub tarefa: Tarefa,
    pub criado_por: UsuarioResumo,
    #[serde(default)]
    pub destinatarios: Vec<UsuarioResumo>,
}

/// Evento de lembrete de tarefa atrasada.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventoTarefaAtrasada {
    pub tarefa: Tarefa,
    #[serde(default)]
    pub destinatarios: Vec<UsuarioResumo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcaoUsuario {
    Criado,
    Desativado,
}

/// Evento de ciclo de vida de usuário (boas-vindas, desativação).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventoUsuario {
    pub acao: AcaoUsuario,
    pub usuario: UsuarioResumo,
    pub empresa_id: String,
    #[serde(default)]
    pub empresa_nome: Option<String>,
}

/// Destinatário de WhatsApp: só quem tem celular cadastrado entra no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinatarioWhatsApp {
    pub nome: String,
    pub celular: String,
}

/// Payload encaminhado ao webhook do pipeline de automação.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadAutomacao {
    pub evento_id: String,
    pub evento: String,
    pub empresa_id: String,
    pub enviado_em: String,
    pub destinatarios: Vec<DestinatarioWhatsApp>,
    pub dados: Value,
}

impl PayloadAutomacao {
    pub fn tarefa_criada(evento: &EventoTarefaCriada) -> Self {
        Self::novo(
            "tarefa_criada",
            &evento.tarefa.empresa_id,
            com_celular(&evento.destinatarios),
            json!({
                "tarefa_id": evento.tarefa.id,
                "titulo": evento.tarefa.titulo,
                "data_entrega": evento.tarefa.data_entrega,
                "criado_por": evento.criado_por.nome,
            }),
        )
    }

    pub fn tarefa_atrasada(evento: &EventoTarefaAtrasada, hoje: NaiveDate) -> Self {
        let dias_atraso = (hoje - evento.tarefa.data_entrega).num_days().max(0);
        Self::novo(
            "tarefa_atrasada",
            &evento.tarefa.empresa_id,
            com_celular(&evento.destinatarios),
            json!({
                "tarefa_id": evento.tarefa.id,
                "titulo": evento.tarefa.titulo,
                "data_entrega": evento.tarefa.data_entrega,
                "dias_atraso": dias_atraso,
            }),
        )
    }

    pub fn usuario(evento: &EventoUsuario) -> Self {
        let nome_evento = match evento.acao {
            AcaoUsuario::Criado => "usuario_criado",
            AcaoUsuario::Desativado => "usuario_desativado",
        };
        Self::novo(
            nome_evento,
            &evento.empresa_id,
            com_celular(std::slice::from_ref(&evento.usuario)),
            json!({
                "usuario_id": evento.usuario.id,
                "nome": evento.usuario.nome,
                "email": evento.usuario.email,
                "empresa_nome": evento.empresa_nome,
            }),
        )
    }

    fn novo(
        evento: &str,
        empresa_id: &str,
        destinatarios: Vec<DestinatarioWhatsApp>,
        dados: Value,
    ) -> Self {
        Self {
            evento_id: uuid::Uuid::new_v4().to_string(),
            evento: evento.to_string(),
            empresa_id: empresa_id.to_string(),
            enviado_em: chrono::Utc::now().to_rfc3339(),
            destinatarios,
            dados,
        }
    }
}

fn com_celular(usuarios: &[UsuarioResumo]) -> Vec<DestinatarioWhatsApp> {
    usuarios
        .iter()
        .filter_map(|u| {
            u.celular.as_ref().map(|c| DestinatarioWhatsApp {
                nome: u.nome.clone(),
                celular: c.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusTarefa;
    use std::collections::BTreeSet;

    fn tarefa_exemplo() -> Tarefa {
        Tarefa {
            id: "t42".to_string(),
            titulo: "Fechar folha de pagamento".to_string(),
            status: StatusTarefa::Executando,
            data_entrega: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            data_conclusao: None,
            responsaveis: BTreeSet::new(),
            empresa_id: "emp1".to_string(),
            arquivada: false,
        }
    }

    fn usuario(nome: &str, celular: Option<&str>) -> UsuarioResumo {
        UsuarioResumo {
            id: format!("u-{}", nome),
            nome: nome.to_string(),
            celular: celular.map(|c| c.to_string()),
            email: None,
        }
    }

    #[test]
    fn test_payload_tarefa_criada_filtra_sem_celular() {
        let evento = EventoTarefaCriada {
            tarefa: tarefa_exemplo(),
            criado_por: usuario("Ana", Some("5511999990000")),
            destinatarios: vec![
                usuario("Bruno", Some("5511988880000")),
                usuario("Carla", None),
            ],
        };

        let payload = PayloadAutomacao::tarefa_criada(&evento);
        assert_eq!(payload.evento, "tarefa_criada");
        assert_eq!(payload.empresa_id, "emp1");
        assert_eq!(payload.destinatarios.len(), 1);
        assert_eq!(payload.destinatarios[0].nome, "Bruno");
        assert_eq!(payload.dados["criado_por"], "Ana");
    }

    #[test]
    fn test_payload_tarefa_atrasada_calcula_dias() {
        let evento = EventoTarefaAtrasada {
            tarefa: tarefa_exemplo(),
            destinatarios: vec![usuario("Bruno", Some("5511988880000"))],
        };

        let hoje = NaiveDate::from_ymd_opt(2024, 6, 13).unwrap();
        let payload = PayloadAutomacao::tarefa_atrasada(&evento, hoje);
        assert_eq!(payload.dados["dias_atraso"], 3);
    }

    #[test]
    fn test_payload_usuario_desativado() {
        let evento = EventoUsuario {
            acao: AcaoUsuario::Desativado,
            usuario: usuario("Carla", Some("5511977770000")),
            empresa_id: "emp1".to_string(),
            empresa_nome: Some("Padaria Central".to_string()),
        };

        let payload = PayloadAutomacao::usuario(&evento);
        assert_eq!(payload.evento, "usuario_desativado");
        assert_eq!(payload.destinatarios.len(), 1);
        assert_eq!(payload.dados["empresa_nome"], "Padaria Central");
    }
}
