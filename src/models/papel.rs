use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::utils::AppError;

/// Papel do usuário dentro de uma empresa.
///
/// Conjunto fechado: `FromStr` é a única borda de parse e rejeita rótulos
/// desconhecidos com `AppError::PapelInvalido`, nunca os tratando como um
/// papel padrão. A desserialização JSON delega ao `FromStr`, então um
/// contexto com papel desconhecido é recusado já na leitura do corpo da
/// requisição, com a mesma mensagem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Papel {
    /// Administrador da plataforma; sem visão dentro de uma empresa
    /// (o modo stealth vira proprietario antes de chegar aqui)
    Master,
    Proprietario,
    Gestor,
    Colaborador,
}

impl FromStr for Papel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(Papel::Master),
            "proprietario" => Ok(Papel::Proprietario),
            "gestor" => Ok(Papel::Gestor),
            "colaborador" => Ok(Papel::Colaborador),
            outro => Err(AppError::PapelInvalido(outro.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Papel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rotulo = String::deserialize(deserializer)?;
        rotulo.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Papel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rotulo = match self {
            Papel::Master => "master",
            Papel::Proprietario => "proprietario",
            Papel::Gestor => "gestor",
            Papel::Colaborador => "colaborador",
        };
        write!(f, "{}", rotulo)
    }
}

/// Contexto de autorização do usuário solicitante.
///
/// Sempre passado explicitamente para o núcleo; nenhuma função lê estado
/// ambiente de sessão.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextoPapel {
    pub papel: Papel,
    pub usuario_id: String,
    #[serde(default)]
    pub empresa_id: Option<String>,
    /// Equipes das quais o usuário é membro
    #[serde(default)]
    pub equipes: BTreeSet<String>,
}
