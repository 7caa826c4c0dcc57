use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub automacao: AutomacaoSettings,
    pub notificacoes: NotificacoesSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Pipeline de automação (n8n/Make) que entrega as mensagens de WhatsApp
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AutomacaoSettings {
    pub webhook_url: String,
    pub token: Option<String>, // Bearer token do pipeline, se exigido
    #[serde(default = "timeout_padrao")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotificacoesSettings {
    pub webhook_secret: Option<String>,
    pub validate_signature: bool,
}

fn timeout_padrao() -> u64 {
    30
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Variáveis de ambiente com precedência sobre os arquivos
        if let Ok(url) = std::env::var("AUTOMACAO_WEBHOOK_URL") {
            builder = builder.set_override("automacao.webhook_url", url)?;
        }
        if let Ok(token) = std::env::var("AUTOMACAO_TOKEN") {
            builder = builder.set_override("automacao.token", token)?;
        }
        if let Ok(secret) = std::env::var("WEBHOOK_SECRET") {
            builder = builder.set_override("notificacoes.webhook_secret", secret)?;
        }

        // Prefixo genérico: TASKZAP_SERVER__PORT, TASKZAP_AUTOMACAO__TOKEN, etc
        builder = builder.add_source(Environment::with_prefix("TASKZAP").separator("__"));

        let s = builder.build()?;

        s.try_deserialize()
    }
}
