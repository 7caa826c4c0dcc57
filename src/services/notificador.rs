//! Cliente HTTP do pipeline de automação que entrega o WhatsApp.
//!
//! O backend não fala com a API do WhatsApp diretamente: encaminha o payload
//! do evento para o webhook do pipeline (n8n/Make) e ele cuida do envio.

use reqwest::Client as HttpClient;
use std::time::Duration;
use thiserror::Error;

use crate::models::PayloadAutomacao;
use crate::utils::logging::*;

/// Erros do cliente do pipeline de automação
#[derive(Debug, Error)]
pub enum NotificadorError {
    /// Erro de requisição HTTP
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resposta não-2xx do pipeline
    #[error("Automation pipeline error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[derive(Clone)]
pub struct NotificadorService {
    http_client: HttpClient,
    webhook_url: String,
    token: Option<String>,
}

impl NotificadorService {
    /// Cria o cliente com timeout total configurável e connect timeout de 5s.
    pub fn new(
        webhook_url: String,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, NotificadorError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                NotificadorError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            webhook_url,
            token,
        })
    }

    pub fn configurado(&self) -> bool {
        !self.webhook_url.is_empty()
    }

    /// Encaminha o payload do evento para o webhook do pipeline.
    pub async fn enviar(&self, payload: &PayloadAutomacao) -> Result<(), NotificadorError> {
        if !self.configurado() {
            return Err(NotificadorError::ConfigError(
                "automacao.webhook_url não configurada".to_string(),
            ));
        }

        tracing::debug!("POST {} - evento {}", self.webhook_url, payload.evento);

        let mut request = self.http_client.post(&self.webhook_url).json(payload);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "sem corpo de resposta".to_string());
            return Err(NotificadorError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        log_notificacao_enviada(&payload.evento, payload.destinatarios.len());
        Ok(())
    }
}
