/// Main Application: backend TaskZap
///
/// Arquitetura:
/// - Webhooks de evento (tarefa criada, atraso, usuário) respondem rápido e
///   encaminham o payload ao pipeline de automação em background
/// - Núcleo puro (recorrência e visibilidade) exposto para o preview da UI,
///   o dashboard e o job de materialização
/// - Sem banco de dados aqui: cada endpoint opera sobre o snapshot de linhas
///   que o chamador já carregou

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use taskzap_backend::{
    config::Settings,
    handlers::{
        handle_tarefa_atrasada, handle_tarefa_criada, handle_usuario, health_check,
        materializar_recorrencias, preview_recorrencia, ready_check, resumo_dashboard,
        status_check,
    },
    middleware as app_middleware, services,
    utils::{logging::*, AppError},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Carregar variáveis de ambiente do arquivo .env (se existir)
    if dotenvy::dotenv().is_err() {
        // Em produção não existe .env - variáveis vêm do ambiente
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    tracing_subscriber::fmt::init();

    let settings = Settings::new()
        .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    let notificador = services::NotificadorService::new(
        settings.automacao.webhook_url.clone(),
        settings.automacao.token.clone(),
        settings.automacao.timeout_seconds,
    )
    .map_err(|e| AppError::ConfigError(format!("Failed to create notifier: {}", e)))?;

    if notificador.configurado() {
        log_info("✅ Pipeline de automação configurado");
    } else {
        log_warning("⚠️  automacao.webhook_url não configurada - notificações desabilitadas");
    }

    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        notificador,
    });

    // Rotas base
    let mut app = Router::new()
        // Health checks (públicos)
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/status", get(status_check))
        // Webhooks de evento (públicos - validação de assinatura própria)
        .route("/webhooks/tarefa-criada", post(handle_tarefa_criada))
        .route("/webhooks/tarefa-atrasada", post(handle_tarefa_atrasada))
        .route("/webhooks/usuario", post(handle_usuario))
        // Núcleo exposto para a UI
        .route("/recorrencias/preview", post(preview_recorrencia))
        .route("/dashboard/resumo", post(resumo_dashboard))
        .with_state(app_state.clone());

    // Materialização protegida: só o gatilho agendado chama
    let admin_routes = Router::new()
        .route("/recorrencias/materializar", post(materializar_recorrencias))
        .layer(middleware::from_fn(app_middleware::require_admin_key))
        .with_state(app_state);

    app = app.merge(admin_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    // Em ambientes gerenciados a porta vem da variável PORT
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(settings.server.port);
    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port)).await?;

    log_server_startup(port);
    log_server_ready(port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("Recebido Ctrl+C, encerrando...");
        }
        _ = terminate => {
            log_info("Recebido SIGTERM, encerrando...");
        }
    }
}
