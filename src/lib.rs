// Biblioteca do backend TaskZap
// Expõe módulos para uso em testes e binários

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub notificador: services::NotificadorService,
}
