/// Middleware layer para o Axum router
///
/// Autenticação do endpoint de materialização, chamado apenas pelo
/// gatilho agendado.

pub mod admin_auth;

pub use admin_auth::require_admin_key;
