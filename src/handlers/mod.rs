// Handlers HTTP: health checks, webhooks de notificação e o núcleo
// exposto para a UI (preview de recorrência, dashboard) e para o job
// agendado (materialização)

pub mod dashboard;
pub mod health;
pub mod notificacoes;
pub mod recorrencias;

pub use dashboard::*;
pub use health::*;
pub use notificacoes::*;
pub use recorrencias::*;
