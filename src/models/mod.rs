pub mod notificacao;
pub mod papel;
pub mod recorrencia;
pub mod tarefa;

pub use notificacao::*;
pub use papel::*;
pub use recorrencia::*;
pub use tarefa::*;
