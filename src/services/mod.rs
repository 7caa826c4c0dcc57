pub mod dashboard;
pub mod gerador;
pub mod notificador;
pub mod recorrencia;
pub mod visibilidade;

pub use dashboard::{resumo, PosicaoRanking, ResumoDashboard};
pub use gerador::{avaliar_modelos, DecisaoMaterializacao, ModeloTarefa};
pub use notificador::{NotificadorError, NotificadorService};
pub use recorrencia::{primeira_ocorrencia_a_partir_de, proximas_ocorrencias};
pub use visibilidade::tarefas_visiveis;
