pub mod atendimentos;
pub mod clientes;
pub mod dashboard;
pub mod produtos;
pub mod servicos;
