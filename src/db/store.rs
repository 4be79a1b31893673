// src/db/store.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        atendimento::{Atendimento, AtendimentoCalculado, AtualizarAtendimento, ProdutoUsado},
        cliente::{AtualizarCliente, Cliente, NovoCliente, VisitaCliente},
        produto::{AtualizarProduto, NovoProduto, Produto},
        servico::{AtualizarServico, NovoServico, Servico},
    },
};

/// Armazenamento de registros usado pelo núcleo.
///
/// Toda operação recebe o `owner` (id da usuária dona dos registros) de forma
/// explícita; nenhuma implementação pode ler ou alterar registros de outro dono.
///
/// Listagens de clientes, serviços e produtos vêm da mais nova para a mais
/// antiga (ordem de inserção). Atendimentos vêm ordenados por `data`
/// decrescente, já com os produtos usados.
///
/// `update_*`/`adjust_stock`/`apply_client_visit` devolvem `None` quando o
/// registro não existe para aquele dono; `delete_*` devolve se algo foi removido.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // --- Clientes ---
    async fn list_clientes(&self, owner: Uuid) -> Result<Vec<Cliente>, AppError>;
    async fn find_cliente(&self, owner: Uuid, id: Uuid) -> Result<Option<Cliente>, AppError>;
    async fn insert_cliente(&self, owner: Uuid, novo: &NovoCliente) -> Result<Cliente, AppError>;
    async fn update_cliente(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarCliente,
    ) -> Result<Option<Cliente>, AppError>;
    async fn delete_cliente(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError>;

    /// Soma `valor` em total_gasto, +1 em quantidade_atendimentos e grava
    /// ultimo_atendimento, tudo numa única operação.
    async fn apply_client_visit(
        &self,
        owner: Uuid,
        id: Uuid,
        visita: &VisitaCliente,
    ) -> Result<Option<Cliente>, AppError>;

    // --- Serviços ---
    async fn list_servicos(&self, owner: Uuid) -> Result<Vec<Servico>, AppError>;
    async fn insert_servico(&self, owner: Uuid, novo: &NovoServico) -> Result<Servico, AppError>;
    async fn update_servico(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarServico,
    ) -> Result<Option<Servico>, AppError>;
    async fn delete_servico(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError>;

    // --- Produtos ---
    async fn list_produtos(&self, owner: Uuid) -> Result<Vec<Produto>, AppError>;
    async fn find_produto(&self, owner: Uuid, id: Uuid) -> Result<Option<Produto>, AppError>;
    async fn insert_produto(&self, owner: Uuid, novo: &NovoProduto) -> Result<Produto, AppError>;
    async fn update_produto(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarProduto,
    ) -> Result<Option<Produto>, AppError>;
    async fn delete_produto(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError>;

    /// `estoque_atual += delta` numa única operação (sem ler-depois-escrever).
    async fn adjust_stock(
        &self,
        owner: Uuid,
        id: Uuid,
        delta: Decimal,
    ) -> Result<Option<Produto>, AppError>;

    // --- Atendimentos ---
    async fn list_atendimentos(&self, owner: Uuid) -> Result<Vec<Atendimento>, AppError>;
    async fn find_atendimento(&self, owner: Uuid, id: Uuid)
    -> Result<Option<Atendimento>, AppError>;
    async fn insert_atendimento(
        &self,
        owner: Uuid,
        novo: &AtendimentoCalculado,
    ) -> Result<Atendimento, AppError>;
    async fn insert_usage_lines(
        &self,
        owner: Uuid,
        atendimento_id: Uuid,
        linhas: &[ProdutoUsado],
    ) -> Result<(), AppError>;
    async fn update_atendimento(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarAtendimento,
    ) -> Result<Option<Atendimento>, AppError>;

    /// Remove o atendimento; os produtos usados vão junto (cascata).
    async fn delete_atendimento(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError>;
}
