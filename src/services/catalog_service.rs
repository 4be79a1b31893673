// src/services/catalog_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::RecordStore,
    models::{
        cliente::{AtualizarCliente, Cliente, NovoCliente},
        produto::{AtualizarProduto, NovoProduto, Produto},
        servico::{AtualizarServico, NovoServico, Servico},
    },
};

// Cadastro de clientes, serviços e produtos.
// A validação dos payloads acontece aqui, antes de chegar no store.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    // --- CLIENTES ---

    pub async fn list_clientes(&self, owner: Uuid) -> Result<Vec<Cliente>, AppError> {
        self.store.list_clientes(owner).await
    }

    pub async fn get_cliente(&self, owner: Uuid, id: Uuid) -> Result<Option<Cliente>, AppError> {
        self.store.find_cliente(owner, id).await
    }

    pub async fn create_cliente(&self, owner: Uuid, novo: &NovoCliente) -> Result<Cliente, AppError> {
        novo.validate()?;
        let cliente = self.store.insert_cliente(owner, novo).await?;
        tracing::info!("Cliente {} cadastrada", cliente.id);
        Ok(cliente)
    }

    pub async fn update_cliente(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarCliente,
    ) -> Result<Option<Cliente>, AppError> {
        self.store.update_cliente(owner, id, dados).await
    }

    pub async fn delete_cliente(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.store.delete_cliente(owner, id).await
    }

    // --- SERVIÇOS ---

    pub async fn list_servicos(&self, owner: Uuid) -> Result<Vec<Servico>, AppError> {
        self.store.list_servicos(owner).await
    }

    pub async fn create_servico(&self, owner: Uuid, novo: &NovoServico) -> Result<Servico, AppError> {
        novo.validate()?;
        let servico = self.store.insert_servico(owner, novo).await?;
        tracing::info!("Serviço {} ({}) cadastrado", servico.nome, servico.id);
        Ok(servico)
    }

    pub async fn update_servico(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarServico,
    ) -> Result<Option<Servico>, AppError> {
        self.store.update_servico(owner, id, dados).await
    }

    pub async fn delete_servico(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.store.delete_servico(owner, id).await
    }

    // --- PRODUTOS ---

    pub async fn list_produtos(&self, owner: Uuid) -> Result<Vec<Produto>, AppError> {
        self.store.list_produtos(owner).await
    }

    pub async fn get_produto(&self, owner: Uuid, id: Uuid) -> Result<Option<Produto>, AppError> {
        self.store.find_produto(owner, id).await
    }

    pub async fn create_produto(&self, owner: Uuid, novo: &NovoProduto) -> Result<Produto, AppError> {
        novo.validate()?;
        let produto = self.store.insert_produto(owner, novo).await?;
        tracing::info!("Produto {} ({}) cadastrado", produto.nome, produto.id);
        Ok(produto)
    }

    pub async fn update_produto(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarProduto,
    ) -> Result<Option<Produto>, AppError> {
        self.store.update_produto(owner, id, dados).await
    }

    pub async fn delete_produto(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.store.delete_produto(owner, id).await
    }
}
