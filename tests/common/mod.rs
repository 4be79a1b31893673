#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use studio_unhas::{
    common::error::AppError,
    db::{MemoryStore, RecordStore},
    models::{
        atendimento::{
            Atendimento, AtendimentoCalculado, AtualizarAtendimento, FormaPagamento,
            LinhaProduto, NovoAtendimento, ProdutoUsado,
        },
        cliente::{AtualizarCliente, Cliente, NovoCliente, VisitaCliente},
        produto::{AtualizarProduto, CategoriaProduto, NovoProduto, Produto, UnidadeMedida},
        servico::{AtualizarServico, CategoriaServico, NovoServico, Servico},
    },
    services::{appointment_service::AppointmentService, inventory_service::InventoryService},
};

pub fn data(dia: u32, hora: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, dia)
        .unwrap()
        .and_hms_opt(hora, 0, 0)
        .unwrap()
}

pub fn novo_cliente(nome: &str) -> NovoCliente {
    NovoCliente {
        nome: nome.to_string(),
        telefone: "(11) 98888-7777".to_string(),
        email: None,
    }
}

pub fn novo_servico(nome: &str) -> NovoServico {
    NovoServico {
        nome: nome.to_string(),
        descricao: None,
        preco_base: dec!(150),
        duracao_media: 90,
        categoria: CategoriaServico::Alongamento,
    }
}

pub fn novo_produto(custo: Decimal, estoque: Decimal, minimo: Decimal) -> NovoProduto {
    NovoProduto {
        nome: "Gel construtor".to_string(),
        categoria: CategoriaProduto::Gel,
        custo_unitario: custo,
        unidade_medida: UnidadeMedida::G,
        estoque_atual: estoque,
        estoque_minimo: minimo,
    }
}

pub fn rascunho(
    cliente_id: Uuid,
    servico_id: Uuid,
    valor: Decimal,
    linhas: Vec<LinhaProduto>,
) -> NovoAtendimento {
    NovoAtendimento {
        cliente_id,
        servico_id,
        data: data(10, 14),
        valor_cobrado: valor,
        forma_pagamento: FormaPagamento::Pix,
        produtos_usados: linhas,
        observacoes: None,
    }
}

pub fn recorder(store: Arc<dyn RecordStore>, estrito: bool) -> AppointmentService {
    AppointmentService::new(store.clone(), InventoryService::new(store), estrito)
}

// Cliente, serviço e produto (custo 10, estoque 100, mínimo 20) de um dono
pub struct Cenario {
    pub owner: Uuid,
    pub cliente: Cliente,
    pub servico: Servico,
    pub produto: Produto,
}

pub async fn cenario(store: &dyn RecordStore) -> Cenario {
    let owner = Uuid::new_v4();
    let cliente = store.insert_cliente(owner, &novo_cliente("Maria")).await.unwrap();
    let servico = store.insert_servico(owner, &novo_servico("Alongamento em gel")).await.unwrap();
    let produto = store
        .insert_produto(owner, &novo_produto(dec!(10), dec!(100), dec!(20)))
        .await
        .unwrap();

    Cenario { owner, cliente, servico, produto }
}

fn falha_simulada(etapa: &str) -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("falha simulada em {etapa}"))
}

/// `MemoryStore` que falha nas operações escolhidas.
#[derive(Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_usage_lines: AtomicBool,
    pub fail_client_visit: AtomicBool,
    pub fail_delete_atendimento: AtomicBool,
    // Número (a partir de 1) da chamada de adjust_stock que falha; 0 = nenhuma
    pub fail_adjust_stock_call: AtomicUsize,
    adjust_stock_calls: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    pub fn fail_adjust_stock_on(&self, chamada: usize) {
        self.adjust_stock_calls.store(0, Ordering::SeqCst);
        self.fail_adjust_stock_call.store(chamada, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn list_clientes(&self, owner: Uuid) -> Result<Vec<Cliente>, AppError> {
        self.inner.list_clientes(owner).await
    }
    async fn find_cliente(&self, owner: Uuid, id: Uuid) -> Result<Option<Cliente>, AppError> {
        self.inner.find_cliente(owner, id).await
    }
    async fn insert_cliente(&self, owner: Uuid, novo: &NovoCliente) -> Result<Cliente, AppError> {
        self.inner.insert_cliente(owner, novo).await
    }
    async fn update_cliente(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarCliente,
    ) -> Result<Option<Cliente>, AppError> {
        self.inner.update_cliente(owner, id, dados).await
    }
    async fn delete_cliente(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete_cliente(owner, id).await
    }
    async fn apply_client_visit(
        &self,
        owner: Uuid,
        id: Uuid,
        visita: &VisitaCliente,
    ) -> Result<Option<Cliente>, AppError> {
        if self.fail_client_visit.load(Ordering::SeqCst) {
            return Err(falha_simulada("apply_client_visit"));
        }
        self.inner.apply_client_visit(owner, id, visita).await
    }

    async fn list_servicos(&self, owner: Uuid) -> Result<Vec<Servico>, AppError> {
        self.inner.list_servicos(owner).await
    }
    async fn insert_servico(&self, owner: Uuid, novo: &NovoServico) -> Result<Servico, AppError> {
        self.inner.insert_servico(owner, novo).await
    }
    async fn update_servico(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarServico,
    ) -> Result<Option<Servico>, AppError> {
        self.inner.update_servico(owner, id, dados).await
    }
    async fn delete_servico(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete_servico(owner, id).await
    }

    async fn list_produtos(&self, owner: Uuid) -> Result<Vec<Produto>, AppError> {
        self.inner.list_produtos(owner).await
    }
    async fn find_produto(&self, owner: Uuid, id: Uuid) -> Result<Option<Produto>, AppError> {
        self.inner.find_produto(owner, id).await
    }
    async fn insert_produto(&self, owner: Uuid, novo: &NovoProduto) -> Result<Produto, AppError> {
        self.inner.insert_produto(owner, novo).await
    }
    async fn update_produto(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarProduto,
    ) -> Result<Option<Produto>, AppError> {
        self.inner.update_produto(owner, id, dados).await
    }
    async fn delete_produto(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete_produto(owner, id).await
    }
    async fn adjust_stock(
        &self,
        owner: Uuid,
        id: Uuid,
        delta: Decimal,
    ) -> Result<Option<Produto>, AppError> {
        let chamada = self.adjust_stock_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if chamada == self.fail_adjust_stock_call.load(Ordering::SeqCst) {
            return Err(falha_simulada("adjust_stock"));
        }
        self.inner.adjust_stock(owner, id, delta).await
    }

    async fn list_atendimentos(&self, owner: Uuid) -> Result<Vec<Atendimento>, AppError> {
        self.inner.list_atendimentos(owner).await
    }
    async fn find_atendimento(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Atendimento>, AppError> {
        self.inner.find_atendimento(owner, id).await
    }
    async fn insert_atendimento(
        &self,
        owner: Uuid,
        novo: &AtendimentoCalculado,
    ) -> Result<Atendimento, AppError> {
        self.inner.insert_atendimento(owner, novo).await
    }
    async fn insert_usage_lines(
        &self,
        owner: Uuid,
        atendimento_id: Uuid,
        linhas: &[ProdutoUsado],
    ) -> Result<(), AppError> {
        if self.fail_usage_lines.load(Ordering::SeqCst) {
            return Err(falha_simulada("insert_usage_lines"));
        }
        self.inner.insert_usage_lines(owner, atendimento_id, linhas).await
    }
    async fn update_atendimento(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarAtendimento,
    ) -> Result<Option<Atendimento>, AppError> {
        self.inner.update_atendimento(owner, id, dados).await
    }
    async fn delete_atendimento(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        if self.fail_delete_atendimento.load(Ordering::SeqCst) {
            return Err(falha_simulada("delete_atendimento"));
        }
        self.inner.delete_atendimento(owner, id).await
    }
}
