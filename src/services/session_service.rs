// src/services/session_service.rs

use std::future::Future;

use chrono::NaiveDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    middleware::owner::CurrentUser,
    models::{
        atendimento::{Atendimento, AtualizarAtendimento, NovoAtendimento, RegistroAtendimento},
        cliente::{AtualizarCliente, Cliente, NovoCliente},
        dashboard::{Dashboard, DiaSemana, MetricasDashboard, ProdutoEstoqueBaixo, Resumo, ServicoPopular},
        produto::{AtualizarProduto, EntradaEstoque, NovoProduto, Produto},
        servico::{AtualizarServico, NovoServico, Servico},
    },
    services::{
        appointment_service::AppointmentService, catalog_service::CatalogService,
        dashboard_service::DashboardService, inventory_service::InventoryService,
    },
};

// Resolve a usuária atual e roda a operação com ela como dona.
async fn for_owner<T, Fut>(
    user: &impl CurrentUser,
    operacao: impl FnOnce(Uuid) -> Fut,
) -> Result<T, AppError>
where
    Fut: Future<Output = Result<T, AppError>>,
{
    let owner = user.current_user().ok_or(AppError::NotAuthenticated)?;
    operacao(owner).await
}

// Leitura: sem usuária ou com falha no store, devolve o valor vazio.
fn or_empty<T: Default>(operacao: &str, resultado: Result<T, AppError>) -> T {
    match resultado {
        Ok(valor) => valor,
        Err(AppError::NotAuthenticated) => {
            tracing::debug!("Nenhuma usuária autenticada ao {}", operacao);
            T::default()
        }
        Err(e) => {
            tracing::error!("🔥 Erro ao {}: {}", operacao, e);
            T::default()
        }
    }
}

// Escrita: erros de payload sobem (viram 400/422), o resto vira `None`.
fn or_none<T>(operacao: &str, resultado: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match resultado {
        Ok(valor) => Ok(Some(valor)),
        Err(e @ (AppError::ValidationError(_) | AppError::InvalidUsageLines(_))) => Err(e),
        Err(AppError::NotAuthenticated) => {
            tracing::debug!("Nenhuma usuária autenticada ao {}", operacao);
            Ok(None)
        }
        Err(AppError::NotFound(entidade)) => {
            tracing::warn!("Não foi possível {}: {} não encontrado", operacao, entidade);
            Ok(None)
        }
        Err(e) => {
            tracing::error!("🔥 Erro ao {}: {}", operacao, e);
            Ok(None)
        }
    }
}

/// Fachada usada pelos handlers.
///
/// Resolve a usuária atual e chama o núcleo com o `owner` explícito. Sem
/// usuária (`NotAuthenticated`), leituras devolvem coleções vazias (ou o
/// painel zerado) e escritas devolvem `None`/`false`; falhas do store são
/// logadas e degradam da mesma forma. Só erros de validação do payload chegam
/// a quem chamou.
#[derive(Clone)]
pub struct SessionService {
    catalog_service: CatalogService,
    inventory_service: InventoryService,
    appointment_service: AppointmentService,
    dashboard_service: DashboardService,
}

impl SessionService {
    pub fn new(
        catalog_service: CatalogService,
        inventory_service: InventoryService,
        appointment_service: AppointmentService,
        dashboard_service: DashboardService,
    ) -> Self {
        Self {
            catalog_service,
            inventory_service,
            appointment_service,
            dashboard_service,
        }
    }

    // --- CLIENTES ---

    pub async fn list_clientes(&self, user: &impl CurrentUser) -> Vec<Cliente> {
        or_empty(
            "buscar clientes",
            for_owner(user, |owner| self.catalog_service.list_clientes(owner)).await,
        )
    }

    pub async fn get_cliente(&self, user: &impl CurrentUser, id: Uuid) -> Option<Cliente> {
        or_empty(
            "buscar cliente",
            for_owner(user, |owner| self.catalog_service.get_cliente(owner, id)).await,
        )
    }

    pub async fn create_cliente(
        &self,
        user: &impl CurrentUser,
        novo: &NovoCliente,
    ) -> Result<Option<Cliente>, AppError> {
        or_none(
            "criar cliente",
            for_owner(user, |owner| self.catalog_service.create_cliente(owner, novo)).await,
        )
    }

    pub async fn update_cliente(
        &self,
        user: &impl CurrentUser,
        id: Uuid,
        dados: &AtualizarCliente,
    ) -> Option<Cliente> {
        or_empty(
            "atualizar cliente",
            for_owner(user, |owner| self.catalog_service.update_cliente(owner, id, dados)).await,
        )
    }

    pub async fn delete_cliente(&self, user: &impl CurrentUser, id: Uuid) -> bool {
        or_empty(
            "deletar cliente",
            for_owner(user, |owner| self.catalog_service.delete_cliente(owner, id)).await,
        )
    }

    // --- SERVIÇOS ---

    pub async fn list_servicos(&self, user: &impl CurrentUser) -> Vec<Servico> {
        or_empty(
            "buscar serviços",
            for_owner(user, |owner| self.catalog_service.list_servicos(owner)).await,
        )
    }

    pub async fn create_servico(
        &self,
        user: &impl CurrentUser,
        novo: &NovoServico,
    ) -> Result<Option<Servico>, AppError> {
        or_none(
            "criar serviço",
            for_owner(user, |owner| self.catalog_service.create_servico(owner, novo)).await,
        )
    }

    pub async fn update_servico(
        &self,
        user: &impl CurrentUser,
        id: Uuid,
        dados: &AtualizarServico,
    ) -> Option<Servico> {
        or_empty(
            "atualizar serviço",
            for_owner(user, |owner| self.catalog_service.update_servico(owner, id, dados)).await,
        )
    }

    pub async fn delete_servico(&self, user: &impl CurrentUser, id: Uuid) -> bool {
        or_empty(
            "deletar serviço",
            for_owner(user, |owner| self.catalog_service.delete_servico(owner, id)).await,
        )
    }

    // --- PRODUTOS ---

    pub async fn list_produtos(&self, user: &impl CurrentUser) -> Vec<Produto> {
        or_empty(
            "buscar produtos",
            for_owner(user, |owner| self.catalog_service.list_produtos(owner)).await,
        )
    }

    pub async fn get_produto(&self, user: &impl CurrentUser, id: Uuid) -> Option<Produto> {
        or_empty(
            "buscar produto",
            for_owner(user, |owner| self.catalog_service.get_produto(owner, id)).await,
        )
    }

    pub async fn create_produto(
        &self,
        user: &impl CurrentUser,
        novo: &NovoProduto,
    ) -> Result<Option<Produto>, AppError> {
        or_none(
            "criar produto",
            for_owner(user, |owner| self.catalog_service.create_produto(owner, novo)).await,
        )
    }

    pub async fn update_produto(
        &self,
        user: &impl CurrentUser,
        id: Uuid,
        dados: &AtualizarProduto,
    ) -> Option<Produto> {
        or_empty(
            "atualizar produto",
            for_owner(user, |owner| self.catalog_service.update_produto(owner, id, dados)).await,
        )
    }

    pub async fn delete_produto(&self, user: &impl CurrentUser, id: Uuid) -> bool {
        or_empty(
            "deletar produto",
            for_owner(user, |owner| self.catalog_service.delete_produto(owner, id)).await,
        )
    }

    pub async fn restock(
        &self,
        user: &impl CurrentUser,
        produto_id: Uuid,
        entrada: &EntradaEstoque,
    ) -> Result<Option<Produto>, AppError> {
        entrada.validate()?;
        or_none(
            "dar entrada no estoque",
            for_owner(user, |owner| {
                self.inventory_service
                    .restock(owner, produto_id, entrada.quantidade)
            })
            .await,
        )
    }

    // --- ATENDIMENTOS ---

    pub async fn list_atendimentos(&self, user: &impl CurrentUser) -> Vec<Atendimento> {
        or_empty(
            "buscar atendimentos",
            for_owner(user, |owner| self.appointment_service.list(owner)).await,
        )
    }

    pub async fn get_atendimento(&self, user: &impl CurrentUser, id: Uuid) -> Option<Atendimento> {
        or_empty(
            "buscar atendimento",
            for_owner(user, |owner| self.appointment_service.get(owner, id)).await,
        )
    }

    pub async fn create_atendimento(
        &self,
        user: &impl CurrentUser,
        draft: &NovoAtendimento,
    ) -> Result<Option<RegistroAtendimento>, AppError> {
        or_none(
            "criar atendimento",
            for_owner(user, |owner| self.appointment_service.create(owner, draft)).await,
        )
    }

    // Valor negativo ou com fração de centavo volta como erro de validação.
    pub async fn update_atendimento(
        &self,
        user: &impl CurrentUser,
        id: Uuid,
        dados: &AtualizarAtendimento,
    ) -> Result<Option<Atendimento>, AppError> {
        or_none(
            "atualizar atendimento",
            for_owner(user, |owner| self.appointment_service.update(owner, id, dados)).await,
        )
        .map(Option::flatten)
    }

    pub async fn delete_atendimento(&self, user: &impl CurrentUser, id: Uuid) -> bool {
        or_empty(
            "deletar atendimento",
            for_owner(user, |owner| self.appointment_service.delete(owner, id)).await,
        )
    }

    // --- DASHBOARD ---

    pub async fn dashboard(&self, user: &impl CurrentUser, agora: NaiveDateTime) -> Dashboard {
        for_owner(user, |owner| self.dashboard_service.get_dashboard(owner, agora))
            .await
            .unwrap_or_else(|e| {
                if !matches!(e, AppError::NotAuthenticated) {
                    tracing::error!("🔥 Erro ao montar o dashboard: {}", e);
                }
                self.dashboard_service.empty_dashboard(agora)
            })
    }

    pub async fn metricas(&self, user: &impl CurrentUser, agora: NaiveDateTime) -> MetricasDashboard {
        for_owner(user, |owner| self.dashboard_service.get_metrics(owner, agora))
            .await
            .unwrap_or_else(|e| {
                if !matches!(e, AppError::NotAuthenticated) {
                    tracing::error!("🔥 Erro ao calcular métricas: {}", e);
                }
                self.dashboard_service.empty_dashboard(agora).metricas
            })
    }

    pub async fn semanal(&self, user: &impl CurrentUser, agora: NaiveDateTime) -> Vec<DiaSemana> {
        for_owner(user, |owner| self.dashboard_service.get_weekly_series(owner, agora))
            .await
            .unwrap_or_else(|e| {
                if !matches!(e, AppError::NotAuthenticated) {
                    tracing::error!("🔥 Erro ao montar o gráfico semanal: {}", e);
                }
                self.dashboard_service.empty_dashboard(agora).semanal
            })
    }

    pub async fn servicos_populares(&self, user: &impl CurrentUser) -> Vec<ServicoPopular> {
        or_empty(
            "buscar serviços populares",
            for_owner(user, |owner| self.dashboard_service.get_popular_services(owner)).await,
        )
    }

    pub async fn estoque_baixo(&self, user: &impl CurrentUser) -> Vec<ProdutoEstoqueBaixo> {
        or_empty(
            "buscar estoque baixo",
            for_owner(user, |owner| self.dashboard_service.get_low_stock(owner)).await,
        )
    }

    pub async fn top_clientes(&self, user: &impl CurrentUser) -> Vec<Cliente> {
        or_empty(
            "buscar top clientes",
            for_owner(user, |owner| self.dashboard_service.get_top_clients(owner)).await,
        )
    }

    pub async fn resumo(&self, user: &impl CurrentUser) -> Resumo {
        or_empty(
            "montar resumo",
            for_owner(user, |owner| self.dashboard_service.get_resumo(owner)).await,
        )
    }
}
