// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};
use uuid::Uuid; // Importante para o Swagger params

use crate::{
    config::AppState,
    middleware::owner::OwnerContext,
    // Importamos os models para referenciar no Swagger
    models::{
        cliente::Cliente,
        dashboard::{Dashboard, DiaSemana, MetricasDashboard, ProdutoEstoqueBaixo, Resumo, ServicoPopular},
    },
    services::dashboard_service::agora,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Tela inicial completa", body = Dashboard)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.dashboard(&owner, agora()).await)
}

// GET /api/dashboard/metricas
#[utoipa::path(
    get,
    path = "/api/dashboard/metricas",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Faturamento do dia, semana e mês, ticket médio e progresso da meta", body = MetricasDashboard)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_metricas(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.metricas(&owner, agora()).await)
}

// GET /api/dashboard/semanal
#[utoipa::path(
    get,
    path = "/api/dashboard/semanal",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Faturamento e lucro de domingo a sábado", body = Vec<DiaSemana>)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_semanal(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.semanal(&owner, agora()).await)
}

// GET /api/dashboard/servicos-populares
#[utoipa::path(
    get,
    path = "/api/dashboard/servicos-populares",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Os 4 serviços mais realizados", body = Vec<ServicoPopular>)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_servicos_populares(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.servicos_populares(&owner).await)
}

// GET /api/dashboard/estoque-baixo
#[utoipa::path(
    get,
    path = "/api/dashboard/estoque-baixo",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Produtos no mínimo ou abaixo dele", body = Vec<ProdutoEstoqueBaixo>)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_estoque_baixo(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.estoque_baixo(&owner).await)
}

// GET /api/dashboard/top-clientes
#[utoipa::path(
    get,
    path = "/api/dashboard/top-clientes",
    tag = "Dashboard",
    responses(
        (status = 200, description = "As 5 clientes que mais gastaram", body = Vec<Cliente>)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_top_clientes(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.top_clientes(&owner).await)
}

// GET /api/dashboard/resumo
#[utoipa::path(
    get,
    path = "/api/dashboard/resumo",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Totais de atendimentos, clientes e estoque", body = Resumo)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_resumo(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.resumo(&owner).await)
}
