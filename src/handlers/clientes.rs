// src/handlers/clientes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::owner::OwnerContext,
    models::cliente::{AtualizarCliente, Cliente, NovoCliente},
};

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    responses(
        (status = 200, description = "Clientes da usuária, da mais nova para a mais antiga", body = Vec<Cliente>)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn list_clientes(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.list_clientes(&owner).await)
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    responses(
        (status = 200, description = "Cliente encontrada", body = Cliente),
        (status = 404, description = "Cliente não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da cliente"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_cliente(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Cliente>, AppError> {
    app_state
        .session_service
        .get_cliente(&owner, id)
        .await
        .map(Json)
        .ok_or(AppError::NotFound("Cliente"))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = NovoCliente,
    responses(
        (status = 201, description = "Cliente cadastrada", body = Cliente),
        (status = 200, description = "Sem usuária ou falha ao gravar (corpo null)"),
        (status = 400, description = "Dados inválidos")
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn create_cliente(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Json(payload): Json<NovoCliente>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state
        .session_service
        .create_cliente(&owner, &payload)
        .await?;

    let status = if cliente.is_some() { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(cliente)))
}

// PATCH /api/clientes/{id}
#[utoipa::path(
    patch,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = AtualizarCliente,
    responses(
        (status = 200, description = "Cliente atualizada (null se não encontrada)", body = Cliente)
    ),
    params(
        ("id" = Uuid, Path, description = "ID da cliente"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn update_cliente(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarCliente>,
) -> impl IntoResponse {
    Json(app_state.session_service.update_cliente(&owner, id, &payload).await)
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    responses(
        (status = 204, description = "Cliente removida"),
        (status = 404, description = "Cliente não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da cliente"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn delete_cliente(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if app_state.session_service.delete_cliente(&owner, id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
