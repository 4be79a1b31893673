// src/handlers/atendimentos.rs

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
    models::atendimento::{Atendimento, AtualizarAtendimento, NovoAtendimento, RegistroAtendimento},
};

// GET /api/atendimentos
#[utoipa::path(
    get,
    path = "/api/atendimentos",
    tag = "Atendimentos",
    responses(
        (status = 200, description = "Atendimentos por data decrescente, com os produtos usados", body = Vec<Atendimento>)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn list_atendimentos(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.list_atendimentos(&owner).await)
}

// GET /api/atendimentos/{id}
#[utoipa::path(
    get,
    path = "/api/atendimentos/{id}",
    tag = "Atendimentos",
    responses(
        (status = 200, description = "Atendimento com os produtos usados", body = Atendimento),
        (status = 404, description = "Atendimento não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do atendimento"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_atendimento(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Atendimento>, AppError> {
    app_state
        .session_service
        .get_atendimento(&owner, id)
        .await
        .map(Json)
        .ok_or(AppError::NotFound("Atendimento"))
}

// POST /api/atendimentos
// Grava o atendimento, os produtos usados, dá baixa no estoque e
// atualiza os totais da cliente.
#[utoipa::path(
    post,
    path = "/api/atendimentos",
    tag = "Atendimentos",
    request_body = NovoAtendimento,
    responses(
        (status = 201, description = "Atendimento registrado, com as linhas descartadas", body = RegistroAtendimento),
        (status = 400, description = "Dados inválidos"),
        (status = 422, description = "Linhas de produto inválidas (modo estrito)")
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn create_atendimento(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Json(payload): Json<NovoAtendimento>,
) -> Result<impl IntoResponse, AppError> {
    let registro = app_state
        .session_service
        .create_atendimento(&owner, &payload)
        .await?;

    let status = if registro.is_some() { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(registro)))
}

// PATCH /api/atendimentos/{id}
#[utoipa::path(
    patch,
    path = "/api/atendimentos/{id}",
    tag = "Atendimentos",
    request_body = AtualizarAtendimento,
    responses(
        (status = 200, description = "Atendimento atualizado (null se não encontrado)", body = Atendimento),
        (status = 400, description = "Valor negativo ou com fração de centavo")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do atendimento"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn update_atendimento(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarAtendimento>,
) -> Result<impl IntoResponse, AppError> {
    let atendimento = app_state
        .session_service
        .update_atendimento(&owner, id, &payload)
        .await?;
    Ok(Json(atendimento))
}

// DELETE /api/atendimentos/{id}
// Não devolve estoque nem estorna os totais da cliente.
#[utoipa::path(
    delete,
    path = "/api/atendimentos/{id}",
    tag = "Atendimentos",
    responses(
        (status = 204, description = "Atendimento removido"),
        (status = 404, description = "Atendimento não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do atendimento"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn delete_atendimento(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if app_state.session_service.delete_atendimento(&owner, id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
