// src/handlers/servicos.rs

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
    models::servico::{AtualizarServico, NovoServico, Servico},
};

// GET /api/servicos
#[utoipa::path(
    get,
    path = "/api/servicos",
    tag = "Serviços",
    responses(
        (status = 200, description = "Serviços oferecidos", body = Vec<Servico>)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn list_servicos(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.list_servicos(&owner).await)
}

// POST /api/servicos
#[utoipa::path(
    post,
    path = "/api/servicos",
    tag = "Serviços",
    request_body = NovoServico,
    responses(
        (status = 201, description = "Serviço cadastrado", body = Servico),
        (status = 400, description = "Dados inválidos")
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn create_servico(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Json(payload): Json<NovoServico>,
) -> Result<impl IntoResponse, AppError> {
    let servico = app_state
        .session_service
        .create_servico(&owner, &payload)
        .await?;

    let status = if servico.is_some() { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(servico)))
}

// PATCH /api/servicos/{id}
#[utoipa::path(
    patch,
    path = "/api/servicos/{id}",
    tag = "Serviços",
    request_body = AtualizarServico,
    responses(
        (status = 200, description = "Serviço atualizado (null se não encontrado)", body = Servico)
    ),
    params(
        ("id" = Uuid, Path, description = "ID do serviço"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn update_servico(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarServico>,
) -> impl IntoResponse {
    Json(app_state.session_service.update_servico(&owner, id, &payload).await)
}

// DELETE /api/servicos/{id}
#[utoipa::path(
    delete,
    path = "/api/servicos/{id}",
    tag = "Serviços",
    responses(
        (status = 204, description = "Serviço removido"),
        (status = 404, description = "Serviço não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do serviço"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn delete_servico(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if app_state.session_service.delete_servico(&owner, id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
