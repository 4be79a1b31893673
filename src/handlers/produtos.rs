// src/handlers/produtos.rs

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
    models::produto::{AtualizarProduto, EntradaEstoque, NovoProduto, Produto},
};

// GET /api/produtos
#[utoipa::path(
    get,
    path = "/api/produtos",
    tag = "Produtos",
    responses(
        (status = 200, description = "Produtos em estoque", body = Vec<Produto>)
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn list_produtos(
    State(app_state): State<AppState>,
    owner: OwnerContext,
) -> impl IntoResponse {
    Json(app_state.session_service.list_produtos(&owner).await)
}

// GET /api/produtos/{id}
#[utoipa::path(
    get,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    responses(
        (status = 200, description = "Produto encontrado", body = Produto),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn get_produto(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Produto>, AppError> {
    app_state
        .session_service
        .get_produto(&owner, id)
        .await
        .map(Json)
        .ok_or(AppError::NotFound("Produto"))
}

// POST /api/produtos
#[utoipa::path(
    post,
    path = "/api/produtos",
    tag = "Produtos",
    request_body = NovoProduto,
    responses(
        (status = 201, description = "Produto cadastrado", body = Produto),
        (status = 400, description = "Dados inválidos")
    ),
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn create_produto(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Json(payload): Json<NovoProduto>,
) -> Result<impl IntoResponse, AppError> {
    let produto = app_state
        .session_service
        .create_produto(&owner, &payload)
        .await?;

    let status = if produto.is_some() { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(produto)))
}

// PATCH /api/produtos/{id}
#[utoipa::path(
    patch,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    request_body = AtualizarProduto,
    responses(
        (status = 200, description = "Produto atualizado (null se não encontrado)", body = Produto)
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn update_produto(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarProduto>,
) -> impl IntoResponse {
    Json(app_state.session_service.update_produto(&owner, id, &payload).await)
}

// DELETE /api/produtos/{id}
#[utoipa::path(
    delete,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn delete_produto(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if app_state.session_service.delete_produto(&owner, id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// POST /api/produtos/{id}/estoque
#[utoipa::path(
    post,
    path = "/api/produtos/{id}/estoque",
    tag = "Produtos",
    request_body = EntradaEstoque,
    responses(
        (status = 200, description = "Estoque atualizado (null se o produto não existir)", body = Produto),
        (status = 400, description = "Quantidade inválida")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-user-id" = Option<Uuid>, Header, description = "ID da usuária dona dos registros")
    )
)]
pub async fn add_stock(
    State(app_state): State<AppState>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntradaEstoque>,
) -> Result<impl IntoResponse, AppError> {
    let produto = app_state
        .session_service
        .restock(&owner, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(produto)))
}
