use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::atendimento::LinhaRejeitada;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Usuário não autenticado")]
    NotAuthenticated,

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Linhas de produto inválidas: {}", .0.len())]
    InvalidUsageLines(Vec<LinhaRejeitada>),

    // Uma etapa falhou e a compensação também: os registros podem ter ficado inconsistentes.
    #[error("Gravação parcial: {0}")]
    PartialWrite(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidUsageLines(linhas) => {
                let body = Json(json!({
                    "error": "Uma ou mais linhas de produto são inválidas.",
                    "details": linhas,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "Usuário não autenticado.".to_string()),
            AppError::NotFound(entidade) => (StatusCode::NOT_FOUND, format!("{entidade} não encontrado.")),

            // Todos os outros erros viram 500. O `tracing` loga a mensagem detalhada.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
