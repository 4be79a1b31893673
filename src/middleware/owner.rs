// src/middleware/owner.rs

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

// Cabeçalho com o id da usuária dona dos registros
pub const OWNER_ID_HEADER: &str = "x-user-id";

/// Quem está usando o sistema agora, se alguém estiver.
pub trait CurrentUser {
    fn current_user(&self) -> Option<Uuid>;
}

// Extrator do dono. Nunca rejeita: cabeçalho ausente ou inválido vira `None`
// e a camada de sessão responde com listas vazias / null.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerContext(pub Option<Uuid>);

impl CurrentUser for OwnerContext {
    fn current_user(&self) -> Option<Uuid> {
        self.0
    }
}

impl<S> FromRequestParts<S> for OwnerContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner = parts
            .headers
            .get(OWNER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok());

        if owner.is_none() && parts.headers.contains_key(OWNER_ID_HEADER) {
            tracing::warn!("Cabeçalho {} inválido (não é um UUID)", OWNER_ID_HEADER);
        }

        Ok(OwnerContext(owner))
    }
}
