// src/models/servico.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_not_negative;

// Mapeia o CREATE TYPE categoria_servico do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "categoria_servico", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CategoriaServico {
    Alongamento,
    Manutencao,
    Esmaltacao,
    Decoracao,
    Outros,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Servico {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "Alongamento em gel")]
    pub nome: String,
    pub descricao: Option<String>,
    #[schema(example = "150.00")]
    pub preco_base: Decimal,
    // Em minutos
    #[schema(example = 120)]
    pub duracao_media: i32,
    pub categoria: CategoriaServico,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NovoServico {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub descricao: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub preco_base: Decimal,
    #[validate(range(min = 0, message = "A duração não pode ser negativa."))]
    pub duracao_media: i32,
    pub categoria: CategoriaServico,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarServico {
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[schema(value_type = Option<String>)]
    pub descricao: Option<Option<String>>,
    pub preco_base: Option<Decimal>,
    pub duracao_media: Option<i32>,
    pub categoria: Option<CategoriaServico>,
}

impl AtualizarServico {
    pub fn apply_to(&self, servico: &mut Servico) {
        if let Some(nome) = &self.nome {
            servico.nome = nome.clone();
        }
        if let Some(descricao) = &self.descricao {
            servico.descricao = descricao.clone();
        }
        if let Some(preco) = self.preco_base {
            servico.preco_base = preco;
        }
        if let Some(duracao) = self.duracao_media {
            servico.duracao_media = duracao;
        }
        if let Some(categoria) = self.categoria {
            servico.categoria = categoria;
        }
    }
}
