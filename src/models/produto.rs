// src/models/produto.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "categoria_produto", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CategoriaProduto {
    Gel,
    Tips,
    Lixa,
    Primer,
    Esmalte,
    Removedor,
    Outros,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "unidade_medida", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UnidadeMedida {
    Ml,
    G,
    Unidade,
}

// --- PRODUTO ---
// estoque_atual pode ficar negativo: não há piso na baixa de estoque.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "Gel construtor")]
    pub nome: String,
    pub categoria: CategoriaProduto,
    #[schema(example = "10.00")]
    pub custo_unitario: Decimal,
    pub unidade_medida: UnidadeMedida,
    #[schema(example = "100")]
    pub estoque_atual: Decimal,
    #[schema(example = "20")]
    pub estoque_minimo: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Produto {
    /// Estoque no limite ou abaixo do mínimo (limite inclusivo).
    pub fn is_low_stock(&self) -> bool {
        self.estoque_atual <= self.estoque_minimo
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NovoProduto {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub categoria: CategoriaProduto,
    #[validate(custom(function = "validate_not_negative"))]
    pub custo_unitario: Decimal,
    pub unidade_medida: UnidadeMedida,
    #[serde(default)]
    pub estoque_atual: Decimal,
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub estoque_minimo: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarProduto {
    pub nome: Option<String>,
    pub categoria: Option<CategoriaProduto>,
    pub custo_unitario: Option<Decimal>,
    pub unidade_medida: Option<UnidadeMedida>,
    pub estoque_atual: Option<Decimal>,
    pub estoque_minimo: Option<Decimal>,
}

impl AtualizarProduto {
    pub fn apply_to(&self, produto: &mut Produto) {
        if let Some(nome) = &self.nome {
            produto.nome = nome.clone();
        }
        if let Some(categoria) = self.categoria {
            produto.categoria = categoria;
        }
        if let Some(custo) = self.custo_unitario {
            produto.custo_unitario = custo;
        }
        if let Some(unidade) = self.unidade_medida {
            produto.unidade_medida = unidade;
        }
        if let Some(atual) = self.estoque_atual {
            produto.estoque_atual = atual;
        }
        if let Some(minimo) = self.estoque_minimo {
            produto.estoque_minimo = minimo;
        }
    }
}

// Entrada de estoque (reposição)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntradaEstoque {
    #[validate(custom(function = "validate_positive"))]
    pub quantidade: Decimal,
}

fn validate_positive(val: &Decimal) -> Result<(), validator::ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = validator::ValidationError::new("range");
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}
