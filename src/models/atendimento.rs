// src/models/atendimento.rs

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{validate_cost, validate_cost_scale, validate_money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "forma_pagamento", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FormaPagamento {
    Dinheiro,
    Pix,
    CartaoDebito,
    CartaoCredito,
}

// --- PRODUTO USADO ---
// Linha de consumo pertencente a um único atendimento. Imutável depois de gravada.
// custo_total = quantidade x custo_unitario no momento do registro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoUsado {
    pub produto_id: Uuid,
    #[schema(example = "2")]
    pub quantidade: Decimal,
    #[schema(example = "20.00")]
    pub custo_total: Decimal,
}

// --- ATENDIMENTO ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Atendimento {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    pub cliente_id: Uuid,
    pub servico_id: Uuid,
    pub data: NaiveDateTime,
    #[schema(example = "150.00")]
    pub valor_cobrado: Decimal,
    pub forma_pagamento: FormaPagamento,
    // Carregado à parte (tabela produtos_usados)
    #[sqlx(skip)]
    #[serde(default)]
    pub produtos_usados: Vec<ProdutoUsado>,
    #[schema(example = "20.00")]
    pub custo_material: Decimal,
    #[schema(example = "130.00")]
    pub lucro: Decimal,
    pub observacoes: Option<String>,
}

// Linha de produto como chega do formulário: os campos podem faltar.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinhaProduto {
    pub produto_id: Option<Uuid>,
    pub quantidade: Option<Decimal>,
}

impl LinhaProduto {
    pub fn new(produto_id: Uuid, quantidade: Decimal) -> Self {
        Self {
            produto_id: Some(produto_id),
            quantidade: Some(quantidade),
        }
    }
}

// Rascunho de atendimento (entrada do registrador)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NovoAtendimento {
    pub cliente_id: Uuid,
    pub servico_id: Uuid,
    pub data: NaiveDateTime,
    #[validate(custom(function = "validate_money"))]
    pub valor_cobrado: Decimal,
    pub forma_pagamento: FormaPagamento,
    #[serde(default)]
    pub produtos_usados: Vec<LinhaProduto>,
    pub observacoes: Option<String>,
}

// Linha já calculada e pronta para gravar, junto com o cabeçalho.
#[derive(Debug, Clone)]
pub struct AtendimentoCalculado {
    pub cliente_id: Uuid,
    pub servico_id: Uuid,
    pub data: NaiveDateTime,
    pub valor_cobrado: Decimal,
    pub forma_pagamento: FormaPagamento,
    pub custo_material: Decimal,
    pub lucro: Decimal,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarAtendimento {
    pub cliente_id: Option<Uuid>,
    pub servico_id: Option<Uuid>,
    pub data: Option<NaiveDateTime>,
    #[validate(custom(function = "validate_money"))]
    pub valor_cobrado: Option<Decimal>,
    pub forma_pagamento: Option<FormaPagamento>,
    #[validate(custom(function = "validate_cost"))]
    pub custo_material: Option<Decimal>,
    #[validate(custom(function = "validate_cost_scale"))]
    pub lucro: Option<Decimal>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[schema(value_type = Option<String>)]
    pub observacoes: Option<Option<String>>,
}

impl AtualizarAtendimento {
    /// Aplica a atualização. Se valor ou custo mudarem sem um lucro explícito,
    /// o lucro é recalculado a partir do registro resultante.
    pub fn apply_to(&self, atendimento: &mut Atendimento) {
        if let Some(cliente_id) = self.cliente_id {
            atendimento.cliente_id = cliente_id;
        }
        if let Some(servico_id) = self.servico_id {
            atendimento.servico_id = servico_id;
        }
        if let Some(data) = self.data {
            atendimento.data = data;
        }
        if let Some(valor) = self.valor_cobrado {
            atendimento.valor_cobrado = valor;
        }
        if let Some(forma) = self.forma_pagamento {
            atendimento.forma_pagamento = forma;
        }
        if let Some(custo) = self.custo_material {
            atendimento.custo_material = custo;
        }
        if let Some(observacoes) = &self.observacoes {
            atendimento.observacoes = observacoes.clone();
        }
        match self.lucro {
            Some(lucro) => atendimento.lucro = lucro,
            None if self.valor_cobrado.is_some() || self.custo_material.is_some() => {
                atendimento.lucro = atendimento.valor_cobrado - atendimento.custo_material;
            }
            None => {}
        }
    }
}

// --- VALIDAÇÃO DAS LINHAS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotivoRejeicao {
    ProdutoAusente,
    QuantidadeAusente,
    QuantidadeNaoPositiva,
    ProdutoDesconhecido,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinhaRejeitada {
    // Posição da linha no rascunho original
    pub indice: usize,
    pub produto_id: Option<Uuid>,
    pub motivo: MotivoRejeicao,
}

// Resultado do registro: o atendimento criado e as linhas descartadas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistroAtendimento {
    pub atendimento: Atendimento,
    pub linhas_rejeitadas: Vec<LinhaRejeitada>,
}
