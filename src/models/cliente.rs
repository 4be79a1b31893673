// src/models/cliente.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- CLIENTE ---
// total_gasto e quantidade_atendimentos são mantidos de forma incremental
// pelo registro de atendimentos (não são recalculados).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "Maria Souza")]
    pub nome: String,
    #[schema(example = "(11) 98888-7777")]
    pub telefone: String,
    pub email: Option<String>,
    pub data_cadastro: DateTime<Utc>,
    pub ultimo_atendimento: Option<NaiveDate>,
    #[schema(example = "150.00")]
    pub total_gasto: Decimal,
    pub quantidade_atendimentos: i32,
}

// Dados para cadastro de uma nova cliente
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NovoCliente {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub telefone: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
}

// Atualização parcial: só os campos presentes são gravados.
// `email: Some(None)` limpa o e-mail.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarCliente {
    pub nome: Option<String>,
    pub telefone: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    pub ultimo_atendimento: Option<NaiveDate>,
    pub total_gasto: Option<Decimal>,
    pub quantidade_atendimentos: Option<i32>,
}

impl AtualizarCliente {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.telefone.is_none()
            && self.email.is_none()
            && self.ultimo_atendimento.is_none()
            && self.total_gasto.is_none()
            && self.quantidade_atendimentos.is_none()
    }

    /// Aplica a atualização sobre um registro já carregado.
    pub fn apply_to(&self, cliente: &mut Cliente) {
        if let Some(nome) = &self.nome {
            cliente.nome = nome.clone();
        }
        if let Some(telefone) = &self.telefone {
            cliente.telefone = telefone.clone();
        }
        if let Some(email) = &self.email {
            cliente.email = email.clone();
        }
        if let Some(data) = self.ultimo_atendimento {
            cliente.ultimo_atendimento = Some(data);
        }
        if let Some(total) = self.total_gasto {
            cliente.total_gasto = total;
        }
        if let Some(qtd) = self.quantidade_atendimentos {
            cliente.quantidade_atendimentos = qtd;
        }
    }
}

// Incremento atômico dos agregados da cliente ao registrar um atendimento:
// total_gasto += valor, quantidade_atendimentos += 1, ultimo_atendimento = data.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitaCliente {
    pub valor: Decimal,
    pub data: NaiveDate,
}
