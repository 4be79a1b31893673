pub mod atendimento;
pub mod cliente;
pub mod dashboard;
pub mod produto;
pub mod servico;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

// Casas decimais das colunas NUMERIC do esquema
pub const CASAS_MOEDA: u32 = 2;
pub const CASAS_CUSTO: u32 = 4;
pub const CASAS_QUANTIDADE: u32 = 3;

/// Arredonda como o Postgres arredonda um NUMERIC(p, casas): metade para longe do zero.
pub fn arredondar(valor: Decimal, casas: u32) -> Decimal {
    valor.round_dp_with_strategy(casas, RoundingStrategy::MidpointAwayFromZero)
}

fn casas_excedidas(val: &Decimal, casas: u32) -> Result<(), ValidationError> {
    if val.normalize().scale() > casas {
        let mut err = ValidationError::new("scale");
        err.add_param("max".into(), &casas);
        err.message = Some(format!("Use no máximo {casas} casas decimais.").into());
        return Err(err);
    }
    Ok(())
}

// Validação compartilhada pelos payloads
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// Valor em dinheiro: não negativo, centavos no máximo
pub(crate) fn validate_money(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;
    casas_excedidas(val, CASAS_MOEDA)
}

pub(crate) fn validate_cost(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;
    casas_excedidas(val, CASAS_CUSTO)
}

// Lucro pode ser negativo; só a escala é conferida
pub(crate) fn validate_cost_scale(val: &Decimal) -> Result<(), ValidationError> {
    casas_excedidas(val, CASAS_CUSTO)
}

// Distingue "campo ausente" (None) de "campo null" (Some(None)) nas atualizações parciais.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
