// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{cliente::Cliente, produto::Produto};

// 1. Cards do topo
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricasDashboard {
    pub faturamento_diario: Decimal,
    pub faturamento_semanal: Decimal,
    pub faturamento_mensal: Decimal,
    pub gastos_materiais: Decimal, // Janela mensal
    pub lucro_total: Decimal,      // Janela mensal
    pub ticket_medio: Decimal,
    pub atendimentos_hoje: usize,
    pub atendimentos_mes: usize,
    pub meta_mensal: Decimal,
    pub progresso_meta: Decimal, // 0..=100
}

// 2. Gráfico semanal (Dom..Sáb)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaSemana {
    #[schema(example = "Dom")]
    pub dia: String,
    pub data: NaiveDate,
    pub faturamento: Decimal,
    pub lucro: Decimal,
}

// 3. Serviços mais populares (histórico completo)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicoPopular {
    pub servico_id: Uuid,
    pub nome: String,
    pub quantidade: usize,
    // Participação dentro da lista retornada
    pub percentual: Decimal,
}

// 4. Estoque baixo
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoEstoqueBaixo {
    #[serde(flatten)]
    pub produto: Produto,
    pub percentual_estoque: Decimal,
}

// 5. Resumos das abas
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoAtendimentos {
    pub total_atendimentos: usize,
    pub faturamento_total: Decimal,
    pub lucro_total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoClientes {
    pub total_clientes: usize,
    pub clientes_ativos: usize,
    pub total_gasto: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoEstoque {
    pub total_produtos: usize,
    pub produtos_estoque_baixo: usize,
    pub valor_total_estoque: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resumo {
    pub atendimentos: ResumoAtendimentos,
    pub clientes: ResumoClientes,
    pub estoque: ResumoEstoque,
}

// Tudo de uma vez, para a tela inicial
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub metricas: MetricasDashboard,
    pub semanal: Vec<DiaSemana>,
    pub servicos_populares: Vec<ServicoPopular>,
    pub estoque_baixo: Vec<ProdutoEstoqueBaixo>,
    pub top_clientes: Vec<Cliente>,
    pub resumo: Resumo,
}
