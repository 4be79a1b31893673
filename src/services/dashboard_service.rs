// src/services/dashboard_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RecordStore,
    models::{
        atendimento::Atendimento,
        cliente::Cliente,
        dashboard::{
            Dashboard, DiaSemana, MetricasDashboard, ProdutoEstoqueBaixo, Resumo,
            ResumoAtendimentos, ResumoClientes, ResumoEstoque, ServicoPopular,
        },
        produto::Produto,
        servico::Servico,
    },
    services::inventory_service::stock_value,
};

pub const META_MENSAL_PADRAO: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

const DIAS_SEMANA: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];
const LIMITE_SERVICOS_POPULARES: usize = 4;
const LIMITE_TOP_CLIENTES: usize = 5;

// Instante de referência: relógio local, sem fuso.
pub fn agora() -> NaiveDateTime {
    Local::now().naive_local()
}

// Domingo mais recente (hoje, se hoje for domingo)
fn inicio_semana(hoje: NaiveDate) -> NaiveDate {
    hoje - Duration::days(i64::from(hoje.weekday().num_days_from_sunday()))
}

fn inicio_mes(hoje: NaiveDate) -> NaiveDate {
    hoje.with_day(1).unwrap_or(hoje)
}

fn percentual(parte: Decimal, todo: Decimal) -> Decimal {
    if todo.is_zero() {
        Decimal::ZERO
    } else {
        parte / todo * Decimal::ONE_HUNDRED
    }
}

// --- CÁLCULOS (funções puras) ---

/// Cards do topo. As janelas de semana e mês só têm limite inferior
/// (`data >= início`); "hoje" é igualdade de data.
pub fn calculate_metrics(
    atendimentos: &[Atendimento],
    agora: NaiveDateTime,
    meta_mensal: Decimal,
) -> MetricasDashboard {
    let hoje = agora.date();
    let semana = inicio_semana(hoje).and_hms_opt(0, 0, 0).unwrap_or(agora);
    let mes = inicio_mes(hoje).and_hms_opt(0, 0, 0).unwrap_or(agora);

    let mut m = MetricasDashboard {
        meta_mensal,
        ..Default::default()
    };

    for a in atendimentos {
        if a.data.date() == hoje {
            m.faturamento_diario += a.valor_cobrado;
            m.atendimentos_hoje += 1;
        }
        if a.data >= semana {
            m.faturamento_semanal += a.valor_cobrado;
        }
        if a.data >= mes {
            m.faturamento_mensal += a.valor_cobrado;
            m.gastos_materiais += a.custo_material;
            m.lucro_total += a.lucro;
            m.atendimentos_mes += 1;
        }
    }

    if m.atendimentos_mes > 0 {
        m.ticket_medio = m.faturamento_mensal / Decimal::from(m.atendimentos_mes);
    }

    // Meta zerada ou negativa não tem progresso
    if meta_mensal > Decimal::ZERO {
        m.progresso_meta = percentual(m.faturamento_mensal, meta_mensal).min(Decimal::ONE_HUNDRED);
    }

    m
}

/// Sete dias da semana corrente, de domingo a sábado.
pub fn weekly_series(atendimentos: &[Atendimento], agora: NaiveDateTime) -> Vec<DiaSemana> {
    let domingo = inicio_semana(agora.date());

    DIAS_SEMANA
        .iter()
        .enumerate()
        .map(|(i, dia)| {
            let data = domingo + Duration::days(i as i64);
            let (faturamento, lucro) = atendimentos
                .iter()
                .filter(|a| a.data.date() == data)
                .fold((Decimal::ZERO, Decimal::ZERO), |(f, l), a| {
                    (f + a.valor_cobrado, l + a.lucro)
                });

            DiaSemana {
                dia: dia.to_string(),
                data,
                faturamento,
                lucro,
            }
        })
        .collect()
}

/// Contagem por serviço em todo o histórico. Serviços sem atendimento entram
/// com zero; empates mantêm a ordem da lista de serviços.
pub fn popular_services(atendimentos: &[Atendimento], servicos: &[Servico]) -> Vec<ServicoPopular> {
    let mut contagem: HashMap<Uuid, usize> = HashMap::new();
    for a in atendimentos {
        *contagem.entry(a.servico_id).or_default() += 1;
    }

    let mut ranking: Vec<(&Servico, usize)> = servicos
        .iter()
        .map(|s| (s, contagem.get(&s.id).copied().unwrap_or(0)))
        .collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking.truncate(LIMITE_SERVICOS_POPULARES);

    let total = Decimal::from(ranking.iter().map(|(_, q)| q).sum::<usize>());

    ranking
        .into_iter()
        .map(|(s, quantidade)| ServicoPopular {
            servico_id: s.id,
            nome: s.nome.clone(),
            quantidade,
            percentual: percentual(Decimal::from(quantidade), total),
        })
        .collect()
}

pub fn low_stock(produtos: &[Produto]) -> Vec<ProdutoEstoqueBaixo> {
    produtos
        .iter()
        .filter(|p| p.is_low_stock())
        .map(|p| ProdutoEstoqueBaixo {
            percentual_estoque: percentual(p.estoque_atual, p.estoque_minimo),
            produto: p.clone(),
        })
        .collect()
}

pub fn top_clients(clientes: &[Cliente]) -> Vec<Cliente> {
    let mut ordenados = clientes.to_vec();
    ordenados.sort_by(|a, b| b.total_gasto.cmp(&a.total_gasto));
    ordenados.truncate(LIMITE_TOP_CLIENTES);
    ordenados
}

pub fn resumo(atendimentos: &[Atendimento], clientes: &[Cliente], produtos: &[Produto]) -> Resumo {
    Resumo {
        atendimentos: ResumoAtendimentos {
            total_atendimentos: atendimentos.len(),
            faturamento_total: atendimentos.iter().map(|a| a.valor_cobrado).sum(),
            lucro_total: atendimentos.iter().map(|a| a.lucro).sum(),
        },
        clientes: ResumoClientes {
            total_clientes: clientes.len(),
            clientes_ativos: clientes
                .iter()
                .filter(|c| c.ultimo_atendimento.is_some())
                .count(),
            total_gasto: clientes.iter().map(|c| c.total_gasto).sum(),
        },
        estoque: ResumoEstoque {
            total_produtos: produtos.len(),
            produtos_estoque_baixo: produtos.iter().filter(|p| p.is_low_stock()).count(),
            valor_total_estoque: stock_value(produtos),
        },
    }
}

// --- CARREGADOR ---
// Lê as coleções do dono no store e aplica as funções acima.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn RecordStore>,
    meta_mensal: Decimal,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RecordStore>, meta_mensal: Decimal) -> Self {
        Self { store, meta_mensal }
    }

    /// Painel sem dados: zeros, a meta configurada e os sete dias da semana.
    pub fn empty_dashboard(&self, agora: NaiveDateTime) -> Dashboard {
        Dashboard {
            metricas: calculate_metrics(&[], agora, self.meta_mensal),
            semanal: weekly_series(&[], agora),
            ..Default::default()
        }
    }

    pub async fn get_metrics(
        &self,
        owner: Uuid,
        agora: NaiveDateTime,
    ) -> Result<MetricasDashboard, AppError> {
        let atendimentos = self.store.list_atendimentos(owner).await?;
        Ok(calculate_metrics(&atendimentos, agora, self.meta_mensal))
    }

    pub async fn get_weekly_series(
        &self,
        owner: Uuid,
        agora: NaiveDateTime,
    ) -> Result<Vec<DiaSemana>, AppError> {
        let atendimentos = self.store.list_atendimentos(owner).await?;
        Ok(weekly_series(&atendimentos, agora))
    }

    pub async fn get_popular_services(&self, owner: Uuid) -> Result<Vec<ServicoPopular>, AppError> {
        let atendimentos = self.store.list_atendimentos(owner).await?;
        let servicos = self.store.list_servicos(owner).await?;
        Ok(popular_services(&atendimentos, &servicos))
    }

    pub async fn get_low_stock(&self, owner: Uuid) -> Result<Vec<ProdutoEstoqueBaixo>, AppError> {
        let produtos = self.store.list_produtos(owner).await?;
        Ok(low_stock(&produtos))
    }

    pub async fn get_top_clients(&self, owner: Uuid) -> Result<Vec<Cliente>, AppError> {
        let clientes = self.store.list_clientes(owner).await?;
        Ok(top_clients(&clientes))
    }

    pub async fn get_resumo(&self, owner: Uuid) -> Result<Resumo, AppError> {
        let atendimentos = self.store.list_atendimentos(owner).await?;
        let clientes = self.store.list_clientes(owner).await?;
        let produtos = self.store.list_produtos(owner).await?;
        Ok(resumo(&atendimentos, &clientes, &produtos))
    }

    /// Tela inicial inteira, lendo cada coleção uma única vez.
    pub async fn get_dashboard(&self, owner: Uuid, agora: NaiveDateTime) -> Result<Dashboard, AppError> {
        let atendimentos = self.store.list_atendimentos(owner).await?;
        let clientes = self.store.list_clientes(owner).await?;
        let servicos = self.store.list_servicos(owner).await?;
        let produtos = self.store.list_produtos(owner).await?;

        Ok(Dashboard {
            metricas: calculate_metrics(&atendimentos, agora, self.meta_mensal),
            semanal: weekly_series(&atendimentos, agora),
            servicos_populares: popular_services(&atendimentos, &servicos),
            estoque_baixo: low_stock(&produtos),
            top_clientes: top_clients(&clientes),
            resumo: resumo(&atendimentos, &clientes, &produtos),
        })
    }
}
