// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{MemoryStore, PgStore, RecordStore},
    services::{
        appointment_service::AppointmentService, catalog_service::CatalogService,
        dashboard_service::{DashboardService, META_MENSAL_PADRAO},
        inventory_service::InventoryService, session_service::SessionService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "memoria" => Ok(Self::Memory),
            outro => bail!("STORE_BACKEND desconhecido: {outro} (use postgres ou memory)"),
        }
    }
}

// Configuração lida do ambiente (.env incluso)
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub meta_mensal: Decimal,
    // Modo estrito: linha de produto inválida aborta o registro do atendimento
    pub reject_invalid_lines: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            database_url: None,
            db_max_connections: 5,
            bind_addr: "0.0.0.0:3000".to_string(),
            meta_mensal: META_MENSAL_PADRAO,
            reject_invalid_lines: false,
        }
    }
}

fn env_or<T>(nome: &str, padrao: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(nome) {
        Ok(valor) => valor
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{nome} inválida ({valor}): {e}")),
        Err(_) => Ok(padrao),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let padrao = Self::default();
        let database_url = env::var("DATABASE_URL").ok();

        // Sem STORE_BACKEND, usa o Postgres só se houver DATABASE_URL
        let store_backend = match env::var("STORE_BACKEND") {
            Ok(valor) => valor.parse()?,
            Err(_) if database_url.is_some() => StoreBackend::Postgres,
            Err(_) => StoreBackend::Memory,
        };

        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL deve ser definida quando STORE_BACKEND=postgres");
        }

        Ok(Self {
            store_backend,
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", padrao.db_max_connections)?,
            bind_addr: env_or("BIND_ADDR", padrao.bind_addr)?,
            meta_mensal: env_or("MONTHLY_GOAL", padrao.meta_mensal)?,
            reject_invalid_lines: env_or("REJECT_INVALID_LINES", padrao.reject_invalid_lines)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    // Só existe com o backend Postgres (usado para as migrações)
    pub db_pool: Option<PgPool>,
    pub session_service: SessionService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        match config.store_backend {
            StoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida")?;

                // Conecta ao banco de dados, usando '?' para propagar erros
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                let store = Arc::new(PgStore::new(db_pool.clone()));
                Ok(Self::build(config, store, Some(db_pool)))
            }
            StoreBackend::Memory => {
                tracing::warn!("Usando armazenamento em memória: os dados somem ao reiniciar");
                Ok(Self::with_store(config, Arc::new(MemoryStore::new())))
            }
        }
    }

    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Self::build(config, store, None)
    }

    // --- Monta o gráfico de dependências ---
    fn build(config: Config, store: Arc<dyn RecordStore>, db_pool: Option<PgPool>) -> Self {
        let inventory_service = InventoryService::new(store.clone());
        let catalog_service = CatalogService::new(store.clone());
        let appointment_service = AppointmentService::new(
            store.clone(),
            inventory_service.clone(),
            config.reject_invalid_lines,
        );
        let dashboard_service = DashboardService::new(store, config.meta_mensal);

        let session_service = SessionService::new(
            catalog_service,
            inventory_service,
            appointment_service,
            dashboard_service,
        );

        Self {
            config: Arc::new(config),
            db_pool,
            session_service,
        }
    }
}
