// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clientes ---
        handlers::clientes::list_clientes,
        handlers::clientes::get_cliente,
        handlers::clientes::create_cliente,
        handlers::clientes::update_cliente,
        handlers::clientes::delete_cliente,

        // --- Serviços ---
        handlers::servicos::list_servicos,
        handlers::servicos::create_servico,
        handlers::servicos::update_servico,
        handlers::servicos::delete_servico,

        // --- Produtos ---
        handlers::produtos::list_produtos,
        handlers::produtos::get_produto,
        handlers::produtos::create_produto,
        handlers::produtos::update_produto,
        handlers::produtos::delete_produto,
        handlers::produtos::add_stock,

        // --- Atendimentos ---
        handlers::atendimentos::list_atendimentos,
        handlers::atendimentos::get_atendimento,
        handlers::atendimentos::create_atendimento,
        handlers::atendimentos::update_atendimento,
        handlers::atendimentos::delete_atendimento,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_metricas,
        handlers::dashboard::get_semanal,
        handlers::dashboard::get_servicos_populares,
        handlers::dashboard::get_estoque_baixo,
        handlers::dashboard::get_top_clientes,
        handlers::dashboard::get_resumo,
    ),
    components(
        schemas(
            // --- Clientes ---
            models::cliente::Cliente,
            models::cliente::NovoCliente,
            models::cliente::AtualizarCliente,

            // --- Serviços ---
            models::servico::CategoriaServico,
            models::servico::Servico,
            models::servico::NovoServico,
            models::servico::AtualizarServico,

            // --- Produtos ---
            models::produto::CategoriaProduto,
            models::produto::UnidadeMedida,
            models::produto::Produto,
            models::produto::NovoProduto,
            models::produto::AtualizarProduto,
            models::produto::EntradaEstoque,

            // --- Atendimentos ---
            models::atendimento::FormaPagamento,
            models::atendimento::ProdutoUsado,
            models::atendimento::Atendimento,
            models::atendimento::LinhaProduto,
            models::atendimento::NovoAtendimento,
            models::atendimento::AtualizarAtendimento,
            models::atendimento::MotivoRejeicao,
            models::atendimento::LinhaRejeitada,
            models::atendimento::RegistroAtendimento,

            // --- Dashboard ---
            models::dashboard::MetricasDashboard,
            models::dashboard::DiaSemana,
            models::dashboard::ServicoPopular,
            models::dashboard::ProdutoEstoqueBaixo,
            models::dashboard::ResumoAtendimentos,
            models::dashboard::ResumoClientes,
            models::dashboard::ResumoEstoque,
            models::dashboard::Resumo,
            models::dashboard::Dashboard,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro de clientes"),
        (name = "Serviços", description = "Serviços oferecidos e preços base"),
        (name = "Produtos", description = "Produtos e controle de estoque"),
        (name = "Atendimentos", description = "Registro de atendimentos"),
        (name = "Dashboard", description = "Faturamento, lucro e indicadores")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "usuario",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-user-id"))),
        );
    }
}
