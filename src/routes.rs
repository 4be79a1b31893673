// src/routes.rs

use axum::{
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn router(app_state: AppState) -> Router {
    let clientes_routes = Router::new()
        .route("/"
               ,post(handlers::clientes::create_cliente)
               .get(handlers::clientes::list_clientes)
        )
        .route("/{id}"
               ,get(handlers::clientes::get_cliente)
               .patch(handlers::clientes::update_cliente)
               .delete(handlers::clientes::delete_cliente)
        );

    let servicos_routes = Router::new()
        .route("/"
               ,post(handlers::servicos::create_servico)
               .get(handlers::servicos::list_servicos)
        )
        .route("/{id}"
               ,patch(handlers::servicos::update_servico)
               .delete(handlers::servicos::delete_servico)
        );

    let produtos_routes = Router::new()
        .route("/"
               ,post(handlers::produtos::create_produto)
               .get(handlers::produtos::list_produtos)
        )
        .route("/{id}"
               ,get(handlers::produtos::get_produto)
               .patch(handlers::produtos::update_produto)
               .delete(handlers::produtos::delete_produto)
        )
        .route("/{id}/estoque"
               ,post(handlers::produtos::add_stock)
        );

    let atendimentos_routes = Router::new()
        .route("/"
               ,post(handlers::atendimentos::create_atendimento)
               .get(handlers::atendimentos::list_atendimentos)
        )
        .route("/{id}"
               ,get(handlers::atendimentos::get_atendimento)
               .patch(handlers::atendimentos::update_atendimento)
               .delete(handlers::atendimentos::delete_atendimento)
        );

    let dashboard_routes = Router::new()
        .route("/", get(handlers::dashboard::get_dashboard))
        .route("/metricas", get(handlers::dashboard::get_metricas))
        .route("/semanal", get(handlers::dashboard::get_semanal))
        .route("/servicos-populares", get(handlers::dashboard::get_servicos_populares))
        .route("/estoque-baixo", get(handlers::dashboard::get_estoque_baixo))
        .route("/top-clientes", get(handlers::dashboard::get_top_clientes))
        .route("/resumo", get(handlers::dashboard::get_resumo));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/clientes", clientes_routes)
        .nest("/api/servicos", servicos_routes)
        .nest("/api/produtos", produtos_routes)
        .nest("/api/atendimentos", atendimentos_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state)
}
