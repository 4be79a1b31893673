mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{cenario, novo_produto, rascunho, recorder, FailingStore};
use studio_unhas::{
    common::error::AppError,
    db::{MemoryStore, RecordStore},
    models::atendimento::{AtualizarAtendimento, LinhaProduto, MotivoRejeicao},
};

#[tokio::test]
async fn create_records_cost_profit_stock_and_client_totals() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);

    let registro = service
        .create(
            c.owner,
            &rascunho(c.cliente.id, c.servico.id, dec!(150), vec![LinhaProduto::new(c.produto.id, dec!(2))]),
        )
        .await
        .unwrap();

    let a = &registro.atendimento;
    assert!(registro.linhas_rejeitadas.is_empty());
    assert_eq!(a.custo_material, dec!(20));
    assert_eq!(a.lucro, dec!(130));
    assert_eq!(a.produtos_usados.len(), 1);
    assert_eq!(a.produtos_usados[0].custo_total, dec!(20));

    let produto = store.find_produto(c.owner, c.produto.id).await.unwrap().unwrap();
    assert_eq!(produto.estoque_atual, dec!(98));

    let cliente = store.find_cliente(c.owner, c.cliente.id).await.unwrap().unwrap();
    assert_eq!(cliente.total_gasto, dec!(150));
    assert_eq!(cliente.quantidade_atendimentos, 1);
    assert_eq!(cliente.ultimo_atendimento, Some(a.data.date()));

    let lista = store.list_atendimentos(c.owner).await.unwrap();
    assert_eq!(lista.len(), 1);
    assert_eq!(lista[0].produtos_usados, a.produtos_usados);
}

#[tokio::test]
async fn delete_keeps_stock_and_client_totals() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);

    let registro = service
        .create(
            c.owner,
            &rascunho(c.cliente.id, c.servico.id, dec!(150), vec![LinhaProduto::new(c.produto.id, dec!(2))]),
        )
        .await
        .unwrap();

    assert!(service.delete(c.owner, registro.atendimento.id).await.unwrap());
    assert!(!service.delete(c.owner, registro.atendimento.id).await.unwrap());

    assert!(store.list_atendimentos(c.owner).await.unwrap().is_empty());

    // Sem estorno: estoque e totais continuam como depois do registro
    let produto = store.find_produto(c.owner, c.produto.id).await.unwrap().unwrap();
    assert_eq!(produto.estoque_atual, dec!(98));
    let cliente = store.find_cliente(c.owner, c.cliente.id).await.unwrap().unwrap();
    assert_eq!(cliente.total_gasto, dec!(150));
    assert_eq!(cliente.quantidade_atendimentos, 1);
}

#[tokio::test]
async fn invalid_lines_are_reported_and_skipped() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);

    let linhas = vec![
        LinhaProduto::new(Uuid::new_v4(), dec!(1)),
        LinhaProduto::new(c.produto.id, dec!(3)),
        LinhaProduto::new(c.produto.id, dec!(-1)),
    ];
    let registro = service
        .create(c.owner, &rascunho(c.cliente.id, c.servico.id, dec!(100), linhas))
        .await
        .unwrap();

    assert_eq!(registro.atendimento.custo_material, dec!(30));
    assert_eq!(registro.atendimento.lucro, dec!(70));
    assert_eq!(registro.linhas_rejeitadas.len(), 2);
    assert_eq!(registro.linhas_rejeitadas[0].indice, 0);
    assert_eq!(registro.linhas_rejeitadas[0].motivo, MotivoRejeicao::ProdutoDesconhecido);
    assert_eq!(registro.linhas_rejeitadas[1].indice, 2);
    assert_eq!(registro.linhas_rejeitadas[1].motivo, MotivoRejeicao::QuantidadeNaoPositiva);

    let produto = store.find_produto(c.owner, c.produto.id).await.unwrap().unwrap();
    assert_eq!(produto.estoque_atual, dec!(97));
}

#[tokio::test]
async fn strict_policy_aborts_before_any_write() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), true);

    let linhas = vec![
        LinhaProduto::new(c.produto.id, dec!(2)),
        LinhaProduto { produto_id: Some(c.produto.id), quantidade: None },
    ];
    let resultado = service
        .create(c.owner, &rascunho(c.cliente.id, c.servico.id, dec!(150), linhas))
        .await;

    match resultado {
        Err(AppError::InvalidUsageLines(rejeitadas)) => {
            assert_eq!(rejeitadas.len(), 1);
            assert_eq!(rejeitadas[0].motivo, MotivoRejeicao::QuantidadeAusente);
        }
        outro => panic!("esperava InvalidUsageLines, veio {outro:?}"),
    }

    assert!(store.list_atendimentos(c.owner).await.unwrap().is_empty());
    let produto = store.find_produto(c.owner, c.produto.id).await.unwrap().unwrap();
    assert_eq!(produto.estoque_atual, dec!(100));
    let cliente = store.find_cliente(c.owner, c.cliente.id).await.unwrap().unwrap();
    assert_eq!(cliente.quantidade_atendimentos, 0);
}

#[tokio::test]
async fn negative_charge_is_a_validation_error() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);

    let resultado = service
        .create(c.owner, &rascunho(c.cliente.id, c.servico.id, dec!(-1), vec![]))
        .await;

    assert!(matches!(resultado, Err(AppError::ValidationError(_))));
    assert!(store.list_atendimentos(c.owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_client_does_not_abort() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);

    let registro = service
        .create(
            c.owner,
            &rascunho(Uuid::new_v4(), c.servico.id, dec!(80), vec![LinhaProduto::new(c.produto.id, dec!(1))]),
        )
        .await
        .unwrap();

    assert_eq!(registro.atendimento.lucro, dec!(70));
    let cliente = store.find_cliente(c.owner, c.cliente.id).await.unwrap().unwrap();
    assert_eq!(cliente.total_gasto, dec!(0));
    let produto = store.find_produto(c.owner, c.produto.id).await.unwrap().unwrap();
    assert_eq!(produto.estoque_atual, dec!(99));
}

#[tokio::test]
async fn failed_client_update_rolls_back_stock_and_appointment() {
    let falho = Arc::new(FailingStore::new());
    let store: Arc<dyn RecordStore> = falho.clone();
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);
    FailingStore::fail(&falho.fail_client_visit);

    let resultado = service
        .create(
            c.owner,
            &rascunho(c.cliente.id, c.servico.id, dec!(150), vec![LinhaProduto::new(c.produto.id, dec!(2))]),
        )
        .await;

    // O erro original volta para quem chamou
    assert!(matches!(resultado, Err(AppError::InternalServerError(_))));
    assert!(store.list_atendimentos(c.owner).await.unwrap().is_empty());
    let produto = store.find_produto(c.owner, c.produto.id).await.unwrap().unwrap();
    assert_eq!(produto.estoque_atual, dec!(100));
    let cliente = store.find_cliente(c.owner, c.cliente.id).await.unwrap().unwrap();
    assert_eq!(cliente.quantidade_atendimentos, 0);
}

#[tokio::test]
async fn failed_usage_lines_remove_the_appointment() {
    let falho = Arc::new(FailingStore::new());
    let store: Arc<dyn RecordStore> = falho.clone();
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);
    FailingStore::fail(&falho.fail_usage_lines);

    let resultado = service
        .create(
            c.owner,
            &rascunho(c.cliente.id, c.servico.id, dec!(150), vec![LinhaProduto::new(c.produto.id, dec!(2))]),
        )
        .await;

    assert!(resultado.is_err());
    assert!(store.list_atendimentos(c.owner).await.unwrap().is_empty());
    let produto = store.find_produto(c.owner, c.produto.id).await.unwrap().unwrap();
    assert_eq!(produto.estoque_atual, dec!(100));
}

#[tokio::test]
async fn failed_stock_adjustment_returns_only_applied_lines() {
    let falho = Arc::new(FailingStore::new());
    let store: Arc<dyn RecordStore> = falho.clone();
    let c = cenario(store.as_ref()).await;
    let segundo = store
        .insert_produto(c.owner, &novo_produto(dec!(4), dec!(30), dec!(5)))
        .await
        .unwrap();
    let service = recorder(store.clone(), false);
    // A baixa da segunda linha falha; a devolução da primeira não
    falho.fail_adjust_stock_on(2);

    let linhas = vec![
        LinhaProduto::new(c.produto.id, dec!(2)),
        LinhaProduto::new(segundo.id, dec!(3)),
    ];
    let resultado = service
        .create(c.owner, &rascunho(c.cliente.id, c.servico.id, dec!(150), linhas))
        .await;

    assert!(matches!(resultado, Err(AppError::InternalServerError(_))));
    assert!(store.list_atendimentos(c.owner).await.unwrap().is_empty());
    let primeiro = store.find_produto(c.owner, c.produto.id).await.unwrap().unwrap();
    assert_eq!(primeiro.estoque_atual, dec!(100));
    let segundo = store.find_produto(c.owner, segundo.id).await.unwrap().unwrap();
    assert_eq!(segundo.estoque_atual, dec!(30));
    let cliente = store.find_cliente(c.owner, c.cliente.id).await.unwrap().unwrap();
    assert_eq!(cliente.quantidade_atendimentos, 0);
}

#[tokio::test]
async fn fractional_quantities_keep_cost_and_profit_consistent() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let esmalte = store
        .insert_produto(c.owner, &novo_produto(dec!(2.3333), dec!(50), dec!(5)))
        .await
        .unwrap();
    let service = recorder(store.clone(), false);

    // 1,5 x 2,3333 = 3,49995 e 0,25 x 10 = 2,5
    let linhas = vec![
        LinhaProduto::new(esmalte.id, dec!(1.5)),
        LinhaProduto::new(c.produto.id, dec!(0.25)),
    ];
    let registro = service
        .create(c.owner, &rascunho(c.cliente.id, c.servico.id, dec!(100.10), linhas))
        .await
        .unwrap();

    let a = &registro.atendimento;
    assert_eq!(a.produtos_usados[0].custo_total, dec!(3.5000));
    assert_eq!(a.produtos_usados[1].custo_total, dec!(2.5));
    assert_eq!(a.custo_material, dec!(6.0000));
    assert_eq!(a.lucro, dec!(94.10));
    assert_eq!(a.lucro, a.valor_cobrado - a.custo_material);

    // O que foi gravado é o que voltou na resposta
    let gravado = service.get(c.owner, a.id).await.unwrap().unwrap();
    assert_eq!(gravado.produtos_usados, a.produtos_usados);
    assert_eq!(gravado.custo_material, a.custo_material);
    assert_eq!(
        gravado.custo_material,
        gravado.produtos_usados.iter().map(|l| l.custo_total).sum::<Decimal>()
    );

    let esmalte = store.find_produto(c.owner, esmalte.id).await.unwrap().unwrap();
    assert_eq!(esmalte.estoque_atual, dec!(48.5));
    let cliente = store.find_cliente(c.owner, c.cliente.id).await.unwrap().unwrap();
    assert_eq!(cliente.total_gasto, dec!(100.10));
}

#[tokio::test]
async fn charge_with_fraction_of_cent_is_rejected() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);

    let resultado = service
        .create(c.owner, &rascunho(c.cliente.id, c.servico.id, dec!(10.005), vec![]))
        .await;

    assert!(matches!(resultado, Err(AppError::ValidationError(_))));
    assert!(store.list_atendimentos(c.owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_compensation_reports_partial_write() {
    let falho = Arc::new(FailingStore::new());
    let store: Arc<dyn RecordStore> = falho.clone();
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);
    FailingStore::fail(&falho.fail_client_visit);
    FailingStore::fail(&falho.fail_delete_atendimento);

    let resultado = service
        .create(
            c.owner,
            &rascunho(c.cliente.id, c.servico.id, dec!(150), vec![LinhaProduto::new(c.produto.id, dec!(2))]),
        )
        .await;

    assert!(matches!(resultado, Err(AppError::PartialWrite(_))));
    // O estoque foi devolvido; o atendimento ficou para trás
    let produto = store.find_produto(c.owner, c.produto.id).await.unwrap().unwrap();
    assert_eq!(produto.estoque_atual, dec!(100));
    assert_eq!(store.list_atendimentos(c.owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_recomputes_profit_when_charge_changes() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);

    let registro = service
        .create(
            c.owner,
            &rascunho(c.cliente.id, c.servico.id, dec!(150), vec![LinhaProduto::new(c.produto.id, dec!(2))]),
        )
        .await
        .unwrap();

    let dados = AtualizarAtendimento {
        valor_cobrado: Some(dec!(200)),
        ..Default::default()
    };
    let atualizado = service
        .update(c.owner, registro.atendimento.id, &dados)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(atualizado.valor_cobrado, dec!(200));
    assert_eq!(atualizado.lucro, dec!(180));
    assert_eq!(atualizado.produtos_usados.len(), 1);

    // Outro dono não enxerga o registro
    let outro = service.update(Uuid::new_v4(), registro.atendimento.id, &dados).await.unwrap();
    assert!(outro.is_none());
}

#[tokio::test]
async fn update_rejects_negative_charge() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let c = cenario(store.as_ref()).await;
    let service = recorder(store.clone(), false);

    let registro = service
        .create(c.owner, &rascunho(c.cliente.id, c.servico.id, dec!(150), vec![]))
        .await
        .unwrap();

    let dados = AtualizarAtendimento {
        valor_cobrado: Some(dec!(-10)),
        ..Default::default()
    };
    let resultado = service.update(c.owner, registro.atendimento.id, &dados).await;

    assert!(matches!(resultado, Err(AppError::ValidationError(_))));
    let gravado = service.get(c.owner, registro.atendimento.id).await.unwrap().unwrap();
    assert_eq!(gravado.valor_cobrado, dec!(150));
    assert_eq!(gravado.lucro, dec!(150));
}
