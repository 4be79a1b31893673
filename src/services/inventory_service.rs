// src/services/inventory_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RecordStore,
    models::produto::Produto,
};

// Livro de estoque: aplica deltas assinados em Produto.estoque_atual.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn RecordStore>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Soma `delta` ao estoque atual (negativo = baixa). Sem piso nem teto.
    ///
    /// Produto inexistente não é erro: loga e segue, para não abortar quem chamou.
    pub async fn adjust_stock(
        &self,
        owner: Uuid,
        produto_id: Uuid,
        delta: Decimal,
    ) -> Result<Option<Produto>, AppError> {
        let produto = self.store.adjust_stock(owner, produto_id, delta).await?;

        match &produto {
            Some(p) => tracing::debug!(
                "Estoque de {} ajustado em {} (atual: {})",
                p.nome,
                delta,
                p.estoque_atual
            ),
            None => tracing::warn!(
                "Ajuste de estoque ignorado: produto {} não encontrado",
                produto_id
            ),
        }

        Ok(produto)
    }

    // --- ENTRADA DE ESTOQUE ---
    pub async fn restock(
        &self,
        owner: Uuid,
        produto_id: Uuid,
        quantidade: Decimal,
    ) -> Result<Produto, AppError> {
        self.adjust_stock(owner, produto_id, quantidade)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }
}

/// Valor total parado em estoque (custo unitário x quantidade atual).
pub fn stock_value(produtos: &[Produto]) -> Decimal {
    produtos
        .iter()
        .map(|p| p.custo_unitario * p.estoque_atual)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryStore,
        models::produto::{CategoriaProduto, NovoProduto, UnidadeMedida},
    };
    use rust_decimal_macros::dec;

    fn esmalte(custo: Decimal, estoque: Decimal) -> NovoProduto {
        NovoProduto {
            nome: "Esmalte".into(),
            categoria: CategoriaProduto::Esmalte,
            custo_unitario: custo,
            unidade_medida: UnidadeMedida::Ml,
            estoque_atual: estoque,
            estoque_minimo: dec!(1),
        }
    }

    #[tokio::test]
    async fn missing_product_is_a_no_op() {
        let service = InventoryService::new(Arc::new(MemoryStore::new()));

        let resultado = service
            .adjust_stock(Uuid::new_v4(), Uuid::new_v4(), dec!(-2))
            .await
            .unwrap();

        assert!(resultado.is_none());
    }

    #[tokio::test]
    async fn restock_requires_an_existing_product() {
        let store = Arc::new(MemoryStore::new());
        let service = InventoryService::new(store.clone());
        let owner = Uuid::new_v4();
        let produto = store.insert_produto(owner, &esmalte(dec!(8), dec!(2))).await.unwrap();

        let atualizado = service.restock(owner, produto.id, dec!(10)).await.unwrap();
        assert_eq!(atualizado.estoque_atual, dec!(12));

        let faltando = service.restock(owner, Uuid::new_v4(), dec!(10)).await;
        assert!(matches!(faltando, Err(AppError::NotFound("Produto"))));
    }

    #[tokio::test]
    async fn stock_value_sums_cost_times_quantity() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store.insert_produto(owner, &esmalte(dec!(8), dec!(2))).await.unwrap();
        store.insert_produto(owner, &esmalte(dec!(1.5), dec!(4))).await.unwrap();

        let produtos = store.list_produtos(owner).await.unwrap();
        assert_eq!(stock_value(&produtos), dec!(22));
        assert_eq!(stock_value(&[]), Decimal::ZERO);
    }
}
