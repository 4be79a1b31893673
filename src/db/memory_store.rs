// src/db/memory_store.rs

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::RecordStore,
    models::{
        arredondar,
        atendimento::{Atendimento, AtendimentoCalculado, AtualizarAtendimento, ProdutoUsado},
        cliente::{AtualizarCliente, Cliente, NovoCliente, VisitaCliente},
        produto::{AtualizarProduto, NovoProduto, Produto},
        servico::{AtualizarServico, NovoServico, Servico},
        CASAS_CUSTO, CASAS_MOEDA, CASAS_QUANTIDADE,
    },
};

// Mesmas escalas das colunas NUMERIC, para os dois backends gravarem igual
fn na_escala_do_banco(atendimento: &mut Atendimento) {
    atendimento.valor_cobrado = arredondar(atendimento.valor_cobrado, CASAS_MOEDA);
    atendimento.custo_material = arredondar(atendimento.custo_material, CASAS_CUSTO);
    atendimento.lucro = arredondar(atendimento.lucro, CASAS_CUSTO);
}

#[derive(Default)]
struct Tabelas {
    // Vetores em ordem de inserção
    clientes: Vec<Cliente>,
    servicos: Vec<Servico>,
    produtos: Vec<Produto>,
    atendimentos: Vec<Atendimento>,
    produtos_usados: Vec<(Uuid, ProdutoUsado)>,
}

impl Tabelas {
    fn usage_lines_of(&self, atendimento_id: Uuid) -> Vec<ProdutoUsado> {
        self.produtos_usados
            .iter()
            .filter(|(id, _)| *id == atendimento_id)
            .map(|(_, linha)| linha.clone())
            .collect()
    }

    fn with_usage_lines(&self, atendimento: &Atendimento) -> Atendimento {
        let mut completo = atendimento.clone();
        completo.produtos_usados = self.usage_lines_of(atendimento.id);
        completo
    }
}

/// `RecordStore` em memória. Cada operação acontece sob um único lock,
/// então os incrementos (estoque, agregados da cliente) são atômicos.
#[derive(Default)]
pub struct MemoryStore {
    tabelas: RwLock<Tabelas>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Mais novos primeiro, só do dono
fn newest_first<T: Clone>(rows: &[T], owner: Uuid, user_id: impl Fn(&T) -> Uuid) -> Vec<T> {
    rows.iter().rev().filter(|r| user_id(r) == owner).cloned().collect()
}

#[async_trait]
impl RecordStore for MemoryStore {
    // ---
    // Clientes
    // ---

    async fn list_clientes(&self, owner: Uuid) -> Result<Vec<Cliente>, AppError> {
        let t = self.tabelas.read().await;
        Ok(newest_first(&t.clientes, owner, |c| c.user_id))
    }

    async fn find_cliente(&self, owner: Uuid, id: Uuid) -> Result<Option<Cliente>, AppError> {
        let t = self.tabelas.read().await;
        Ok(t.clientes.iter().find(|c| c.id == id && c.user_id == owner).cloned())
    }

    async fn insert_cliente(&self, owner: Uuid, novo: &NovoCliente) -> Result<Cliente, AppError> {
        let cliente = Cliente {
            id: Uuid::new_v4(),
            user_id: owner,
            nome: novo.nome.clone(),
            telefone: novo.telefone.clone(),
            email: novo.email.clone(),
            data_cadastro: Utc::now(),
            ultimo_atendimento: None,
            total_gasto: Decimal::ZERO,
            quantidade_atendimentos: 0,
        };
        self.tabelas.write().await.clientes.push(cliente.clone());
        Ok(cliente)
    }

    async fn update_cliente(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarCliente,
    ) -> Result<Option<Cliente>, AppError> {
        let mut t = self.tabelas.write().await;
        Ok(t.clientes
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
            .map(|c| {
                dados.apply_to(c);
                c.clone()
            }))
    }

    async fn delete_cliente(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tabelas.write().await;
        let antes = t.clientes.len();
        t.clientes.retain(|c| !(c.id == id && c.user_id == owner));
        Ok(t.clientes.len() != antes)
    }

    async fn apply_client_visit(
        &self,
        owner: Uuid,
        id: Uuid,
        visita: &VisitaCliente,
    ) -> Result<Option<Cliente>, AppError> {
        let mut t = self.tabelas.write().await;
        Ok(t.clientes
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
            .map(|c| {
                c.total_gasto = arredondar(c.total_gasto + visita.valor, CASAS_MOEDA);
                c.quantidade_atendimentos += 1;
                c.ultimo_atendimento = Some(visita.data);
                c.clone()
            }))
    }

    // ---
    // Serviços
    // ---

    async fn list_servicos(&self, owner: Uuid) -> Result<Vec<Servico>, AppError> {
        let t = self.tabelas.read().await;
        Ok(newest_first(&t.servicos, owner, |s| s.user_id))
    }

    async fn insert_servico(&self, owner: Uuid, novo: &NovoServico) -> Result<Servico, AppError> {
        let servico = Servico {
            id: Uuid::new_v4(),
            user_id: owner,
            nome: novo.nome.clone(),
            descricao: novo.descricao.clone(),
            preco_base: novo.preco_base,
            duracao_media: novo.duracao_media,
            categoria: novo.categoria,
            created_at: Utc::now(),
        };
        self.tabelas.write().await.servicos.push(servico.clone());
        Ok(servico)
    }

    async fn update_servico(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarServico,
    ) -> Result<Option<Servico>, AppError> {
        let mut t = self.tabelas.write().await;
        Ok(t.servicos
            .iter_mut()
            .find(|s| s.id == id && s.user_id == owner)
            .map(|s| {
                dados.apply_to(s);
                s.clone()
            }))
    }

    async fn delete_servico(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tabelas.write().await;
        let antes = t.servicos.len();
        t.servicos.retain(|s| !(s.id == id && s.user_id == owner));
        Ok(t.servicos.len() != antes)
    }

    // ---
    // Produtos
    // ---

    async fn list_produtos(&self, owner: Uuid) -> Result<Vec<Produto>, AppError> {
        let t = self.tabelas.read().await;
        Ok(newest_first(&t.produtos, owner, |p| p.user_id))
    }

    async fn find_produto(&self, owner: Uuid, id: Uuid) -> Result<Option<Produto>, AppError> {
        let t = self.tabelas.read().await;
        Ok(t.produtos.iter().find(|p| p.id == id && p.user_id == owner).cloned())
    }

    async fn insert_produto(&self, owner: Uuid, novo: &NovoProduto) -> Result<Produto, AppError> {
        let produto = Produto {
            id: Uuid::new_v4(),
            user_id: owner,
            nome: novo.nome.clone(),
            categoria: novo.categoria,
            custo_unitario: novo.custo_unitario,
            unidade_medida: novo.unidade_medida,
            estoque_atual: novo.estoque_atual,
            estoque_minimo: novo.estoque_minimo,
            created_at: Utc::now(),
        };
        self.tabelas.write().await.produtos.push(produto.clone());
        Ok(produto)
    }

    async fn update_produto(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarProduto,
    ) -> Result<Option<Produto>, AppError> {
        let mut t = self.tabelas.write().await;
        Ok(t.produtos
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner)
            .map(|p| {
                dados.apply_to(p);
                p.clone()
            }))
    }

    async fn delete_produto(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tabelas.write().await;
        let antes = t.produtos.len();
        t.produtos.retain(|p| !(p.id == id && p.user_id == owner));
        Ok(t.produtos.len() != antes)
    }

    async fn adjust_stock(
        &self,
        owner: Uuid,
        id: Uuid,
        delta: Decimal,
    ) -> Result<Option<Produto>, AppError> {
        let mut t = self.tabelas.write().await;
        Ok(t.produtos
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner)
            .map(|p| {
                p.estoque_atual = arredondar(p.estoque_atual + delta, CASAS_QUANTIDADE);
                p.clone()
            }))
    }

    // ---
    // Atendimentos
    // ---

    async fn list_atendimentos(&self, owner: Uuid) -> Result<Vec<Atendimento>, AppError> {
        let t = self.tabelas.read().await;
        let mut lista: Vec<Atendimento> = t
            .atendimentos
            .iter()
            .rev()
            .filter(|a| a.user_id == owner)
            .map(|a| t.with_usage_lines(a))
            .collect();
        // Ordenação estável: empates ficam com o mais recente primeiro
        lista.sort_by(|a, b| b.data.cmp(&a.data));
        Ok(lista)
    }

    async fn find_atendimento(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Atendimento>, AppError> {
        let t = self.tabelas.read().await;
        Ok(t.atendimentos
            .iter()
            .find(|a| a.id == id && a.user_id == owner)
            .map(|a| t.with_usage_lines(a)))
    }

    async fn insert_atendimento(
        &self,
        owner: Uuid,
        novo: &AtendimentoCalculado,
    ) -> Result<Atendimento, AppError> {
        let mut atendimento = Atendimento {
            id: Uuid::new_v4(),
            user_id: owner,
            cliente_id: novo.cliente_id,
            servico_id: novo.servico_id,
            data: novo.data,
            valor_cobrado: novo.valor_cobrado,
            forma_pagamento: novo.forma_pagamento,
            produtos_usados: Vec::new(),
            custo_material: novo.custo_material,
            lucro: novo.lucro,
            observacoes: novo.observacoes.clone(),
        };
        na_escala_do_banco(&mut atendimento);
        self.tabelas.write().await.atendimentos.push(atendimento.clone());
        Ok(atendimento)
    }

    async fn insert_usage_lines(
        &self,
        owner: Uuid,
        atendimento_id: Uuid,
        linhas: &[ProdutoUsado],
    ) -> Result<(), AppError> {
        let mut t = self.tabelas.write().await;
        let existe = t
            .atendimentos
            .iter()
            .any(|a| a.id == atendimento_id && a.user_id == owner);
        if !existe {
            return Err(AppError::NotFound("Atendimento"));
        }
        t.produtos_usados.extend(linhas.iter().map(|linha| {
            let gravada = ProdutoUsado {
                produto_id: linha.produto_id,
                quantidade: arredondar(linha.quantidade, CASAS_QUANTIDADE),
                custo_total: arredondar(linha.custo_total, CASAS_CUSTO),
            };
            (atendimento_id, gravada)
        }));
        Ok(())
    }

    async fn update_atendimento(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarAtendimento,
    ) -> Result<Option<Atendimento>, AppError> {
        let mut t = self.tabelas.write().await;
        let Some(atendimento) = t
            .atendimentos
            .iter_mut()
            .find(|a| a.id == id && a.user_id == owner)
        else {
            return Ok(None);
        };
        dados.apply_to(atendimento);
        na_escala_do_banco(atendimento);
        let atualizado = atendimento.clone();
        Ok(Some(t.with_usage_lines(&atualizado)))
    }

    async fn delete_atendimento(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tabelas.write().await;
        let antes = t.atendimentos.len();
        t.atendimentos.retain(|a| !(a.id == id && a.user_id == owner));
        let removido = t.atendimentos.len() != antes;
        if removido {
            t.produtos_usados.retain(|(atendimento_id, _)| *atendimento_id != id);
        }
        Ok(removido)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::produto::{CategoriaProduto, UnidadeMedida};

    fn novo_produto(estoque: i64) -> NovoProduto {
        NovoProduto {
            nome: "Gel".into(),
            categoria: CategoriaProduto::Gel,
            custo_unitario: Decimal::from(10),
            unidade_medida: UnidadeMedida::G,
            estoque_atual: Decimal::from(estoque),
            estoque_minimo: Decimal::from(5),
        }
    }

    #[tokio::test]
    async fn adjust_stock_goes_below_zero_without_clamp() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let produto = store.insert_produto(owner, &novo_produto(1)).await.unwrap();

        let atualizado = store
            .adjust_stock(owner, produto.id, Decimal::from(-3))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(atualizado.estoque_atual, Decimal::from(-2));
    }

    #[tokio::test]
    async fn records_are_scoped_by_owner() {
        let store = MemoryStore::new();
        let dona = Uuid::new_v4();
        let outra = Uuid::new_v4();
        let produto = store.insert_produto(dona, &novo_produto(10)).await.unwrap();

        assert!(store.list_produtos(outra).await.unwrap().is_empty());
        assert!(store.find_produto(outra, produto.id).await.unwrap().is_none());
        assert!(
            store
                .adjust_stock(outra, produto.id, Decimal::ONE)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_produto(outra, produto.id).await.unwrap());
        assert_eq!(store.list_produtos(dona).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn money_columns_keep_database_scale() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let calculado = AtendimentoCalculado {
            cliente_id: Uuid::new_v4(),
            servico_id: Uuid::new_v4(),
            data: chrono::NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            valor_cobrado: Decimal::new(10005, 3),
            forma_pagamento: crate::models::atendimento::FormaPagamento::Pix,
            custo_material: Decimal::new(5, 5),
            lucro: Decimal::new(1000495, 5),
            observacoes: None,
        };

        let atendimento = store.insert_atendimento(owner, &calculado).await.unwrap();

        assert_eq!(atendimento.valor_cobrado, Decimal::new(1001, 2));
        assert_eq!(atendimento.custo_material, Decimal::new(1, 4));
        assert_eq!(atendimento.lucro, Decimal::new(100050, 4));
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let primeiro = store.insert_produto(owner, &novo_produto(1)).await.unwrap();
        let segundo = store.insert_produto(owner, &novo_produto(2)).await.unwrap();

        let ids: Vec<Uuid> = store
            .list_produtos(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![segundo.id, primeiro.id]);
    }
}
