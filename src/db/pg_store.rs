// src/db/pg_store.rs

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::RecordStore,
    models::{
        atendimento::{Atendimento, AtendimentoCalculado, AtualizarAtendimento, ProdutoUsado},
        cliente::{AtualizarCliente, Cliente, NovoCliente, VisitaCliente},
        produto::{AtualizarProduto, NovoProduto, Produto},
        servico::{AtualizarServico, NovoServico, Servico},
    },
};

// Linha de produtos_usados com a chave do atendimento (para agrupar)
#[derive(FromRow)]
struct LinhaComAtendimento {
    atendimento_id: Uuid,
    produto_id: Uuid,
    quantidade: Decimal,
    custo_total: Decimal,
}

/// `RecordStore` sobre PostgreSQL.
/// As queries são checadas em tempo de execução (`query_as`), sem exigir o banco na compilação.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn usage_lines_for(
        &self,
        atendimento_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<ProdutoUsado>>, AppError> {
        let linhas = sqlx::query_as::<_, LinhaComAtendimento>(
            r#"
            SELECT atendimento_id, produto_id, quantidade, custo_total
            FROM produtos_usados
            WHERE atendimento_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(atendimento_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut por_atendimento: HashMap<Uuid, Vec<ProdutoUsado>> = HashMap::new();
        for linha in linhas {
            por_atendimento
                .entry(linha.atendimento_id)
                .or_default()
                .push(ProdutoUsado {
                    produto_id: linha.produto_id,
                    quantidade: linha.quantidade,
                    custo_total: linha.custo_total,
                });
        }
        Ok(por_atendimento)
    }

    async fn attach_usage_lines(
        &self,
        mut atendimentos: Vec<Atendimento>,
    ) -> Result<Vec<Atendimento>, AppError> {
        if atendimentos.is_empty() {
            return Ok(atendimentos);
        }
        let ids: Vec<Uuid> = atendimentos.iter().map(|a| a.id).collect();
        let mut linhas = self.usage_lines_for(&ids).await?;
        for atendimento in &mut atendimentos {
            atendimento.produtos_usados = linhas.remove(&atendimento.id).unwrap_or_default();
        }
        Ok(atendimentos)
    }

    async fn attach_one(&self, atendimento: Option<Atendimento>) -> Result<Option<Atendimento>, AppError> {
        match atendimento {
            Some(a) => Ok(self.attach_usage_lines(vec![a]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    // ---
    // Clientes
    // ---

    async fn list_clientes(&self, owner: Uuid) -> Result<Vec<Cliente>, AppError> {
        let clientes = sqlx::query_as::<_, Cliente>(
            "SELECT * FROM clientes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(clientes)
    }

    async fn find_cliente(&self, owner: Uuid, id: Uuid) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(
            "SELECT * FROM clientes WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cliente)
    }

    async fn insert_cliente(&self, owner: Uuid, novo: &NovoCliente) -> Result<Cliente, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (user_id, nome, telefone, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(owner)
        .bind(&novo.nome)
        .bind(&novo.telefone)
        .bind(novo.email.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(cliente)
    }

    async fn update_cliente(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarCliente,
    ) -> Result<Option<Cliente>, AppError> {
        // COALESCE mantém o valor atual quando o campo não veio.
        // O e-mail usa uma flag porque NULL é um valor válido para ele.
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                nome = COALESCE($3, nome),
                telefone = COALESCE($4, telefone),
                email = CASE WHEN $5 THEN $6 ELSE email END,
                ultimo_atendimento = COALESCE($7, ultimo_atendimento),
                total_gasto = COALESCE($8, total_gasto),
                quantidade_atendimentos = COALESCE($9, quantidade_atendimentos)
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(dados.nome.as_deref())
        .bind(dados.telefone.as_deref())
        .bind(dados.email.is_some())
        .bind(dados.email.clone().flatten())
        .bind(dados.ultimo_atendimento)
        .bind(dados.total_gasto)
        .bind(dados.quantidade_atendimentos)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cliente)
    }

    async fn delete_cliente(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn apply_client_visit(
        &self,
        owner: Uuid,
        id: Uuid,
        visita: &VisitaCliente,
    ) -> Result<Option<Cliente>, AppError> {
        // Incremento no próprio UPDATE: atômico, sem corrida de ler-depois-escrever.
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                total_gasto = total_gasto + $3,
                quantidade_atendimentos = quantidade_atendimentos + 1,
                ultimo_atendimento = $4
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(visita.valor)
        .bind(visita.data)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cliente)
    }

    // ---
    // Serviços
    // ---

    async fn list_servicos(&self, owner: Uuid) -> Result<Vec<Servico>, AppError> {
        let servicos = sqlx::query_as::<_, Servico>(
            "SELECT * FROM servicos WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(servicos)
    }

    async fn insert_servico(&self, owner: Uuid, novo: &NovoServico) -> Result<Servico, AppError> {
        let servico = sqlx::query_as::<_, Servico>(
            r#"
            INSERT INTO servicos (user_id, nome, descricao, preco_base, duracao_media, categoria)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(owner)
        .bind(&novo.nome)
        .bind(novo.descricao.as_deref())
        .bind(novo.preco_base)
        .bind(novo.duracao_media)
        .bind(novo.categoria)
        .fetch_one(&self.pool)
        .await?;
        Ok(servico)
    }

    async fn update_servico(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarServico,
    ) -> Result<Option<Servico>, AppError> {
        let servico = sqlx::query_as::<_, Servico>(
            r#"
            UPDATE servicos SET
                nome = COALESCE($3, nome),
                descricao = CASE WHEN $4 THEN $5 ELSE descricao END,
                preco_base = COALESCE($6, preco_base),
                duracao_media = COALESCE($7, duracao_media),
                categoria = COALESCE($8, categoria)
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(dados.nome.as_deref())
        .bind(dados.descricao.is_some())
        .bind(dados.descricao.clone().flatten())
        .bind(dados.preco_base)
        .bind(dados.duracao_media)
        .bind(dados.categoria)
        .fetch_optional(&self.pool)
        .await?;
        Ok(servico)
    }

    async fn delete_servico(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM servicos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Produtos
    // ---

    async fn list_produtos(&self, owner: Uuid) -> Result<Vec<Produto>, AppError> {
        let produtos = sqlx::query_as::<_, Produto>(
            "SELECT * FROM produtos WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(produtos)
    }

    async fn find_produto(&self, owner: Uuid, id: Uuid) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>(
            "SELECT * FROM produtos WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(produto)
    }

    async fn insert_produto(&self, owner: Uuid, novo: &NovoProduto) -> Result<Produto, AppError> {
        let produto = sqlx::query_as::<_, Produto>(
            r#"
            INSERT INTO produtos
                (user_id, nome, categoria, custo_unitario, unidade_medida, estoque_atual, estoque_minimo)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(owner)
        .bind(&novo.nome)
        .bind(novo.categoria)
        .bind(novo.custo_unitario)
        .bind(novo.unidade_medida)
        .bind(novo.estoque_atual)
        .bind(novo.estoque_minimo)
        .fetch_one(&self.pool)
        .await?;
        Ok(produto)
    }

    async fn update_produto(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarProduto,
    ) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>(
            r#"
            UPDATE produtos SET
                nome = COALESCE($3, nome),
                categoria = COALESCE($4, categoria),
                custo_unitario = COALESCE($5, custo_unitario),
                unidade_medida = COALESCE($6, unidade_medida),
                estoque_atual = COALESCE($7, estoque_atual),
                estoque_minimo = COALESCE($8, estoque_minimo)
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(dados.nome.as_deref())
        .bind(dados.categoria)
        .bind(dados.custo_unitario)
        .bind(dados.unidade_medida)
        .bind(dados.estoque_atual)
        .bind(dados.estoque_minimo)
        .fetch_optional(&self.pool)
        .await?;
        Ok(produto)
    }

    async fn delete_produto(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM produtos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_stock(
        &self,
        owner: Uuid,
        id: Uuid,
        delta: Decimal,
    ) -> Result<Option<Produto>, AppError> {
        // Soma o delta no próprio UPDATE. Sem piso: o estoque pode ficar negativo.
        let produto = sqlx::query_as::<_, Produto>(
            r#"
            UPDATE produtos SET estoque_atual = estoque_atual + $3
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;
        Ok(produto)
    }

    // ---
    // Atendimentos
    // ---

    async fn list_atendimentos(&self, owner: Uuid) -> Result<Vec<Atendimento>, AppError> {
        let atendimentos = sqlx::query_as::<_, Atendimento>(
            r#"
            SELECT id, user_id, cliente_id, servico_id, data, valor_cobrado, forma_pagamento,
                   custo_material, lucro, observacoes
            FROM atendimentos
            WHERE user_id = $1
            ORDER BY data DESC, created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        self.attach_usage_lines(atendimentos).await
    }

    async fn find_atendimento(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Atendimento>, AppError> {
        let atendimento = sqlx::query_as::<_, Atendimento>(
            r#"
            SELECT id, user_id, cliente_id, servico_id, data, valor_cobrado, forma_pagamento,
                   custo_material, lucro, observacoes
            FROM atendimentos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        self.attach_one(atendimento).await
    }

    async fn insert_atendimento(
        &self,
        owner: Uuid,
        novo: &AtendimentoCalculado,
    ) -> Result<Atendimento, AppError> {
        let atendimento = sqlx::query_as::<_, Atendimento>(
            r#"
            INSERT INTO atendimentos
                (user_id, cliente_id, servico_id, data, valor_cobrado, forma_pagamento,
                 custo_material, lucro, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, cliente_id, servico_id, data, valor_cobrado, forma_pagamento,
                      custo_material, lucro, observacoes
            "#,
        )
        .bind(owner)
        .bind(novo.cliente_id)
        .bind(novo.servico_id)
        .bind(novo.data)
        .bind(novo.valor_cobrado)
        .bind(novo.forma_pagamento)
        .bind(novo.custo_material)
        .bind(novo.lucro)
        .bind(novo.observacoes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(atendimento)
    }

    async fn insert_usage_lines(
        &self,
        owner: Uuid,
        atendimento_id: Uuid,
        linhas: &[ProdutoUsado],
    ) -> Result<(), AppError> {
        if linhas.is_empty() {
            return Ok(());
        }

        let produto_ids: Vec<Uuid> = linhas.iter().map(|l| l.produto_id).collect();
        let quantidades: Vec<Decimal> = linhas.iter().map(|l| l.quantidade).collect();
        let custos: Vec<Decimal> = linhas.iter().map(|l| l.custo_total).collect();

        // Um único INSERT para todas as linhas; o WHERE garante que o atendimento é do dono.
        let result = sqlx::query(
            r#"
            INSERT INTO produtos_usados (atendimento_id, produto_id, quantidade, custo_total)
            SELECT $1, l.produto_id, l.quantidade, l.custo_total
            FROM UNNEST($3::uuid[], $4::numeric[], $5::numeric[])
                 WITH ORDINALITY AS l(produto_id, quantidade, custo_total, ordem)
            WHERE EXISTS (SELECT 1 FROM atendimentos WHERE id = $1 AND user_id = $2)
            ORDER BY l.ordem
            "#,
        )
        .bind(atendimento_id)
        .bind(owner)
        .bind(&produto_ids)
        .bind(&quantidades)
        .bind(&custos)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Atendimento"));
        }
        Ok(())
    }

    async fn update_atendimento(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarAtendimento,
    ) -> Result<Option<Atendimento>, AppError> {
        // Lucro: usa o explícito; senão recalcula se valor ou custo mudaram.
        let atendimento = sqlx::query_as::<_, Atendimento>(
            r#"
            UPDATE atendimentos SET
                cliente_id = COALESCE($3, cliente_id),
                servico_id = COALESCE($4, servico_id),
                data = COALESCE($5, data),
                valor_cobrado = COALESCE($6, valor_cobrado),
                forma_pagamento = COALESCE($7, forma_pagamento),
                custo_material = COALESCE($8, custo_material),
                lucro = CASE
                    WHEN $9::numeric IS NOT NULL THEN $9
                    WHEN $6::numeric IS NOT NULL OR $8::numeric IS NOT NULL
                        THEN COALESCE($6, valor_cobrado) - COALESCE($8, custo_material)
                    ELSE lucro
                END,
                observacoes = CASE WHEN $10 THEN $11 ELSE observacoes END
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, cliente_id, servico_id, data, valor_cobrado, forma_pagamento,
                      custo_material, lucro, observacoes
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(dados.cliente_id)
        .bind(dados.servico_id)
        .bind(dados.data)
        .bind(dados.valor_cobrado)
        .bind(dados.forma_pagamento)
        .bind(dados.custo_material)
        .bind(dados.lucro)
        .bind(dados.observacoes.is_some())
        .bind(dados.observacoes.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;
        self.attach_one(atendimento).await
    }

    async fn delete_atendimento(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        // produtos_usados tem ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM atendimentos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
