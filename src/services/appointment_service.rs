// src/services/appointment_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::RecordStore,
    models::{
        atendimento::{
            Atendimento, AtendimentoCalculado, AtualizarAtendimento, LinhaProduto,
            LinhaRejeitada, MotivoRejeicao, NovoAtendimento, ProdutoUsado, RegistroAtendimento,
        },
        arredondar,
        cliente::VisitaCliente,
        produto::Produto,
        CASAS_CUSTO, CASAS_QUANTIDADE,
    },
    services::inventory_service::InventoryService,
};

// Ação que desfaz uma etapa já concluída do registro
#[derive(Debug)]
enum Compensacao {
    // Remove o atendimento (os produtos usados vão junto, em cascata)
    RemoverAtendimento(Uuid),
    DevolverEstoque { produto_id: Uuid, quantidade: Decimal },
}

// Etapas concluídas, na ordem em que aconteceram
struct Saga {
    owner: Uuid,
    feitas: Vec<Compensacao>,
}

impl Saga {
    fn new(owner: Uuid) -> Self {
        Self { owner, feitas: Vec::new() }
    }

    fn push(&mut self, compensacao: Compensacao) {
        self.feitas.push(compensacao);
    }

    /// Desfaz na ordem inversa. Devolve o erro original, ou `PartialWrite`
    /// se alguma compensação também falhar.
    async fn rollback(self, store: &dyn RecordStore, causa: AppError) -> AppError {
        tracing::warn!("Registro de atendimento falhou ({}); desfazendo {} etapa(s)", causa, self.feitas.len());

        let mut falhas = 0;
        for compensacao in self.feitas.into_iter().rev() {
            let resultado = match &compensacao {
                Compensacao::RemoverAtendimento(id) => {
                    store.delete_atendimento(self.owner, *id).await.map(|_| ())
                }
                Compensacao::DevolverEstoque { produto_id, quantidade } => store
                    .adjust_stock(self.owner, *produto_id, *quantidade)
                    .await
                    .map(|_| ()),
            };
            if let Err(e) = resultado {
                falhas += 1;
                tracing::error!("🔥 Falha ao compensar {:?}: {}", compensacao, e);
            }
        }

        if falhas > 0 {
            AppError::PartialWrite(format!("{causa}; {falhas} compensação(ões) falharam"))
        } else {
            causa
        }
    }
}

/// Separa as linhas válidas das rejeitadas, usando o catálogo atual.
///
/// Uma linha válida vira `ProdutoUsado` com `custo_total = quantidade x custo_unitario`.
/// A quantidade é arredondada para 3 casas e o custo da linha para 4, as
/// escalas das colunas; o custo do material é a soma desses valores já
/// arredondados.
/// Linhas sem produto, sem quantidade, com quantidade <= 0 ou com produto
/// desconhecido são rejeitadas com o índice original e o motivo.
pub fn validate_usage_lines(
    catalogo: &[Produto],
    linhas: &[LinhaProduto],
) -> (Vec<ProdutoUsado>, Vec<LinhaRejeitada>) {
    let mut validas = Vec::with_capacity(linhas.len());
    let mut rejeitadas = Vec::new();

    for (indice, linha) in linhas.iter().enumerate() {
        let rejeitar = |motivo| LinhaRejeitada {
            indice,
            produto_id: linha.produto_id,
            motivo,
        };

        let Some(produto_id) = linha.produto_id else {
            rejeitadas.push(rejeitar(MotivoRejeicao::ProdutoAusente));
            continue;
        };
        let Some(quantidade) = linha.quantidade.map(|q| arredondar(q, CASAS_QUANTIDADE)) else {
            rejeitadas.push(rejeitar(MotivoRejeicao::QuantidadeAusente));
            continue;
        };
        if quantidade <= Decimal::ZERO {
            rejeitadas.push(rejeitar(MotivoRejeicao::QuantidadeNaoPositiva));
            continue;
        }
        let Some(produto) = catalogo.iter().find(|p| p.id == produto_id) else {
            rejeitadas.push(rejeitar(MotivoRejeicao::ProdutoDesconhecido));
            continue;
        };

        validas.push(ProdutoUsado {
            produto_id,
            quantidade,
            custo_total: arredondar(quantidade * produto.custo_unitario, CASAS_CUSTO),
        });
    }

    (validas, rejeitadas)
}

pub fn material_cost(linhas: &[ProdutoUsado]) -> Decimal {
    linhas.iter().map(|l| l.custo_total).sum()
}

// Registrador de atendimentos
#[derive(Clone)]
pub struct AppointmentService {
    store: Arc<dyn RecordStore>,
    inventory_service: InventoryService,
    reject_invalid_lines: bool,
}

impl AppointmentService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        inventory_service: InventoryService,
        reject_invalid_lines: bool,
    ) -> Self {
        Self {
            store,
            inventory_service,
            reject_invalid_lines,
        }
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<Atendimento>, AppError> {
        self.store.list_atendimentos(owner).await
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Atendimento>, AppError> {
        self.store.find_atendimento(owner, id).await
    }

    // --- REGISTRAR ATENDIMENTO ---
    pub async fn create(
        &self,
        owner: Uuid,
        draft: &NovoAtendimento,
    ) -> Result<RegistroAtendimento, AppError> {
        draft.validate()?;

        // 1. Custo do material com o catálogo atual
        let catalogo = self.store.list_produtos(owner).await?;
        let (linhas, rejeitadas) = validate_usage_lines(&catalogo, &draft.produtos_usados);

        if !rejeitadas.is_empty() {
            if self.reject_invalid_lines {
                return Err(AppError::InvalidUsageLines(rejeitadas));
            }
            tracing::warn!("{} linha(s) de produto descartada(s): {:?}", rejeitadas.len(), rejeitadas);
        }

        let custo_material = material_cost(&linhas);

        // 2. Lucro (pode ser negativo)
        let lucro = draft.valor_cobrado - custo_material;

        // 3. Grava o atendimento. Se falhar aqui, não há nada para desfazer.
        let calculado = AtendimentoCalculado {
            cliente_id: draft.cliente_id,
            servico_id: draft.servico_id,
            data: draft.data,
            valor_cobrado: draft.valor_cobrado,
            forma_pagamento: draft.forma_pagamento,
            custo_material,
            lucro,
            observacoes: draft.observacoes.clone(),
        };
        let mut atendimento = self.store.insert_atendimento(owner, &calculado).await?;

        let mut saga = Saga::new(owner);
        saga.push(Compensacao::RemoverAtendimento(atendimento.id));

        // 4 e 5. Produtos usados, baixa de estoque e agregados da cliente
        if let Err(causa) = self.apply_effects(owner, &atendimento, &linhas, &mut saga).await {
            return Err(saga.rollback(self.store.as_ref(), causa).await);
        }

        tracing::info!(
            "✅ Atendimento {} registrado (valor: {}, custo: {}, lucro: {})",
            atendimento.id,
            atendimento.valor_cobrado,
            atendimento.custo_material,
            atendimento.lucro
        );

        atendimento.produtos_usados = linhas;
        Ok(RegistroAtendimento {
            atendimento,
            linhas_rejeitadas: rejeitadas,
        })
    }

    async fn apply_effects(
        &self,
        owner: Uuid,
        atendimento: &Atendimento,
        linhas: &[ProdutoUsado],
        saga: &mut Saga,
    ) -> Result<(), AppError> {
        if !linhas.is_empty() {
            self.store
                .insert_usage_lines(owner, atendimento.id, linhas)
                .await?;

            for linha in linhas {
                let ajustado = self
                    .inventory_service
                    .adjust_stock(owner, linha.produto_id, -linha.quantidade)
                    .await?;
                if ajustado.is_some() {
                    saga.push(Compensacao::DevolverEstoque {
                        produto_id: linha.produto_id,
                        quantidade: linha.quantidade,
                    });
                }
            }
        }

        // Última etapa: se falhar, as anteriores são desfeitas pela saga.
        let visita = VisitaCliente {
            valor: atendimento.valor_cobrado,
            data: atendimento.data.date(),
        };
        let cliente = self
            .store
            .apply_client_visit(owner, atendimento.cliente_id, &visita)
            .await?;
        if cliente.is_none() {
            tracing::warn!(
                "Cliente {} não encontrada; totais não atualizados",
                atendimento.cliente_id
            );
        }

        Ok(())
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        dados: &AtualizarAtendimento,
    ) -> Result<Option<Atendimento>, AppError> {
        dados.validate()?;
        self.store.update_atendimento(owner, id, dados).await
    }

    /// Remove o atendimento e seus produtos usados.
    /// Não devolve estoque e não estorna os totais da cliente.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let removido = self.store.delete_atendimento(owner, id).await?;
        if removido {
            tracing::info!("Atendimento {} removido (sem estorno de estoque ou totais)", id);
        }
        Ok(removido)
    }
}
