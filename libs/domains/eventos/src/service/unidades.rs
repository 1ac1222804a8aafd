use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{EventosError, EventosResult};
use crate::models::{CreateUnidade, Unidade, UnidadeComEventos, UnidadeFilter, UpdateUnidade};
use crate::repository::{EventoRepository, UnidadeRepository};

/// Service layer for Unidade business logic
pub struct UnidadeService<U: UnidadeRepository, E: EventoRepository> {
    unidades: Arc<U>,
    eventos: Arc<E>,
}

impl<U: UnidadeRepository, E: EventoRepository> Clone for UnidadeService<U, E> {
    fn clone(&self) -> Self {
        Self {
            unidades: Arc::clone(&self.unidades),
            eventos: Arc::clone(&self.eventos),
        }
    }
}

impl<U: UnidadeRepository, E: EventoRepository> UnidadeService<U, E> {
    pub fn new(unidades: U, eventos: E) -> Self {
        Self {
            unidades: Arc::new(unidades),
            eventos: Arc::new(eventos),
        }
    }

    /// Create a unidade, refusing names already in use
    #[instrument(skip(self))]
    pub async fn create_unidade(&self, input: CreateUnidade) -> EventosResult<Unidade> {
        input.validate()?;

        if self
            .unidades
            .get_by_nome(&input.nome_unidade)
            .await?
            .is_some()
        {
            return Err(EventosError::DuplicateName(input.nome_unidade));
        }

        self.unidades.create(input.nome_unidade).await
    }

    #[instrument(skip(self))]
    pub async fn list_unidades(&self, filter: UnidadeFilter) -> EventosResult<Vec<Unidade>> {
        self.unidades.list(filter).await
    }

    /// Get a unidade by ID together with its events
    #[instrument(skip(self))]
    pub async fn get_unidade(&self, id: i32) -> EventosResult<UnidadeComEventos> {
        let unidade = self
            .unidades
            .get_by_id(id)
            .await?
            .ok_or(EventosError::UnidadeNotFound(id))?;

        self.with_eventos(unidade).await
    }

    /// Get a unidade by exact name together with its events
    #[instrument(skip(self))]
    pub async fn get_unidade_by_nome(&self, nome_unidade: &str) -> EventosResult<UnidadeComEventos> {
        let unidade = self
            .unidades
            .get_by_nome(nome_unidade)
            .await?
            .ok_or_else(|| EventosError::UnidadeNomeNotFound(nome_unidade.to_string()))?;

        self.with_eventos(unidade).await
    }

    #[instrument(skip(self))]
    pub async fn search_unidades(&self, term: &str) -> EventosResult<Vec<Unidade>> {
        self.unidades.search(term).await
    }

    /// Rename a unidade; the new name must not belong to another unidade
    #[instrument(skip(self))]
    pub async fn update_unidade(&self, id: i32, input: UpdateUnidade) -> EventosResult<Unidade> {
        input.validate()?;

        let current = self
            .unidades
            .get_by_id(id)
            .await?
            .ok_or(EventosError::UnidadeNotFound(id))?;

        if let Some(nome) = input.nome_unidade.as_value() {
            if nome != &current.nome_unidade {
                if let Some(other) = self.unidades.get_by_nome(nome).await? {
                    if other.id != id {
                        return Err(EventosError::NameTaken(nome.clone()));
                    }
                }
            }
        }

        self.unidades
            .update(id, input)
            .await
            .map_err(|e| match e {
                EventosError::DuplicateName(nome) => EventosError::NameTaken(nome),
                other => other,
            })
    }

    /// Delete a unidade that owns no events
    #[instrument(skip(self))]
    pub async fn delete_unidade(&self, id: i32) -> EventosResult<()> {
        if self.unidades.get_by_id(id).await?.is_none() {
            return Err(EventosError::UnidadeNotFound(id));
        }

        let count = self.eventos.count_by_unidade(id).await?;
        if count > 0 {
            return Err(EventosError::HasEventos {
                unidade_id: id,
                count,
            });
        }

        if !self.unidades.delete(id).await? {
            return Err(EventosError::UnidadeNotFound(id));
        }

        Ok(())
    }

    async fn with_eventos(&self, unidade: Unidade) -> EventosResult<UnidadeComEventos> {
        let eventos = self.eventos.list_by_unidade(unidade.id).await?;
        Ok(UnidadeComEventos { unidade, eventos })
    }
}
