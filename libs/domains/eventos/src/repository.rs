use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{EventosError, EventosResult};
use crate::models::{
    Evento, EventoAprovado, EventoFilter, Submission, SubmitResult, Unidade, UnidadeFilter,
    UpdateEvento, UpdateUnidade,
};

/// Repository trait for Unidade persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnidadeRepository: Send + Sync {
    /// Create a unidade; `DuplicateName` when the name is taken
    async fn create(&self, nome_unidade: String) -> EventosResult<Unidade>;

    async fn get_by_id(&self, id: i32) -> EventosResult<Option<Unidade>>;

    /// Exact, case-sensitive name lookup
    async fn get_by_nome(&self, nome_unidade: &str) -> EventosResult<Option<Unidade>>;

    /// Unidades for the given ids, in id order; unknown ids are skipped
    async fn get_many(&self, ids: Vec<i32>) -> EventosResult<Vec<Unidade>>;

    async fn list(&self, filter: UnidadeFilter) -> EventosResult<Vec<Unidade>>;

    /// Unidades whose name contains `term`
    async fn search(&self, term: &str) -> EventosResult<Vec<Unidade>>;

    /// Apply a partial update; `DuplicateName` when renaming onto a taken name
    async fn update(&self, id: i32, input: UpdateUnidade) -> EventosResult<Unidade>;

    /// Delete a unidade that owns no events; `HasEventos` otherwise
    async fn delete(&self, id: i32) -> EventosResult<bool>;

    async fn count(&self) -> EventosResult<u64>;
}

/// Repository trait for Evento persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventoRepository: Send + Sync {
    /// Get-or-create the unidade and insert every event, all or nothing
    async fn submit(&self, submission: Submission) -> EventosResult<SubmitResult>;

    async fn get_by_id(&self, id: i32) -> EventosResult<Option<Evento>>;

    /// List events with optional filters, in id order
    async fn list(&self, filter: EventoFilter) -> EventosResult<Vec<Evento>>;

    /// Every event, for aggregation
    async fn list_all(&self) -> EventosResult<Vec<Evento>>;

    async fn list_by_unidade(&self, unidade_id: i32) -> EventosResult<Vec<Evento>>;

    async fn count_by_unidade(&self, unidade_id: i32) -> EventosResult<u64>;

    /// Apply a partial update; `EventoNotFound` when missing
    async fn update(&self, id: i32, input: UpdateEvento) -> EventosResult<Evento>;

    /// Delete an event and its approval snapshots
    async fn delete(&self, id: i32) -> EventosResult<bool>;

    /// Record an approval snapshot and mark the event approved
    async fn aprovar(&self, id: i32) -> EventosResult<EventoAprovado>;

    /// Approval snapshots of one event, newest first
    async fn list_aprovacoes(&self, evento_id: i32) -> EventosResult<Vec<EventoAprovado>>;
}

#[derive(Debug, Default)]
struct State {
    unidades: BTreeMap<i32, Unidade>,
    eventos: BTreeMap<i32, Evento>,
    aprovacoes: Vec<EventoAprovado>,
    next_unidade_id: i32,
    next_evento_id: i32,
    next_aprovacao_id: i32,
}

impl State {
    fn unidade_by_nome(&self, nome_unidade: &str) -> Option<&Unidade> {
        self.unidades
            .values()
            .find(|u| u.nome_unidade == nome_unidade)
    }

    fn insert_unidade(&mut self, nome_unidade: String) -> Unidade {
        self.next_unidade_id += 1;
        let unidade = Unidade {
            id: self.next_unidade_id,
            nome_unidade,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.unidades.insert(unidade.id, unidade.clone());
        unidade
    }

    fn eventos_of(&self, unidade_id: i32) -> impl Iterator<Item = &Evento> {
        self.eventos
            .values()
            .filter(move |e| e.unidade_id == unidade_id)
    }
}

fn page<T>(items: impl Iterator<Item = T>, limit: Option<u64>, offset: u64) -> Vec<T> {
    let take = limit.map_or(usize::MAX, |limit| limit as usize);
    items.skip(offset as usize).take(take).collect()
}

/// In-memory implementation of both repositories (for development/testing)
///
/// Clones share one store, so a single instance backs both services.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnidadeRepository for InMemoryStore {
    async fn create(&self, nome_unidade: String) -> EventosResult<Unidade> {
        let mut state = self.state.write().await;

        if state.unidade_by_nome(&nome_unidade).is_some() {
            return Err(EventosError::DuplicateName(nome_unidade));
        }

        let unidade = state.insert_unidade(nome_unidade);
        tracing::info!(unidade_id = unidade.id, "Created unidade");
        Ok(unidade)
    }

    async fn get_by_id(&self, id: i32) -> EventosResult<Option<Unidade>> {
        let state = self.state.read().await;
        Ok(state.unidades.get(&id).cloned())
    }

    async fn get_by_nome(&self, nome_unidade: &str) -> EventosResult<Option<Unidade>> {
        let state = self.state.read().await;
        Ok(state.unidade_by_nome(nome_unidade).cloned())
    }

    async fn get_many(&self, ids: Vec<i32>) -> EventosResult<Vec<Unidade>> {
        let state = self.state.read().await;
        Ok(state
            .unidades
            .values()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn list(&self, filter: UnidadeFilter) -> EventosResult<Vec<Unidade>> {
        let state = self.state.read().await;
        Ok(page(
            state.unidades.values().cloned(),
            filter.limit,
            filter.offset,
        ))
    }

    async fn search(&self, term: &str) -> EventosResult<Vec<Unidade>> {
        let state = self.state.read().await;
        Ok(state
            .unidades
            .values()
            .filter(|u| u.nome_unidade.contains(term))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, input: UpdateUnidade) -> EventosResult<Unidade> {
        let mut state = self.state.write().await;

        if let Some(nome) = input.nome_unidade.as_value() {
            if state
                .unidade_by_nome(nome)
                .is_some_and(|other| other.id != id)
            {
                return Err(EventosError::DuplicateName(nome.clone()));
            }
        }

        let unidade = state
            .unidades
            .get_mut(&id)
            .ok_or(EventosError::UnidadeNotFound(id))?;
        input.nome_unidade.apply_to(&mut unidade.nome_unidade);
        unidade.updated_at = Some(Utc::now());

        tracing::info!(unidade_id = id, "Updated unidade");
        Ok(unidade.clone())
    }

    async fn delete(&self, id: i32) -> EventosResult<bool> {
        let mut state = self.state.write().await;

        let count = state.eventos_of(id).count() as u64;
        if count > 0 {
            return Err(EventosError::HasEventos {
                unidade_id: id,
                count,
            });
        }

        let removed = state.unidades.remove(&id).is_some();
        if removed {
            tracing::info!(unidade_id = id, "Deleted unidade");
        }
        Ok(removed)
    }

    async fn count(&self) -> EventosResult<u64> {
        let state = self.state.read().await;
        Ok(state.unidades.len() as u64)
    }
}

#[async_trait]
impl EventoRepository for InMemoryStore {
    async fn submit(&self, submission: Submission) -> EventosResult<SubmitResult> {
        let mut state = self.state.write().await;

        let existing = state
            .unidade_by_nome(&submission.nome_unidade)
            .map(|u| u.id);
        let unidade_id = match existing {
            Some(id) => id,
            None => state.insert_unidade(submission.nome_unidade).id,
        };

        let now = Utc::now();
        let mut eventos_count = 0;
        for input in submission.eventos {
            state.next_evento_id += 1;
            let evento = Evento {
                id: state.next_evento_id,
                nome: input.nome,
                unidade_responsavel: input.unidade_responsavel,
                nome_solicitante: input.nome_solicitante,
                quantidade_pessoas: input.quantidade_pessoas,
                mes_previsto: input.mes_previsto,
                coffee_break_manha: input.coffee_break_manha,
                coffee_break_tarde: input.coffee_break_tarde,
                almoco: input.almoco,
                jantar: input.jantar,
                cerimonial: input.cerimonial,
                aprovado: false,
                unidade_id,
                created_at: now,
                updated_at: None,
            };
            state.eventos.insert(evento.id, evento);
            eventos_count += 1;
        }

        tracing::info!(unidade_id, eventos_count, "Submitted form");
        Ok(SubmitResult {
            unidade_id,
            eventos_count,
        })
    }

    async fn get_by_id(&self, id: i32) -> EventosResult<Option<Evento>> {
        let state = self.state.read().await;
        Ok(state.eventos.get(&id).cloned())
    }

    async fn list(&self, filter: EventoFilter) -> EventosResult<Vec<Evento>> {
        let state = self.state.read().await;
        let matching = state
            .eventos
            .values()
            .filter(|e| filter.matches(e))
            .cloned();
        Ok(page(matching, filter.limit, filter.offset))
    }

    async fn list_all(&self) -> EventosResult<Vec<Evento>> {
        let state = self.state.read().await;
        Ok(state.eventos.values().cloned().collect())
    }

    async fn list_by_unidade(&self, unidade_id: i32) -> EventosResult<Vec<Evento>> {
        let state = self.state.read().await;
        Ok(state.eventos_of(unidade_id).cloned().collect())
    }

    async fn count_by_unidade(&self, unidade_id: i32) -> EventosResult<u64> {
        let state = self.state.read().await;
        Ok(state.eventos_of(unidade_id).count() as u64)
    }

    async fn update(&self, id: i32, input: UpdateEvento) -> EventosResult<Evento> {
        let mut state = self.state.write().await;

        let evento = state
            .eventos
            .get_mut(&id)
            .ok_or(EventosError::EventoNotFound(id))?;
        evento.apply_update(input)?;

        tracing::info!(evento_id = id, "Updated evento");
        Ok(evento.clone())
    }

    async fn delete(&self, id: i32) -> EventosResult<bool> {
        let mut state = self.state.write().await;

        let removed = state.eventos.remove(&id).is_some();
        if removed {
            state.aprovacoes.retain(|a| a.evento_id != id);
            tracing::info!(evento_id = id, "Deleted evento");
        }
        Ok(removed)
    }

    async fn aprovar(&self, id: i32) -> EventosResult<EventoAprovado> {
        let mut state = self.state.write().await;

        let evento = state
            .eventos
            .get_mut(&id)
            .ok_or(EventosError::EventoNotFound(id))?;
        evento.aprovado = true;
        evento.updated_at = Some(Utc::now());
        let mut snapshot = EventoAprovado::snapshot(evento);

        state.next_aprovacao_id += 1;
        snapshot.id = state.next_aprovacao_id;
        state.aprovacoes.push(snapshot.clone());

        tracing::info!(evento_id = id, aprovacao_id = snapshot.id, "Approved evento");
        Ok(snapshot)
    }

    async fn list_aprovacoes(&self, evento_id: i32) -> EventosResult<Vec<EventoAprovado>> {
        let state = self.state.read().await;
        Ok(state
            .aprovacoes
            .iter()
            .rev()
            .filter(|a| a.evento_id == evento_id)
            .cloned()
            .collect())
    }
}
