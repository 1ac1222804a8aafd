use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{EventosError, EventosResult};
use crate::models::{
    Evento, EventoAprovado, EventoComUnidade, EventoFilter, Mes, SubmitForm, SubmitResult,
    UpdateEvento,
};
use crate::repository::{EventoRepository, UnidadeRepository};
use crate::stats::{EventoStats, compute_stats};

/// Service layer for Evento business logic
pub struct EventoService<E: EventoRepository, U: UnidadeRepository> {
    eventos: Arc<E>,
    unidades: Arc<U>,
}

impl<E: EventoRepository, U: UnidadeRepository> Clone for EventoService<E, U> {
    fn clone(&self) -> Self {
        Self {
            eventos: Arc::clone(&self.eventos),
            unidades: Arc::clone(&self.unidades),
        }
    }
}

impl<E: EventoRepository, U: UnidadeRepository> EventoService<E, U> {
    pub fn new(eventos: E, unidades: U) -> Self {
        Self {
            eventos: Arc::new(eventos),
            unidades: Arc::new(unidades),
        }
    }

    /// Register a unidade (or reuse it by name) and all of its events at once
    ///
    /// Every month label is checked before anything is written. Storage
    /// failures surface as `SubmitFailed`; nothing from the form is kept.
    #[instrument(skip(self, form), fields(nome_unidade = %form.nome_unidade, eventos = form.eventos.len()))]
    pub async fn submit_form(&self, form: SubmitForm) -> EventosResult<SubmitResult> {
        form.validate()?;
        let submission = form.into_submission()?;

        self.eventos
            .submit(submission)
            .await
            .map_err(|e| match e {
                EventosError::Database(err) => EventosError::SubmitFailed(err.to_string()),
                EventosError::Internal(detail) => EventosError::SubmitFailed(detail),
                other => other,
            })
    }

    #[instrument(skip(self))]
    pub async fn list_eventos(&self, filter: EventoFilter) -> EventosResult<Vec<EventoComUnidade>> {
        let eventos = self.eventos.list(filter).await?;
        self.attach_unidades(eventos).await
    }

    /// Every event planned for the month labelled `mes`
    #[instrument(skip(self))]
    pub async fn list_eventos_por_mes(&self, mes: &str) -> EventosResult<Vec<EventoComUnidade>> {
        let mes = Mes::parse_field("mes", mes)?;
        let eventos = self.eventos.list(EventoFilter::por_mes(mes)).await?;
        self.attach_unidades(eventos).await
    }

    #[instrument(skip(self))]
    pub async fn get_evento(&self, id: i32) -> EventosResult<EventoComUnidade> {
        let evento = self.find(id).await?;
        let mut found = self.attach_unidades(vec![evento]).await?;
        found
            .pop()
            .ok_or_else(|| EventosError::Internal(format!("Evento {id} lost its unidade")))
    }

    /// Apply the fields present in `input`
    #[instrument(skip(self))]
    pub async fn update_evento(&self, id: i32, input: UpdateEvento) -> EventosResult<Evento> {
        input.validate()?;
        input.mes()?;

        self.find(id).await?;
        self.eventos.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_evento(&self, id: i32) -> EventosResult<()> {
        if !self.eventos.delete(id).await? {
            return Err(EventosError::EventoNotFound(id));
        }

        Ok(())
    }

    /// Snapshot the event's services and mark it approved
    #[instrument(skip(self))]
    pub async fn aprovar_evento(&self, id: i32) -> EventosResult<EventoAprovado> {
        self.eventos.aprovar(id).await
    }

    /// Approval history of one event, newest first
    #[instrument(skip(self))]
    pub async fn list_aprovacoes(&self, id: i32) -> EventosResult<Vec<EventoAprovado>> {
        self.find(id).await?;
        self.eventos.list_aprovacoes(id).await
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> EventosResult<EventoStats> {
        let eventos = self.eventos.list_all().await?;
        let total_unidades = self.unidades.count().await?;

        Ok(compute_stats(&eventos, total_unidades))
    }

    async fn find(&self, id: i32) -> EventosResult<Evento> {
        self.eventos
            .get_by_id(id)
            .await?
            .ok_or(EventosError::EventoNotFound(id))
    }

    async fn attach_unidades(&self, eventos: Vec<Evento>) -> EventosResult<Vec<EventoComUnidade>> {
        let ids: BTreeSet<i32> = eventos.iter().map(|e| e.unidade_id).collect();
        let unidades: HashMap<_, _> = self
            .unidades
            .get_many(ids.into_iter().collect())
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        eventos
            .into_iter()
            .map(|evento| {
                let unidade = unidades.get(&evento.unidade_id).cloned().ok_or_else(|| {
                    EventosError::Internal(format!(
                        "Unidade {} missing for evento {}",
                        evento.unidade_id, evento.id
                    ))
                })?;
                Ok(EventoComUnidade { evento, unidade })
            })
            .collect()
    }
}
