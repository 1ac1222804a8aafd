use async_trait::async_trait;
use chrono::Utc;
use database::postgres::DatabaseConnection;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{LikeExpr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};

use crate::{
    entity::{evento, evento_aprovado, unidade},
    error::{EventosError, EventosResult},
    models::{
        Evento, EventoAprovado, EventoFilter, Submission, SubmitResult, Unidade, UnidadeFilter,
        UpdateEvento, UpdateUnidade,
    },
    repository::{EventoRepository, UnidadeRepository},
};

/// Unique index violations on `unidades.nome_unidade` become `DuplicateName`.
fn map_unique(err: DbErr, nome_unidade: &str) -> EventosError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            EventosError::DuplicateName(nome_unidade.to_string())
        }
        _ => EventosError::Database(err),
    }
}

/// `%term%` with the `LIKE` metacharacters of `term` backslash-escaped.
fn escape_like(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Literal substring match, same as `str::contains`.
fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(escape_like(term)).escape('\\')
}

async fn count_eventos<C: ConnectionTrait>(conn: &C, unidade_id: i32) -> Result<u64, DbErr> {
    evento::Entity::find()
        .filter(evento::Column::UnidadeId.eq(unidade_id))
        .count(conn)
        .await
}

#[derive(Clone)]
pub struct PgUnidadeRepository {
    db: DatabaseConnection,
}

impl PgUnidadeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnidadeRepository for PgUnidadeRepository {
    async fn create(&self, nome_unidade: String) -> EventosResult<Unidade> {
        let model = unidade::new_active_model(nome_unidade.clone())
            .insert(&self.db)
            .await
            .map_err(|e| map_unique(e, &nome_unidade))?;

        tracing::info!(unidade_id = model.id, "Created unidade");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> EventosResult<Option<Unidade>> {
        let model = unidade::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_nome(&self, nome_unidade: &str) -> EventosResult<Option<Unidade>> {
        let model = unidade::Entity::find()
            .filter(unidade::Column::NomeUnidade.eq(nome_unidade))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn get_many(&self, ids: Vec<i32>) -> EventosResult<Vec<Unidade>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = unidade::Entity::find()
            .filter(unidade::Column::Id.is_in(ids))
            .order_by_asc(unidade::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list(&self, filter: UnidadeFilter) -> EventosResult<Vec<Unidade>> {
        let models = unidade::Entity::find()
            .order_by_asc(unidade::Column::Id)
            .offset(filter.offset)
            .limit(filter.limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn search(&self, term: &str) -> EventosResult<Vec<Unidade>> {
        let models = unidade::Entity::find()
            .filter(unidade::Column::NomeUnidade.like(contains_pattern(term)))
            .order_by_asc(unidade::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i32, input: UpdateUnidade) -> EventosResult<Unidade> {
        let model = unidade::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(EventosError::UnidadeNotFound(id))?;

        let nome_unidade = input.nome_unidade.as_value().cloned();
        let mut active: unidade::ActiveModel = model.into();
        if let Some(nome) = &nome_unidade {
            active.nome_unidade = Set(nome.clone());
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| map_unique(e, nome_unidade.as_deref().unwrap_or_default()))?;

        tracing::info!(unidade_id = id, "Updated unidade");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> EventosResult<bool> {
        let txn = self.db.begin().await?;

        let count = count_eventos(&txn, id).await?;
        if count > 0 {
            return Err(EventosError::HasEventos {
                unidade_id: id,
                count,
            });
        }

        let result = match unidade::Entity::delete_by_id(id).exec(&txn).await {
            Ok(result) => result,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                // An event was attached after the count; report what is there now.
                drop(txn);
                let count = count_eventos(&self.db, id).await.unwrap_or(1).max(1);
                return Err(EventosError::HasEventos {
                    unidade_id: id,
                    count,
                });
            }
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(unidade_id = id, "Deleted unidade");
        }
        Ok(deleted)
    }

    async fn count(&self) -> EventosResult<u64> {
        Ok(unidade::Entity::find().count(&self.db).await?)
    }
}

#[derive(Clone)]
pub struct PgEventoRepository {
    db: DatabaseConnection,
}

impl PgEventoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventoRepository for PgEventoRepository {
    async fn submit(&self, submission: Submission) -> EventosResult<SubmitResult> {
        let txn = self.db.begin().await?;

        // Concurrent submissions for a new name converge on one row.
        let inserted = unidade::Entity::insert(unidade::new_active_model(
            submission.nome_unidade.clone(),
        ))
        .on_conflict(
            OnConflict::column(unidade::Column::NomeUnidade)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        let unidade_id = unidade::Entity::find()
            .filter(unidade::Column::NomeUnidade.eq(submission.nome_unidade.as_str()))
            .one(&txn)
            .await?
            .map(|u| u.id)
            .ok_or_else(|| {
                EventosError::Internal(format!(
                    "Unidade '{}' missing after upsert",
                    submission.nome_unidade
                ))
            })?;
        if inserted > 0 {
            tracing::info!(unidade_id, "Created unidade from form");
        }

        let mut eventos_count = 0;
        for input in submission.eventos {
            evento::new_active_model(input, unidade_id)
                .insert(&txn)
                .await?;
            eventos_count += 1;
        }

        txn.commit().await?;

        tracing::info!(unidade_id, eventos_count, "Submitted form");
        Ok(SubmitResult {
            unidade_id,
            eventos_count,
        })
    }

    async fn get_by_id(&self, id: i32) -> EventosResult<Option<Evento>> {
        let model = evento::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: EventoFilter) -> EventosResult<Vec<Evento>> {
        let mut query = evento::Entity::find();

        if let Some(unidade_id) = filter.unidade_id {
            query = query.filter(evento::Column::UnidadeId.eq(unidade_id));
        }
        if let Some(mes) = filter.mes {
            query = query.filter(evento::Column::MesPrevisto.eq(mes));
        }
        if let Some(aprovado) = filter.aprovado {
            query = query.filter(evento::Column::Aprovado.eq(aprovado));
        }

        let models = query
            .order_by_asc(evento::Column::Id)
            .offset(filter.offset)
            .limit(filter.limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> EventosResult<Vec<Evento>> {
        let models = evento::Entity::find()
            .order_by_asc(evento::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_by_unidade(&self, unidade_id: i32) -> EventosResult<Vec<Evento>> {
        let models = evento::Entity::find()
            .filter(evento::Column::UnidadeId.eq(unidade_id))
            .order_by_asc(evento::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_by_unidade(&self, unidade_id: i32) -> EventosResult<u64> {
        Ok(count_eventos(&self.db, unidade_id).await?)
    }

    async fn update(&self, id: i32, input: UpdateEvento) -> EventosResult<Evento> {
        let txn = self.db.begin().await?;

        // Row stays locked until commit so concurrent partial updates serialize.
        let model = evento::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(EventosError::EventoNotFound(id))?;

        let mut evento: Evento = model.into();
        evento.apply_update(input)?;

        let active: evento::ActiveModel = evento.into();
        let model = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(evento_id = id, "Updated evento");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> EventosResult<bool> {
        let result = evento::Entity::delete_by_id(id).exec(&self.db).await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(evento_id = id, "Deleted evento");
        }
        Ok(deleted)
    }

    async fn aprovar(&self, id: i32) -> EventosResult<EventoAprovado> {
        let txn = self.db.begin().await?;

        let model = evento::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(EventosError::EventoNotFound(id))?;

        let evento: Evento = model.clone().into();
        let snapshot: evento_aprovado::ActiveModel = EventoAprovado::snapshot(&evento).into();
        let snapshot = snapshot.insert(&txn).await?;

        let mut active: evento::ActiveModel = model.into();
        active.aprovado = Set(true);
        active.updated_at = Set(Some(Utc::now().into()));
        active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(evento_id = id, aprovacao_id = snapshot.id, "Approved evento");
        Ok(snapshot.into())
    }

    async fn list_aprovacoes(&self, evento_id: i32) -> EventosResult<Vec<EventoAprovado>> {
        let models = evento_aprovado::Entity::find()
            .filter(evento_aprovado::Column::EventoId.eq(evento_id))
            .order_by_desc(evento_aprovado::Column::AprovadoEm)
            .order_by_desc(evento_aprovado::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
