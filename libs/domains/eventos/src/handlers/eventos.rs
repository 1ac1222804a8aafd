use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ApiResponse, Created, IdPath, MessageResponse, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::EVENTOS_TAG;
use crate::error::EventosResult;
use crate::models::{
    AprovacaoData, Evento, EventoAprovado, EventoComUnidade, EventoData, EventoFilter, EventoForm,
    Mes, SubmitForm, SubmitResult, Unidade, UpdateEvento,
};
use crate::repository::{EventoRepository, UnidadeRepository};
use crate::service::EventoService;
use crate::stats::{EventoStats, Servico};

type SharedService<E, U> = State<Arc<EventoService<E, U>>>;

/// OpenAPI documentation for the Eventos API
#[derive(OpenApi)]
#[openapi(
    paths(
        submit_form,
        list_eventos,
        get_evento,
        update_evento,
        delete_evento,
        list_eventos_por_mes,
        get_stats,
        aprovar_evento,
        list_aprovacoes,
    ),
    components(
        schemas(
            SubmitForm,
            EventoForm,
            SubmitResult,
            Evento,
            EventoComUnidade,
            Unidade,
            UpdateEvento,
            EventoData,
            EventoAprovado,
            AprovacaoData,
            EventoStats,
            Servico,
            Mes,
            MessageResponse
        ),
        responses(BadRequestResponse, NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = EVENTOS_TAG, description = "Form submission, event management and statistics")
    )
)]
pub struct EventosApiDoc;

/// Create the eventos router with all HTTP endpoints
pub fn router<E, U>(service: EventoService<E, U>) -> Router
where
    E: EventoRepository + 'static,
    U: UnidadeRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_eventos).post(submit_form))
        .route(
            "/{id}",
            get(get_evento).put(update_evento).delete(delete_evento),
        )
        .route("/mes/{mes}", get(list_eventos_por_mes))
        .route("/stats/resumo", get(get_stats))
        .route("/{id}/aprovar", post(aprovar_evento))
        .route("/{id}/aprovacoes", get(list_aprovacoes))
        .with_state(shared_service)
}

/// Submit the events form
///
/// Reuses the unidade when the name is already registered.
#[utoipa::path(
    post,
    path = "",
    tag = EVENTOS_TAG,
    request_body = SubmitForm,
    responses(
        (status = 201, description = "Form stored", body = ApiResponse<SubmitResult>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn submit_form<E: EventoRepository, U: UnidadeRepository>(
    State(service): SharedService<E, U>,
    ValidatedJson(form): ValidatedJson<SubmitForm>,
) -> EventosResult<impl IntoResponse> {
    let result = service.submit_form(form).await?;

    let message = format!(
        "Formulário submetido com sucesso. {} eventos criados.",
        result.eventos_count
    );
    Ok(Created(ApiResponse::ok(message, result)))
}

/// List events with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = EVENTOS_TAG,
    params(EventoFilter),
    responses(
        (status = 200, description = "Events with their unidade", body = Vec<EventoComUnidade>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_eventos<E: EventoRepository, U: UnidadeRepository>(
    State(service): SharedService<E, U>,
    ValidatedQuery(filter): ValidatedQuery<EventoFilter>,
) -> EventosResult<Json<Vec<EventoComUnidade>>> {
    let eventos = service.list_eventos(filter).await?;
    Ok(Json(eventos))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = EVENTOS_TAG,
    params(("id" = i32, Path, description = "Evento ID")),
    responses(
        (status = 200, description = "Event found", body = EventoComUnidade),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_evento<E: EventoRepository, U: UnidadeRepository>(
    State(service): SharedService<E, U>,
    IdPath(id): IdPath,
) -> EventosResult<Json<EventoComUnidade>> {
    let evento = service.get_evento(id).await?;
    Ok(Json(evento))
}

/// Partially update an event
#[utoipa::path(
    put,
    path = "/{id}",
    tag = EVENTOS_TAG,
    params(("id" = i32, Path, description = "Evento ID")),
    request_body = UpdateEvento,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventoData>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_evento<E: EventoRepository, U: UnidadeRepository>(
    State(service): SharedService<E, U>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateEvento>,
) -> EventosResult<Json<ApiResponse<EventoData>>> {
    let evento = service.update_evento(id, input).await?;
    Ok(Json(ApiResponse::ok(
        "Evento atualizado com sucesso",
        EventoData { evento },
    )))
}

/// Delete an event and its approval history
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = EVENTOS_TAG,
    params(("id" = i32, Path, description = "Evento ID")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_evento<E: EventoRepository, U: UnidadeRepository>(
    State(service): SharedService<E, U>,
    IdPath(id): IdPath,
) -> EventosResult<Json<MessageResponse>> {
    service.delete_evento(id).await?;
    Ok(Json(MessageResponse::ok("Evento deletado com sucesso")))
}

/// List every event planned for a month
#[utoipa::path(
    get,
    path = "/mes/{mes}",
    tag = EVENTOS_TAG,
    params(("mes" = String, Path, description = "Month label, e.g. Março")),
    responses(
        (status = 200, description = "Events of the month", body = Vec<EventoComUnidade>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_eventos_por_mes<E: EventoRepository, U: UnidadeRepository>(
    State(service): SharedService<E, U>,
    Path(mes): Path<String>,
) -> EventosResult<Json<Vec<EventoComUnidade>>> {
    let eventos = service.list_eventos_por_mes(&mes).await?;
    Ok(Json(eventos))
}

/// Dashboard summary
#[utoipa::path(
    get,
    path = "/stats/resumo",
    tag = EVENTOS_TAG,
    responses(
        (status = 200, description = "Aggregated counts", body = EventoStats),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_stats<E: EventoRepository, U: UnidadeRepository>(
    State(service): SharedService<E, U>,
) -> EventosResult<Json<EventoStats>> {
    let stats = service.stats().await?;
    Ok(Json(stats))
}

/// Approve an event, recording a snapshot of its services
#[utoipa::path(
    post,
    path = "/{id}/aprovar",
    tag = EVENTOS_TAG,
    params(("id" = i32, Path, description = "Evento ID")),
    responses(
        (status = 201, description = "Approval recorded", body = ApiResponse<AprovacaoData>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn aprovar_evento<E: EventoRepository, U: UnidadeRepository>(
    State(service): SharedService<E, U>,
    IdPath(id): IdPath,
) -> EventosResult<impl IntoResponse> {
    let aprovacao = service.aprovar_evento(id).await?;
    Ok(Created(ApiResponse::ok(
        "Evento aprovado com sucesso",
        AprovacaoData { aprovacao },
    )))
}

/// Approval history of an event, newest first
#[utoipa::path(
    get,
    path = "/{id}/aprovacoes",
    tag = EVENTOS_TAG,
    params(("id" = i32, Path, description = "Evento ID")),
    responses(
        (status = 200, description = "Approval snapshots", body = Vec<EventoAprovado>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_aprovacoes<E: EventoRepository, U: UnidadeRepository>(
    State(service): SharedService<E, U>,
    IdPath(id): IdPath,
) -> EventosResult<Json<Vec<EventoAprovado>>> {
    let aprovacoes = service.list_aprovacoes(id).await?;
    Ok(Json(aprovacoes))
}
