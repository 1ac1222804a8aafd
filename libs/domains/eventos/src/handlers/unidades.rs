use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ApiResponse, Created, IdPath, MessageResponse, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::UNIDADES_TAG;
use crate::error::EventosResult;
use crate::models::{
    CreateUnidade, Evento, Unidade, UnidadeComEventos, UnidadeData, UnidadeFilter, UpdateUnidade,
};
use crate::repository::{EventoRepository, UnidadeRepository};
use crate::service::UnidadeService;

type SharedService<U, E> = State<Arc<UnidadeService<U, E>>>;

/// OpenAPI documentation for the Unidades API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_unidade,
        list_unidades,
        get_unidade,
        update_unidade,
        delete_unidade,
        get_unidade_by_nome,
        search_unidades,
    ),
    components(
        schemas(
            Unidade,
            UnidadeComEventos,
            Evento,
            CreateUnidade,
            UpdateUnidade,
            UnidadeData,
            MessageResponse
        ),
        responses(
            BadRequestResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = UNIDADES_TAG, description = "Unidade management endpoints")
    )
)]
pub struct UnidadesApiDoc;

/// Create the unidades router with all HTTP endpoints
pub fn router<U, E>(service: UnidadeService<U, E>) -> Router
where
    U: UnidadeRepository + 'static,
    E: EventoRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_unidades).post(create_unidade))
        .route(
            "/{id}",
            get(get_unidade).put(update_unidade).delete(delete_unidade),
        )
        .route("/nome/{nome}", get(get_unidade_by_nome))
        .route("/search/{term}", get(search_unidades))
        .with_state(shared_service)
}

/// Create a unidade
#[utoipa::path(
    post,
    path = "",
    tag = UNIDADES_TAG,
    request_body = CreateUnidade,
    responses(
        (status = 201, description = "Unidade created", body = ApiResponse<UnidadeData>),
        (status = 400, response = BadRequestResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_unidade<U: UnidadeRepository, E: EventoRepository>(
    State(service): SharedService<U, E>,
    ValidatedJson(input): ValidatedJson<CreateUnidade>,
) -> EventosResult<impl IntoResponse> {
    let unidade = service.create_unidade(input).await?;
    Ok(Created(ApiResponse::ok(
        "Unidade criada com sucesso",
        UnidadeData { unidade },
    )))
}

/// List unidades
#[utoipa::path(
    get,
    path = "",
    tag = UNIDADES_TAG,
    params(UnidadeFilter),
    responses(
        (status = 200, description = "List of unidades", body = Vec<Unidade>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_unidades<U: UnidadeRepository, E: EventoRepository>(
    State(service): SharedService<U, E>,
    ValidatedQuery(filter): ValidatedQuery<UnidadeFilter>,
) -> EventosResult<Json<Vec<Unidade>>> {
    let unidades = service.list_unidades(filter).await?;
    Ok(Json(unidades))
}

/// Get a unidade by ID with its events
#[utoipa::path(
    get,
    path = "/{id}",
    tag = UNIDADES_TAG,
    params(("id" = i32, Path, description = "Unidade ID")),
    responses(
        (status = 200, description = "Unidade found", body = UnidadeComEventos),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_unidade<U: UnidadeRepository, E: EventoRepository>(
    State(service): SharedService<U, E>,
    IdPath(id): IdPath,
) -> EventosResult<Json<UnidadeComEventos>> {
    let unidade = service.get_unidade(id).await?;
    Ok(Json(unidade))
}

/// Rename a unidade
#[utoipa::path(
    put,
    path = "/{id}",
    tag = UNIDADES_TAG,
    params(("id" = i32, Path, description = "Unidade ID")),
    request_body = UpdateUnidade,
    responses(
        (status = 200, description = "Unidade updated", body = ApiResponse<UnidadeData>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_unidade<U: UnidadeRepository, E: EventoRepository>(
    State(service): SharedService<U, E>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateUnidade>,
) -> EventosResult<Json<ApiResponse<UnidadeData>>> {
    let unidade = service.update_unidade(id, input).await?;
    Ok(Json(ApiResponse::ok(
        "Unidade atualizada com sucesso",
        UnidadeData { unidade },
    )))
}

/// Delete a unidade that owns no events
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = UNIDADES_TAG,
    params(("id" = i32, Path, description = "Unidade ID")),
    responses(
        (status = 200, description = "Unidade deleted", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_unidade<U: UnidadeRepository, E: EventoRepository>(
    State(service): SharedService<U, E>,
    IdPath(id): IdPath,
) -> EventosResult<Json<MessageResponse>> {
    service.delete_unidade(id).await?;
    Ok(Json(MessageResponse::ok("Unidade deletada com sucesso")))
}

/// Get a unidade by exact name with its events
#[utoipa::path(
    get,
    path = "/nome/{nome}",
    tag = UNIDADES_TAG,
    params(("nome" = String, Path, description = "Exact unidade name")),
    responses(
        (status = 200, description = "Unidade found", body = UnidadeComEventos),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_unidade_by_nome<U: UnidadeRepository, E: EventoRepository>(
    State(service): SharedService<U, E>,
    Path(nome): Path<String>,
) -> EventosResult<Json<UnidadeComEventos>> {
    let unidade = service.get_unidade_by_nome(&nome).await?;
    Ok(Json(unidade))
}

/// Search unidades whose name contains a term
#[utoipa::path(
    get,
    path = "/search/{term}",
    tag = UNIDADES_TAG,
    params(("term" = String, Path, description = "Case-sensitive substring")),
    responses(
        (status = 200, description = "Matching unidades", body = Vec<Unidade>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_unidades<U: UnidadeRepository, E: EventoRepository>(
    State(service): SharedService<U, E>,
    Path(term): Path<String>,
) -> EventosResult<Json<Vec<Unidade>>> {
    let unidades = service.search_unidades(&term).await?;
    Ok(Json(unidades))
}
