use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "SEAD Calendário de Eventos API",
        version = "0.1.0",
        description = "Registration of unidades, their planned eventos and dashboard statistics"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/eventos", api = domain_eventos::handlers::EventosApiDoc),
        (path = "/unidades", api = domain_eventos::handlers::UnidadesApiDoc)
    )
)]
pub struct ApiDoc;
