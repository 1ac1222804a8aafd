use axum::Router;
use axum::routing::get;
use domain_eventos::{
    EventoService, PgEventoRepository, PgUnidadeRepository, UnidadeService, handlers,
};

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &crate::state::AppState) -> Router {
    let eventos = EventoService::new(
        PgEventoRepository::new(state.db.clone()),
        PgUnidadeRepository::new(state.db.clone()),
    );
    let unidades = UnidadeService::new(
        PgUnidadeRepository::new(state.db.clone()),
        PgEventoRepository::new(state.db.clone()),
    );

    Router::new()
        .nest("/eventos", handlers::eventos_router(eventos))
        .nest("/unidades", handlers::unidades_router(unidades))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Root banner, kept for clients that probe `/`.
pub fn root_router() -> Router {
    Router::new().route("/", get(health::root_handler))
}
