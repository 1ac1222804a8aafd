//! Application-specific health handlers with a real database check.

use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use serde::Serialize;

/// Readiness check endpoint that actually pings the database.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}

#[derive(Serialize)]
pub struct RootMessage {
    message: &'static str,
}

pub async fn root_handler() -> Json<RootMessage> {
    Json(RootMessage {
        message: "SEAD Calendario Eventos API is running",
    })
}
