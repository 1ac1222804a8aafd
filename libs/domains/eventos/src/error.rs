use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum EventosError {
    #[error("Unidade not found: {0}")]
    UnidadeNotFound(i32),

    #[error("Unidade not found by name: {0}")]
    UnidadeNomeNotFound(String),

    #[error("Evento not found: {0}")]
    EventoNotFound(i32),

    #[error("Unidade with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Unidade name '{0}' is taken by another unidade")]
    NameTaken(String),

    #[error("Unidade {unidade_id} still owns {count} evento(s)")]
    HasEventos { unidade_id: i32, count: u64 },

    #[error("Invalid month '{value}' in {field}")]
    InvalidMes { field: String, value: String },

    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationErrors),

    #[error("Form submission failed: {0}")]
    SubmitFailed(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EventosResult<T> = Result<T, EventosError>;

impl EventosError {
    pub fn invalid_mes(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidMes {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Convert EventosError to AppError for standardized error responses
impl From<EventosError> for AppError {
    fn from(err: EventosError) -> Self {
        match err {
            EventosError::UnidadeNotFound(_) | EventosError::UnidadeNomeNotFound(_) => {
                AppError::NotFound("Unidade não encontrada".to_string())
            }
            EventosError::EventoNotFound(_) => {
                AppError::NotFound("Evento não encontrado".to_string())
            }
            EventosError::DuplicateName(_) => AppError::conflict(
                "Unidade já existe",
                "nome_unidade",
                "Esta unidade já foi cadastrada",
            ),
            EventosError::NameTaken(_) => AppError::conflict(
                "Nome de unidade já existe",
                "nome_unidade",
                "Este nome já pertence a outra unidade",
            ),
            EventosError::HasEventos { count, .. } => AppError::conflict(
                "Não é possível deletar unidade com eventos associados",
                "eventos",
                format!("Esta unidade possui {count} evento(s) associado(s)"),
            ),
            EventosError::InvalidMes { field, value } => {
                AppError::invalid_field(field, format!("Mês inválido: {value}"))
            }
            EventosError::Validation { field, message } => AppError::invalid_field(field, message),
            EventosError::InvalidInput(errors) => AppError::ValidationError(errors),
            EventosError::SubmitFailed(detail) => AppError::InternalServerError {
                message: "Erro ao processar formulário".to_string(),
                detail,
            },
            EventosError::Database(e) => AppError::Database(e),
            EventosError::Internal(detail) => AppError::internal(detail),
        }
    }
}

impl IntoResponse for EventosError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_has_eventos_reports_count() {
        let (status, body) = AppError::from(EventosError::HasEventos {
            unidade_id: 1,
            count: 3,
        })
        .into_parts(false);

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body.errors.unwrap()["eventos"],
            vec!["Esta unidade possui 3 evento(s) associado(s)".to_string()]
        );
    }

    #[test]
    fn test_invalid_mes_names_field_and_value() {
        let (status, body) =
            AppError::from(EventosError::invalid_mes("eventos[2].mes_previsto", "Marco"))
                .into_parts(false);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Mês inválido: Marco");
        assert!(body.errors.unwrap().contains_key("eventos[2].mes_previsto"));
    }

    #[test]
    fn test_not_found_messages() {
        let (status, body) = AppError::from(EventosError::EventoNotFound(9)).into_parts(false);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Evento não encontrado");

        let (_, body) =
            AppError::from(EventosError::UnidadeNomeNotFound("X".into())).into_parts(false);
        assert_eq!(body.message, "Unidade não encontrada");
    }

    #[test]
    fn test_submit_failure_hides_detail_by_default() {
        let (status, body) =
            AppError::from(EventosError::SubmitFailed("deadlock".into())).into_parts(false);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Erro ao processar formulário");
        assert!(body.errors.is_none());
    }
}
