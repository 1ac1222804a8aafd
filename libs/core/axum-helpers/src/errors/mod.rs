pub mod codes;
pub mod details;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;
pub use details::{ErrorDetails, attach_error_details};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Field name to the messages reported against it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Key under which internal error detail is reported when exposed.
pub const DETAIL_FIELD: &str = "detail";

/// Envelope returned for every failed request.
///
/// # JSON Example
///
/// ```json
/// {
///   "success": false,
///   "message": "Unidade já existe",
///   "errors": { "nome_unidade": ["Esta unidade já foi cadastrada"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub message: String,
    /// Per-field messages, omitted when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: (!errors.is_empty()).then_some(errors),
        }
    }

    /// Adds `detail` under [`DETAIL_FIELD`].
    pub fn with_detail(mut self, detail: String) -> Self {
        self.errors
            .get_or_insert_with(FieldErrors::new)
            .insert(DETAIL_FIELD.to_string(), vec![detail]);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Path extraction error: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Query extraction error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {message}")]
    BadRequest { message: String, errors: FieldErrors },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict { message: String, errors: FieldErrors },

    #[error("Internal Server Error: {message}: {detail}")]
    InternalServerError { message: String, detail: String },
}

impl AppError {
    /// 400 naming a single offending field; the message doubles as envelope message.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::BadRequest {
            errors: single_field(field, message.clone()),
            message,
        }
    }

    /// 409 with one field explaining the conflict.
    pub fn conflict(
        message: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            message: message.into(),
            errors: single_field(field, reason),
        }
    }

    /// 500 with the default message.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::InternalServerError {
            message: ErrorCode::InternalError.default_message().to_string(),
            detail: detail.into(),
        }
    }

    /// Status and envelope for this error.
    ///
    /// Internal detail is added under `errors.detail` only when `expose_details` is set.
    pub fn into_parts(self, expose_details: bool) -> (StatusCode, ErrorResponse) {
        match self.render() {
            (status, body, Some(detail)) if expose_details => (status, body.with_detail(detail)),
            (status, body, _) => (status, body),
        }
    }

    /// Logs the error; returns the envelope and, for 5xx, the hidden detail.
    fn render(self) -> (StatusCode, ErrorResponse, Option<String>) {
        let (status, code, message, errors, detail) = match self {
            AppError::Database(e) => map_db_error(e),
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::JsonExtraction,
                    ErrorCode::JsonExtraction.default_message().to_string(),
                    single_field("body", e.body_text()),
                    None,
                )
            }
            AppError::PathRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidId.code(),
                    "Path extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidId,
                    ErrorCode::InvalidId.default_message().to_string(),
                    single_field("path", e.body_text()),
                    None,
                )
            }
            AppError::QueryRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Query extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    single_field("query", e.body_text()),
                    None,
                )
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    flatten_validation_errors(&e),
                    None,
                )
            }
            AppError::BadRequest { message, errors } => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Bad request: {}",
                    message
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    message,
                    errors,
                    None,
                )
            }
            AppError::NotFound(msg) => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    msg
                );
                (
                    StatusCode::NOT_FOUND,
                    ErrorCode::NotFound,
                    msg,
                    FieldErrors::new(),
                    None,
                )
            }
            AppError::Conflict { message, errors } => {
                tracing::info!(
                    error_code = ErrorCode::Conflict.code(),
                    "Conflict: {}",
                    message
                );
                (
                    StatusCode::CONFLICT,
                    ErrorCode::Conflict,
                    message,
                    errors,
                    None,
                )
            }
            AppError::InternalServerError { message, detail } => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}: {}",
                    message,
                    detail
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    message,
                    FieldErrors::new(),
                    Some(detail),
                )
            }
        };

        tracing::debug!(error = %code, %status, "Rendering error envelope");
        (status, ErrorResponse::new(message, errors), detail)
    }
}

/// Renders the envelope without internal detail. The detail travels in the
/// response extensions for [`attach_error_details`] to reveal.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body, detail) = self.render();
        let mut response = (status, Json(&body)).into_response();
        if let Some(detail) = detail {
            response
                .extensions_mut()
                .insert(details::InternalDetail { envelope: body, detail });
        }
        response
    }
}

type ErrorParts = (
    StatusCode,
    ErrorCode,
    String,
    FieldErrors,
    Option<String>,
);

/// Maps DbErr to response components.
///
/// Pool exhaustion is reported as 503; everything else is a 500.
fn map_db_error(error: DbErr) -> ErrorParts {
    match error {
        DbErr::ConnectionAcquire(e) => {
            tracing::warn!(
                error_code = ErrorCode::DatabasePoolTimeout.code(),
                "Database connection acquire failed: {:?}",
                e
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DatabasePoolTimeout,
                ErrorCode::DatabasePoolTimeout.default_message().to_string(),
                FieldErrors::new(),
                Some(e.to_string()),
            )
        }
        other => {
            tracing::error!(
                error_code = ErrorCode::DatabaseError.code(),
                "Database error: {:?}",
                other
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                ErrorCode::DatabaseError.default_message().to_string(),
                FieldErrors::new(),
                Some(other.to_string()),
            )
        }
    }
}

fn single_field(field: impl Into<String>, message: impl Into<String>) -> FieldErrors {
    FieldErrors::from([(field.into(), vec![message.into()])])
}

/// Flattens nested validator output into dotted/indexed field paths,
/// e.g. `eventos[0].quantidade_pessoas`.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect_validation_errors(errors, None, &mut out);
    out
}

fn collect_validation_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors.iter().map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => default_validation_message(&err.code),
                });
                out.entry(path).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_validation_errors(nested, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_errors(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

fn default_validation_message(code: &str) -> String {
    match code {
        "length" => "Tamanho inválido".to_string(),
        "range" => "Valor fora do intervalo permitido".to_string(),
        "required" => "Campo obrigatório".to_string(),
        other => format!("Valor inválido ({other})"),
    }
}
