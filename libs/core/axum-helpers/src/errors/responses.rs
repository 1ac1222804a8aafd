//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Erro interno do servidor"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Mês inválido: Foo",
        "errors": {
            "eventos[0].mes_previsto": ["Mês inválido: Foo"]
        }
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Unidade não encontrada"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Duplicate name or dependent records",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Unidade já existe",
        "errors": {
            "nome_unidade": ["Esta unidade já foi cadastrada"]
        }
    })
)]
pub struct ConflictResponse(pub ErrorResponse);
