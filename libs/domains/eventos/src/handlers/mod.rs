//! HTTP endpoints, one router and OpenAPI document per resource.

pub mod eventos;
pub mod unidades;

pub const EVENTOS_TAG: &str = "eventos";
pub const UNIDADES_TAG: &str = "unidades";

pub use eventos::{EventosApiDoc, router as eventos_router};
pub use unidades::{UnidadesApiDoc, router as unidades_router};
