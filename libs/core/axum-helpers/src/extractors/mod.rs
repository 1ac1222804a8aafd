//! Custom extractors for Axum handlers.
//!
//! Rejections render the shared error envelope instead of axum's plain-text bodies.

pub mod id_path;
pub mod validated_json;
pub mod validated_query;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
