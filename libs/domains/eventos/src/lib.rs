//! Eventos Domain
//!
//! Unidades (organizational units), the events they plan and the approval
//! history of those events, plus the dashboard statistics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /eventos and /unidades routers
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Validation, uniqueness, guarded delete, stats
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Traits + in-memory store + Postgres
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, Mes
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_eventos::{EventoService, InMemoryStore, UnidadeService, handlers};
//!
//! // One store backs both repositories
//! let store = InMemoryStore::new();
//! let eventos = EventoService::new(store.clone(), store.clone());
//! let unidades = UnidadeService::new(store.clone(), store);
//!
//! let router = axum::Router::<()>::new()
//!     .nest("/eventos", handlers::eventos_router(eventos))
//!     .nest("/unidades", handlers::unidades_router(unidades));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod patch;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod stats;

// Re-export commonly used types
pub use error::{EventosError, EventosResult};
pub use models::{
    CreateUnidade, Evento, EventoAprovado, EventoComUnidade, EventoFilter, EventoForm, Mes,
    SubmitForm, SubmitResult, Unidade, UnidadeComEventos, UnidadeFilter, UpdateEvento,
    UpdateUnidade,
};
pub use patch::Patch;
pub use postgres::{PgEventoRepository, PgUnidadeRepository};
pub use repository::{EventoRepository, InMemoryStore, UnidadeRepository};
pub use service::{EventoService, UnidadeService};
pub use stats::{EventoStats, Servico, compute_stats};
