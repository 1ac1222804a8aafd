//! Business rules on top of the repositories.

mod eventos;
mod unidades;

pub use eventos::EventoService;
pub use unidades::UnidadeService;
