//! Sea-ORM entities for the `unidades`, `eventos` and `eventos_aprovados` tables.

pub mod evento;
pub mod evento_aprovado;
pub mod unidade;
