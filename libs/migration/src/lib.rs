pub use sea_orm_migration::prelude::*;

mod m20250301_000000_create_unidades;
mod m20250301_000001_create_eventos;
mod m20250301_000002_create_eventos_aprovados;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000000_create_unidades::Migration),
            Box::new(m20250301_000001_create_eventos::Migration),
            Box::new(m20250301_000002_create_eventos_aprovados::Migration),
        ]
    }
}
