use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Approval snapshots; rows are never updated
        manager
            .create_table(
                Table::create()
                    .table(EventosAprovados::Table)
                    .if_not_exists()
                    .col(pk_auto(EventosAprovados::Id))
                    .col(integer(EventosAprovados::EventoId))
                    .col(integer(EventosAprovados::QuantidadePessoas))
                    .col(boolean(EventosAprovados::CoffeeBreakManha))
                    .col(boolean(EventosAprovados::CoffeeBreakTarde))
                    .col(boolean(EventosAprovados::Almoco))
                    .col(boolean(EventosAprovados::Jantar))
                    .col(boolean(EventosAprovados::Cerimonial))
                    .col(
                        timestamp_with_time_zone(EventosAprovados::AprovadoEm)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_eventos_aprovados_evento_id")
                            .from(EventosAprovados::Table, EventosAprovados::EventoId)
                            .to(Eventos::Table, Eventos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_eventos_aprovados_evento_id")
                    .table(EventosAprovados::Table)
                    .col(EventosAprovados::EventoId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventosAprovados::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EventosAprovados {
    Table,
    Id,
    EventoId,
    QuantidadePessoas,
    CoffeeBreakManha,
    CoffeeBreakTarde,
    Almoco,
    Jantar,
    Cerimonial,
    AprovadoEm,
}

#[derive(DeriveIden)]
enum Eventos {
    Table,
    Id,
}
