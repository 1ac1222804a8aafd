use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Unidades::Table)
                    .if_not_exists()
                    .col(pk_auto(Unidades::Id))
                    .col(string_len(Unidades::NomeUnidade, 255))
                    .col(
                        timestamp_with_time_zone(Unidades::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Unidades::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Backstop for concurrent get-or-create on the same name
        manager
            .create_index(
                Index::create()
                    .name("uq_unidades_nome_unidade")
                    .table(Unidades::Table)
                    .col(Unidades::NomeUnidade)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Unidades::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Unidades {
    Table,
    Id,
    NomeUnidade,
    CreatedAt,
    UpdatedAt,
}
