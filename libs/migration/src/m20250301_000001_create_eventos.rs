use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Mes::Enum)
                    .values(Mes::values())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Eventos::Table)
                    .if_not_exists()
                    .col(pk_auto(Eventos::Id))
                    .col(string_len(Eventos::Nome, 255))
                    .col(string_len(Eventos::UnidadeResponsavel, 255))
                    .col(string_len_null(Eventos::NomeSolicitante, 255))
                    .col(integer(Eventos::QuantidadePessoas))
                    .col(
                        ColumnDef::new(Eventos::MesPrevisto)
                            .enumeration(Mes::Enum, Mes::values())
                            .not_null(),
                    )
                    .col(boolean(Eventos::CoffeeBreakManha).default(false))
                    .col(boolean(Eventos::CoffeeBreakTarde).default(false))
                    .col(boolean(Eventos::Almoco).default(false))
                    .col(boolean(Eventos::Jantar).default(false))
                    .col(boolean(Eventos::Cerimonial).default(false))
                    .col(boolean(Eventos::Aprovado).default(false))
                    .col(integer(Eventos::UnidadeId))
                    .col(
                        timestamp_with_time_zone(Eventos::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Eventos::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_eventos_unidade_id")
                            .from(Eventos::Table, Eventos::UnidadeId)
                            .to(Unidades::Table, Unidades::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE eventos
                    ADD CONSTRAINT ck_eventos_quantidade_pessoas_positive
                    CHECK (quantidade_pessoas > 0)
                "#,
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_eventos_unidade_id")
                    .table(Eventos::Table)
                    .col(Eventos::UnidadeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_eventos_mes_previsto")
                    .table(Eventos::Table)
                    .col(Eventos::MesPrevisto)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Eventos::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(Mes::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Eventos {
    Table,
    Id,
    Nome,
    UnidadeResponsavel,
    NomeSolicitante,
    QuantidadePessoas,
    MesPrevisto,
    CoffeeBreakManha,
    CoffeeBreakTarde,
    Almoco,
    Jantar,
    Cerimonial,
    Aprovado,
    UnidadeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Unidades {
    Table,
    Id,
}

#[derive(DeriveIden, Clone, Copy)]
enum Mes {
    #[sea_orm(iden = "mes")]
    Enum,
    #[sea_orm(iden = "Janeiro")]
    Janeiro,
    #[sea_orm(iden = "Fevereiro")]
    Fevereiro,
    #[sea_orm(iden = "Março")]
    Marco,
    #[sea_orm(iden = "Abril")]
    Abril,
    #[sea_orm(iden = "Maio")]
    Maio,
    #[sea_orm(iden = "Junho")]
    Junho,
    #[sea_orm(iden = "Julho")]
    Julho,
    #[sea_orm(iden = "Agosto")]
    Agosto,
    #[sea_orm(iden = "Setembro")]
    Setembro,
    #[sea_orm(iden = "Outubro")]
    Outubro,
    #[sea_orm(iden = "Novembro")]
    Novembro,
    #[sea_orm(iden = "Dezembro")]
    Dezembro,
}

impl Mes {
    /// Calendar order; the pg enum sorts by declaration.
    fn values() -> [Mes; 12] {
        [
            Mes::Janeiro,
            Mes::Fevereiro,
            Mes::Marco,
            Mes::Abril,
            Mes::Maio,
            Mes::Junho,
            Mes::Julho,
            Mes::Agosto,
            Mes::Setembro,
            Mes::Outubro,
            Mes::Novembro,
            Mes::Dezembro,
        ]
    }
}
