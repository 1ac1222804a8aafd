use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "eventos_aprovados")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub evento_id: i32,
    pub quantidade_pessoas: i32,
    pub coffee_break_manha: bool,
    pub coffee_break_tarde: bool,
    pub almoco: bool,
    pub jantar: bool,
    pub cerimonial: bool,
    pub aprovado_em: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::evento::Entity",
        from = "Column::EventoId",
        to = "super::evento::Column::Id",
        on_delete = "Cascade"
    )]
    Evento,
}

impl Related<super::evento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evento.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::EventoAprovado {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            evento_id: model.evento_id,
            quantidade_pessoas: model.quantidade_pessoas,
            coffee_break_manha: model.coffee_break_manha,
            coffee_break_tarde: model.coffee_break_tarde,
            almoco: model.almoco,
            jantar: model.jantar,
            cerimonial: model.cerimonial,
            aprovado_em: model.aprovado_em.into(),
        }
    }
}

impl From<crate::models::EventoAprovado> for ActiveModel {
    fn from(snapshot: crate::models::EventoAprovado) -> Self {
        ActiveModel {
            evento_id: Set(snapshot.evento_id),
            quantidade_pessoas: Set(snapshot.quantidade_pessoas),
            coffee_break_manha: Set(snapshot.coffee_break_manha),
            coffee_break_tarde: Set(snapshot.coffee_break_tarde),
            almoco: Set(snapshot.almoco),
            jantar: Set(snapshot.jantar),
            cerimonial: Set(snapshot.cerimonial),
            aprovado_em: Set(snapshot.aprovado_em.into()),
            ..Default::default()
        }
    }
}
