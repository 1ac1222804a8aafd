use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "unidades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub nome_unidade: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::evento::Entity")]
    Evento,
}

impl Related<super::evento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evento.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Unidade {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            nome_unidade: model.nome_unidade,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.map(Into::into),
        }
    }
}

/// Insert model for a new unidade; the id comes from the sequence.
pub fn new_active_model(nome_unidade: String) -> ActiveModel {
    ActiveModel {
        nome_unidade: Set(nome_unidade),
        created_at: Set(chrono::Utc::now().into()),
        updated_at: Set(None),
        ..Default::default()
    }
}
