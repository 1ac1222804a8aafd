use crate::models::{Mes, NewEvento};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "eventos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome: String,
    pub unidade_responsavel: String,
    pub nome_solicitante: Option<String>,
    pub quantidade_pessoas: i32,
    pub mes_previsto: Mes,
    pub coffee_break_manha: bool,
    pub coffee_break_tarde: bool,
    pub almoco: bool,
    pub jantar: bool,
    pub cerimonial: bool,
    pub aprovado: bool,
    pub unidade_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unidade::Entity",
        from = "Column::UnidadeId",
        to = "super::unidade::Column::Id",
        on_delete = "Restrict"
    )]
    Unidade,
    #[sea_orm(has_many = "super::evento_aprovado::Entity")]
    EventoAprovado,
}

impl Related<super::unidade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unidade.def()
    }
}

impl Related<super::evento_aprovado::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventoAprovado.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Evento {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            nome: model.nome,
            unidade_responsavel: model.unidade_responsavel,
            nome_solicitante: model.nome_solicitante,
            quantidade_pessoas: model.quantidade_pessoas,
            mes_previsto: model.mes_previsto,
            coffee_break_manha: model.coffee_break_manha,
            coffee_break_tarde: model.coffee_break_tarde,
            almoco: model.almoco,
            jantar: model.jantar,
            cerimonial: model.cerimonial,
            aprovado: model.aprovado,
            unidade_id: model.unidade_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.map(Into::into),
        }
    }
}

/// Full-row update model for an already persisted event.
impl From<crate::models::Evento> for ActiveModel {
    fn from(evento: crate::models::Evento) -> Self {
        ActiveModel {
            id: Set(evento.id),
            nome: Set(evento.nome),
            unidade_responsavel: Set(evento.unidade_responsavel),
            nome_solicitante: Set(evento.nome_solicitante),
            quantidade_pessoas: Set(evento.quantidade_pessoas),
            mes_previsto: Set(evento.mes_previsto),
            coffee_break_manha: Set(evento.coffee_break_manha),
            coffee_break_tarde: Set(evento.coffee_break_tarde),
            almoco: Set(evento.almoco),
            jantar: Set(evento.jantar),
            cerimonial: Set(evento.cerimonial),
            aprovado: Set(evento.aprovado),
            unidade_id: Set(evento.unidade_id),
            created_at: Set(evento.created_at.into()),
            updated_at: Set(evento.updated_at.map(Into::into)),
        }
    }
}

/// Insert model for a submitted event owned by `unidade_id`.
pub fn new_active_model(input: NewEvento, unidade_id: i32) -> ActiveModel {
    ActiveModel {
        nome: Set(input.nome),
        unidade_responsavel: Set(input.unidade_responsavel),
        nome_solicitante: Set(input.nome_solicitante),
        quantidade_pessoas: Set(input.quantidade_pessoas),
        mes_previsto: Set(input.mes_previsto),
        coffee_break_manha: Set(input.coffee_break_manha),
        coffee_break_tarde: Set(input.coffee_break_tarde),
        almoco: Set(input.almoco),
        jantar: Set(input.jantar),
        cerimonial: Set(input.cerimonial),
        aprovado: Set(false),
        unidade_id: Set(unidade_id),
        created_at: Set(chrono::Utc::now().into()),
        updated_at: Set(None),
        ..Default::default()
    }
}
