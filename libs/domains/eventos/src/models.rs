use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{EventosError, EventosResult};
use crate::patch::Patch;

/// Maximum length of every free-text column.
pub const MAX_TEXT_LEN: usize = 255;

/// Planned month of an event, in calendar order.
///
/// Labels are matched exactly: `"Março"` parses, `"março"` and `"Marco"` do not.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "mes")]
pub enum Mes {
    #[sea_orm(string_value = "Janeiro")]
    Janeiro,
    #[sea_orm(string_value = "Fevereiro")]
    Fevereiro,
    #[sea_orm(string_value = "Março")]
    #[serde(rename = "Março")]
    #[strum(serialize = "Março")]
    Marco,
    #[sea_orm(string_value = "Abril")]
    Abril,
    #[sea_orm(string_value = "Maio")]
    Maio,
    #[sea_orm(string_value = "Junho")]
    Junho,
    #[sea_orm(string_value = "Julho")]
    Julho,
    #[sea_orm(string_value = "Agosto")]
    Agosto,
    #[sea_orm(string_value = "Setembro")]
    Setembro,
    #[sea_orm(string_value = "Outubro")]
    Outubro,
    #[sea_orm(string_value = "Novembro")]
    Novembro,
    #[sea_orm(string_value = "Dezembro")]
    Dezembro,
}

impl Mes {
    /// Parses a month label, reporting `field` on failure.
    pub fn parse_field(field: impl Into<String>, value: &str) -> EventosResult<Self> {
        value
            .parse()
            .map_err(|_| EventosError::invalid_mes(field, value))
    }
}

/// Organizational unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Unidade {
    pub id: i32,
    pub nome_unidade: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Planned event owned by a unidade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Evento {
    pub id: i32,
    pub nome: String,
    /// Free-text label, independent of the owning unidade
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
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Evento {
    /// Applies the present fields of `input`.
    ///
    /// Fails without touching `self` when the month label is unknown.
    pub fn apply_update(&mut self, input: UpdateEvento) -> EventosResult<()> {
        let mes = input.mes()?;

        input.nome.apply_to(&mut self.nome);
        input
            .unidade_responsavel
            .apply_to(&mut self.unidade_responsavel);
        input
            .nome_solicitante
            .apply_nullable(&mut self.nome_solicitante);
        input
            .quantidade_pessoas
            .apply_to(&mut self.quantidade_pessoas);
        if let Some(mes) = mes {
            self.mes_previsto = mes;
        }
        input
            .coffee_break_manha
            .apply_to(&mut self.coffee_break_manha);
        input
            .coffee_break_tarde
            .apply_to(&mut self.coffee_break_tarde);
        input.almoco.apply_to(&mut self.almoco);
        input.jantar.apply_to(&mut self.jantar);
        input.cerimonial.apply_to(&mut self.cerimonial);
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}

/// Immutable snapshot of an event's services at approval time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventoAprovado {
    pub id: i32,
    pub evento_id: i32,
    pub quantidade_pessoas: i32,
    pub coffee_break_manha: bool,
    pub coffee_break_tarde: bool,
    pub almoco: bool,
    pub jantar: bool,
    pub cerimonial: bool,
    pub aprovado_em: DateTime<Utc>,
}

impl EventoAprovado {
    /// Snapshot of `evento` with `id` left for the store to assign.
    pub fn snapshot(evento: &Evento) -> Self {
        Self {
            id: 0,
            evento_id: evento.id,
            quantidade_pessoas: evento.quantidade_pessoas,
            coffee_break_manha: evento.coffee_break_manha,
            coffee_break_tarde: evento.coffee_break_tarde,
            almoco: evento.almoco,
            jantar: evento.jantar,
            cerimonial: evento.cerimonial,
            aprovado_em: Utc::now(),
        }
    }
}

/// Event read together with its owning unidade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventoComUnidade {
    #[serde(flatten)]
    pub evento: Evento,
    pub unidade: Unidade,
}

/// Unidade read together with all of its events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UnidadeComEventos {
    #[serde(flatten)]
    pub unidade: Unidade,
    pub eventos: Vec<Evento>,
}

/// One event line of the submission form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EventoForm {
    #[validate(length(min = 1, max = 255, message = "Informe o nome do evento"))]
    pub nome: String,

    #[validate(length(min = 1, max = 255, message = "Informe a unidade responsável"))]
    pub unidade_responsavel: String,

    /// Falls back to the form-level `nome_solicitante` when omitted
    #[validate(length(max = 255))]
    #[serde(default)]
    pub nome_solicitante: Option<String>,

    #[validate(range(min = 1, message = "A quantidade de pessoas deve ser maior que zero"))]
    pub quantidade_pessoas: i32,

    /// Month label, e.g. `"Março"`
    #[schema(example = "Janeiro")]
    pub mes_previsto: String,

    #[serde(default)]
    pub coffee_break_manha: bool,
    #[serde(default)]
    pub coffee_break_tarde: bool,
    #[serde(default)]
    pub almoco: bool,
    #[serde(default)]
    pub jantar: bool,
    #[serde(default)]
    pub cerimonial: bool,
}

/// Form payload: a unidade name plus the events it plans
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitForm {
    #[validate(length(min = 1, max = 255, message = "Informe o nome da unidade"))]
    pub nome_unidade: String,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub nome_solicitante: Option<String>,

    #[validate(nested)]
    pub eventos: Vec<EventoForm>,
}

/// Event ready to be stored: month resolved, requester defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvento {
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
}

/// Validated form submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub nome_unidade: String,
    pub eventos: Vec<NewEvento>,
}

impl SubmitForm {
    /// Resolves every month label before anything is written.
    ///
    /// The first unknown label fails the whole form.
    pub fn into_submission(self) -> EventosResult<Submission> {
        if self.eventos.is_empty() {
            return Err(EventosError::validation(
                "eventos",
                "Informe ao menos um evento",
            ));
        }

        let solicitante = self.nome_solicitante;
        let eventos = self
            .eventos
            .into_iter()
            .enumerate()
            .map(|(index, form)| {
                let mes_previsto = Mes::parse_field(
                    format!("eventos[{index}].mes_previsto"),
                    &form.mes_previsto,
                )?;

                Ok(NewEvento {
                    nome: form.nome,
                    unidade_responsavel: form.unidade_responsavel,
                    nome_solicitante: form.nome_solicitante.or_else(|| solicitante.clone()),
                    quantidade_pessoas: form.quantidade_pessoas,
                    mes_previsto,
                    coffee_break_manha: form.coffee_break_manha,
                    coffee_break_tarde: form.coffee_break_tarde,
                    almoco: form.almoco,
                    jantar: form.jantar,
                    cerimonial: form.cerimonial,
                })
            })
            .collect::<EventosResult<Vec<_>>>()?;

        Ok(Submission {
            nome_unidade: self.nome_unidade,
            eventos,
        })
    }
}

/// Outcome of a form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmitResult {
    pub unidade_id: i32,
    pub eventos_count: u64,
}

/// DTO for creating a unidade directly
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUnidade {
    #[validate(length(min = 1, max = 255, message = "Informe o nome da unidade"))]
    pub nome_unidade: String,
}

/// Partial update of a unidade; `null` is not accepted
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUnidade {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub nome_unidade: Patch<String>,
}

impl Validate for UpdateUnidade {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match &self.nome_unidade {
            Patch::Null => errors.add("nome_unidade", null_not_allowed()),
            Patch::Value(nome) if !text_len_ok(nome, 1) => {
                errors.add("nome_unidade", length_error())
            }
            _ => {}
        }
        into_result(errors)
    }
}

/// Partial update of an event; only `nome_solicitante` may be cleared with `null`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEvento {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub nome: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub unidade_responsavel: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub nome_solicitante: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub quantidade_pessoas: Patch<i32>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Março")]
    pub mes_previsto: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub coffee_break_manha: Patch<bool>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub coffee_break_tarde: Patch<bool>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub almoco: Patch<bool>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub jantar: Patch<bool>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub cerimonial: Patch<bool>,
}

impl UpdateEvento {
    /// Resolved month when one was sent.
    pub fn mes(&self) -> EventosResult<Option<Mes>> {
        self.mes_previsto
            .as_value()
            .map(|label| Mes::parse_field("mes_previsto", label))
            .transpose()
    }
}

impl Validate for UpdateEvento {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, patch) in [
            ("nome", &self.nome),
            ("unidade_responsavel", &self.unidade_responsavel),
            ("mes_previsto", &self.mes_previsto),
        ] {
            match patch {
                Patch::Null => errors.add(field, null_not_allowed()),
                Patch::Value(text) if !text_len_ok(text, 1) => errors.add(field, length_error()),
                _ => {}
            }
        }

        if let Patch::Value(nome) = &self.nome_solicitante {
            if !text_len_ok(nome, 0) {
                errors.add("nome_solicitante", length_error());
            }
        }

        match self.quantidade_pessoas {
            Patch::Null => errors.add("quantidade_pessoas", null_not_allowed()),
            Patch::Value(quantidade) if quantidade <= 0 => errors.add(
                "quantidade_pessoas",
                ValidationError::new("range")
                    .with_message("A quantidade de pessoas deve ser maior que zero".into()),
            ),
            _ => {}
        }

        for (field, patch) in [
            ("coffee_break_manha", &self.coffee_break_manha),
            ("coffee_break_tarde", &self.coffee_break_tarde),
            ("almoco", &self.almoco),
            ("jantar", &self.jantar),
            ("cerimonial", &self.cerimonial),
        ] {
            if matches!(patch, Patch::Null) {
                errors.add(field, null_not_allowed());
            }
        }

        into_result(errors)
    }
}

fn text_len_ok(text: &str, min: usize) -> bool {
    let len = text.chars().count();
    len >= min && len <= MAX_TEXT_LEN
}

fn null_not_allowed() -> ValidationError {
    ValidationError::new("required").with_message("Campo não pode ser nulo".into())
}

fn length_error() -> ValidationError {
    ValidationError::new("length")
        .with_message(format!("Deve ter entre 1 e {MAX_TEXT_LEN} caracteres").into())
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Query parameters for listing events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, IntoParams)]
pub struct EventoFilter {
    /// Only events owned by this unidade
    pub unidade_id: Option<i32>,
    /// Only events planned for this month
    pub mes: Option<Mes>,
    /// Only approved (or not yet approved) events
    pub aprovado: Option<bool>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    #[serde(default)]
    #[validate(range(max = MAX_OFFSET))]
    pub offset: u64,
}

impl Default for EventoFilter {
    fn default() -> Self {
        Self {
            unidade_id: None,
            mes: None,
            aprovado: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl EventoFilter {
    /// Every event planned for `mes`, unpaginated.
    pub fn por_mes(mes: Mes) -> Self {
        Self {
            mes: Some(mes),
            limit: None,
            ..Self::default()
        }
    }

    pub fn matches(&self, evento: &Evento) -> bool {
        self.unidade_id.is_none_or(|id| evento.unidade_id == id)
            && self.mes.is_none_or(|mes| evento.mes_previsto == mes)
            && self.aprovado.is_none_or(|aprovado| evento.aprovado == aprovado)
    }
}

/// Query parameters for listing unidades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, IntoParams)]
pub struct UnidadeFilter {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    #[serde(default)]
    #[validate(range(max = MAX_OFFSET))]
    pub offset: u64,
}

impl Default for UnidadeFilter {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// Deepest page a listing may start at; keeps `OFFSET` inside Postgres' `bigint`.
pub const MAX_OFFSET: u64 = 1_000_000;

fn default_limit() -> Option<u64> {
    Some(100)
}

/// `data` of the event update envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventoData {
    pub evento: Evento,
}

/// `data` of the unidade create/update envelopes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnidadeData {
    pub unidade: Unidade,
}

/// `data` of the approval envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AprovacaoData {
    pub aprovacao: EventoAprovado,
}
