//! Dashboard aggregation over events.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, IntoEnumIterator};
use utoipa::ToSchema;

use crate::models::{Evento, Mes};

/// Catering/ceremonial service an event can request.
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
    EnumIter,
    ToSchema,
)]
pub enum Servico {
    #[serde(rename = "Coffee Break Manhã")]
    #[strum(serialize = "Coffee Break Manhã")]
    CoffeeBreakManha,
    #[serde(rename = "Coffee Break Tarde")]
    #[strum(serialize = "Coffee Break Tarde")]
    CoffeeBreakTarde,
    #[serde(rename = "Almoço")]
    #[strum(serialize = "Almoço")]
    Almoco,
    Jantar,
    Cerimonial,
}

impl Servico {
    pub fn solicitado(self, evento: &Evento) -> bool {
        match self {
            Servico::CoffeeBreakManha => evento.coffee_break_manha,
            Servico::CoffeeBreakTarde => evento.coffee_break_tarde,
            Servico::Almoco => evento.almoco,
            Servico::Jantar => evento.jantar,
            Servico::Cerimonial => evento.cerimonial,
        }
    }
}

/// Summary counts for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventoStats {
    pub total_eventos: u64,
    pub total_unidades: u64,
    pub total_aprovados: u64,
    /// Only months with at least one event
    pub eventos_por_mes: BTreeMap<Mes, u64>,
    /// Summed headcount per month
    pub pessoas_por_mes: BTreeMap<Mes, i64>,
    /// Every service is present, zero when never requested
    pub servicos_mais_solicitados: BTreeMap<Servico, u64>,
}

/// Aggregates `eventos`; the result does not depend on their order.
pub fn compute_stats(eventos: &[Evento], total_unidades: u64) -> EventoStats {
    let mut eventos_por_mes = BTreeMap::new();
    let mut pessoas_por_mes = BTreeMap::new();
    let mut servicos: BTreeMap<Servico, u64> = Servico::iter().map(|s| (s, 0)).collect();

    for evento in eventos {
        *eventos_por_mes.entry(evento.mes_previsto).or_insert(0) += 1;
        *pessoas_por_mes.entry(evento.mes_previsto).or_insert(0) +=
            i64::from(evento.quantidade_pessoas);

        for (servico, count) in servicos.iter_mut() {
            if servico.solicitado(evento) {
                *count += 1;
            }
        }
    }

    EventoStats {
        total_eventos: eventos.len() as u64,
        total_unidades,
        total_aprovados: eventos.iter().filter(|e| e.aprovado).count() as u64,
        eventos_por_mes,
        pessoas_por_mes,
        servicos_mais_solicitados: servicos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn evento(id: i32, mes: Mes, pessoas: i32) -> Evento {
        Evento {
            id,
            nome: format!("Evento {id}"),
            unidade_responsavel: "Setor A".to_string(),
            nome_solicitante: None,
            quantidade_pessoas: pessoas,
            mes_previsto: mes,
            coffee_break_manha: false,
            coffee_break_tarde: false,
            almoco: false,
            jantar: false,
            cerimonial: false,
            aprovado: false,
            unidade_id: 1,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_empty_stats_list_every_service() {
        let stats = compute_stats(&[], 0);

        assert_eq!(stats.total_eventos, 0);
        assert!(stats.eventos_por_mes.is_empty());

        let body = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            body["servicos_mais_solicitados"],
            json!({
                "Coffee Break Manhã": 0,
                "Coffee Break Tarde": 0,
                "Almoço": 0,
                "Jantar": 0,
                "Cerimonial": 0,
            })
        );
    }

    #[test]
    fn test_single_submission_example() {
        let stats = compute_stats(&[evento(1, Mes::Janeiro, 50)], 1);

        let body = serde_json::to_value(&stats).unwrap();
        assert_eq!(body["eventos_por_mes"], json!({"Janeiro": 1}));
        assert_eq!(body["pessoas_por_mes"], json!({"Janeiro": 50}));
        assert_eq!(body["total_unidades"], 1);
    }

    #[test]
    fn test_counts_are_consistent() {
        let mut eventos = vec![
            evento(1, Mes::Janeiro, 10),
            evento(2, Mes::Marco, 20),
            evento(3, Mes::Marco, 5),
            evento(4, Mes::Dezembro, 100),
        ];
        eventos[0].almoco = true;
        eventos[1].almoco = true;
        eventos[1].cerimonial = true;
        eventos[3].aprovado = true;

        let stats = compute_stats(&eventos, 2);

        assert_eq!(stats.eventos_por_mes.values().sum::<u64>(), 4);
        assert_eq!(stats.pessoas_por_mes[&Mes::Marco], 25);
        assert_eq!(stats.servicos_mais_solicitados[&Servico::Almoco], 2);
        assert_eq!(stats.servicos_mais_solicitados[&Servico::Cerimonial], 1);
        assert!(stats.servicos_mais_solicitados.values().all(|&c| c <= 4));
        assert_eq!(stats.total_aprovados, 1);
    }

    #[test]
    fn test_order_independent() {
        let mut eventos = vec![
            evento(1, Mes::Maio, 3),
            evento(2, Mes::Janeiro, 7),
            evento(3, Mes::Maio, 11),
        ];
        eventos[2].jantar = true;

        let forward = compute_stats(&eventos, 1);
        eventos.reverse();
        let backward = compute_stats(&eventos, 1);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_months_serialize_in_calendar_order() {
        let stats = compute_stats(
            &[evento(1, Mes::Dezembro, 1), evento(2, Mes::Fevereiro, 1)],
            1,
        );

        let body = serde_json::to_string(&stats.eventos_por_mes).unwrap();
        assert_eq!(body, r#"{"Fevereiro":1,"Dezembro":1}"#);
    }
}
