//! Tri-state field for partial updates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a partial update body.
///
/// Use with `#[serde(default)]` so an absent key becomes [`Patch::Missing`];
/// an explicit `null` becomes [`Patch::Null`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Writes `Value` into `target`; `Missing` and `Null` leave it untouched.
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Value(value) = self {
            *target = value;
        }
    }

    /// For nullable columns: `Null` clears, `Value` sets.
    pub fn apply_nullable(self, target: &mut Option<T>) {
        match self {
            Patch::Missing => {}
            Patch::Null => *target = None,
            Patch::Value(value) => *target = Some(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        nome: Patch<String>,
    }

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let absent: Body = serde_json::from_value(json!({})).unwrap();
        let null: Body = serde_json::from_value(json!({"nome": null})).unwrap();
        let value: Body = serde_json::from_value(json!({"nome": "Setor B"})).unwrap();

        assert_eq!(absent.nome, Patch::Missing);
        assert_eq!(null.nome, Patch::Null);
        assert_eq!(value.nome, Patch::Value("Setor B".to_string()));
    }

    #[test]
    fn test_apply_nullable_clears_on_null() {
        let mut solicitante = Some("Ana".to_string());
        Patch::<String>::Missing.apply_nullable(&mut solicitante);
        assert_eq!(solicitante.as_deref(), Some("Ana"));

        Patch::<String>::Null.apply_nullable(&mut solicitante);
        assert_eq!(solicitante, None);
    }

    #[test]
    fn test_apply_to_ignores_null() {
        let mut quantidade = 10;
        Patch::Null.apply_to(&mut quantidade);
        assert_eq!(quantidade, 10);

        Patch::Value(30).apply_to(&mut quantidade);
        assert_eq!(quantidade, 30);
    }
}
