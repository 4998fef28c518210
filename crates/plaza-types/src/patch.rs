use serde::{Deserialize, Deserializer};

/// A field in a partial update body.
///
/// Pair with `#[serde(default)]`: a missing key stays `Absent`, an explicit
/// JSON `null` becomes `Null`, anything else is `Value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    /// The sent value. `Absent` and `Null` both yield `None`.
    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Absent | Patch::Null => None,
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
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        name: Patch<String>,
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.name, Patch::Absent);

        let null: Body = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(null.name, Patch::Null);

        let value: Body = serde_json::from_str(r#"{"name": "ana"}"#).unwrap();
        assert_eq!(value.name, Patch::Value("ana".to_string()));
    }

    #[test]
    fn only_values_survive_into_value() {
        assert!(Patch::<String>::Null.is_null());
        assert!(!Patch::<String>::Absent.is_null());
        assert_eq!(Patch::<String>::Absent.into_value(), None);
        assert_eq!(Patch::<String>::Null.into_value(), None);
        assert_eq!(Patch::Value("ana".to_string()).into_value().as_deref(), Some("ana"));
    }
}
