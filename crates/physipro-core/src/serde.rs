//! Custom deserializers for optional identifiers.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Treats an empty string as absent. Useful for query strings such as
/// `?trainerId=`.
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Distinguishes an explicit `null` from an absent field.
///
/// Pair with `#[serde(default)]`: absent gives `None`, `null` gives
/// `Some(None)`, a UUID gives `Some(Some(id))`.
pub fn deserialize_nullable_uuid<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        trainer_id: Option<Uuid>,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_nullable_uuid")]
        trainer_id: Option<Option<Uuid>>,
    }

    #[test]
    fn empty_string_is_none() {
        let q: Query = serde_json::from_str(r#"{"trainer_id": ""}"#).unwrap();
        assert!(q.trainer_id.is_none());
        let q: Query = serde_json::from_str("{}").unwrap();
        assert!(q.trainer_id.is_none());
    }

    #[test]
    fn invalid_uuid_is_rejected() {
        assert!(serde_json::from_str::<Query>(r#"{"trainer_id": "nope"}"#).is_err());
    }

    #[test]
    fn null_differs_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.trainer_id, None);

        let null: Patch = serde_json::from_str(r#"{"trainer_id": null}"#).unwrap();
        assert_eq!(null.trainer_id, Some(None));

        let id = Uuid::new_v4();
        let set: Patch = serde_json::from_str(&format!(r#"{{"trainer_id": "{}"}}"#, id)).unwrap();
        assert_eq!(set.trainer_id, Some(Some(id)));
    }
}
