use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Attributes every persisted entity carries.
///
/// Timestamps are optional: records written without them are stored back
/// without them, and `null` reads as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseFields {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl BaseFields {
    /// Fresh identity with both timestamps set to now
    pub fn new() -> Self {
        let ts = now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Some(ts),
            updated_at: Some(ts),
        }
    }

    /// Mark the entity as modified
    pub fn touch(&mut self) {
        self.updated_at = Some(now());
    }
}

impl Default for BaseFields {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = BaseFields::new();
        let b = BaseFields::new();
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_touch_only_moves_updated_at() {
        let mut base = BaseFields::new();
        let before = base.clone();
        base.touch();
        assert_eq!(base.id, before.id);
        assert_eq!(base.created_at, before.created_at);
        assert!(base.updated_at >= before.updated_at);
    }

    #[test]
    fn test_missing_timestamps_stay_missing() {
        let base: BaseFields = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(base.id, "abc");
        assert!(base.created_at.is_none());

        let value = serde_json::to_value(&base).unwrap();
        assert_eq!(value, serde_json::json!({"id": "abc"}));
    }

    #[test]
    fn test_null_timestamp_is_accepted() {
        let base: BaseFields =
            serde_json::from_str(r#"{"id": "abc", "created_at": null}"#).unwrap();
        assert!(base.created_at.is_none());
    }

    #[test]
    fn test_timestamp_format() {
        let base: BaseFields = serde_json::from_str(
            r#"{"id": "abc", "created_at": "2017-09-28T21:05:54.119427", "updated_at": "2017-09-28T21:05:54.119572"}"#,
        )
        .unwrap();
        let value = serde_json::to_value(&base).unwrap();
        assert_eq!(value["created_at"], "2017-09-28T21:05:54.119427");
    }
}
