use super::base::{BaseFields, null_as_default};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user's review of a place.
///
/// `place_id` and `user_id` are checked against storage when the review is
/// created; afterwards only `text` changes. Stored attributes this type
/// doesn't know about are kept in `extra` and written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub base: BaseFields,

    #[serde(default, deserialize_with = "null_as_default")]
    pub place_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Review {
    pub fn new(place_id: String, user_id: String, text: String) -> Self {
        Self {
            base: BaseFields::new(),
            place_id,
            user_id,
            text,
            extra: Map::new(),
        }
    }

    /// Replace the review text and bump `updated_at`
    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.base.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_keeps_identity() {
        let mut review = Review::new("p1".into(), "u1".into(), "ok".into());
        let before = review.clone();

        review.set_text("better".into());

        assert_eq!(review.text, "better");
        assert_eq!(review.base.id, before.base.id);
        assert_eq!(review.base.created_at, before.base.created_at);
        assert_eq!(review.place_id, "p1");
        assert_eq!(review.user_id, "u1");
    }

    #[test]
    fn test_serialized_fields_are_flat() {
        let review = Review::new("p1".into(), "u1".into(), "nice".into());
        let value = serde_json::to_value(&review).unwrap();

        assert_eq!(value["id"], review.base.id.as_str());
        assert_eq!(value["place_id"], "p1");
        assert_eq!(value["user_id"], "u1");
        assert_eq!(value["text"], "nice");
        assert!(value.get("created_at").is_some());
        assert!(value.get("base").is_none());
    }

    #[test]
    fn test_stored_record_keeps_unknown_keys_and_tolerates_null() {
        let raw = serde_json::json!({
            "id": "r1",
            "place_id": "p1",
            "user_id": "u1",
            "text": null,
            "rating": 4
        });

        let review: Review = serde_json::from_value(raw).unwrap();
        assert_eq!(review.text, "");
        assert_eq!(review.extra["rating"], 4);
        assert!(!review.extra.contains_key("place_id"));

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["rating"], 4);
        assert_eq!(value["place_id"], "p1");
    }
}
