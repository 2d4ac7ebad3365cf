use super::base::BaseFields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A rentable place. Reviews hang off it.
///
/// Only the identity is interpreted here; every other attribute (name,
/// city_id, price_by_night, amenity_ids, ...) is carried as-is so records
/// owned by other services survive a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub base: BaseFields,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Place {
    pub fn new(name: impl Into<String>) -> Self {
        let mut place = Self::default();
        place
            .attributes
            .insert("name".to_string(), Value::String(name.into()));
        place
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attributes_round_trip_verbatim() {
        let raw = json!({
            "id": "p1",
            "created_at": "2017-03-25T02:17:06.119427",
            "name": "Loft",
            "latitude": null,
            "number_rooms": 3,
            "amenity_ids": ["a1", "a2"]
        });

        let place: Place = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(place.base.id, "p1");
        assert_eq!(place.name(), Some("Loft"));
        assert!(!place.attributes.contains_key("id"));

        assert_eq!(serde_json::to_value(&place).unwrap(), raw);
    }
}
