pub mod base;
pub mod place;
pub mod review;
pub mod user;

pub use base::BaseFields;
pub use place::Place;
pub use review::Review;
pub use user::User;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class name of a stored entity, as written in `__class__`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Place,
    User,
    Review,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Place => "Place",
            EntityKind::User => "User",
            EntityKind::Review => "Review",
        }
    }

    pub fn from_class(name: &str) -> Option<Self> {
        match name {
            "Place" => Some(EntityKind::Place),
            "User" => Some(EntityKind::User),
            "Review" => Some(EntityKind::Review),
            _ => None,
        }
    }

    /// Storage key for an entity of this kind, e.g. `Review.<id>`
    pub fn key(&self, id: &str) -> String {
        format!("{}.{}", self.as_str(), id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any persisted entity.
///
/// Serializes as a flat object with a `__class__` discriminator; this is
/// both the storage file format and the API response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Entity {
    Place(Place),
    User(User),
    Review(Review),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Place(_) => EntityKind::Place,
            Entity::User(_) => EntityKind::User,
            Entity::Review(_) => EntityKind::Review,
        }
    }

    pub fn base(&self) -> &BaseFields {
        match self {
            Entity::Place(p) => &p.base,
            Entity::User(u) => &u.base,
            Entity::Review(r) => &r.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn key(&self) -> String {
        self.kind().key(self.id())
    }
}

/// A concrete entity type that can be moved in and out of [`Entity`].
pub trait Model: Clone + Into<Entity> + TryFrom<Entity> {
    const KIND: EntityKind;
}

macro_rules! impl_model {
    ($ty:ident) => {
        impl Model for $ty {
            const KIND: EntityKind = EntityKind::$ty;
        }

        impl From<$ty> for Entity {
            fn from(value: $ty) -> Self {
                Entity::$ty(value)
            }
        }

        impl TryFrom<Entity> for $ty {
            type Error = Entity;

            fn try_from(entity: Entity) -> Result<Self, Self::Error> {
                match entity {
                    Entity::$ty(value) => Ok(value),
                    other => Err(other),
                }
            }
        }
    };
}

impl_model!(Place);
impl_model!(User);
impl_model!(Review);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_carries_class_tag() {
        let review = Review::new("p1".into(), "u1".into(), "hello".into());
        let value = serde_json::to_value(Entity::from(review.clone())).unwrap();

        assert_eq!(value["__class__"], "Review");
        assert_eq!(value["id"], review.base.id.as_str());
        assert_eq!(value["text"], "hello");
    }

    #[test]
    fn test_entity_parses_tagged_object() {
        let raw = serde_json::json!({
            "__class__": "Place",
            "id": "123",
            "created_at": "2017-03-25T02:17:06.000000",
            "updated_at": "2017-03-25T02:17:06.000000",
            "name": "Lovely loft",
            "number_rooms": 2
        });

        let entity: Entity = serde_json::from_value(raw).unwrap();
        assert_eq!(entity.kind(), EntityKind::Place);
        assert_eq!(entity.key(), "Place.123");

        let place = Place::try_from(entity).unwrap();
        assert_eq!(place.name(), Some("Lovely loft"));
        assert_eq!(place.attributes["number_rooms"], 2);
    }

    #[test]
    fn test_try_from_wrong_kind_returns_entity() {
        let entity = Entity::from(User::new("a@b.c"));
        let err = Review::try_from(entity).unwrap_err();
        assert_eq!(err.kind(), EntityKind::User);
    }

    #[test]
    fn test_kind_from_class() {
        assert_eq!(EntityKind::from_class("User"), Some(EntityKind::User));
        assert_eq!(EntityKind::from_class("City"), None);
        assert_eq!(EntityKind::Review.key("x"), "Review.x");
    }
}
