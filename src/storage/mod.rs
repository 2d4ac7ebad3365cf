pub mod file;

pub use file::FileStorage;

use crate::models::{Entity, EntityKind, Model};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt storage entry {key}: {message}")]
    Corrupt { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence gateway for all entities.
///
/// Writes through `insert`/`delete` are visible to subsequent reads right
/// away; `save` commits them to the backing store.
pub trait Storage: Send + Sync {
    fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Entity>>;

    /// Every entity of `kind` (or of every kind), keyed by `<Kind>.<id>`
    fn all(&self, kind: Option<EntityKind>) -> Result<HashMap<String, Entity>>;

    /// Stage an entity, replacing any existing one with the same key
    fn insert(&self, entity: Entity) -> Result<()>;

    /// Returns whether anything was removed
    fn delete(&self, kind: EntityKind, id: &str) -> Result<bool>;

    fn save(&self) -> Result<()>;

    fn count(&self, kind: Option<EntityKind>) -> Result<usize> {
        Ok(self.all(kind)?.len())
    }
}

/// Typed helpers over [`Storage`].
pub trait StorageExt: Storage {
    fn get_as<T: Model>(&self, id: &str) -> Result<Option<T>> {
        Ok(self
            .get(T::KIND, id)?
            .and_then(|entity| T::try_from(entity).ok()))
    }

    fn all_of<T: Model>(&self) -> Result<Vec<T>> {
        Ok(self
            .all(Some(T::KIND))?
            .into_values()
            .filter_map(|entity| T::try_from(entity).ok())
            .collect())
    }

    fn put<T: Model>(&self, model: T) -> Result<()> {
        self.insert(model.into())
    }
}

impl<S: Storage + ?Sized> StorageExt for S {}
