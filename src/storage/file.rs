use super::{Result, Storage, StorageError};
use crate::models::{Entity, EntityKind};
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// JSON file storage.
///
/// All objects live in memory keyed by `<Kind>.<id>`. `save` serializes the
/// whole map to a single JSON object on disk. Objects of classes this service
/// doesn't model are kept as raw JSON and written back untouched.
pub struct FileStorage {
    path: Option<PathBuf>,
    objects: RwLock<HashMap<String, Entity>>,
    foreign: RwLock<Map<String, Value>>,
    /// Held for the whole snapshot/write/rename of a save
    save_lock: Mutex<()>,
}

impl FileStorage {
    /// Storage backed by `path`, loaded from it if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self {
            path: Some(path.into()),
            objects: RwLock::new(HashMap::new()),
            foreign: RwLock::new(Map::new()),
            save_lock: Mutex::new(()),
        };
        storage.reload()?;
        Ok(storage)
    }

    /// Storage with no backing file; `save` does nothing
    pub fn in_memory() -> Self {
        Self {
            path: None,
            objects: RwLock::new(HashMap::new()),
            foreign: RwLock::new(Map::new()),
            save_lock: Mutex::new(()),
        }
    }

    /// Replace in-memory state with the file contents.
    ///
    /// A missing file leaves the storage empty.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if !path.exists() {
            info!(path = %path.display(), "Storage file not found, starting empty");
            return Ok(());
        }

        let raw: Map<String, Value> = serde_json::from_slice(&fs::read(path)?)?;

        let mut objects = HashMap::new();
        let mut foreign = Map::new();

        for (key, value) in raw {
            let class = value.get("__class__").and_then(Value::as_str);
            match class.and_then(EntityKind::from_class) {
                Some(_) => {
                    let entity: Entity =
                        serde_json::from_value(value).map_err(|e| StorageError::Corrupt {
                            key: key.clone(),
                            message: e.to_string(),
                        })?;
                    objects.insert(entity.key(), entity);
                }
                None => {
                    debug!(key = %key, "Keeping unmodelled object as-is");
                    foreign.insert(key, value);
                }
            }
        }

        info!(
            path = %path.display(),
            objects = objects.len(),
            foreign = foreign.len(),
            "Storage loaded"
        );

        *self.objects.write() = objects;
        *self.foreign.write() = foreign;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Entity>> {
        Ok(self.objects.read().get(&kind.key(id)).cloned())
    }

    fn all(&self, kind: Option<EntityKind>) -> Result<HashMap<String, Entity>> {
        Ok(self
            .objects
            .read()
            .iter()
            .filter(|(_, entity)| kind.is_none_or(|k| entity.kind() == k))
            .map(|(key, entity)| (key.clone(), entity.clone()))
            .collect())
    }

    fn insert(&self, entity: Entity) -> Result<()> {
        self.objects.write().insert(entity.key(), entity);
        Ok(())
    }

    fn delete(&self, kind: EntityKind, id: &str) -> Result<bool> {
        Ok(self.objects.write().remove(&kind.key(id)).is_some())
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self.save_lock.lock();

        let mut out = self.foreign.read().clone();
        for (key, entity) in self.objects.read().iter() {
            out.insert(key.clone(), serde_json::to_value(entity)?);
        }

        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        // Write to a fresh temp file, then rename it over the target
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec(&out)?)?;
        tmp.as_file().sync_all()?;
        if let Err(e) = tmp.persist(path) {
            warn!(error = %e.error, "Failed to move storage file into place");
            return Err(e.error.into());
        }

        debug!(path = %path.display(), objects = out.len(), "Storage saved");
        Ok(())
    }
}
