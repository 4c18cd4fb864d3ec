//! Saved-property list and its JSON file store.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::property::Property;

#[derive(Debug, Error)]
pub enum SavedError {
    #[error("property already saved (key \"{key}\")")]
    AlreadySaved { key: String },

    #[error("no saved property with id {0}")]
    NotFound(Uuid),

    #[error("saved-list I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("saved-list JSON error for {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A property the user chose to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProperty {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub property: Property,
}

/// Ordered saved list, deduplicated by [`Property::uniqueness_key`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedProperties {
    items: Vec<SavedProperty>,
}

impl SavedProperties {
    #[must_use]
    pub fn from_entries(items: Vec<SavedProperty>) -> Self {
        Self { items }
    }

    /// Appends `property` stamped with `saved_at` and a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`SavedError::AlreadySaved`] when an entry with the same
    /// uniqueness key exists; the list is left unchanged.
    pub fn save(
        &mut self,
        property: Property,
        saved_at: DateTime<Utc>,
    ) -> Result<&SavedProperty, SavedError> {
        let key = property.uniqueness_key();
        if self.contains_key(&key) {
            return Err(SavedError::AlreadySaved { key });
        }
        self.items.push(SavedProperty {
            id: Uuid::new_v4(),
            saved_at,
            property,
        });
        Ok(&self.items[self.items.len() - 1])
    }

    /// Removes the entry with `id`, preserving the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`SavedError::NotFound`] if no entry has that id.
    pub fn remove(&mut self, id: Uuid) -> Result<SavedProperty, SavedError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(SavedError::NotFound(id))?;
        Ok(self.items.remove(index))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.property.uniqueness_key() == key)
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&SavedProperty> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Entries whose id is in `ids`, in saved order. Unknown ids are ignored.
    #[must_use]
    pub fn select(&self, ids: &[Uuid]) -> Vec<&SavedProperty> {
        self.items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SavedProperty> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SavedProperty] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// [`SavedProperties`] persisted as a JSON array.
///
/// Every mutation is written through; a failed write rolls the in-memory
/// list back so memory and disk stay in step.
#[derive(Debug)]
pub struct SavedStore {
    path: Option<PathBuf>,
    entries: SavedProperties,
}

impl SavedStore {
    /// Opens the store at `path`. A missing file is an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`SavedError::Io`] if the file exists but cannot be read and
    /// [`SavedError::Json`] if it is not a JSON array of saved properties.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SavedError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let items: Vec<SavedProperty> =
                    serde_json::from_str(&content).map_err(|e| SavedError::Json {
                        path: path.display().to_string(),
                        source: e,
                    })?;
                SavedProperties::from_entries(items)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SavedProperties::default(),
            Err(e) => {
                return Err(SavedError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        tracing::debug!(path = %path.display(), count = entries.len(), "opened saved list");
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// A store that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: SavedProperties::default(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &SavedProperties {
        &self.entries
    }

    /// Saves `property` stamped with the current time and persists the list.
    ///
    /// # Errors
    ///
    /// [`SavedError::AlreadySaved`] for a duplicate, or an I/O/JSON error if
    /// the write fails (the entry is not kept in that case).
    pub fn save(&mut self, property: Property) -> Result<SavedProperty, SavedError> {
        let saved = self.entries.save(property, Utc::now())?.clone();
        if let Err(e) = self.persist() {
            let _ = self.entries.remove(saved.id);
            return Err(e);
        }
        tracing::info!(id = %saved.id, key = %saved.property.uniqueness_key(), "saved property");
        Ok(saved)
    }

    /// Removes an entry and persists the list.
    ///
    /// # Errors
    ///
    /// [`SavedError::NotFound`] for an unknown id, or an I/O/JSON error if
    /// the write fails (the entry is restored in that case).
    pub fn remove(&mut self, id: Uuid) -> Result<SavedProperty, SavedError> {
        let snapshot = self.entries.clone();
        let removed = self.entries.remove(id)?;
        if let Err(e) = self.persist() {
            self.entries = snapshot;
            return Err(e);
        }
        tracing::info!(id = %id, "removed saved property");
        Ok(removed)
    }

    fn persist(&self) -> Result<(), SavedError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_atomic(path, self.entries.as_slice())
    }
}

fn write_atomic(path: &Path, items: &[SavedProperty]) -> Result<(), SavedError> {
    let io_err = |source: std::io::Error| SavedError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let body = serde_json::to_string_pretty(items).map_err(|e| SavedError::Json {
        path: path.display().to_string(),
        source: e,
    })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{LatLng, PropertySource};

    fn parcel(id: &str) -> Property {
        let mut p = Property::empty(PropertySource::Taxlot);
        p.parcel_id = Some(id.to_string());
        p.situs_address = Some("1234 OAK ST".to_string());
        p.owner = Some("SMITH JOHN".to_string());
        p
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("parcelmap-saved-{}", Uuid::new_v4()))
            .join("saved.json")
    }

    #[test]
    fn duplicate_save_is_rejected() {
        let mut list = SavedProperties::default();
        list.save(parcel("A1"), Utc::now()).expect("first save");

        let err = list.save(parcel("A1"), Utc::now()).unwrap_err();
        assert!(matches!(err, SavedError::AlreadySaved { .. }));
        assert!(err.to_string().contains("already saved"));
        assert_eq!(list.len(), 1, "rejected save must not grow the list");
    }

    #[test]
    fn dedup_ignores_case() {
        let mut list = SavedProperties::default();
        list.save(parcel("a1"), Utc::now()).unwrap();
        assert!(list.save(parcel("A1"), Utc::now()).is_err());
    }

    #[test]
    fn remove_preserves_order() {
        let mut list = SavedProperties::default();
        let a = list.save(parcel("A"), Utc::now()).unwrap().id;
        let b = list.save(parcel("B"), Utc::now()).unwrap().id;
        let c = list.save(parcel("C"), Utc::now()).unwrap().id;

        list.remove(b).expect("remove b");
        let ids: Vec<Uuid> = list.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert!(matches!(list.remove(b), Err(SavedError::NotFound(_))));
    }

    #[test]
    fn select_keeps_saved_order() {
        let mut list = SavedProperties::default();
        let a = list.save(parcel("A"), Utc::now()).unwrap().id;
        let b = list.save(parcel("B"), Utc::now()).unwrap().id;
        let picked: Vec<Uuid> = list.select(&[b, a, Uuid::new_v4()]).iter().map(|s| s.id).collect();
        assert_eq!(picked, vec![a, b]);
    }

    #[test]
    fn saved_property_serializes_flat_with_saved_at() {
        let mut list = SavedProperties::default();
        let saved = list.save(parcel("A"), Utc::now()).unwrap().clone();
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["parcelId"], "A");
        assert!(json["savedAt"].is_string());
        assert!(json["id"].is_string());
    }

    #[test]
    fn store_round_trips_through_file() {
        let path = temp_path();
        let mut store = SavedStore::open(&path).expect("missing file opens empty");
        assert!(store.entries().is_empty());

        let mut placeholder = Property::from_coordinates(LatLng::new(44.1, -123.2));
        placeholder.zip = Some("97401".to_string());
        let first = store.save(parcel("A")).unwrap();
        store.save(placeholder).unwrap();

        let reopened = SavedStore::open(&path).expect("reopen");
        assert_eq!(reopened.entries().len(), 2);
        assert_eq!(reopened.entries().get(first.id), Some(&first));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn store_rejects_corrupt_file() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(SavedStore::open(&path), Err(SavedError::Json { .. })));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
