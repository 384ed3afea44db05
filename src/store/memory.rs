//! In-memory collection with optional JSON snapshot persistence.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::store::{
    json_type_name, Collection, DeleteResult, Document, InsertResult, ObjectId, StoreError,
    UpdateResult, ID_FIELD,
};

/// A concurrent document collection keyed by [`ObjectId`].
///
/// Natural order is identifier order, which for generated ids is creation
/// order. When opened with a snapshot path, the whole collection is
/// rewritten to that file after every write that changed something; a
/// write whose snapshot fails is rolled back before the error is returned.
pub struct MemoryCollection {
    documents: DashMap<ObjectId, Document>,
    snapshot: Option<PathBuf>,
    /// Serializes snapshot writes.
    snapshot_lock: Mutex<()>,
    acknowledge_writes: bool,
}

impl MemoryCollection {
    /// Create an empty, volatile collection.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            snapshot: None,
            snapshot_lock: Mutex::new(()),
            acknowledge_writes: true,
        }
    }

    /// Open a collection persisted at `path`, loading it if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut collection = Self::new();
        collection.snapshot = Some(path.to_path_buf());

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let documents: Vec<Document> =
                serde_json::from_str(&content).map_err(|source| StoreError::Snapshot {
                    path: path.display().to_string(),
                    source,
                })?;

            for document in documents {
                let id = document_id(&document)?;
                collection.documents.insert(id, document);
            }
            tracing::info!(
                path = %path.display(),
                documents = collection.documents.len(),
                "Loaded collection snapshot"
            );
        }

        Ok(collection)
    }

    /// Whether inserts report themselves as acknowledged.
    pub fn with_acknowledged_writes(mut self, acknowledge: bool) -> Self {
        self.acknowledge_writes = acknowledge;
        self
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn sorted_documents(&self) -> Vec<Document> {
        let mut entries: Vec<(ObjectId, Document)> = self
            .documents
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, doc)| doc).collect()
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let _guard = self.snapshot_lock.lock().await;
        let documents = self.sorted_documents();
        let bytes = serde_json::to_vec_pretty(&documents).map_err(|source| StoreError::Snapshot {
            path: path.display().to_string(),
            source,
        })?;

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        tracing::trace!(path = %path.display(), documents = documents.len(), "Snapshot written");
        Ok(())
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the identifier stored in a document.
fn document_id(document: &Document) -> Result<ObjectId, StoreError> {
    match document.get(ID_FIELD) {
        Some(Value::String(s)) => Ok(ObjectId::parse_str(s)?),
        Some(other) => Err(StoreError::InvalidIdType(json_type_name(other))),
        None => Err(StoreError::MissingId),
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.sorted_documents())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.get(id).map(|r| r.value().clone()))
    }

    async fn insert(&self, mut document: Document) -> Result<InsertResult, StoreError> {
        let id = if document.contains_key(ID_FIELD) {
            document_id(&document)?
        } else {
            ObjectId::new()
        };
        document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));

        match self.documents.entry(id) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateKey(id)),
            Entry::Vacant(slot) => {
                slot.insert(document);
            }
        }

        if let Err(e) = self.persist().await {
            self.documents.remove(&id);
            return Err(e);
        }
        Ok(InsertResult {
            acknowledged: self.acknowledge_writes,
            inserted_id: id,
        })
    }

    async fn merge_by_id(
        &self,
        id: &ObjectId,
        fields: Document,
    ) -> Result<Option<UpdateResult>, StoreError> {
        if fields.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }
        if let Some(value) = fields.get(ID_FIELD) {
            let same = matches!(value, Value::String(s) if ObjectId::parse_str(s).ok() == Some(*id));
            if !same {
                return Err(StoreError::ImmutableField);
            }
        }

        let previous = {
            let Some(mut document) = self.documents.get_mut(id) else {
                return Ok(Some(UpdateResult {
                    matched_count: 0,
                    modified_count: 0,
                }));
            };

            let previous = document.clone();
            for (key, value) in fields {
                if key == ID_FIELD {
                    continue;
                }
                if document.get(&key) != Some(&value) {
                    document.insert(key, value);
                }
            }
            (*document != previous).then_some(previous)
        };

        let modified = previous.is_some();
        if let Some(previous) = previous {
            if let Err(e) = self.persist().await {
                self.documents.insert(*id, previous);
                return Err(e);
            }
        }
        Ok(Some(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        }))
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<Option<DeleteResult>, StoreError> {
        let removed = self.documents.remove(id);
        if let Some((_, document)) = &removed {
            if let Err(e) = self.persist().await {
                self.documents.insert(*id, document.clone());
                return Err(e);
            }
        }
        Ok(Some(DeleteResult {
            deleted_count: u64::from(removed.is_some()),
        }))
    }
}
