//! In-memory document store for tests and local development

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use super::{Collection, DocumentStore, Filter};
use crate::error::{StoreError, StoreResult};

type Collections = HashMap<Collection, Vec<(Uuid, Value)>>;

/// In-memory store keeping documents in insertion order
///
/// Uses an RwLock for thread-safe access. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> StoreResult<T> {
        let collections = self
            .collections
            .read()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire read lock: {}", e)))?;
        Ok(f(&collections))
    }

    fn documents<'a>(collections: &'a Collections, collection: Collection) -> &'a [(Uuid, Value)] {
        collections
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, id: Uuid, document: Value) -> StoreResult<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire write lock: {}", e)))?;

        let documents = collections.entry(collection).or_default();

        for &field in collection.unique_fields() {
            let Some(value) = document.get(field) else {
                continue;
            };
            if documents.iter().any(|(_, doc)| doc.get(field) == Some(value)) {
                return Err(StoreError::Conflict {
                    collection: collection.name(),
                    field,
                });
            }
        }

        documents.push((id, document));

        Ok(())
    }

    async fn get(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Value>> {
        self.read(|collections| {
            Self::documents(collections, collection)
                .iter()
                .find(|(doc_id, _)| *doc_id == id)
                .map(|(_, doc)| doc.clone())
        })
    }

    async fn get_many(&self, collection: Collection, ids: &[Uuid]) -> StoreResult<Vec<Value>> {
        let wanted: HashSet<&Uuid> = ids.iter().collect();
        self.read(|collections| {
            Self::documents(collections, collection)
                .iter()
                .filter(|(doc_id, _)| wanted.contains(doc_id))
                .map(|(_, doc)| doc.clone())
                .collect()
        })
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        self.read(|collections| {
            Self::documents(collections, collection)
                .iter()
                .map(|(_, doc)| doc.clone())
                .collect()
        })
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Value>> {
        self.read(|collections| {
            Self::documents(collections, collection)
                .iter()
                .filter(|(_, doc)| filter.matches(doc))
                .map(|(_, doc)| doc.clone())
                .collect()
        })
    }
}
