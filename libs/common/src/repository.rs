//! Typed repositories over the document store
//!
//! A `Repository<T>` is the per-kind interface handlers work with. It owns
//! id generation and the JSON encoding of `T`; the store only ever sees raw
//! documents.

use serde::{Serialize, de::DeserializeOwned};
use std::{marker::PhantomData, sync::Arc};
use uuid::Uuid;

use crate::{
    error::StoreResult,
    store::{Collection, DocumentStore, Filter},
};

/// An entity persisted as a document in a fixed collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the entity lives in
    const COLLECTION: Collection;

    /// Identifier of the stored entity
    fn id(&self) -> Uuid;
}

/// Creation payload for a document of type `T`
pub trait NewDocument<T: Document> {
    /// Build the document that will be stored under `id`
    fn into_document(self, id: Uuid) -> T;
}

/// Repository for a single entity kind
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _kind: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    /// Create a new repository over a shared store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// Persist a new entity under a freshly generated id
    pub async fn create(&self, fields: impl NewDocument<T>) -> StoreResult<T> {
        let document = fields.into_document(Uuid::new_v4());
        let value = serde_json::to_value(&document)?;

        self.store
            .insert(T::COLLECTION, document.id(), value)
            .await?;

        Ok(document)
    }

    /// Find an entity by id
    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    /// Find every entity whose id is in `ids`
    pub async fn find_many(&self, ids: &[Uuid]) -> StoreResult<Vec<T>> {
        decode_all(self.store.get_many(T::COLLECTION, ids).await?)
    }

    /// Get every entity of this kind
    pub async fn find_all(&self) -> StoreResult<Vec<T>> {
        decode_all(self.store.list(T::COLLECTION).await?)
    }

    /// Get every entity matching `filter`
    pub async fn find_where(&self, filter: &Filter) -> StoreResult<Vec<T>> {
        decode_all(self.store.find(T::COLLECTION, filter).await?)
    }
}

fn decode<T: Document>(value: serde_json::Value) -> StoreResult<T> {
    Ok(serde_json::from_value(value)?)
}

fn decode_all<T: Document>(values: Vec<serde_json::Value>) -> StoreResult<Vec<T>> {
    values.into_iter().map(decode::<T>).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(rename = "_id")]
        id: Uuid,
        topic: String,
    }

    impl Document for Note {
        const COLLECTION: Collection = Collection::Reviews;

        fn id(&self) -> Uuid {
            self.id
        }
    }

    struct NewNote(&'static str);

    impl NewDocument<Note> for NewNote {
        fn into_document(self, id: Uuid) -> Note {
            Note {
                id,
                topic: self.0.to_string(),
            }
        }
    }

    fn repository() -> Repository<Note> {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() -> StoreResult<()> {
        let notes = repository();

        let first = notes.create(NewNote("a")).await?;
        let second = notes.create(NewNote("a")).await?;
        assert_ne!(first.id, second.id);

        assert_eq!(notes.find_by_id(first.id).await?, Some(first));
        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_unknown_id_is_none() -> StoreResult<()> {
        assert_eq!(repository().find_by_id(Uuid::new_v4()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_where_and_find_many() -> StoreResult<()> {
        let notes = repository();
        let rust = notes.create(NewNote("rust")).await?;
        let go = notes.create(NewNote("go")).await?;

        let found = notes.find_where(&Filter::new().eq("topic", "rust")).await?;
        assert_eq!(found, vec![rust.clone()]);

        let many = notes.find_many(&[go.id, rust.id, Uuid::new_v4()]).await?;
        assert_eq!(many.len(), 2);

        assert_eq!(notes.find_all().await?, vec![rust, go]);
        Ok(())
    }

    #[tokio::test]
    async fn test_undecodable_document_is_an_error() -> StoreResult<()> {
        let store = Arc::new(MemoryStore::new());
        let id = Uuid::new_v4();
        store
            .insert(Collection::Reviews, id, serde_json::json!({"_id": id}))
            .await?;

        let notes: Repository<Note> = Repository::new(store);
        assert!(notes.find_by_id(id).await.is_err());
        Ok(())
    }
}
