//! Document store abstraction
//!
//! Entities are kept as JSON documents grouped in named collections and
//! addressed by UUID. References between entities are stored as plain ids;
//! nothing here follows them.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::error::StoreResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// The collections known to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Movies,
    Actors,
    Directors,
    Producers,
    Reviews,
    Users,
}

impl Collection {
    /// Every collection, in bootstrap order
    pub const ALL: [Collection; 6] = [
        Collection::Movies,
        Collection::Actors,
        Collection::Directors,
        Collection::Producers,
        Collection::Reviews,
        Collection::Users,
    ];

    /// Storage name of the collection
    pub fn name(self) -> &'static str {
        match self {
            Collection::Movies => "movies",
            Collection::Actors => "actors",
            Collection::Directors => "directors",
            Collection::Producers => "producers",
            Collection::Reviews => "reviews",
            Collection::Users => "users",
        }
    }

    /// Top-level fields no two documents of the collection may share
    pub fn unique_fields(self) -> &'static [&'static str] {
        match self {
            Collection::Users => &["username"],
            _ => &[],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conjunction of top-level field equalities
///
/// Only scalar values are meaningful: the PostgreSQL backend evaluates the
/// filter as JSONB containment, which for arrays means "contains" rather
/// than "equals".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Map<String, Value>,
}

impl Filter {
    /// Create an empty filter matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Check a document against the filter
    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }

    /// The filter as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Raw access to document collections
///
/// Implementations must be safe to share between concurrent requests.
/// `list` and `find` return documents in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document under `id`
    ///
    /// Fails with `StoreError::Conflict` when the document repeats the value
    /// of one of the collection's [`Collection::unique_fields`]. The check
    /// and the write are atomic.
    async fn insert(&self, collection: Collection, id: Uuid, document: Value) -> StoreResult<()>;

    /// Fetch a single document, `None` when the id is unknown
    async fn get(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Value>>;

    /// Fetch every document whose id is in `ids`; unknown ids are skipped
    async fn get_many(&self, collection: Collection, ids: &[Uuid]) -> StoreResult<Vec<Value>>;

    /// Fetch every document of a collection
    async fn list(&self, collection: Collection) -> StoreResult<Vec<Value>>;

    /// Fetch every document matching `filter`
    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Value>>;
}
