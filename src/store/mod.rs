//! Document storage subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → Collection (trait object shared via Arc)
//!     → memory.rs (DashMap keyed by ObjectId)
//!     → optional JSON snapshot on disk
//! ```
//!
//! # Design Decisions
//! - Documents are open JSON objects; only `_id` is interpreted here
//! - Each operation is one call; no multi-document transactions
//! - Write results mirror what a document database reports (acknowledged,
//!   matched/modified/deleted counts) so callers can map logical no-ops

pub mod memory;
pub mod object_id;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use memory::MemoryCollection;
pub use object_id::{ObjectId, ObjectIdError};

/// A schema-less document.
pub type Document = Map<String, Value>;

/// Key under which a document's identifier is stored.
pub const ID_FIELD: &str = "_id";

/// Errors raised by a collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document must be a JSON object, got {0}")]
    InvalidDocument(&'static str),

    #[error(transparent)]
    InvalidId(#[from] ObjectIdError),

    #[error("_id must be a 24 character hex string, got {0}")]
    InvalidIdType(&'static str),

    #[error("document has no _id")]
    MissingId,

    #[error("duplicate key error: _id {0} already exists")]
    DuplicateKey(ObjectId),

    #[error("performing an update on the path '_id' would modify the immutable field '_id'")]
    ImmutableField,

    #[error("update document must not be empty")]
    EmptyUpdate,

    #[error("snapshot {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported storage uri `{0}`")]
    UnsupportedUri(String),
}

/// Outcome of an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: ObjectId,
}

/// Outcome of a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// The operations the employee handlers need from storage.
///
/// `merge_by_id` and `delete_by_id` may return `None` when the backend
/// completes without reporting a result.
#[async_trait]
pub trait Collection: Send + Sync {
    /// All documents in natural order.
    async fn list(&self) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, StoreError>;

    /// Insert a document. A valid `_id` in the document is kept, otherwise
    /// one is assigned.
    async fn insert(&self, document: Document) -> Result<InsertResult, StoreError>;

    /// Shallow merge: every top-level field in `fields` overwrites the stored one.
    async fn merge_by_id(
        &self,
        id: &ObjectId,
        fields: Document,
    ) -> Result<Option<UpdateResult>, StoreError>;

    async fn delete_by_id(&self, id: &ObjectId) -> Result<Option<DeleteResult>, StoreError>;
}

/// Name of a JSON value's type, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Unwrap a JSON value into a document.
pub fn into_document(value: Value) -> Result<Document, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(json_type_name(&other))),
    }
}
