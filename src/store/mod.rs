//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → TodoStore (trait object, injected via AppState)
//!         → memory.rs (mutex-guarded Vec, sequential ids)
//!         → mongo.rs  (MongoDB collection, ObjectId ids)
//! ```
//!
//! # Design Decisions
//! - Handlers never parse identifiers; each store validates its own format
//! - "Absent" is `Ok(None)`, not an error, so handlers own the 404 mapping
//! - One storage call per request, no retries

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewTodo, Todo};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Errors surfaced by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Identifier does not have the format this store issues.
    #[error("Invalid todo id: {0}")]
    InvalidId(String),

    /// Backend unreachable or the operation failed.
    #[error("Storage error: {0}")]
    Backend(String),

    /// A stored record could not be turned into a `Todo`.
    #[error("Decode error: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence interface for todos.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// All todos in store iteration order.
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    async fn get(&self, id: &str) -> StoreResult<Option<Todo>>;

    /// Persist a new todo with `completed = false` and return it with its id.
    async fn create(&self, new: NewTodo) -> StoreResult<Todo>;

    /// Set `completed = true` and return the updated todo.
    async fn complete(&self, id: &str) -> StoreResult<Option<Todo>>;

    /// Remove a todo and return what was removed.
    async fn delete(&self, id: &str) -> StoreResult<Option<Todo>>;
}
