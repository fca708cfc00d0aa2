//! Domain model.
//!
//! # Responsibilities
//! - Define the `Todo` entity and its opaque identifier
//! - Enforce the creation invariant (non-empty body)
//!
//! # Design Decisions
//! - Identifiers are assigned by the store, never by the client
//! - The JSON key of the identifier follows the store's convention
//!   (`id` for sequential ids, `_id` for document ids)

pub mod todo;

pub use todo::{NewTodo, Todo, TodoId, ValidationError};
