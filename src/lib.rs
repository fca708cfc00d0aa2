//! Todo service library.
//!
//! A small HTTP CRUD service for todo items, backed by either an in-memory
//! store or MongoDB.

pub mod config;
pub mod domain;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod store;

pub use config::schema::ServiceConfig;
pub use domain::{NewTodo, Todo, TodoId};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::{MemoryStore, MongoStore, StoreError, TodoStore};
