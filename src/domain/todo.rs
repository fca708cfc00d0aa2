//! Todo entity and identifier types.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use thiserror::Error;

/// Store-assigned identifier of a todo.
///
/// Handlers treat it as an opaque token; only the store that issued an id
/// knows how to parse one back from a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TodoId {
    /// Sequential integer issued by the in-memory store.
    Sequence(u64),
    /// 24-character hex object id issued by the document store.
    Object(String),
}

impl TodoId {
    /// JSON key under which this kind of id is exposed.
    pub fn json_key(&self) -> &'static str {
        match self {
            TodoId::Sequence(_) => "id",
            TodoId::Object(_) => "_id",
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Sequence(n) => write!(f, "{}", n),
            TodoId::Object(hex) => f.write_str(hex),
        }
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TodoId::Sequence(n) => serializer.serialize_u64(*n),
            TodoId::Object(hex) => serializer.serialize_str(hex),
        }
    }
}

/// A persisted todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub completed: bool,
    pub body: String,
}

impl Serialize for Todo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Todo", 3)?;
        state.serialize_field(self.id.json_key(), &self.id)?;
        state.serialize_field("completed", &self.completed)?;
        state.serialize_field("body", &self.body)?;
        state.end()
    }
}

/// Creation-time validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Todo body is required")]
    EmptyBody,
}

/// A validated request to create a todo.
///
/// New todos always start out not completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    body: String,
}

impl NewTodo {
    /// Validate the body of a todo about to be created.
    pub fn new(body: impl Into<String>) -> Result<Self, ValidationError> {
        let body = body.into();
        if body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        Ok(Self { body })
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_id_serializes_as_integer_under_id() {
        let todo = Todo {
            id: TodoId::Sequence(1),
            completed: false,
            body: "buy milk".into(),
        };

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "completed": false, "body": "buy milk"})
        );
    }

    #[test]
    fn test_object_id_serializes_as_string_under_underscore_id() {
        let todo = Todo {
            id: TodoId::Object("65f1c0d2a4b3e9f01a2b3c4d".into()),
            completed: true,
            body: "walk dog".into(),
        };

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["_id"], "65f1c0d2a4b3e9f01a2b3c4d");
        assert_eq!(json["completed"], true);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_new_todo_rejects_empty_body() {
        assert_eq!(NewTodo::new(""), Err(ValidationError::EmptyBody));

        let todo = NewTodo::new("write tests").unwrap();
        assert_eq!(todo.body(), "write tests");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(TodoId::Sequence(42).to_string(), "42");
        assert_eq!(TodoId::Object("abc".into()).to_string(), "abc");
    }
}
