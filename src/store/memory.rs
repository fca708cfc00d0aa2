//! In-memory todo store.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{NewTodo, Todo, TodoId};
use crate::store::{StoreError, StoreResult, TodoStore};

#[derive(Debug)]
struct MemoryState {
    next_id: u64,
    todos: Vec<Todo>,
}

/// A thread-safe, insertion-ordered todo store.
///
/// Ids are issued from a counter starting at 1 and are never reused, even
/// after the todo holding one is deleted.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                next_id: 1,
                todos: Vec::new(),
            }),
        }
    }

    /// Number of todos currently stored.
    pub fn len(&self) -> usize {
        self.lock().map(|state| state.todos.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts canonical decimal only, so each todo has exactly one id spelling.
fn parse_id(id: &str) -> StoreResult<TodoId> {
    let invalid = || StoreError::InvalidId(id.to_string());
    let canonical = !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_digit())
        && !(id.len() > 1 && id.starts_with('0'));
    if !canonical {
        return Err(invalid());
    }
    id.parse::<u64>().map(TodoId::Sequence).map_err(|_| invalid())
}

#[async_trait]
impl TodoStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        Ok(self.lock()?.todos.clone())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Todo>> {
        let id = parse_id(id)?;
        let state = self.lock()?;
        Ok(state.todos.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, new: NewTodo) -> StoreResult<Todo> {
        let mut state = self.lock()?;
        let todo = Todo {
            id: TodoId::Sequence(state.next_id),
            completed: false,
            body: new.into_body(),
        };
        state.next_id += 1;
        state.todos.push(todo.clone());
        Ok(todo)
    }

    async fn complete(&self, id: &str) -> StoreResult<Option<Todo>> {
        let id = parse_id(id)?;
        let mut state = self.lock()?;
        Ok(state.todos.iter_mut().find(|t| t.id == id).map(|todo| {
            todo.completed = true;
            todo.clone()
        }))
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Todo>> {
        let id = parse_id(id)?;
        let mut state = self.lock()?;
        let position = state.todos.iter().position(|t| t.id == id);
        Ok(position.map(|index| state.todos.remove(index)))
    }
}
