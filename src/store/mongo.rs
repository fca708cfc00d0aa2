//! MongoDB-backed todo store.
//!
//! # Responsibilities
//! - Connect to the configured deployment and verify it with a ping
//! - Map todos to and from BSON documents in a single collection
//! - Validate ObjectId path segments before querying
//!
//! # Design Decisions
//! - Connection or ping failure at startup is fatal to the caller
//! - Completion is a single find-one-and-update returning the new document
//! - Deletion returns the removed document via find-one-and-delete

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::StoreConfig;
use crate::domain::{NewTodo, Todo, TodoId};
use crate::store::{StoreError, StoreResult, TodoStore};

/// BSON shape of a todo in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub body: String,
}

impl TryFrom<TodoDocument> for Todo {
    type Error = StoreError;

    fn try_from(document: TodoDocument) -> Result<Self, Self::Error> {
        let id = document
            .id
            .ok_or_else(|| StoreError::Decode("document has no _id".to_string()))?;
        Ok(Todo {
            id: TodoId::Object(id.to_hex()),
            completed: document.completed,
            body: document.body,
        })
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Parse a path segment into an ObjectId.
pub fn parse_object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Todo store over a MongoDB collection.
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<TodoDocument>,
}

impl MongoStore {
    /// Connect using the store configuration and ping the deployment.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let uri = config
            .mongodb_uri
            .as_deref()
            .ok_or_else(|| StoreError::Backend("no MongoDB URI configured".to_string()))?;

        let mut options = ClientOptions::parse(uri).await?;
        let timeout = Duration::from_secs(config.connect_timeout_secs);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "Connected to MongoDB"
        );

        Ok(Self::from_client(&client, &config.database, &config.collection))
    }

    /// Build a store over an existing client without contacting the server.
    pub fn from_client(client: &Client, database: &str, collection: &str) -> Self {
        Self {
            collection: client.database(database).collection(collection),
        }
    }
}

#[async_trait]
impl TodoStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<TodoDocument> = cursor.try_collect().await?;
        documents.into_iter().map(Todo::try_from).collect()
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Todo>> {
        let id = parse_object_id(id)?;
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .map(Todo::try_from)
            .transpose()
    }

    async fn create(&self, new: NewTodo) -> StoreResult<Todo> {
        let document = TodoDocument {
            id: None,
            completed: false,
            body: new.into_body(),
        };
        let result = self.collection.insert_one(&document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Decode("inserted _id is not an ObjectId".to_string()))?;

        Ok(Todo {
            id: TodoId::Object(id.to_hex()),
            completed: document.completed,
            body: document.body,
        })
    }

    async fn complete(&self, id: &str) -> StoreResult<Option<Todo>> {
        let id = parse_object_id(id)?;
        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": { "completed": true } })
            .return_document(ReturnDocument::After)
            .await?
            .map(Todo::try_from)
            .transpose()
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Todo>> {
        let id = parse_object_id(id)?;
        self.collection
            .find_one_and_delete(doc! { "_id": id })
            .await?
            .map(Todo::try_from)
            .transpose()
    }
}
