//! Document adapter
//!
//! User CRUD against a MongoDB collection. The shared [`Client`] is created
//! once at startup and pools connections internally; only the connectivity
//! probe opens (and closes) a client of its own.

use crate::config::DocumentConfig;
use crate::error::AppError;
use crate::models::{User, UserInput};
use async_trait::async_trait;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Operations exposed by the user routes
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Open a fresh connection, read one document, close the connection
    async fn health_check(&self) -> Result<Option<serde_json::Value>, AppError>;

    async fn create(&self, input: &UserInput) -> Result<User, AppError>;

    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn get(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Returns the document as it is after the update
    async fn update(&self, id: &str, input: &UserInput) -> Result<Option<User>, AppError>;

    /// Number of documents removed
    async fn delete(&self, id: &str) -> Result<u64, AppError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<Bson>,
}

impl UserDocument {
    fn into_user(self) -> User {
        User {
            id: self.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: self.name.map(Bson::into_relaxed_extjson),
            email: self.email.map(Bson::into_relaxed_extjson),
        }
    }
}

/// MongoDB-backed [`UserStore`]
pub struct MongoUserStore {
    uri: String,
    database: String,
    collection: String,
    users: Collection<UserDocument>,
}

impl MongoUserStore {
    /// Parses the URI and prepares the shared client; no I/O happens until
    /// the first operation.
    pub async fn new(config: &DocumentConfig) -> Result<Self, AppError> {
        let options = ClientOptions::parse(&config.uri).await?;
        let database = config
            .database
            .clone()
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| "test".to_string());

        let client = Client::with_options(options)?;
        let users = client
            .database(&database)
            .collection::<UserDocument>(&config.collection);

        info!(
            "Document store configured (database: {}, collection: {})",
            database, config.collection
        );

        Ok(Self {
            uri: config.uri.clone(),
            database,
            collection: config.collection.clone(),
            users,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn health_check(&self) -> Result<Option<serde_json::Value>, AppError> {
        let client = Client::with_uri_str(&self.uri).await?;
        let found = client
            .database(&self.database)
            .collection::<Document>(&self.collection)
            .find_one(doc! {})
            .await;
        client.shutdown().await;

        let found = found?;
        let read = if found.is_some() { "one" } else { "no" };
        debug!("Connectivity probe read {} document", read);
        Ok(found.map(|d| Bson::Document(d).into_relaxed_extjson()))
    }

    async fn create(&self, input: &UserInput) -> Result<User, AppError> {
        let mut record = UserDocument {
            id: None,
            name: field_value(&input.name)?,
            email: field_value(&input.email)?,
        };
        let result = self.users.insert_one(&record).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::Internal(format!("inserted id {} is not an ObjectId", result.inserted_id))
        })?;
        record.id = Some(id);
        Ok(record.into_user())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut cursor = self.users.find(doc! {}).await?;
        let mut users = Vec::new();
        while cursor.advance().await? {
            users.push(cursor.deserialize_current()?.into_user());
        }
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    async fn get(&self, id: &str) -> Result<Option<User>, AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let found = self.users.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(UserDocument::into_user))
    }

    async fn update(&self, id: &str, input: &UserInput) -> Result<Option<User>, AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let fields = set_fields(input)?;
        if fields.is_empty() {
            return self.get(id).await;
        }

        let updated = self
            .users
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(UserDocument::into_user))
    }

    async fn delete(&self, id: &str) -> Result<u64, AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(0);
        };
        let result = self.users.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count)
    }
}

/// A malformed id cannot match any document.
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

/// A body value converted to BSON as received.
fn field_value(value: &Option<Value>) -> Result<Option<Bson>, AppError> {
    value
        .as_ref()
        .map(|value| bson::to_bson(value).map_err(|e| AppError::Internal(e.to_string())))
        .transpose()
}

/// Fields present in the request body; absent ones keep their stored value.
fn set_fields(input: &UserInput) -> Result<Document, AppError> {
    let mut fields = Document::new();
    if let Some(name) = field_value(&input.name)? {
        fields.insert("name", name);
    }
    if let Some(email) = field_value(&input.email)? {
        fields.insert("email", email);
    }
    Ok(fields)
}
