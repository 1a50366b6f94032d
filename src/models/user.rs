//! User models and DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A document of the users collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-assigned identifier, hex encoded
    #[serde(rename = "_id")]
    #[schema(example = "665f1c2e9b1e8a3d4c2b1a00")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
}

/// Body of `POST /usuarios` and `PUT /usuarios/{id}`
///
/// Values are stored as received, whatever their JSON type.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserInput {
    #[schema(value_type = Option<String>, example = "Maria")]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>, example = "maria@example.com")]
    pub email: Option<Value>,
}

/// Result of the document store connectivity probe
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionProbe {
    pub message: String,
    /// One arbitrary document from the users collection, if any
    #[schema(value_type = Option<Object>)]
    pub document: Option<serde_json::Value>,
}
