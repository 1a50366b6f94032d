//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains all request/response structures used by the API.

pub mod object;
pub mod product;
pub mod user;

// Re-export commonly used types
pub use object::*;
pub use product::*;
pub use user::*;

use serde::Serialize;
use utoipa::ToSchema;

/// Message-only response (no data)
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
