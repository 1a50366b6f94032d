//! Object storage models and DTOs

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Access level applied to an uploaded object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    /// Anything other than `public` keeps the object private.
    pub fn from_form_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("public") {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// A file part received from a multipart upload
#[derive(Debug, Clone)]
pub struct NewObject {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
    pub visibility: Visibility,
}

impl NewObject {
    /// Object key: upload time in milliseconds followed by the original name
    pub fn key_at(&self, now: DateTime<Utc>) -> String {
        format!("{}-{}", now.timestamp_millis(), self.file_name)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub visibility: Visibility,
}

/// Result of `POST /buckets/{bucketName}/upload`
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub file: StoredObject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_is_timestamp_prefixed() {
        let object = NewObject {
            file_name: "relatorio.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF"),
            visibility: Visibility::Private,
        };
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(object.key_at(now), "1700000000123-relatorio.pdf");
    }

    #[test]
    fn test_visibility_defaults_to_private() {
        assert_eq!(Visibility::default(), Visibility::Private);
        assert_eq!(serde_json::to_value(Visibility::Private).unwrap(), "private");
        assert_eq!(Visibility::from_form_value("PUBLIC"), Visibility::Public);
        assert_eq!(Visibility::from_form_value("public-read"), Visibility::Private);
    }
}
