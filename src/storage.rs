//! Object-storage adapter
//!
//! Bucket and object operations against S3 (or an S3-compatible endpoint)
//! using static credentials. Bucket existence is never pre-checked; the
//! service's own error is reported.

use crate::config::StorageConfig;
use crate::error::AppError;
use crate::models::{BucketSummary, NewObject, ObjectSummary, StoredObject, Visibility};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::{ByteStream, DateTime as S3DateTime};
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Operations exposed by the bucket routes
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, AppError>;

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, AppError>;

    /// Store a file under a timestamp-prefixed key
    async fn upload(&self, bucket: &str, object: NewObject) -> Result<StoredObject, AppError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), AppError>;
}

/// S3-backed [`ObjectStore`]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            config.session_token.clone(),
            None,
            "storehub-static",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
            info!("Object storage using custom endpoint {}", endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, AppError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(storage_error)?;

        Ok(output
            .buckets()
            .iter()
            .map(|bucket| BucketSummary {
                name: bucket.name().unwrap_or_default().to_string(),
                creation_date: bucket.creation_date().and_then(to_chrono),
            })
            .collect())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, AppError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(storage_error)?;
            objects.extend(page.contents().iter().map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().unwrap_or_default(),
                last_modified: object.last_modified().and_then(to_chrono),
                etag: object.e_tag().map(str::to_string),
            }));
        }

        debug!("Listed {} objects in bucket {}", objects.len(), bucket);
        Ok(objects)
    }

    async fn upload(&self, bucket: &str, object: NewObject) -> Result<StoredObject, AppError> {
        let key = object.key_at(Utc::now());
        let size = object.bytes.len();

        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .acl(canned_acl(object.visibility))
            .set_content_type(object.content_type.clone())
            .body(ByteStream::from(object.bytes))
            .send()
            .await
            .map_err(storage_error)?;

        debug!("Uploaded {} bytes to {}/{}", size, bucket, key);
        Ok(StoredObject {
            bucket: bucket.to_string(),
            key,
            size,
            content_type: object.content_type,
            etag: output.e_tag().map(str::to_string),
            visibility: object.visibility,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

fn storage_error<E>(err: E) -> AppError
where
    E: std::error::Error + 'static,
{
    AppError::Storage(DisplayErrorContext(&err).to_string())
}

fn canned_acl(visibility: Visibility) -> ObjectCannedAcl {
    match visibility {
        Visibility::Private => ObjectCannedAcl::Private,
        Visibility::Public => ObjectCannedAcl::PublicRead,
    }
}

fn to_chrono(value: &S3DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}
