//! In-memory adapters for router tests

use crate::db::ProductStore;
use crate::documents::UserStore;
use crate::error::AppError;
use crate::models::{
    BucketSummary, NewObject, ObjectSummary, Product, ProductCreated, ProductInput, StoredObject,
    User, UserInput,
};
use crate::state::{AppState, SharedState};
use crate::storage::ObjectStore;
use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub fn test_state(
    products: MemoryProducts,
    users: MemoryUsers,
    objects: MemoryObjects,
) -> SharedState {
    Arc::new(AppState::new(products, users, objects))
}

#[derive(Default)]
pub struct MemoryProducts {
    rows: Mutex<BTreeMap<i64, Product>>,
    next_id: Mutex<i64>,
    initialized: Arc<AtomicBool>,
}

impl MemoryProducts {
    pub fn initialized_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.initialized)
    }

    /// Mirrors the NOT NULL and NUMERIC(10,2) constraints of the real table
    fn validate(input: &ProductInput) -> Result<(String, String, String), AppError> {
        let column = |value: Option<String>, name: &str| {
            value.ok_or_else(|| {
                AppError::Internal(format!(
                    "null value in column \"{}\" violates not-null constraint",
                    name
                ))
            })
        };
        let name = column(input.name_text(), "name")?;
        let description = column(input.description_text(), "description")?;
        let raw_price = column(input.price_text(), "price")?;
        let price: f64 = raw_price.parse().map_err(|_| {
            AppError::Internal(format!("invalid input syntax for type numeric: \"{}\"", raw_price))
        })?;
        Ok((name, description, format!("{:.2}", price)))
    }
}

#[async_trait]
impl ProductStore for MemoryProducts {
    async fn init_schema(&self) -> Result<(), AppError> {
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, AppError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, input: &ProductInput) -> Result<ProductCreated, AppError> {
        let (name, description, price) = Self::validate(input)?;
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let product = Product {
            id,
            name,
            description,
            price,
        };
        self.rows.lock().unwrap().insert(id, product.clone());
        Ok(ProductCreated {
            insert_id: id,
            affected_rows: 1,
            product,
        })
    }

    async fn update(&self, id: i64, input: &ProductInput) -> Result<Option<Product>, AppError> {
        let (name, description, price) = Self::validate(input)?;
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(&id).map(|product| {
            product.name = name;
            product.description = description;
            product.price = price;
            product.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<u64, AppError> {
        Ok(self.rows.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    docs: Mutex<BTreeMap<String, User>>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn health_check(&self) -> Result<Option<serde_json::Value>, AppError> {
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .values()
            .next()
            .map(|user| serde_json::to_value(user).unwrap_or_default()))
    }

    async fn create(&self, input: &UserInput) -> Result<User, AppError> {
        let user = User {
            id: ObjectId::new().to_hex(),
            name: input.name.clone(),
            email: input.email.clone(),
        };
        self.docs
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.docs.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.docs.lock().unwrap().get(id).cloned())
    }

    async fn update(&self, id: &str, input: &UserInput) -> Result<Option<User>, AppError> {
        let mut docs = self.docs.lock().unwrap();
        Ok(docs.get_mut(id).map(|user| {
            if let Some(name) = &input.name {
                user.name = Some(name.clone());
            }
            if let Some(email) = &input.email {
                user.email = Some(email.clone());
            }
            user.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<u64, AppError> {
        Ok(self.docs.lock().unwrap().remove(id).map_or(0, |_| 1))
    }
}

#[derive(Default)]
pub struct MemoryObjects {
    buckets: Mutex<BTreeMap<String, Vec<StoredObject>>>,
}

impl MemoryObjects {
    pub fn with_buckets(names: &[&str]) -> Self {
        let buckets = names
            .iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();
        Self {
            buckets: Mutex::new(buckets),
        }
    }

    fn no_such_bucket(bucket: &str) -> AppError {
        AppError::Storage(format!("NoSuchBucket: The specified bucket does not exist: {}", bucket))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, AppError> {
        Ok(self
            .buckets
            .lock()
            .unwrap()
            .keys()
            .map(|name| BucketSummary {
                name: name.clone(),
                creation_date: None,
            })
            .collect())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, AppError> {
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets.get(bucket).ok_or_else(|| Self::no_such_bucket(bucket))?;
        Ok(objects
            .iter()
            .map(|object| ObjectSummary {
                key: object.key.clone(),
                size: object.size as i64,
                last_modified: Some(Utc::now()),
                etag: object.etag.clone(),
            })
            .collect())
    }

    async fn upload(&self, bucket: &str, object: NewObject) -> Result<StoredObject, AppError> {
        let mut buckets = self.buckets.lock().unwrap();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| Self::no_such_bucket(bucket))?;
        let stored = StoredObject {
            bucket: bucket.to_string(),
            key: object.key_at(Utc::now()),
            size: object.bytes.len(),
            content_type: object.content_type,
            etag: None,
            visibility: object.visibility,
        };
        objects.push(stored.clone());
        Ok(stored)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), AppError> {
        let mut buckets = self.buckets.lock().unwrap();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| Self::no_such_bucket(bucket))?;
        objects.retain(|object| object.key != key);
        Ok(())
    }
}
