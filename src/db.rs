//! Relational adapter
//!
//! Product CRUD against a PostgreSQL table through a bounded connection pool.

pub mod queries;

use crate::config::RelationalConfig;
use crate::error::AppError;
use crate::models::{Product, ProductCreated, ProductInput};
use async_trait::async_trait;
use deadpool_postgres::{
    Config, ManagerConfig, Object, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts,
};
use queries::ProductQueries;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_postgres::{NoTls, Row};
use tracing::{debug, info};

/// Operations exposed by the product routes
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Create the schema and the product table if missing
    async fn init_schema(&self) -> Result<(), AppError>;

    async fn list(&self) -> Result<Vec<Product>, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Product>, AppError>;

    async fn create(&self, input: &ProductInput) -> Result<ProductCreated, AppError>;

    /// `None` when no row has the given id
    async fn update(&self, id: i64, input: &ProductInput) -> Result<Option<Product>, AppError>;

    /// Number of rows removed
    async fn delete(&self, id: i64) -> Result<u64, AppError>;
}

/// PostgreSQL-backed [`ProductStore`]
pub struct PgProductStore {
    pool: Pool,
    /// Caps checked-out connections plus waiters
    gate: Arc<Semaphore>,
    capacity: usize,
    schema: String,
    queries: ProductQueries,
}

impl PgProductStore {
    pub fn new(config: &RelationalConfig) -> Result<Self, AppError> {
        let pool = create_pool(config)?;
        let permits = config.pool.max_size + config.pool.queue_limit;

        Ok(Self {
            pool,
            gate: Arc::new(Semaphore::new(permits)),
            capacity: permits,
            schema: config.schema.clone(),
            queries: ProductQueries::for_schema(&config.schema),
        })
    }

    /// Check that the server is reachable
    pub async fn ping(&self) -> Result<(), AppError> {
        let (_permit, client) = self.client().await?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    async fn client(&self) -> Result<(OwnedSemaphorePermit, Object), AppError> {
        let permit = self.gate.clone().try_acquire_owned().map_err(|_| {
            AppError::Saturated(format!(
                "{} requests already holding or waiting for a connection",
                self.capacity
            ))
        })?;
        let client = self.pool.get().await?;
        Ok((permit, client))
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn init_schema(&self) -> Result<(), AppError> {
        let (_permit, client) = self.client().await?;
        client.execute(&self.queries.create_schema, &[]).await?;
        client.execute(&self.queries.create_table, &[]).await?;
        info!("Schema '{}' and product table ready", self.schema);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>, AppError> {
        let (_permit, client) = self.client().await?;
        let rows = client.query(&self.queries.list, &[]).await?;
        debug!("Listed {} products", rows.len());
        Ok(rows.iter().map(product_from_row).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, AppError> {
        let (_permit, client) = self.client().await?;
        let row = client.query_opt(&self.queries.get, &[&id]).await?;
        Ok(row.as_ref().map(product_from_row))
    }

    async fn create(&self, input: &ProductInput) -> Result<ProductCreated, AppError> {
        let (_permit, client) = self.client().await?;
        let (name, description, price) = columns(input);
        let row = client
            .query_one(&self.queries.insert, &[&name, &description, &price])
            .await?;

        let product = product_from_row(&row);
        debug!("Inserted product {}", product.id);
        Ok(ProductCreated {
            insert_id: product.id,
            affected_rows: 1,
            product,
        })
    }

    async fn update(&self, id: i64, input: &ProductInput) -> Result<Option<Product>, AppError> {
        let (_permit, client) = self.client().await?;
        let (name, description, price) = columns(input);
        let row = client
            .query_opt(&self.queries.update, &[&name, &description, &price, &id])
            .await?;
        Ok(row.as_ref().map(product_from_row))
    }

    async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let (_permit, client) = self.client().await?;
        let affected = client.execute(&self.queries.delete, &[&id]).await?;
        debug!("Deleted {} product rows for id {}", affected, id);
        Ok(affected)
    }
}

/// Body values bound as text, in column order
fn columns(input: &ProductInput) -> (Option<String>, Option<String>, Option<String>) {
    (input.name_text(), input.description_text(), input.price_text())
}

fn product_from_row(row: &Row) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
    }
}

/// Create a connection pool with the configured bounds
fn create_pool(config: &RelationalConfig) -> Result<Pool, AppError> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    let timeout = Some(config.pool.acquire_timeout);
    let mut pool_config = PoolConfig::new(config.pool.max_size);
    pool_config.timeouts = Timeouts {
        wait: timeout,
        create: timeout,
        recycle: timeout,
    };
    cfg.pool = Some(pool_config);

    if config.ssl {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

        cfg.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| AppError::Config(format!("Failed to create TLS pool: {}", e)))
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| AppError::Config(format!("Failed to create pool: {}", e)))
    }
}
