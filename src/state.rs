//! Application state management
//!
//! Holds the three adapters, constructed once in `main` and shared by every
//! handler.

use crate::db::ProductStore;
use crate::documents::UserStore;
use crate::storage::ObjectStore;
use std::sync::Arc;

pub struct AppState {
    /// Relational adapter (products)
    pub products: Box<dyn ProductStore>,

    /// Document adapter (users)
    pub users: Box<dyn UserStore>,

    /// Object-storage adapter (buckets)
    pub objects: Box<dyn ObjectStore>,
}

impl AppState {
    pub fn new(
        products: impl ProductStore + 'static,
        users: impl UserStore + 'static,
        objects: impl ObjectStore + 'static,
    ) -> Self {
        Self {
            products: Box::new(products),
            users: Box::new(users),
            objects: Box::new(objects),
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
