use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::UPDATE_CACHE_NAMESPACE;
use crate::update::error::StoreError;
use crate::update::store::Store;
use crate::update::types::UpdateCheck;

/// Update-check cache on top of an expiring store
///
/// Keys depend on the product identity only, so every request checking the
/// same product converges on one entry.
#[derive(Clone)]
pub struct UpdateCache {
    store: Arc<dyn Store>,
}

impl UpdateCache {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Cache key for a product
    pub fn key_for(product_id: &str) -> String {
        format!("{}:{}", UPDATE_CACHE_NAMESPACE, product_id)
    }

    /// Get the cached check for a product
    ///
    /// Returns `None` on a miss. A value that no longer decodes is treated
    /// as a miss as well.
    pub fn get(&self, product_id: &str) -> Result<Option<UpdateCheck>, StoreError> {
        let key = Self::key_for(product_id);
        let Some(raw) = self.store.get(&key)? else {
            debug!("Cache miss for {}", key);
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(check) => {
                debug!("Cache hit for {}", key);
                Ok(Some(check))
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                Ok(None)
            }
        }
    }

    pub fn put(
        &self,
        product_id: &str,
        check: &UpdateCheck,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_string(check)?;
        self.store.set(&Self::key_for(product_id), &value, ttl)
    }

    /// Expire the cached check early
    pub fn invalidate(&self, product_id: &str) -> Result<(), StoreError> {
        debug!("Invalidating cached update check for {}", product_id);
        self.store.delete(&Self::key_for(product_id))
    }
}
