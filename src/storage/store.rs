//! Durable key-value string storage.

use async_trait::async_trait;
use std::sync::Arc;

/// Key under which the full restaurant collection is stored.
pub const DEFAULT_STORAGE_KEY: &str = "motmap_restaurants";

/// Persistent string store scoped to one application instance.
///
/// Values are opaque strings; the caller owns the serialization format.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replaces the value under `key`. Must be durable once this returns.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl<S: DurableStore + ?Sized> DurableStore for Arc<S> {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key).await
    }
}
