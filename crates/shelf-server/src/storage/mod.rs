//! Storage layer
//!
//! Three interchangeable backends behind the `BookStore` trait: an in-process
//! list, MongoDB fronted by a cache-aside Redis layer, and Redis as the sole
//! system of record.

pub mod cache;
pub mod cached;
pub mod memory;
pub mod mongo;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Book, BookDraft, BookId};

pub use cache::{Cache, MemoryCache, RedisCache};
pub use cached::CachedStore;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use self::redis::RedisStore;

/// Storage error taxonomy. Anything that is not a missing record is a
/// backend failure and surfaces as a 500.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Uniform contract across the backends. Implementations differ only in id
/// generation and storage medium; handlers are agnostic to which is active.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Assigns a fresh id and persists the record.
    async fn create(&self, draft: BookDraft) -> Result<Book, StoreError>;

    async fn get(&self, id: &BookId) -> Result<Book, StoreError>;

    /// Returns every stored book. Insertion order for the in-memory and
    /// MongoDB backends; key-scan order for Redis.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    /// Replaces title/author of an existing record. Updating a nonexistent
    /// id is NotFound on every backend.
    async fn update(&self, id: &BookId, draft: BookDraft) -> Result<Book, StoreError>;

    async fn delete(&self, id: &BookId) -> Result<(), StoreError>;

    /// Unconditionally empties the store.
    async fn clear(&self) -> Result<(), StoreError>;
}
