//! Cache-aside wrapper around a durable store.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use super::{BookStore, Cache, StoreError};
use crate::types::{Book, BookDraft, BookId};

/// Fixed key holding the serialized full book list.
const LIST_KEY: &str = "books:all";

fn book_key(id: &BookId) -> String {
    format!("book:{}", id)
}

/// Fronts a durable `BookStore` with a key-value cache.
///
/// Reads populate the cache on miss. Writes go to the durable store first,
/// then refresh the per-book entry and drop the list entry; a cache failure
/// after a successful durable write surfaces as a backend error without
/// rolling the durable change back, so the two stores can disagree until
/// the next write. No entry carries an expiration.
pub struct CachedStore {
    durable: Arc<dyn BookStore>,
    cache: Arc<dyn Cache>,
}

impl CachedStore {
    pub fn new(durable: Arc<dyn BookStore>, cache: Arc<dyn Cache>) -> Self {
        Self { durable, cache }
    }
}

#[async_trait]
impl BookStore for CachedStore {
    async fn create(&self, draft: BookDraft) -> Result<Book, StoreError> {
        let book = self.durable.create(draft).await?;
        let data = serde_json::to_vec(&book).context("failed to serialize book")?;
        self.cache.set(&book_key(&book.id), data).await?;
        self.cache.delete(LIST_KEY).await?;
        Ok(book)
    }

    async fn get(&self, id: &BookId) -> Result<Book, StoreError> {
        let key = book_key(id);
        if let Some(data) = self.cache.get(&key).await? {
            let book = serde_json::from_slice(&data).context("corrupt cache entry")?;
            return Ok(book);
        }
        let book = self.durable.get(id).await?;
        let data = serde_json::to_vec(&book).context("failed to serialize book")?;
        self.cache.set(&key, data).await?;
        Ok(book)
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        if let Some(data) = self.cache.get(LIST_KEY).await? {
            let books = serde_json::from_slice(&data).context("corrupt cache entry")?;
            return Ok(books);
        }
        let books = self.durable.list().await?;
        let data = serde_json::to_vec(&books).context("failed to serialize book list")?;
        self.cache.set(LIST_KEY, data).await?;
        Ok(books)
    }

    async fn update(&self, id: &BookId, draft: BookDraft) -> Result<Book, StoreError> {
        let book = self.durable.update(id, draft).await?;
        let data = serde_json::to_vec(&book).context("failed to serialize book")?;
        self.cache.set(&book_key(id), data).await?;
        self.cache.delete(LIST_KEY).await?;
        Ok(book)
    }

    async fn delete(&self, id: &BookId) -> Result<(), StoreError> {
        self.durable.delete(id).await?;
        self.cache.delete(&book_key(id)).await?;
        self.cache.delete(LIST_KEY).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.durable.clear().await?;
        self.cache.flush().await?;
        Ok(())
    }
}
