//! Redis backend: the key-value store as the sole system of record.
//!
//! Books live at `book:<id>` as serialized JSON; ids come from an atomic
//! INCR of `next_book_id`, so concurrent creates never collide.

use anyhow::Context;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{BookStore, StoreError};
use crate::types::{Book, BookDraft, BookId};

const NEXT_ID_KEY: &str = "next_book_id";

pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url).context("invalid redis url")?;
        let conn = ConnectionManager::new(client)
            .await
            .context("failed to connect to redis")?;
        Ok(Self { conn })
    }

    fn key(id: &BookId) -> String {
        format!("book:{}", id)
    }
}

#[async_trait]
impl BookStore for RedisStore {
    async fn create(&self, draft: BookDraft) -> Result<Book, StoreError> {
        let mut conn = self.conn.clone();
        let id: i64 = conn
            .incr(NEXT_ID_KEY, 1)
            .await
            .context("redis INCR failed")?;
        let book = Book {
            id: BookId::Seq(id),
            title: draft.title,
            author: draft.author,
        };
        let data = serde_json::to_string(&book).context("failed to serialize book")?;
        conn.set::<_, _, ()>(Self::key(&book.id), data)
            .await
            .context("redis SET failed")?;
        Ok(book)
    }

    async fn get(&self, id: &BookId) -> Result<Book, StoreError> {
        let mut conn = self.conn.clone();
        let data: Option<String> = conn
            .get(Self::key(id))
            .await
            .context("redis GET failed")?;
        let data = data.ok_or(StoreError::NotFound)?;
        let book = serde_json::from_str(&data).context("corrupt book entry")?;
        Ok(book)
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let mut conn = self.conn.clone();
        // Key-scan order; callers get no ordering guarantee from this
        // backend.
        let keys: Vec<String> = conn.keys("book:*").await.context("redis KEYS failed")?;
        let mut books = Vec::with_capacity(keys.len());
        for key in keys {
            let data: Option<String> = conn.get(&key).await.context("redis GET failed")?;
            // A key deleted between the scan and the read is skipped.
            if let Some(data) = data {
                books.push(serde_json::from_str(&data).context("corrupt book entry")?);
            }
        }
        Ok(books)
    }

    async fn update(&self, id: &BookId, draft: BookDraft) -> Result<Book, StoreError> {
        let mut conn = self.conn.clone();
        let key = Self::key(id);
        let existing: Option<String> = conn.get(&key).await.context("redis GET failed")?;
        if existing.is_none() {
            return Err(StoreError::NotFound);
        }
        let book = Book {
            id: id.clone(),
            title: draft.title,
            author: draft.author,
        };
        let data = serde_json::to_string(&book).context("failed to serialize book")?;
        conn.set::<_, _, ()>(key, data)
            .await
            .context("redis SET failed")?;
        Ok(book)
    }

    async fn delete(&self, id: &BookId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .del(Self::key(id))
            .await
            .context("redis DEL failed")?;
        if removed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("FLUSHDB")
            .query_async::<_, ()>(&mut conn)
            .await
            .context("redis FLUSHDB failed")?;
        Ok(())
    }
}
