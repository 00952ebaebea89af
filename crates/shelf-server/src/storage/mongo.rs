//! MongoDB backend
//!
//! System of record for the document-store variant; the cache-aside layer
//! wraps it in front. Ids are generated ObjectIds.

use anyhow::Context;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::doc;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use super::{BookStore, StoreError};
use crate::types::{Book, BookDraft, BookId};

/// Wire shape of a stored book; `_id` is the generated document id.
#[derive(Debug, Serialize, Deserialize)]
struct BookDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    author: String,
}

impl From<BookDocument> for Book {
    fn from(document: BookDocument) -> Self {
        Book {
            id: BookId::Oid(document.id.to_hex()),
            title: document.title,
            author: document.author,
        }
    }
}

pub struct MongoStore {
    books: Collection<BookDocument>,
}

impl MongoStore {
    pub async fn connect(url: &str, database: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(url)
            .await
            .context("failed to connect to mongodb")?;
        let books = client.database(database).collection("books");
        Ok(Self { books })
    }

    /// This backend only ever issues ObjectIds, so a sequential id (or a
    /// malformed hex string) can never match a stored document.
    fn object_id(id: &BookId) -> Result<ObjectId, StoreError> {
        match id {
            BookId::Oid(hex) => ObjectId::parse_str(hex).map_err(|_| StoreError::NotFound),
            BookId::Seq(_) => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl BookStore for MongoStore {
    async fn create(&self, draft: BookDraft) -> Result<Book, StoreError> {
        let document = BookDocument {
            id: ObjectId::new(),
            title: draft.title,
            author: draft.author,
        };
        self.books
            .insert_one(&document, None)
            .await
            .context("mongodb insert failed")?;
        Ok(document.into())
    }

    async fn get(&self, id: &BookId) -> Result<Book, StoreError> {
        let oid = Self::object_id(id)?;
        let document = self
            .books
            .find_one(doc! { "_id": oid }, None)
            .await
            .context("mongodb query failed")?;
        document.map(Book::from).ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let cursor = self
            .books
            .find(doc! {}, None)
            .await
            .context("mongodb query failed")?;
        let documents: Vec<BookDocument> =
            cursor.try_collect().await.context("mongodb cursor failed")?;
        Ok(documents.into_iter().map(Book::from).collect())
    }

    async fn update(&self, id: &BookId, draft: BookDraft) -> Result<Book, StoreError> {
        let oid = Self::object_id(id)?;
        let replacement = BookDocument {
            id: oid,
            title: draft.title,
            author: draft.author,
        };
        let result = self
            .books
            .replace_one(doc! { "_id": oid }, &replacement, None)
            .await
            .context("mongodb update failed")?;
        // No upsert: replacing a missing document is NotFound, matching
        // the other backends.
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(replacement.into())
    }

    async fn delete(&self, id: &BookId) -> Result<(), StoreError> {
        let oid = Self::object_id(id)?;
        let result = self
            .books
            .delete_one(doc! { "_id": oid }, None)
            .await
            .context("mongodb delete failed")?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.books
            .delete_many(doc! {}, None)
            .await
            .context("mongodb clear failed")?;
        Ok(())
    }
}
