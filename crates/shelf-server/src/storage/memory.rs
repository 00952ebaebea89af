//! In-memory backend
//!
//! The store is an owned object injected through application state and
//! guarded by a mutex, so concurrent creates cannot observe a stale next
//! id and deletes cannot race list mutation.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{BookStore, StoreError};
use crate::types::{Book, BookDraft, BookId};

pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    books: Vec<Book>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                books: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn create(&self, draft: BookDraft) -> Result<Book, StoreError> {
        let mut inner = self.inner.lock().await;
        let id = BookId::Seq(inner.next_id);
        inner.next_id += 1;
        let book = Book {
            id,
            title: draft.title,
            author: draft.author,
        };
        inner.books.push(book.clone());
        Ok(book)
    }

    async fn get(&self, id: &BookId) -> Result<Book, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .books
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.inner.lock().await.books.clone())
    }

    async fn update(&self, id: &BookId, draft: BookDraft) -> Result<Book, StoreError> {
        let mut inner = self.inner.lock().await;
        let book = inner
            .books
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or(StoreError::NotFound)?;
        book.title = draft.title;
        book.author = draft.author;
        Ok(book.clone())
    }

    async fn delete(&self, id: &BookId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let before = inner.books.len();
        inner.books.retain(|b| &b.id != id);
        if inner.books.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.lock().await.books.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, author: &str) -> BookDraft {
        BookDraft {
            title: title.to_string(),
            author: author.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_unique_ids() {
        let store = MemoryStore::new();
        let a = store.create(draft("Dune", "Herbert")).await.unwrap();
        let b = store.create(draft("Hyperion", "Simmons")).await.unwrap();
        assert_eq!(a.id, BookId::Seq(1));
        assert_eq!(b.id, BookId::Seq(2));
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = MemoryStore::new();
        let created = store.create(draft("Dune", "Herbert")).await.unwrap();
        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get(&BookId::Seq(999)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_id() {
        let store = MemoryStore::new();
        let created = store.create(draft("Dune", "Herbert")).await.unwrap();
        let updated = store
            .update(&created.id, draft("Dune Messiah", "Herbert"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(store.get(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(&BookId::Seq(1), draft("Dune", "Herbert"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = MemoryStore::new();
        let created = store.create(draft("Dune", "Herbert")).await.unwrap();
        store.delete(&created.id).await.unwrap();
        assert!(matches!(
            store.get(&created.id).await.unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete(&BookId::Seq(7)).await.unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[tokio::test]
    async fn deleted_ids_are_never_reissued() {
        let store = MemoryStore::new();
        let a = store.create(draft("Dune", "Herbert")).await.unwrap();
        store.delete(&a.id).await.unwrap();
        let b = store.create(draft("Hyperion", "Simmons")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn list_tracks_creates_and_deletes_in_insertion_order() {
        let store = MemoryStore::new();
        let a = store.create(draft("Dune", "Herbert")).await.unwrap();
        let b = store.create(draft("Hyperion", "Simmons")).await.unwrap();
        let c = store.create(draft("Foundation", "Asimov")).await.unwrap();
        store.delete(&b.id).await.unwrap();

        let books = store.list().await.unwrap();
        assert_eq!(books, vec![a, c]);
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let store = MemoryStore::new();
        store.create(draft("Dune", "Herbert")).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
