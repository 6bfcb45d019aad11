use tokio::sync::RwLock;
use validator::{Validate, ValidationErrors};

use super::{Book, BookId, BookKey, BookUpdate, NewBook};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No book found with {0}")]
    NotFound(BookKey),
    #[error("A book with id {0} already exists")]
    DuplicateId(BookId),
    #[error("No id left after {0}")]
    IdsExhausted(BookId),
    #[error("Invalid book: {0}")]
    Validation(#[from] ValidationErrors),
}

/// In-memory book records kept in insertion order.
///
/// Every mutation runs under a single write guard, so id assignment and
/// scan-then-mutate sequences are atomic with respect to each other.
#[derive(Debug, Default)]
pub struct BookStore {
    books: RwLock<Vec<Book>>,
}

impl BookStore {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    pub fn seeded() -> Self {
        Self::new(super::seed())
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }

    pub async fn list_all(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    pub async fn find_by_id(&self, id: BookId) -> Result<Book, StoreError> {
        self.find(&BookKey::Id(id)).await
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Book, StoreError> {
        self.find(&BookKey::Title(title.to_string())).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find(&self, key: &BookKey) -> Result<Book, StoreError> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.matches_key(key))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    /// Returns every book matching `predicate`, in insertion order.
    pub async fn filter_by<P>(&self, predicate: P) -> Vec<Book>
    where
        P: Fn(&Book) -> bool,
    {
        self.books
            .read()
            .await
            .iter()
            .filter(|book| predicate(book))
            .cloned()
            .collect()
    }

    /// Validates and appends a book.
    ///
    /// A missing id becomes one past the highest id in the store, or `1` when empty.
    /// Fails with [`StoreError::IdsExhausted`] when that would pass [`BookId::MAX`].
    #[tracing::instrument(skip_all, fields(title = %new_book.title))]
    pub async fn create(&self, new_book: NewBook) -> Result<Book, StoreError> {
        new_book.validate()?;

        let mut books = self.books.write().await;

        let id = match new_book.id {
            Some(id) if books.iter().any(|book| book.id == id) => {
                tracing::warn!(id, "Duplicate id");

                return Err(StoreError::DuplicateId(id));
            }
            Some(id) => id,
            None => match books.iter().map(|book| book.id).max() {
                None => 1,
                Some(max) => max.checked_add(1).ok_or_else(|| {
                    tracing::warn!(max, "Ids exhausted");

                    StoreError::IdsExhausted(max)
                })?,
            },
        };

        let book = Book::from_new_book(id, new_book);
        books.push(book.clone());

        tracing::debug!(id, "Created");

        Ok(book)
    }

    /// Validates and replaces the first book matching the update's key.
    ///
    /// The stored id is kept, the other fields are replaced as a whole.
    #[tracing::instrument(skip_all, fields(key = %update.key()))]
    pub async fn update(&self, update: BookUpdate) -> Result<Book, StoreError> {
        update.validate()?;

        let key = update.key();
        let mut books = self.books.write().await;

        let Some(slot) = books.iter_mut().find(|book| book.matches_key(&key)) else {
            tracing::debug!("Not found");

            return Err(StoreError::NotFound(key));
        };

        *slot = Book::from_update(slot.id, update);

        tracing::debug!(id = slot.id, "Updated");

        Ok(slot.clone())
    }

    /// Removes the first book matching `key` and returns it.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, key: &BookKey) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;

        let Some(index) = books.iter().position(|book| book.matches_key(key)) else {
            tracing::debug!("Not found");

            return Err(StoreError::NotFound(key.clone()));
        };

        let book = books.remove(index);

        tracing::debug!(id = book.id, "Deleted");

        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::book::BookFilter;

    use super::*;

    fn new_book(title: &str) -> NewBook {
        NewBook {
            id: None,
            title: title.to_string(),
            author: "Author".to_string(),
            category: Some("science".to_string()),
            description: "Description".to_string(),
            rating: 4,
            published_date: 2010,
        }
    }

    fn update_of(book: &Book) -> BookUpdate {
        BookUpdate {
            id: Some(book.id),
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            description: book.description.clone(),
            rating: i64::from(book.rating),
            published_date: i64::from(book.published_date),
        }
    }

    #[tokio::test]
    async fn create_assigns_one_on_empty_store() {
        let store = BookStore::default();

        let book = store.create(new_book("First")).await.unwrap();

        assert_eq!(book.id, 1);
        assert_eq!(store.list_all().await, vec![book]);
    }

    #[tokio::test]
    async fn create_assigns_max_id_plus_one() {
        let store = BookStore::seeded();

        let book = store.create(new_book("Seventh")).await.unwrap();
        assert_eq!(book.id, 7);

        let explicit = NewBook {
            id: Some(42),
            ..new_book("Explicit")
        };
        store.create(explicit).await.unwrap();

        let lower = NewBook {
            id: Some(10),
            ..new_book("Lower")
        };
        store.create(lower).await.unwrap();

        let next = store.create(new_book("Next")).await.unwrap();
        assert_eq!(next.id, 43);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let store = BookStore::seeded();

        let duplicate = NewBook {
            id: Some(3),
            ..new_book("Duplicate")
        };
        let err = store.create(duplicate).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateId(3)));
        assert_eq!(store.len().await, 6);
    }

    #[tokio::test]
    async fn create_after_max_id_is_exhausted() {
        let store = BookStore::default();

        let last = NewBook {
            id: Some(BookId::MAX),
            ..new_book("Last")
        };
        store.create(last).await.unwrap();

        let err = store.create(new_book("Overflow")).await.unwrap_err();

        assert!(matches!(err, StoreError::IdsExhausted(BookId::MAX)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn create_validates_before_touching_the_store() {
        let store = BookStore::default();

        let invalid = NewBook {
            rating: 6,
            ..new_book("Invalid")
        };
        let err = store.create(invalid).await.unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn find_by_title_ignores_case() {
        let store = BookStore::seeded();

        let book = store.find_by_title("master ENDPOINTS").await.unwrap();
        assert_eq!(book.id, 3);

        let err = store.find_by_title("Missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(BookKey::Title(_))));
    }

    #[tokio::test]
    async fn find_by_id_reports_not_found() {
        let store = BookStore::seeded();

        assert_eq!(store.find_by_id(5).await.unwrap().title, "HP2");
        assert!(matches!(
            store.find_by_id(99).await,
            Err(StoreError::NotFound(BookKey::Id(99)))
        ));
    }

    #[tokio::test]
    async fn filter_preserves_insertion_order() {
        let store = BookStore::seeded();

        let filter = BookFilter {
            rating: Some(5),
            ..Default::default()
        };
        let ids: Vec<_> = store
            .filter_by(|book| filter.matches(book))
            .await
            .into_iter()
            .map(|book| book.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let filter = BookFilter {
            category: Some("FANTASY".to_string()),
            ..Default::default()
        };
        let ids: Vec<_> = store
            .filter_by(|book| filter.matches(book))
            .await
            .into_iter()
            .map(|book| book.id)
            .collect();
        assert_eq!(ids, vec![4, 5, 6]);

        assert!(store.filter_by(|book| book.rating == 4).await.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_whole_record() {
        let store = BookStore::seeded();

        let mut update = update_of(&store.find_by_id(4).await.unwrap());
        update.title = "HP1 Revised".to_string();
        update.category = None;
        update.rating = 4;

        let updated = store.update(update).await.unwrap();

        assert_eq!(updated.id, 4);
        assert_eq!(updated.category, None);
        assert_eq!(store.find_by_id(4).await.unwrap(), updated);
        assert_eq!(store.len().await, 6);
    }

    #[tokio::test]
    async fn update_by_title_keeps_stored_id() {
        let store = BookStore::seeded();

        let mut update = update_of(&store.find_by_id(5).await.unwrap());
        update.id = None;
        update.title = "hp2".to_string();
        update.description = "Now lowercase".to_string();

        let updated = store.update(update).await.unwrap();

        assert_eq!(updated.id, 5);
        assert_eq!(updated.title, "hp2");
    }

    #[tokio::test]
    async fn update_of_missing_book_leaves_store_unchanged() {
        let store = BookStore::seeded();
        let before = store.list_all().await;

        let mut update = update_of(&before[0]);
        update.id = Some(100);

        let err = store.update(update).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound(BookKey::Id(100))));
        assert_eq!(store.list_all().await, before);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() {
        let store = BookStore::seeded();

        let deleted = store.delete(&BookKey::Id(2)).await.unwrap();
        assert_eq!(deleted.id, 2);
        assert_eq!(store.len().await, 5);

        let err = store.delete(&BookKey::Id(2)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(BookKey::Id(2))));
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn delete_by_title_stops_at_first_match() {
        let mut books = crate::book::seed();
        let mut twin = books[3].clone();
        twin.id = 7;
        books.push(twin);
        let store = BookStore::new(books);

        let deleted = store
            .delete(&BookKey::Title("hp1".to_string()))
            .await
            .unwrap();

        assert_eq!(deleted.id, 4);
        assert_eq!(store.find_by_title("HP1").await.unwrap().id, 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_unique_ids() {
        let store = Arc::new(BookStore::default());

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_book(&format!("Book {i}"))).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=64).collect::<Vec<_>>());
    }
}
