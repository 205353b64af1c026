//! Book storage behind an async trait, with the in-memory implementation
//! the service runs on.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Book, BookFields, BookFilter, BookSummary};

/// Rejected book fields
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("readPage ({read_page}) must not exceed pageCount ({page_count})")]
    ReadPageExceedsPageCount { read_page: u32, page_count: u32 },
}

impl ValidationError {
    /// Check the create/update constraints; the name is checked first
    pub fn check(fields: &BookFields) -> Result<(), ValidationError> {
        if fields.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if fields.read_page > fields.page_count {
            return Err(ValidationError::ReadPageExceedsPageCount {
                read_page: fields.read_page,
                page_count: fields.page_count,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("book {0} not found")]
    NotFound(String),
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Validate and store a new book, returning its generated id
    async fn create(&self, fields: BookFields) -> Result<String, BookError>;

    /// Summaries of the books matching `filter`, in insertion order
    async fn list(&self, filter: &BookFilter) -> Vec<BookSummary>;

    async fn get_by_id(&self, id: &str) -> Result<Book, BookError>;

    /// Validate and replace every field except `id` and `inserted_at`
    async fn update(&self, id: &str, fields: BookFields) -> Result<Book, BookError>;

    async fn delete(&self, id: &str) -> Result<(), BookError>;
}

/// Ordered list of books held in process memory
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_id() -> String {
        Uuid::now_v7().simple().to_string()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create(&self, fields: BookFields) -> Result<String, BookError> {
        ValidationError::check(&fields)?;

        let now = OffsetDateTime::now_utc();
        let id = Self::generate_id();
        let book = Book {
            id: id.clone(),
            finished: fields.is_finished(),
            name: fields.name,
            year: fields.year,
            author: fields.author,
            summary: fields.summary,
            publisher: fields.publisher,
            page_count: fields.page_count,
            read_page: fields.read_page,
            reading: fields.reading,
            inserted_at: now,
            updated_at: now,
        };

        self.books.write().await.push(book);
        tracing::debug!(book_id = %id, "book created");
        Ok(id)
    }

    async fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.books
            .read()
            .await
            .iter()
            .filter(|book| filter.matches(book))
            .map(Book::to_summary)
            .collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Book, BookError> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or_else(|| BookError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, fields: BookFields) -> Result<Book, BookError> {
        ValidationError::check(&fields)?;

        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        book.apply(fields, OffsetDateTime::now_utc());
        tracing::debug!(book_id = %id, "book updated");
        Ok(book.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), BookError> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        books.remove(index);
        tracing::debug!(book_id = %id, "book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, page_count: u32, read_page: u32) -> BookFields {
        BookFields {
            name: name.to_string(),
            year: 2010,
            author: "John Doe".to_string(),
            summary: "Lorem ipsum dolor sit amet".to_string(),
            publisher: "Dicoding Indonesia".to_string(),
            page_count,
            read_page,
            reading: false,
        }
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let repo = InMemoryBookRepository::new();
        let err = repo.create(fields("", 10, 0)).await.unwrap_err();
        assert_eq!(err, BookError::Validation(ValidationError::EmptyName));
        assert!(repo.list(&BookFilter::default()).await.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_read_page_past_page_count() {
        let repo = InMemoryBookRepository::new();
        let err = repo.create(fields("Buku A", 10, 11)).await.unwrap_err();
        assert_eq!(
            err,
            BookError::Validation(ValidationError::ReadPageExceedsPageCount {
                read_page: 11,
                page_count: 10,
            })
        );
    }

    #[tokio::test]
    async fn empty_name_is_reported_before_page_counts() {
        let repo = InMemoryBookRepository::new();
        let err = repo.create(fields("", 10, 11)).await.unwrap_err();
        assert_eq!(err, BookError::Validation(ValidationError::EmptyName));
    }

    #[tokio::test]
    async fn create_derives_finished_and_timestamps() {
        let repo = InMemoryBookRepository::new();

        let done = repo.create(fields("Selesai", 50, 50)).await.unwrap();
        let partial = repo.create(fields("Sebagian", 50, 10)).await.unwrap();
        assert_ne!(done, partial);

        let done = repo.get_by_id(&done).await.unwrap();
        assert!(done.finished);
        assert_eq!(done.inserted_at, done.updated_at);

        let partial = repo.get_by_id(&partial).await.unwrap();
        assert!(!partial.finished);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let repo = InMemoryBookRepository::new();
        let first = repo.create(fields("Pertama", 1, 0)).await.unwrap();
        let second = repo.create(fields("Kedua", 1, 0)).await.unwrap();

        let ids: Vec<_> = repo
            .list(&BookFilter::default())
            .await
            .into_iter()
            .map(|summary| summary.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_identity() {
        let repo = InMemoryBookRepository::new();
        let id = repo.create(fields("Lama", 100, 10)).await.unwrap();
        let before = repo.get_by_id(&id).await.unwrap();

        let mut replacement = fields("Baru", 100, 100);
        replacement.reading = true;
        let after = repo.update(&id, replacement).await.unwrap();

        assert_eq!(after.id, before.id);
        assert_eq!(after.inserted_at, before.inserted_at);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.name, "Baru");
        assert!(after.finished);
        assert!(after.reading);
        assert_eq!(repo.get_by_id(&id).await.unwrap(), after);
    }

    #[tokio::test]
    async fn update_validates_before_lookup() {
        let repo = InMemoryBookRepository::new();

        let invalid = repo.update("missing", fields("", 1, 0)).await.unwrap_err();
        assert_eq!(invalid, BookError::Validation(ValidationError::EmptyName));

        let missing = repo.update("missing", fields("Ada", 1, 0)).await.unwrap_err();
        assert_eq!(missing, BookError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn delete_removes_book() {
        let repo = InMemoryBookRepository::new();
        let id = repo.create(fields("Hapus", 1, 0)).await.unwrap();

        repo.delete(&id).await.unwrap();

        assert!(repo.list(&BookFilter::default()).await.is_empty());
        assert_eq!(
            repo.get_by_id(&id).await.unwrap_err(),
            BookError::NotFound(id.clone())
        );
        assert_eq!(
            repo.delete(&id).await.unwrap_err(),
            BookError::NotFound(id)
        );
    }
}
