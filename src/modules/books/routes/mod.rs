//! HTTP handlers for `/books`.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::{ApiResponse, AppError};
use serde::{Deserialize, Serialize};

use super::models::{Book, BookFields, BookFilter, BookSummary};
use super::repository::{BookError, BookRepository, ValidationError};

pub type SharedRepository = Arc<dyn BookRepository>;

/// Router for the books module, relative to its mount point
pub fn router(repository: SharedRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repository)
}

/// Localized messages per operation
mod messages {
    pub const CREATED: &str = "Buku berhasil ditambahkan";
    pub const CREATE_FAILED: &str = "Buku gagal ditambahkan";
    pub const CREATE_NO_NAME: &str = "Gagal menambahkan buku. Mohon isi nama buku";
    pub const CREATE_READ_PAGE: &str =
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount";

    pub const NOT_FOUND: &str = "Buku tidak ditemukan";

    pub const UPDATED: &str = "Buku berhasil diperbarui";
    pub const UPDATE_NO_NAME: &str = "Gagal memperbarui buku. Mohon isi nama buku";
    pub const UPDATE_READ_PAGE: &str =
        "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount";
    pub const UPDATE_NOT_FOUND: &str = "Gagal memperbarui buku. Id tidak ditemukan";

    pub const DELETED: &str = "Buku berhasil dihapus";
    pub const DELETE_NOT_FOUND: &str = "Buku gagal dihapus. Id tidak ditemukan";

    pub const MALFORMED: &str = "Format data buku tidak valid";
}

/// Wording for the failures of a write operation
struct Wording {
    prefix: &'static str,
    no_name: &'static str,
    read_page: &'static str,
    /// `None` when the operation cannot miss, so a miss is a server fault
    not_found: Option<&'static str>,
}

const CREATE: Wording = Wording {
    prefix: "Gagal menambahkan buku.",
    no_name: messages::CREATE_NO_NAME,
    read_page: messages::CREATE_READ_PAGE,
    not_found: None,
};

const UPDATE: Wording = Wording {
    prefix: "Gagal memperbarui buku.",
    no_name: messages::UPDATE_NO_NAME,
    read_page: messages::UPDATE_READ_PAGE,
    not_found: Some(messages::UPDATE_NOT_FOUND),
};

impl Wording {
    fn error(&self, err: BookError) -> AppError {
        match err {
            BookError::Validation(ValidationError::EmptyName) => AppError::validation(self.no_name),
            BookError::Validation(ValidationError::ReadPageExceedsPageCount { .. }) => {
                AppError::validation(self.read_page)
            }
            BookError::NotFound(_) => match self.not_found {
                Some(message) => AppError::not_found(message),
                None => AppError::internal(messages::CREATE_FAILED, err),
            },
        }
    }

    fn rejected(&self, rejection: JsonRejection) -> AppError {
        tracing::debug!(error = %rejection.body_text(), "rejected book payload");
        AppError::bad_request(format!("{} {}", self.prefix, messages::MALFORMED))
    }
}

/// Map a lookup miss to 404; reads and deletes have no other failure mode
fn missing(err: BookError, message: &'static str) -> AppError {
    match err {
        BookError::NotFound(_) => AppError::not_found(message),
        other => AppError::internal(message, other),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBook {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}

/// Raw `GET /books` query
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

impl ListQuery {
    /// Only the first given criterion applies, checked as `name`, `reading`,
    /// then `finished`
    pub fn into_filter(self) -> BookFilter {
        if let Some(name) = self.name {
            BookFilter::NameContains(name)
        } else if let Some(reading) = self.reading {
            BookFilter::Reading(parse_flag(&reading))
        } else if let Some(finished) = self.finished {
            BookFilter::Finished(parse_flag(&finished))
        } else {
            BookFilter::All
        }
    }
}

/// `1`/`true` or `0`/`false`; an empty value reads as false. `None` for
/// anything else
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "true" => Some(true),
        "0" | "false" | "" => Some(false),
        _ => None,
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn create_book(
    State(repository): State<SharedRepository>,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<ApiResponse<CreatedBook>, AppError> {
    let Json(fields) = payload.map_err(|rejection| CREATE.rejected(rejection))?;

    let book_id = repository
        .create(fields)
        .await
        .map_err(|err| CREATE.error(err))?;

    tracing::info!(book_id = %book_id, "book added");
    Ok(ApiResponse::success(CreatedBook { book_id })
        .with_message(messages::CREATED)
        .with_code(StatusCode::CREATED))
}

async fn list_books(
    State(repository): State<SharedRepository>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ApiResponse<BookList>, AppError> {
    let Query(query) = query?;
    let filter = query.into_filter();
    tracing::debug!(filter = ?filter, "listing books");

    let books = repository.list(&filter).await;
    Ok(ApiResponse::success(BookList { books }))
}

async fn get_book(
    State(repository): State<SharedRepository>,
    Path(id): Path<String>,
) -> Result<ApiResponse<BookDetail>, AppError> {
    tracing::debug!(book_id = %id, "fetching book");
    let book = repository
        .get_by_id(&id)
        .await
        .map_err(|err| missing(err, messages::NOT_FOUND))?;

    Ok(ApiResponse::success(BookDetail { book }))
}

async fn update_book(
    State(repository): State<SharedRepository>,
    Path(book_id): Path<String>,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let Json(fields) = payload.map_err(|rejection| UPDATE.rejected(rejection))?;

    repository
        .update(&book_id, fields)
        .await
        .map_err(|err| UPDATE.error(err))?;

    tracing::info!(book_id = %book_id, "book updated");
    Ok(ApiResponse::message(messages::UPDATED))
}

async fn delete_book(
    State(repository): State<SharedRepository>,
    Path(id): Path<String>,
) -> Result<ApiResponse, AppError> {
    repository
        .delete(&id)
        .await
        .map_err(|err| missing(err, messages::DELETE_NOT_FOUND))?;

    tracing::info!(book_id = %id, "book deleted");
    Ok(ApiResponse::message(messages::DELETED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_numeric_and_boolean_forms() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("yes"), None);
    }

    #[test]
    fn name_takes_precedence_over_flags() {
        let query = ListQuery {
            name: Some("dicoding".to_string()),
            reading: Some("1".to_string()),
            finished: Some("0".to_string()),
        };
        assert_eq!(
            query.into_filter(),
            BookFilter::NameContains("dicoding".to_string())
        );
    }

    #[test]
    fn reading_takes_precedence_over_finished() {
        let query = ListQuery {
            reading: Some("0".to_string()),
            finished: Some("1".to_string()),
            ..Default::default()
        };
        assert_eq!(query.into_filter(), BookFilter::Reading(Some(false)));
    }

    #[test]
    fn unknown_flag_is_kept_as_unmatched() {
        let query = ListQuery {
            finished: Some("maybe".to_string()),
            ..Default::default()
        };
        assert_eq!(query.into_filter(), BookFilter::Finished(None));
        assert_eq!(ListQuery::default().into_filter(), BookFilter::All);
    }

    #[test]
    fn update_errors_use_update_wording() {
        let err = UPDATE.error(BookError::NotFound("x".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), format!("not found: {}", messages::UPDATE_NOT_FOUND));

        let err = UPDATE.error(BookError::Validation(ValidationError::EmptyName));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn create_cannot_miss() {
        let err = CREATE.error(BookError::NotFound("x".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn lookups_map_misses_to_not_found() {
        let err = missing(BookError::NotFound("x".to_string()), messages::NOT_FOUND);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
