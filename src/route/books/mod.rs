use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    book::{store::StoreError, Book, BookFilter, BookId, BookKey},
    error::{field_violations, ErrorVerbosity, FieldViolation, ResourceError, ResourceErrorProvider},
};

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct BookResponse {
    pub book: Book,
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CreatedBookResponse {
    pub book: Book,
}

impl IntoResponse for CreatedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

impl IntoResponse for BooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct BookIdPath {
    /// Id of the book.
    #[validate(range(min = 1, message = "Must be greater than 0"))]
    pub id: BookId,
}

#[derive(Debug, Deserialize, JsonSchema, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct BookTitlePath {
    /// Title of the book, compared case-insensitively.
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum BookErrorType {
    NotFound {
        #[serde(skip)]
        key: BookKey,
    },
    DuplicateId {
        #[serde(skip)]
        id: BookId,
    },
    IdsExhausted {
        #[serde(skip)]
        max: BookId,
    },
    Invalid {
        #[serde(skip)]
        violations: Vec<FieldViolation>,
    },
}

#[derive(Debug, Serialize)]
pub struct BookErrorContext {
    pub reason: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl ResourceErrorProvider for BookErrorType {
    type Context = BookErrorContext;

    fn headers(&self) -> Option<HeaderMap> {
        None
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BookErrorType::NotFound { .. } => StatusCode::NOT_FOUND,
            BookErrorType::DuplicateId { .. } | BookErrorType::IdsExhausted { .. } => {
                StatusCode::CONFLICT
            }
            BookErrorType::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            BookErrorType::NotFound { .. } => "Book not found",
            BookErrorType::DuplicateId { .. } => "Book id already in use",
            BookErrorType::IdsExhausted { .. } => "No book id left to assign",
            BookErrorType::Invalid { .. } => "Book is invalid",
        }
    }

    fn context(&self) -> Self::Context {
        match self {
            BookErrorType::NotFound { key } => BookErrorContext {
                reason: format!("Book with {key} not found"),
                violations: Vec::new(),
            },
            BookErrorType::DuplicateId { id } => BookErrorContext {
                reason: format!("Id {id} is already used by another book"),
                violations: Vec::new(),
            },
            BookErrorType::IdsExhausted { max } => BookErrorContext {
                reason: format!("Highest id {max} has no successor, pass an unused id explicitly"),
                violations: Vec::new(),
            },
            BookErrorType::Invalid { violations } => BookErrorContext {
                reason: "Book violates field constraints".to_string(),
                violations: violations.clone(),
            },
        }
    }
}

impl From<StoreError> for BookErrorType {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => BookErrorType::NotFound { key },
            StoreError::DuplicateId(id) => BookErrorType::DuplicateId { id },
            StoreError::IdsExhausted(max) => BookErrorType::IdsExhausted { max },
            StoreError::Validation(errors) => BookErrorType::Invalid {
                violations: field_violations(&errors),
            },
        }
    }
}

pub type BookError = ResourceError<BookErrorType, BookErrorContext>;

/// Maps a [`StoreError`] to a [`BookError`] with the given verbosity.
pub fn book_error(verbosity: ErrorVerbosity) -> impl FnOnce(StoreError) -> BookError {
    move |err| {
        tracing::debug!(%err, "Store rejected request");

        ResourceError::new(verbosity, err.into())
    }
}

/// Query parameters shared by the list endpoints.
#[derive(Debug, Default, Deserialize, JsonSchema, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookFilterQuery {
    /// Category, compared case-insensitively.
    pub category: Option<String>,
    /// Author, compared case-insensitively.
    pub author: Option<String>,
    /// Rating from 1 to 5.
    #[serde(alias = "book_rating")]
    #[validate(range(min = 1, max = 5, message = "Must be between 1 and 5"))]
    pub rating: Option<i64>,
    /// Year of publication from 1901 to 2030.
    #[validate(range(min = 1901, max = 2030, message = "Must be between 1901 and 2030"))]
    pub published_date: Option<i64>,
}

impl From<BookFilterQuery> for BookFilter {
    fn from(query: BookFilterQuery) -> Self {
        BookFilter {
            category: query.category,
            author: query.author,
            rating: query.rating,
            published_date: query.published_date,
        }
    }
}
