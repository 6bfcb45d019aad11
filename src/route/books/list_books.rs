use axum::extract::State;
use schemars::JsonSchema;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    book::BookFilter,
    extractor::{path::ApiPath, query::ApiQuery, validated::ValidatedFromRequestParts},
    state::ApiState,
};

use super::{BookFilterQuery, BooksResponse};

#[derive(Debug, Deserialize, JsonSchema, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct AuthorPath {
    /// Author, compared case-insensitively.
    pub author: String,
}

#[derive(Debug, Deserialize, JsonSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// Optional category the author's books must also belong to.
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PublishedDateQuery {
    /// Year of publication from 1901 to 2030.
    #[validate(range(min = 1901, max = 2030, message = "Must be between 1901 and 2030"))]
    pub published_date: i64,
}

/// Lists books in insertion order, narrowed by any given filters.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookFilterQuery),
    responses(
        (status = 200, description = "Matching books", body = [crate::book::Book]),
        (status = 422, description = "A filter is out of range"),
    )
)]
pub async fn list_books(
    State(state): State<ApiState>,
    ValidatedFromRequestParts(ApiQuery(query)): ValidatedFromRequestParts<
        ApiQuery<BookFilterQuery>,
    >,
) -> BooksResponse {
    let filter = BookFilter::from(query);

    let books = if filter == BookFilter::default() {
        state.store().list_all().await
    } else {
        state.store().filter_by(|book| filter.matches(book)).await
    };

    tracing::debug!(?filter, count = books.len(), "Listed books");

    BooksResponse { books }
}

/// Lists the books of an author, optionally within one category.
#[utoipa::path(
    get,
    path = "/books/by_author/{author}",
    tag = "books",
    params(AuthorPath, CategoryQuery),
    responses((status = 200, description = "Matching books", body = [crate::book::Book]))
)]
pub async fn list_books_by_author(
    State(state): State<ApiState>,
    ApiPath(path): ApiPath<AuthorPath>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> BooksResponse {
    let filter = BookFilter {
        author: Some(path.author),
        category: query.category,
        ..Default::default()
    };

    let books = state.store().filter_by(|book| filter.matches(book)).await;

    BooksResponse { books }
}

/// Lists the books published in a given year.
#[utoipa::path(
    get,
    path = "/books/publish/",
    tag = "books",
    params(PublishedDateQuery),
    responses(
        (status = 200, description = "Matching books", body = [crate::book::Book]),
        (status = 422, description = "The year is out of range"),
    )
)]
pub async fn list_books_by_published_date(
    State(state): State<ApiState>,
    ValidatedFromRequestParts(ApiQuery(query)): ValidatedFromRequestParts<
        ApiQuery<PublishedDateQuery>,
    >,
) -> BooksResponse {
    let published_date = query.published_date;

    let books = state
        .store()
        .filter_by(|book| i64::from(book.published_date) == published_date)
        .await;

    BooksResponse { books }
}
