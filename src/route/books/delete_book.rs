use axum::{extract::State, http::StatusCode};

use crate::{
    book::BookKey,
    error::ErrorVerbosityProvider,
    extractor::{path::ApiPath, validated::ValidatedFromRequestParts},
    state::ApiState,
};

use super::{book_error, BookError, BookIdPath, BookTitlePath};

#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(BookIdPath),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
    )
)]
pub async fn delete_book(
    State(state): State<ApiState>,
    ValidatedFromRequestParts(ApiPath(path)): ValidatedFromRequestParts<ApiPath<BookIdPath>>,
) -> Result<StatusCode, BookError> {
    delete(&state, BookKey::Id(path.id)).await
}

#[utoipa::path(
    delete,
    path = "/books/delete_book/{title}",
    tag = "books",
    params(BookTitlePath),
    responses(
        (status = 204, description = "First book with that title deleted"),
        (status = 404, description = "Book not found"),
    )
)]
pub async fn delete_book_by_title(
    State(state): State<ApiState>,
    ApiPath(path): ApiPath<BookTitlePath>,
) -> Result<StatusCode, BookError> {
    delete(&state, BookKey::Title(path.title)).await
}

async fn delete(state: &ApiState, key: BookKey) -> Result<StatusCode, BookError> {
    let book = state
        .store()
        .delete(&key)
        .await
        .map_err(book_error(state.error_verbosity()))?;

    tracing::info!(id = book.id, "Book deleted");

    Ok(StatusCode::NO_CONTENT)
}
