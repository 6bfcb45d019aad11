use axum::extract::State;

use crate::{
    error::ErrorVerbosityProvider,
    extractor::{path::ApiPath, validated::ValidatedFromRequestParts},
    state::ApiState,
};

use super::{book_error, BookError, BookIdPath, BookResponse, BookTitlePath};

#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(BookIdPath),
    responses(
        (status = 200, description = "The book", body = crate::book::Book),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Id is not positive"),
    )
)]
pub async fn get_book(
    State(state): State<ApiState>,
    ValidatedFromRequestParts(ApiPath(path)): ValidatedFromRequestParts<ApiPath<BookIdPath>>,
) -> Result<BookResponse, BookError> {
    let book = state
        .store()
        .find_by_id(path.id)
        .await
        .map_err(book_error(state.error_verbosity()))?;

    Ok(BookResponse { book })
}

#[utoipa::path(
    get,
    path = "/books/by_title/{title}",
    tag = "books",
    params(BookTitlePath),
    responses(
        (status = 200, description = "The first book with that title", body = crate::book::Book),
        (status = 404, description = "Book not found"),
    )
)]
pub async fn get_book_by_title(
    State(state): State<ApiState>,
    ApiPath(path): ApiPath<BookTitlePath>,
) -> Result<BookResponse, BookError> {
    let book = state
        .store()
        .find_by_title(&path.title)
        .await
        .map_err(book_error(state.error_verbosity()))?;

    Ok(BookResponse { book })
}
