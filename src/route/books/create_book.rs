use axum::extract::State;

use crate::{
    book::NewBook,
    error::ErrorVerbosityProvider,
    extractor::{json::ApiJson, validated::ValidatedFromRequest},
    state::ApiState,
};

use super::{book_error, BookError, CreatedBookResponse};

/// Stores a new book, assigning the next free id when none is given.
#[utoipa::path(
    post,
    path = "/books/create_book",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 201, description = "The stored book", body = crate::book::Book),
        (status = 409, description = "The given id is already in use, or no id is left to assign"),
        (status = 422, description = "A field violates its constraints"),
    )
)]
pub async fn create_book(
    State(state): State<ApiState>,
    ValidatedFromRequest(ApiJson(new_book)): ValidatedFromRequest<ApiJson<NewBook>>,
) -> Result<CreatedBookResponse, BookError> {
    let book = state
        .store()
        .create(new_book)
        .await
        .map_err(book_error(state.error_verbosity()))?;

    tracing::info!(id = book.id, title = %book.title, "Book created");

    Ok(CreatedBookResponse { book })
}
