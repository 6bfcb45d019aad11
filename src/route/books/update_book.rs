use axum::extract::State;

use crate::{
    book::BookUpdate,
    error::ErrorVerbosityProvider,
    extractor::{json::ApiJson, validated::ValidatedFromRequest},
    state::ApiState,
};

use super::{book_error, BookError, BookResponse};

/// Replaces a book as a whole. Keyed by `id`, or by title when `id` is omitted.
#[utoipa::path(
    put,
    path = "/books/update_book",
    tag = "books",
    request_body = BookUpdate,
    responses(
        (status = 200, description = "The replaced book", body = crate::book::Book),
        (status = 404, description = "Book not found"),
        (status = 422, description = "A field violates its constraints"),
    )
)]
pub async fn update_book(
    State(state): State<ApiState>,
    ValidatedFromRequest(ApiJson(update)): ValidatedFromRequest<ApiJson<BookUpdate>>,
) -> Result<BookResponse, BookError> {
    let book = state
        .store()
        .update(update)
        .await
        .map_err(book_error(state.error_verbosity()))?;

    tracing::info!(id = book.id, "Book updated");

    Ok(BookResponse { book })
}
