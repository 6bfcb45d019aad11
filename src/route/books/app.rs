use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::ApiState;

use super::{create_book, delete_book, get_book, list_books, update_book};

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route("/books", get(list_books::list_books))
        .route("/books/", get(list_books::list_books))
        .route(
            "/books/publish/",
            get(list_books::list_books_by_published_date),
        )
        .route(
            "/books/by_author/:author",
            get(list_books::list_books_by_author),
        )
        .route("/books/by_title/:title", get(get_book::get_book_by_title))
        .route(
            "/books/:id",
            get(get_book::get_book).delete(delete_book::delete_book),
        )
        .route("/books/create_book", post(create_book::create_book))
        .route("/create-book", post(create_book::create_book))
        .route("/books/update_book", put(update_book::update_book))
        .route("/books/update-book", put(update_book::update_book))
        .route(
            "/books/delete_book/:title",
            delete(delete_book::delete_book_by_title),
        )
}
