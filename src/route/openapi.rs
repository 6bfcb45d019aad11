use axum::Router;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    book::{Book, BookUpdate, NewBook},
    state::ApiState,
};

use super::books::{create_book, delete_book, get_book, list_books, update_book};

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books::list_books,
        list_books::list_books_by_author,
        list_books::list_books_by_published_date,
        get_book::get_book,
        get_book::get_book_by_title,
        create_book::create_book,
        update_book::update_book,
        delete_book::delete_book,
        delete_book::delete_book_by_title,
    ),
    components(schemas(Book, NewBook, BookUpdate)),
    tags((name = "books", description = "In-memory book records"))
)]
pub struct ApiDoc;

/// Serves the OpenAPI document through Swagger UI, Redoc and RapiDoc.
pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
}
