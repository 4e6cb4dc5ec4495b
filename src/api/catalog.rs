//! Catalog pages: summary, listings and detail views

use axum::extract::{Path, State};
use uuid::Uuid;

use crate::{error::AppResult, services::view::ViewBag, AppState};

/// Record counts for the catalog home page
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Counts of books, copies, authors and genres", body = ViewBag),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<ViewBag> {
    state.services.catalog.summary().await
}

/// All books by title, with their authors
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "catalog",
    responses((status = 200, description = "Book list", body = ViewBag))
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<ViewBag> {
    state.services.catalog.book_list().await
}

/// All authors by family name
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "catalog",
    responses((status = 200, description = "Author list", body = ViewBag))
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<ViewBag> {
    state.services.catalog.author_list().await
}

#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "catalog",
    responses((status = 200, description = "Genre list", body = ViewBag))
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<ViewBag> {
    state.services.catalog.genre_list().await
}

/// All copies with their books
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "catalog",
    responses((status = 200, description = "Copy list", body = ViewBag))
)]
pub async fn list_bookinstances(State(state): State<AppState>) -> AppResult<ViewBag> {
    state.services.catalog.bookinstance_list().await
}

/// Book with author, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book detail", body = ViewBag),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<ViewBag> {
    state.services.catalog.book_detail(id).await
}

/// Author with their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author detail", body = ViewBag),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ViewBag> {
    state.services.catalog.author_detail(id).await
}

/// Genre with the books tagged with it
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre detail", body = ViewBag),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<ViewBag> {
    state.services.catalog.genre_detail(id).await
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy detail", body = ViewBag),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_bookinstance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ViewBag> {
    state.services.catalog.bookinstance_detail(id).await
}
