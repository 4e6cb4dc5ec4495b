//! Delete confirmation and delete endpoints

use axum::extract::{Path, State};
use uuid::Uuid;

use crate::{
    error::AppResult,
    repository::Record,
    services::{catalog::DeletePage, view::ViewBag},
    AppState,
};

/// The record and everything that still references it
#[utoipa::path(
    get,
    path = "/catalog/{kind}/{id}/delete",
    tag = "forms",
    params(
        ("kind" = String, Path, description = "author, genre, book or bookinstance"),
        ("id" = Uuid, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record and its dependents", body = ViewBag),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm<P: Record>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ViewBag> {
    state.services.catalog.delete_confirmation::<P>(id).await
}

/// Delete unless referenced; a refusal comes back as the confirmation page
#[utoipa::path(
    post,
    path = "/catalog/{kind}/{id}/delete",
    tag = "forms",
    params(
        ("kind" = String, Path, description = "author, genre, book or bookinstance"),
        ("id" = Uuid, Path, description = "Record ID")
    ),
    responses(
        (status = 303, description = "Deleted; Location is the listing"),
        (status = 409, description = "Still referenced; nothing was deleted", body = ViewBag),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete<P: Record>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<DeletePage> {
    state.services.catalog.delete::<P>(id).await
}
