//! Create and update form endpoints, shared by every record type.
//!
//! Bodies are urlencoded; a field repeated in the body (genre checkboxes)
//! arrives as several values.

use axum::{
    extract::{Path, State},
    Form,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    services::{
        forms::{EntityForm, FormContext, FormOutcome, RawForm},
        view::ViewBag,
    },
    AppState,
};

/// Empty create form with its option lists
#[utoipa::path(
    get,
    path = "/catalog/{kind}/create",
    tag = "forms",
    params(("kind" = String, Path, description = "author, genre, book or bookinstance")),
    responses(
        (status = 200, description = "Create form with its option lists", body = ViewBag)
    )
)]
pub async fn create_form<F: EntityForm>(State(state): State<AppState>) -> AppResult<ViewBag> {
    state.services.catalog.form::<F>(&FormContext::create()).await
}

/// Store a new record
#[utoipa::path(
    post,
    path = "/catalog/{kind}/create",
    tag = "forms",
    params(("kind" = String, Path, description = "author, genre, book or bookinstance")),
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "Form fields; repeat a name for several values"
    ),
    responses(
        (status = 303, description = "Stored, or an equal genre exists; Location is the record"),
        (status = 422, description = "Rejected; the form with every error", body = ViewBag)
    )
)]
pub async fn create<F: EntityForm>(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<FormOutcome> {
    state
        .services
        .catalog
        .submit::<F>(&FormContext::create(), RawForm::from_pairs(fields))
        .await
}

/// Update form seeded with the stored record
#[utoipa::path(
    get,
    path = "/catalog/{kind}/{id}/update",
    tag = "forms",
    params(
        ("kind" = String, Path, description = "author, genre, book or bookinstance"),
        ("id" = Uuid, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Update form", body = ViewBag),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_form<F: EntityForm>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ViewBag> {
    state.services.catalog.form::<F>(&FormContext::update(id)).await
}

/// Replace a record, keeping its id
#[utoipa::path(
    post,
    path = "/catalog/{kind}/{id}/update",
    tag = "forms",
    params(
        ("kind" = String, Path, description = "author, genre, book or bookinstance"),
        ("id" = Uuid, Path, description = "Record ID")
    ),
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "Form fields; repeat a name for several values"
    ),
    responses(
        (status = 303, description = "Stored; Location is the record"),
        (status = 422, description = "Rejected; the form with every error", body = ViewBag),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update<F: EntityForm>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<FormOutcome> {
    state
        .services
        .catalog
        .submit::<F>(&FormContext::update(id), RawForm::from_pairs(fields))
        .await
}
