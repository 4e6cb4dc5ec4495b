//! HTTP handlers for the catalog endpoints

pub mod catalog;
pub mod delete;
pub mod forms;
pub mod health;
pub mod openapi;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    models::{AuthorForm, BookForm, BookInstanceForm, GenreForm},
    repository::Record,
    services::{catalog::DeletePage, forms::EntityForm, forms::FormOutcome, view::ViewBag},
    AppState,
};

impl IntoResponse for ViewBag {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl IntoResponse for FormOutcome {
    fn into_response(self) -> Response {
        match self {
            FormOutcome::Redirect(to) => Redirect::to(&to).into_response(),
            FormOutcome::Invalid { view, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, view).into_response()
            }
        }
    }
}

impl IntoResponse for DeletePage {
    fn into_response(self) -> Response {
        match self {
            DeletePage::Redirect(to) => Redirect::to(&to).into_response(),
            DeletePage::Blocked(view) => (StatusCode::CONFLICT, view).into_response(),
        }
    }
}

/// Create, update and delete routes for one record type
fn entity_routes<F>() -> Router<AppState>
where
    F: EntityForm + 'static,
{
    let key = <F::Record as Record>::KIND.key();

    Router::new()
        .route(
            &format!("/{}/create", key),
            get(forms::create_form::<F>).post(forms::create::<F>),
        )
        .route(
            &format!("/{}/:id/update", key),
            get(forms::update_form::<F>).post(forms::update::<F>),
        )
        .route(
            &format!("/{}/:id/delete", key),
            get(delete::confirm::<F::Record>).post(delete::delete::<F::Record>),
        )
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Listings
        .route("/books", get(catalog::list_books))
        .route("/authors", get(catalog::list_authors))
        .route("/genres", get(catalog::list_genres))
        .route("/bookinstances", get(catalog::list_bookinstances))
        // Details
        .route("/book/:id", get(catalog::get_book))
        .route("/author/:id", get(catalog::get_author))
        .route("/genre/:id", get(catalog::get_genre))
        .route("/bookinstance/:id", get(catalog::get_bookinstance))
        // Forms and deletion
        .merge(entity_routes::<BookForm>())
        .merge(entity_routes::<AuthorForm>())
        .merge(entity_routes::<GenreForm>())
        .merge(entity_routes::<BookInstanceForm>())
        .with_state(state.clone());

    let api_v1 = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .nest("/catalog", catalog)
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
