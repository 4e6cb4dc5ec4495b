//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{catalog, delete, forms, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "1.0.0",
        description = "Books, authors, genres and copies of a local library"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::index,
        catalog::list_books,
        catalog::list_authors,
        catalog::list_genres,
        catalog::list_bookinstances,
        catalog::get_book,
        catalog::get_author,
        catalog::get_genre,
        catalog::get_bookinstance,
        // Forms and deletion
        forms::create_form,
        forms::create,
        forms::update_form,
        forms::update,
        delete::confirm,
        delete::delete,
    ),
    components(
        schemas(
            // Records
            crate::models::Author,
            crate::models::Genre,
            crate::models::Book,
            crate::models::BookInstance,
            crate::models::BookStatus,
            // Pages
            crate::services::view::ViewBag,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog pages"),
        (name = "forms", description = "Create, update and delete forms")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
