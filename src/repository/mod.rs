//! Repository layer: the entity store and reference resolution

pub mod memory;
pub mod postgres;
pub mod records;
pub mod relations;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    config::{AppConfig, StoreBackend},
    error::AppResult,
    models::{Author, Book, BookInstance, BookStatus, Genre},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use records::Record;
pub use relations::{DependentQuery, Related};

/// Shared handle to the entity store
pub type Repository = Arc<dyn CatalogStore>;

/// Persistent records for the four catalog collections.
///
/// Lookups return `Ok(None)` for a missing record; `replace_*` and `delete_*`
/// report whether a record with that id existed. Each call is a single
/// document write, nothing spans several calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // Authors, ordered by family name then first name
    async fn list_authors(&self) -> AppResult<Vec<Author>>;
    async fn get_author(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn insert_author(&self, author: &Author) -> AppResult<()>;
    async fn replace_author(&self, author: &Author) -> AppResult<bool>;
    async fn delete_author(&self, id: Uuid) -> AppResult<bool>;
    async fn count_authors(&self) -> AppResult<i64>;

    // Genres, ordered by name
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;
    async fn get_genre(&self, id: Uuid) -> AppResult<Option<Genre>>;
    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    async fn insert_genre(&self, genre: &Genre) -> AppResult<()>;
    async fn replace_genre(&self, genre: &Genre) -> AppResult<bool>;
    async fn delete_genre(&self, id: Uuid) -> AppResult<bool>;
    async fn count_genres(&self) -> AppResult<i64>;

    // Books, ordered by title
    async fn list_books(&self) -> AppResult<Vec<Book>>;
    async fn get_book(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>>;
    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>>;
    async fn insert_book(&self, book: &Book) -> AppResult<()>;
    async fn replace_book(&self, book: &Book) -> AppResult<bool>;
    async fn delete_book(&self, id: Uuid) -> AppResult<bool>;
    async fn count_books(&self) -> AppResult<i64>;

    // Book instances, ordered by due date
    async fn list_book_instances(&self) -> AppResult<Vec<BookInstance>>;
    async fn get_book_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>>;
    async fn insert_book_instance(&self, instance: &BookInstance) -> AppResult<()>;
    async fn replace_book_instance(&self, instance: &BookInstance) -> AppResult<bool>;
    async fn delete_book_instance(&self, id: Uuid) -> AppResult<bool>;
    async fn count_book_instances(&self) -> AppResult<i64>;
    async fn count_book_instances_by_status(&self, status: BookStatus) -> AppResult<i64>;
}

/// Open the configured store
pub async fn connect(config: &AppConfig) -> AppResult<Repository> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory catalog store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config.database).await?;
            Ok(Arc::new(store))
        }
    }
}
