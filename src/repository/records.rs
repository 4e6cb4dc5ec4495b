//! Typed access to each collection, and the removal rules per record type

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{CatalogStore, DependentQuery};
use crate::{
    error::AppResult,
    models::{
        Author, AuthorView, Book, BookInstance, BookInstanceView, BookView, EntityKind, Genre,
        GenreView,
    },
};

/// A catalog record type with its collection operations
#[async_trait]
pub trait Record: Clone + Send + Sync + Sized + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Uuid;

    fn url(&self) -> String {
        Self::KIND.record_path(self.id())
    }

    /// The record with its derived display values
    fn view(&self) -> AppResult<Value>;

    /// Collections that must be empty before a record may be removed.
    /// Removal never cascades.
    fn dependents(id: Uuid) -> Vec<(&'static str, DependentQuery)>;

    async fn find(store: &dyn CatalogStore, id: Uuid) -> AppResult<Option<Self>>;

    async fn insert(&self, store: &dyn CatalogStore) -> AppResult<()>;

    /// Overwrite the record stored under the same id
    async fn replace(&self, store: &dyn CatalogStore) -> AppResult<bool>;

    async fn remove(store: &dyn CatalogStore, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
impl Record for Author {
    const KIND: EntityKind = EntityKind::Author;

    fn id(&self) -> Uuid {
        self.id
    }

    fn view(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(AuthorView::from(self.clone()))?)
    }

    fn dependents(id: Uuid) -> Vec<(&'static str, DependentQuery)> {
        vec![("author_books", DependentQuery::BooksByAuthor(id))]
    }

    async fn find(store: &dyn CatalogStore, id: Uuid) -> AppResult<Option<Self>> {
        store.get_author(id).await
    }

    async fn insert(&self, store: &dyn CatalogStore) -> AppResult<()> {
        store.insert_author(self).await
    }

    async fn replace(&self, store: &dyn CatalogStore) -> AppResult<bool> {
        store.replace_author(self).await
    }

    async fn remove(store: &dyn CatalogStore, id: Uuid) -> AppResult<bool> {
        store.delete_author(id).await
    }
}

#[async_trait]
impl Record for Genre {
    const KIND: EntityKind = EntityKind::Genre;

    fn id(&self) -> Uuid {
        self.id
    }

    fn view(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(GenreView::from(self.clone()))?)
    }

    fn dependents(id: Uuid) -> Vec<(&'static str, DependentQuery)> {
        vec![("genre_books", DependentQuery::BooksInGenre(id))]
    }

    async fn find(store: &dyn CatalogStore, id: Uuid) -> AppResult<Option<Self>> {
        store.get_genre(id).await
    }

    async fn insert(&self, store: &dyn CatalogStore) -> AppResult<()> {
        store.insert_genre(self).await
    }

    async fn replace(&self, store: &dyn CatalogStore) -> AppResult<bool> {
        store.replace_genre(self).await
    }

    async fn remove(store: &dyn CatalogStore, id: Uuid) -> AppResult<bool> {
        store.delete_genre(id).await
    }
}

#[async_trait]
impl Record for Book {
    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> Uuid {
        self.id
    }

    fn view(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(BookView::from(self.clone()))?)
    }

    fn dependents(id: Uuid) -> Vec<(&'static str, DependentQuery)> {
        vec![("book_instances", DependentQuery::CopiesOfBook(id))]
    }

    async fn find(store: &dyn CatalogStore, id: Uuid) -> AppResult<Option<Self>> {
        store.get_book(id).await
    }

    async fn insert(&self, store: &dyn CatalogStore) -> AppResult<()> {
        store.insert_book(self).await
    }

    async fn replace(&self, store: &dyn CatalogStore) -> AppResult<bool> {
        store.replace_book(self).await
    }

    async fn remove(store: &dyn CatalogStore, id: Uuid) -> AppResult<bool> {
        store.delete_book(id).await
    }
}

#[async_trait]
impl Record for BookInstance {
    const KIND: EntityKind = EntityKind::BookInstance;

    fn id(&self) -> Uuid {
        self.id
    }

    fn view(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(BookInstanceView::from(self.clone()))?)
    }

    // Nothing references a copy
    fn dependents(_id: Uuid) -> Vec<(&'static str, DependentQuery)> {
        Vec::new()
    }

    async fn find(store: &dyn CatalogStore, id: Uuid) -> AppResult<Option<Self>> {
        store.get_book_instance(id).await
    }

    async fn insert(&self, store: &dyn CatalogStore) -> AppResult<()> {
        store.insert_book_instance(self).await
    }

    async fn replace(&self, store: &dyn CatalogStore) -> AppResult<bool> {
        store.replace_book_instance(self).await
    }

    async fn remove(store: &dyn CatalogStore, id: Uuid) -> AppResult<bool> {
        store.delete_book_instance(id).await
    }
}
