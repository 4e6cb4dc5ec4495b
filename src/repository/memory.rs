//! In-memory entity store

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CatalogStore;
use crate::{
    error::AppResult,
    models::{Author, Book, BookInstance, BookStatus, Genre},
};

#[derive(Default)]
struct Tables {
    authors: IndexMap<Uuid, Author>,
    genres: IndexMap<Uuid, Genre>,
    books: IndexMap<Uuid, Book>,
    book_instances: IndexMap<Uuid, BookInstance>,
}

/// Store keeping every collection in process memory, in insertion order.
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Replace the entry for `id` if present, keeping its position
fn replace_in<T: Clone>(table: &mut IndexMap<Uuid, T>, id: Uuid, record: &T) -> bool {
    match table.get_mut(&id) {
        Some(slot) => {
            *slot = record.clone();
            true
        }
        None => false,
    }
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let tables = self.tables.read().await;
        let mut authors: Vec<Author> = tables.authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            (&a.family_name, &a.first_name).cmp(&(&b.family_name, &b.first_name))
        });
        Ok(authors)
    }

    async fn get_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn insert_author(&self, author: &Author) -> AppResult<()> {
        self.tables.write().await.authors.insert(author.id, author.clone());
        Ok(())
    }

    async fn replace_author(&self, author: &Author) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(replace_in(&mut tables.authors, author.id, author))
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.authors.shift_remove(&id).is_some())
    }

    async fn count_authors(&self) -> AppResult<i64> {
        Ok(count(self.tables.read().await.authors.len()))
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let tables = self.tables.read().await;
        let mut genres: Vec<Genre> = tables.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn get_genre(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.tables.read().await.genres.get(&id).cloned())
    }

    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let tables = self.tables.read().await;
        Ok(tables.genres.values().find(|g| g.name == name).cloned())
    }

    async fn insert_genre(&self, genre: &Genre) -> AppResult<()> {
        self.tables.write().await.genres.insert(genre.id, genre.clone());
        Ok(())
    }

    async fn replace_genre(&self, genre: &Genre) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(replace_in(&mut tables.genres, genre.id, genre))
    }

    async fn delete_genre(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.genres.shift_remove(&id).is_some())
    }

    async fn count_genres(&self) -> AppResult<i64> {
        Ok(count(self.tables.read().await.genres.len()))
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        let mut books: Vec<Book> = tables.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn get_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .values()
            .filter(|b| b.author == author_id)
            .cloned()
            .collect())
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .values()
            .filter(|b| b.genre.contains(&genre_id))
            .cloned()
            .collect())
    }

    async fn insert_book(&self, book: &Book) -> AppResult<()> {
        self.tables.write().await.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn replace_book(&self, book: &Book) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(replace_in(&mut tables.books, book.id, book))
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.books.shift_remove(&id).is_some())
    }

    async fn count_books(&self) -> AppResult<i64> {
        Ok(count(self.tables.read().await.books.len()))
    }

    async fn list_book_instances(&self) -> AppResult<Vec<BookInstance>> {
        let tables = self.tables.read().await;
        let mut instances: Vec<BookInstance> = tables.book_instances.values().cloned().collect();
        instances.sort_by_key(|i| i.due_back);
        Ok(instances)
    }

    async fn get_book_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.tables.read().await.book_instances.get(&id).cloned())
    }

    async fn instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let tables = self.tables.read().await;
        Ok(tables
            .book_instances
            .values()
            .filter(|i| i.book == book_id)
            .cloned()
            .collect())
    }

    async fn insert_book_instance(&self, instance: &BookInstance) -> AppResult<()> {
        self.tables
            .write()
            .await
            .book_instances
            .insert(instance.id, instance.clone());
        Ok(())
    }

    async fn replace_book_instance(&self, instance: &BookInstance) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(replace_in(&mut tables.book_instances, instance.id, instance))
    }

    async fn delete_book_instance(&self, id: Uuid) -> AppResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .book_instances
            .shift_remove(&id)
            .is_some())
    }

    async fn count_book_instances(&self) -> AppResult<i64> {
        Ok(count(self.tables.read().await.book_instances.len()))
    }

    async fn count_book_instances_by_status(&self, status: BookStatus) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(count(
            tables
                .book_instances
                .values()
                .filter(|i| i.status == status)
                .count(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn genre(name: &str) -> Genre {
        Genre {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_replace_keeps_identity_and_reports_missing() {
        let store = MemoryStore::new();
        let mut g = genre("Poetry");
        store.insert_genre(&g).await.unwrap();

        g.name = "Verse".to_string();
        assert!(store.replace_genre(&g).await.unwrap());
        assert_eq!(store.get_genre(g.id).await.unwrap().unwrap().name, "Verse");
        assert_eq!(store.count_genres().await.unwrap(), 1);

        assert!(!store.replace_genre(&genre("Ghost")).await.unwrap());
        assert_eq!(store.count_genres().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let store = MemoryStore::new();
        let g = genre("Poetry");
        store.insert_genre(&g).await.unwrap();

        assert!(store.delete_genre(g.id).await.unwrap());
        assert!(!store.delete_genre(g.id).await.unwrap());
        assert!(store.get_genre(g.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listings_are_sorted() {
        let store = MemoryStore::new();
        for name in ["Science Fiction", "Fantasy", "Poetry"] {
            store.insert_genre(&genre(name)).await.unwrap();
        }
        let names: Vec<String> = store
            .list_genres()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, ["Fantasy", "Poetry", "Science Fiction"]);
    }

    #[tokio::test]
    async fn test_reference_filters() {
        let store = MemoryStore::new();
        let fantasy = genre("Fantasy");
        let author_id = Uuid::new_v4();
        let book = Book {
            id: Uuid::new_v4(),
            title: "The Hobbit".to_string(),
            author: author_id,
            summary: "There and back again".to_string(),
            isbn: "9780261103344".to_string(),
            genre: vec![fantasy.id],
        };
        store.insert_book(&book).await.unwrap();
        for status in [BookStatus::Available, BookStatus::Loaned] {
            store
                .insert_book_instance(&BookInstance {
                    id: Uuid::new_v4(),
                    book: book.id,
                    imprint: "Allen & Unwin".to_string(),
                    status,
                    due_back: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                })
                .await
                .unwrap();
        }

        assert_eq!(store.books_by_author(author_id).await.unwrap(), vec![book.clone()]);
        assert_eq!(store.books_by_genre(fantasy.id).await.unwrap(), vec![book.clone()]);
        assert!(store.books_by_genre(Uuid::new_v4()).await.unwrap().is_empty());
        assert_eq!(store.instances_by_book(book.id).await.unwrap().len(), 2);
        assert_eq!(
            store
                .count_book_instances_by_status(BookStatus::Available)
                .await
                .unwrap(),
            1
        );
    }
}
