//! Reference resolution between collections.
//!
//! There is no join table or cache: a relationship is either a filter over
//! the dependent collection (copies where `book == id`) or a dereference of
//! the id a record embeds. Every call goes back to the store.

use std::collections::HashMap;

use futures::future::try_join_all;
use serde_json::Value;
use uuid::Uuid;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorView, Book, BookInstance, BookInstanceView, BookView, Genre, GenreView,
        PopulatedBook, PopulatedCopy,
    },
};

/// A query over one related collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentQuery {
    /// Copies of the given book
    CopiesOfBook(Uuid),
    /// Books written by the given author
    BooksByAuthor(Uuid),
    /// Books tagged with the given genre
    BooksInGenre(Uuid),
    AllAuthors,
    AllGenres,
    AllBooks,
}

impl DependentQuery {
    pub async fn run(self, store: &dyn CatalogStore) -> AppResult<Related> {
        let related = match self {
            DependentQuery::CopiesOfBook(id) => Related::Copies(store.instances_by_book(id).await?),
            DependentQuery::BooksByAuthor(id) => Related::Books(store.books_by_author(id).await?),
            DependentQuery::BooksInGenre(id) => Related::Books(store.books_by_genre(id).await?),
            DependentQuery::AllAuthors => Related::Authors(store.list_authors().await?),
            DependentQuery::AllGenres => Related::Genres(store.list_genres().await?),
            DependentQuery::AllBooks => Related::Books(store.list_books().await?),
        };
        Ok(related)
    }
}

/// Result of a [`DependentQuery`]
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    Authors(Vec<Author>),
    Genres(Vec<Genre>),
    Books(Vec<Book>),
    Copies(Vec<BookInstance>),
}

impl Related {
    pub fn len(&self) -> usize {
        match self {
            Related::Authors(v) => v.len(),
            Related::Genres(v) => v.len(),
            Related::Books(v) => v.len(),
            Related::Copies(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_genres(self) -> AppResult<Vec<Genre>> {
        match self {
            Related::Genres(genres) => Ok(genres),
            other => Err(AppError::Internal(format!(
                "expected genres, got {} other records",
                other.len()
            ))),
        }
    }

    /// Records with their derived display values
    pub fn to_view(&self) -> AppResult<Value> {
        let value = match self {
            Related::Authors(v) => serde_json::to_value(
                v.iter().cloned().map(AuthorView::from).collect::<Vec<_>>(),
            )?,
            Related::Genres(v) => serde_json::to_value(
                v.iter().cloned().map(GenreView::from).collect::<Vec<_>>(),
            )?,
            Related::Books(v) => serde_json::to_value(
                v.iter().cloned().map(BookView::from).collect::<Vec<_>>(),
            )?,
            Related::Copies(v) => serde_json::to_value(
                v.iter()
                    .cloned()
                    .map(BookInstanceView::from)
                    .collect::<Vec<_>>(),
            )?,
        };
        Ok(value)
    }
}

/// Dereference a book's author and genres. Dangling references are skipped.
pub async fn populate_book(store: &dyn CatalogStore, book: Book) -> AppResult<PopulatedBook> {
    let author = store.get_author(book.author);
    let genres = try_join_all(book.genre.iter().map(|id| store.get_genre(*id)));
    let (author, genres) = tokio::try_join!(author, genres)?;

    let genres = genres.into_iter().flatten().collect();
    Ok(PopulatedBook::new(book, author, genres))
}

/// Dereference a copy's book
pub async fn populate_copy(
    store: &dyn CatalogStore,
    instance: BookInstance,
) -> AppResult<PopulatedCopy> {
    let book = store.get_book(instance.book).await?;
    Ok(PopulatedCopy::new(instance, book))
}

/// Every book with its references resolved, by title
pub async fn all_books_populated(store: &dyn CatalogStore) -> AppResult<Vec<PopulatedBook>> {
    let (books, authors, genres) = tokio::try_join!(
        store.list_books(),
        store.list_authors(),
        store.list_genres(),
    )?;

    let authors: HashMap<Uuid, Author> = authors.into_iter().map(|a| (a.id, a)).collect();
    let genres: HashMap<Uuid, Genre> = genres.into_iter().map(|g| (g.id, g)).collect();

    Ok(books
        .into_iter()
        .map(|book| {
            let author = authors.get(&book.author).cloned();
            let book_genres = book
                .genre
                .iter()
                .filter_map(|id| genres.get(id).cloned())
                .collect();
            PopulatedBook::new(book, author, book_genres)
        })
        .collect())
}

/// Every copy with its book resolved
pub async fn all_copies_populated(store: &dyn CatalogStore) -> AppResult<Vec<PopulatedCopy>> {
    let (instances, books) = tokio::try_join!(store.list_book_instances(), store.list_books())?;
    let books: HashMap<Uuid, Book> = books.into_iter().map(|b| (b.id, b)).collect();

    Ok(instances
        .into_iter()
        .map(|instance| {
            let book = books.get(&instance.book).cloned();
            PopulatedCopy::new(instance, book)
        })
        .collect())
}
