//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{Author, AuthorView, EntityKind, Genre, GenreView};

/// Book record. `author` and `genre` hold references, resolved on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        EntityKind::Book.record_path(self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self {
            url: book.url(),
            book,
        }
    }
}

/// Book with its author and genres dereferenced.
///
/// A reference that no longer resolves is left out (`author: None`, missing
/// genre skipped) rather than failing the read.
#[derive(Debug, Clone, Serialize)]
pub struct PopulatedBook {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Option<AuthorView>,
    pub genre: Vec<GenreView>,
    pub url: String,
}

impl PopulatedBook {
    pub fn new(book: Book, author: Option<Author>, genres: Vec<Genre>) -> Self {
        Self {
            url: book.url(),
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author: author.map(AuthorView::from),
            genre: genres.into_iter().map(GenreView::from).collect(),
        }
    }
}

/// Book form submission (trimmed values)
#[derive(Debug, Clone, Default, Validate)]
pub struct BookForm {
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty."))]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty."))]
    pub isbn: String,
    pub genre: Vec<String>,
}
