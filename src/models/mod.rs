//! Data models for the library catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

// Re-export commonly used types
pub use author::{Author, AuthorForm, AuthorView};
pub use book::{Book, BookForm, BookView, PopulatedBook};
pub use book_instance::{BookInstance, BookInstanceForm, BookInstanceView, BookStatus, PopulatedCopy};
pub use genre::{Genre, GenreForm, GenreView};

/// The four kinds of catalog records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Author,
    Genre,
    Book,
    BookInstance,
}

impl EntityKind {
    /// Path segment and view key for a single record (`book`, `bookinstance`...)
    pub fn key(&self) -> &'static str {
        match self {
            EntityKind::Author => "author",
            EntityKind::Genre => "genre",
            EntityKind::Book => "book",
            EntityKind::BookInstance => "bookinstance",
        }
    }

    /// Path segment for the listing
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Author => "authors",
            EntityKind::Genre => "genres",
            EntityKind::Book => "books",
            EntityKind::BookInstance => "bookinstances",
        }
    }

    /// Human readable label used in page titles
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Author => "Author",
            EntityKind::Genre => "Genre",
            EntityKind::Book => "Book",
            EntityKind::BookInstance => "BookInstance",
        }
    }

    /// Canonical location of one record
    pub fn record_path(&self, id: Uuid) -> String {
        format!("/catalog/{}/{}", self.key(), id)
    }

    /// Canonical location of the listing
    pub fn list_path(&self) -> String {
        format!("/catalog/{}", self.plural())
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Format a date as `January 3rd, 1892`
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// Format an optional date for a date input (`yyyy-MM-dd`), empty when absent
pub fn format_form_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Parse an ISO `yyyy-MM-dd` date
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
