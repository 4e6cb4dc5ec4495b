//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{format_form_date, format_long_date, Book, BookView, EntityKind};

/// Copy availability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Available,
        BookStatus::Maintenance,
        BookStatus::Loaned,
        BookStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Maintenance => "Maintenance",
            BookStatus::Loaned => "Loaned",
            BookStatus::Reserved => "Reserved",
        }
    }

    /// Parse the stored/submitted label, exact match
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Book instance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    pub status: BookStatus,
    pub due_back: NaiveDate,
}

impl BookInstance {
    pub fn url(&self) -> String {
        EntityKind::BookInstance.record_path(self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceView {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub due_back_formatted: String,
    pub due_back_form: String,
    pub url: String,
}

impl From<BookInstance> for BookInstanceView {
    fn from(instance: BookInstance) -> Self {
        Self {
            due_back_formatted: format_long_date(instance.due_back),
            due_back_form: format_form_date(Some(instance.due_back)),
            url: instance.url(),
            instance,
        }
    }
}

/// Copy with its book dereferenced
#[derive(Debug, Clone, Serialize)]
pub struct PopulatedCopy {
    pub id: Uuid,
    pub imprint: String,
    pub status: BookStatus,
    pub due_back: NaiveDate,
    pub due_back_formatted: String,
    pub due_back_form: String,
    pub book: Option<BookView>,
    pub url: String,
}

impl PopulatedCopy {
    pub fn new(instance: BookInstance, book: Option<Book>) -> Self {
        Self {
            due_back_formatted: format_long_date(instance.due_back),
            due_back_form: format_form_date(Some(instance.due_back)),
            url: instance.url(),
            id: instance.id,
            imprint: instance.imprint,
            status: instance.status,
            due_back: instance.due_back,
            book: book.map(BookView::from),
        }
    }
}

/// Book instance form submission (trimmed values)
#[derive(Debug, Clone, Default, Validate)]
pub struct BookInstanceForm {
    #[validate(length(min = 1, message = "Book must be specified."))]
    pub book: String,
    #[validate(length(min = 1, message = "Imprint must be specified."))]
    pub imprint: String,
    pub status: String,
    pub due_back: String,
}
