//! Book instance form

use async_trait::async_trait;
use uuid::Uuid;

use super::{escape, EntityForm, FieldError, FormContext, FormData};
use crate::{
    error::AppResult,
    models::{parse_form_date, BookInstance, BookInstanceForm, BookStatus},
    repository::{CatalogStore, DependentQuery},
    services::{aggregate::RelatedSet, view::ViewBag},
};

#[async_trait]
impl EntityForm for BookInstanceForm {
    type Record = BookInstance;

    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    fn from_form(form: &FormData) -> Self {
        Self {
            book: form.text("book"),
            imprint: form.text("imprint"),
            status: form.text("status"),
            due_back: form.text("due_back"),
        }
    }

    fn extra_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !self.book.is_empty() && Uuid::parse_str(&self.book).is_err() {
            errors.push(FieldError::new("book", "Book not found."));
        }
        if !self.status.is_empty() && BookStatus::parse(&self.status).is_none() {
            errors.push(FieldError::new("status", "Invalid status."));
        }
        if !self.due_back.is_empty() && parse_form_date(&self.due_back).is_none() {
            errors.push(FieldError::new("due_back", "Invalid date"));
        }
        errors
    }

    fn sanitize(self) -> Self {
        Self {
            book: escape(&self.book),
            imprint: escape(&self.imprint),
            status: escape(&self.status),
            due_back: escape(&self.due_back),
        }
    }

    fn build(&self, id: Uuid, ctx: &FormContext) -> BookInstance {
        BookInstance {
            id,
            book: Uuid::parse_str(&self.book).unwrap_or_else(|_| Uuid::nil()),
            imprint: self.imprint.clone(),
            status: BookStatus::parse(&self.status).unwrap_or_default(),
            due_back: parse_form_date(&self.due_back).unwrap_or(ctx.today),
        }
    }

    fn option_queries() -> Vec<(&'static str, DependentQuery)> {
        vec![("books", DependentQuery::AllBooks)]
    }

    fn render_options(
        view: ViewBag,
        _record: Option<&BookInstance>,
        options: &RelatedSet,
    ) -> AppResult<ViewBag> {
        let statuses: Vec<&str> = BookStatus::ALL.iter().map(BookStatus::as_str).collect();
        view.with_related(options)?.with("statuses", statuses)
    }

    async fn reference_errors(
        record: &BookInstance,
        store: &dyn CatalogStore,
    ) -> AppResult<Vec<FieldError>> {
        match store.get_book(record.book).await? {
            Some(_) => Ok(Vec::new()),
            None => Ok(vec![FieldError::new("book", "Book not found.")]),
        }
    }
}
