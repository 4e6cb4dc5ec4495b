//! Book form. Genres arrive as repeated checkbox values.

use async_trait::async_trait;
use futures::future::try_join_all;
use indexmap::IndexSet;
use serde::Serialize;
use uuid::Uuid;

use super::{escape, EntityForm, FieldError, FormContext, FormData};
use crate::{
    error::AppResult,
    models::{Book, BookForm, GenreView},
    repository::{CatalogStore, DependentQuery},
    services::{aggregate::RelatedSet, view::ViewBag},
};

/// A genre checkbox
#[derive(Debug, Clone, Serialize)]
pub struct GenreOption {
    #[serde(flatten)]
    pub genre: GenreView,
    pub checked: bool,
}

#[async_trait]
impl EntityForm for BookForm {
    type Record = Book;

    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    fn from_form(form: &FormData) -> Self {
        Self {
            title: form.text("title"),
            author: form.text("author"),
            summary: form.text("summary"),
            isbn: form.text("isbn"),
            genre: form.values("genre"),
        }
    }

    fn extra_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !self.author.is_empty() && Uuid::parse_str(&self.author).is_err() {
            errors.push(FieldError::new("author", "Author not found."));
        }
        if self.genre.iter().any(|g| Uuid::parse_str(g).is_err()) {
            errors.push(FieldError::new("genre", "Genre not found."));
        }
        errors
    }

    fn sanitize(self) -> Self {
        Self {
            title: escape(&self.title),
            author: escape(&self.author),
            summary: escape(&self.summary),
            isbn: escape(&self.isbn),
            genre: self.genre.iter().map(|g| escape(g)).collect(),
        }
    }

    fn build(&self, id: Uuid, _ctx: &FormContext) -> Book {
        Book {
            id,
            title: self.title.clone(),
            author: Uuid::parse_str(&self.author).unwrap_or_else(|_| Uuid::nil()),
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            // a set: repeated checkbox values collapse, first position wins
            genre: self
                .genre
                .iter()
                .filter_map(|g| Uuid::parse_str(g).ok())
                .collect::<IndexSet<Uuid>>()
                .into_iter()
                .collect(),
        }
    }

    fn option_queries() -> Vec<(&'static str, DependentQuery)> {
        vec![
            ("authors", DependentQuery::AllAuthors),
            ("genres", DependentQuery::AllGenres),
        ]
    }

    fn render_options(
        view: ViewBag,
        record: Option<&Book>,
        options: &RelatedSet,
    ) -> AppResult<ViewBag> {
        let mut view = view;
        for (name, related) in options {
            if *name != "genres" {
                view = view.with_value(name, related.to_view()?);
                continue;
            }
            let selected: &[Uuid] = record.map(|b| b.genre.as_slice()).unwrap_or(&[]);
            let genres: Vec<GenreOption> = related
                .clone()
                .into_genres()?
                .into_iter()
                .map(|genre| GenreOption {
                    checked: selected.contains(&genre.id),
                    genre: GenreView::from(genre),
                })
                .collect();
            view = view.with(name, genres)?;
        }
        Ok(view)
    }

    async fn reference_errors(
        record: &Book,
        store: &dyn CatalogStore,
    ) -> AppResult<Vec<FieldError>> {
        let author = store.get_author(record.author);
        let genres = try_join_all(record.genre.iter().map(|id| store.get_genre(*id)));
        let (author, genres) = tokio::try_join!(author, genres)?;

        let mut errors = Vec::new();
        if author.is_none() {
            errors.push(FieldError::new("author", "Author not found."));
        }
        if genres.iter().any(Option::is_none) {
            errors.push(FieldError::new("genre", "Genre not found."));
        }
        Ok(errors)
    }
}
