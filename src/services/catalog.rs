//! Catalog service: the read, form and delete operations behind every page

use serde::Serialize;
use uuid::Uuid;

use super::{
    aggregate::{self, RelatedSet},
    forms::{self, EntityForm, FormContext, FormOutcome, RawForm},
    integrity::{self, DeleteOutcome},
    view::ViewBag,
};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorView, Book, BookStatus, EntityKind, Genre, GenreView},
    repository::{relations, DependentQuery, Record, Repository},
};

/// Record counts shown on the catalog home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

/// Result of a delete submission
#[derive(Debug)]
pub enum DeletePage {
    /// Removed; go back to the listing
    Redirect(String),
    /// Refused; the confirmation page, listing what still references the record
    Blocked(ViewBag),
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Count every collection at once
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let store = self.repository.as_ref();
        let (books, copies, available, authors, genres) = tokio::try_join!(
            store.count_books(),
            store.count_book_instances(),
            store.count_book_instances_by_status(BookStatus::Available),
            store.count_authors(),
            store.count_genres(),
        )?;

        Ok(CatalogCounts {
            book_count: books,
            book_instance_count: copies,
            book_instance_available_count: available,
            author_count: authors,
            genre_count: genres,
        })
    }

    pub async fn summary(&self) -> AppResult<ViewBag> {
        ViewBag::titled("Local Library Home").with("data", self.counts().await?)
    }

    // Listings

    pub async fn book_list(&self) -> AppResult<ViewBag> {
        let books = relations::all_books_populated(self.repository.as_ref()).await?;
        ViewBag::titled("Book List").with("book_list", books)
    }

    pub async fn author_list(&self) -> AppResult<ViewBag> {
        let authors: Vec<AuthorView> = self
            .repository
            .list_authors()
            .await?
            .into_iter()
            .map(AuthorView::from)
            .collect();
        ViewBag::titled("Author List").with("author_list", authors)
    }

    pub async fn genre_list(&self) -> AppResult<ViewBag> {
        let genres: Vec<GenreView> = self
            .repository
            .list_genres()
            .await?
            .into_iter()
            .map(GenreView::from)
            .collect();
        ViewBag::titled("Genre List").with("genre_list", genres)
    }

    pub async fn bookinstance_list(&self) -> AppResult<ViewBag> {
        let copies = relations::all_copies_populated(self.repository.as_ref()).await?;
        ViewBag::titled("Book Instance List").with("bookinstance_list", copies)
    }

    // Detail views

    /// A book with its author and genres resolved, and its copies
    pub async fn book_detail(&self, id: Uuid) -> AppResult<ViewBag> {
        let store = self.repository.as_ref();
        let aggregate =
            aggregate::fetch::<Book>(store, id, &[("book_instances", DependentQuery::CopiesOfBook(id))])
                .await?;

        let book = relations::populate_book(store, aggregate.primary).await?;
        ViewBag::titled(book.title.clone())
            .with("book", book)?
            .with_related(&aggregate.related)
    }

    pub async fn genre_detail(&self, id: Uuid) -> AppResult<ViewBag> {
        let aggregate = aggregate::fetch::<Genre>(
            self.repository.as_ref(),
            id,
            &[("genre_books", DependentQuery::BooksInGenre(id))],
        )
        .await?;

        ViewBag::titled("Genre Detail")
            .with_value("genre", aggregate.primary.view()?)
            .with_related(&aggregate.related)
    }

    pub async fn author_detail(&self, id: Uuid) -> AppResult<ViewBag> {
        let aggregate = aggregate::fetch::<Author>(
            self.repository.as_ref(),
            id,
            &[("author_books", DependentQuery::BooksByAuthor(id))],
        )
        .await?;

        ViewBag::titled("Author Detail")
            .with_value("author", aggregate.primary.view()?)
            .with_related(&aggregate.related)
    }

    /// A copy with its book resolved
    pub async fn bookinstance_detail(&self, id: Uuid) -> AppResult<ViewBag> {
        let store = self.repository.as_ref();
        let instance = store
            .get_book_instance(id)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::BookInstance, id))?;

        let copy = relations::populate_copy(store, instance).await?;
        let title = match &copy.book {
            Some(book) => format!("Copy: {}", book.book.title),
            None => "Copy".to_string(),
        };
        ViewBag::titled(title).with("bookinstance", copy)
    }

    // Forms

    /// The create or update form, with its option lists
    pub async fn form<F: EntityForm>(&self, ctx: &FormContext) -> AppResult<ViewBag> {
        forms::prefill::<F>(self.repository.as_ref(), ctx).await
    }

    pub async fn submit<F: EntityForm>(
        &self,
        ctx: &FormContext,
        raw: RawForm,
    ) -> AppResult<FormOutcome> {
        forms::submit::<F>(self.repository.as_ref(), ctx, raw).await
    }

    // Deletion

    /// The delete confirmation page: the record and whatever references it
    pub async fn delete_confirmation<P: Record>(&self, id: Uuid) -> AppResult<ViewBag> {
        let aggregate =
            aggregate::fetch::<P>(self.repository.as_ref(), id, &P::dependents(id)).await?;
        delete_view(&aggregate.primary, &aggregate.related)
    }

    pub async fn delete<P: Record>(&self, id: Uuid) -> AppResult<DeletePage> {
        match integrity::attempt_delete::<P>(self.repository.as_ref(), id).await? {
            DeleteOutcome::Deleted => Ok(DeletePage::Redirect(P::KIND.list_path())),
            DeleteOutcome::Blocked { entity, dependents } => {
                Ok(DeletePage::Blocked(delete_view(&entity, &dependents)?))
            }
        }
    }
}

fn delete_view<P: Record>(entity: &P, dependents: &RelatedSet) -> AppResult<ViewBag> {
    ViewBag::titled(format!("Delete {}", P::KIND.label()))
        .with_value(P::KIND.key(), entity.view()?)
        .with_related(dependents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookInstance, GenreForm};
    use crate::repository::{CatalogStore, MemoryStore, MockCatalogStore};
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct Fixture {
        service: CatalogService,
        store: MemoryStore,
        author: Author,
        genre: Genre,
        book: Book,
        copies: Vec<BookInstance>,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let author = Author {
            id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            family_name: "Austen".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1775, 12, 16),
            date_of_death: NaiveDate::from_ymd_opt(1817, 7, 18),
        };
        let genre = Genre {
            id: Uuid::new_v4(),
            name: "Romance".to_string(),
        };
        let book = Book {
            id: Uuid::new_v4(),
            title: "Emma".to_string(),
            author: author.id,
            summary: "Matchmaking in Highbury".to_string(),
            isbn: "9780141439587".to_string(),
            genre: vec![genre.id],
        };
        let copies: Vec<BookInstance> = [BookStatus::Available, BookStatus::Loaned]
            .into_iter()
            .enumerate()
            .map(|(i, status)| BookInstance {
                id: Uuid::new_v4(),
                book: book.id,
                imprint: format!("Penguin, printing {}", i + 1),
                status,
                due_back: NaiveDate::from_ymd_opt(2026, 11, 1 + i as u32).unwrap(),
            })
            .collect();

        store.insert_author(&author).await.unwrap();
        store.insert_genre(&genre).await.unwrap();
        store.insert_book(&book).await.unwrap();
        for copy in &copies {
            store.insert_book_instance(copy).await.unwrap();
        }

        Fixture {
            service: CatalogService::new(Arc::new(store.clone())),
            store,
            author,
            genre,
            book,
            copies,
        }
    }

    #[tokio::test]
    async fn test_counts() {
        let f = fixture().await;
        let counts = f.service.counts().await.unwrap();
        assert_eq!(
            counts,
            CatalogCounts {
                book_count: 1,
                book_instance_count: 2,
                book_instance_available_count: 1,
                author_count: 1,
                genre_count: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_summary_fails_when_any_count_fails() {
        let mut store = MockCatalogStore::new();
        store.expect_count_books().returning(|| Ok(1));
        store.expect_count_book_instances().returning(|| Ok(1));
        store
            .expect_count_book_instances_by_status()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        store.expect_count_authors().returning(|| Ok(1));
        store.expect_count_genres().returning(|| Ok(1));

        let service = CatalogService::new(Arc::new(store));
        assert!(matches!(
            service.summary().await.unwrap_err(),
            AppError::Database(_)
        ));
    }

    #[tokio::test]
    async fn test_book_detail_joins_book_and_copies() {
        let f = fixture().await;

        let view = f.service.book_detail(f.book.id).await.unwrap();

        assert_eq!(view.title(), Some("Emma"));
        assert_eq!(view.get("book").unwrap()["author"]["name"], "Austen, Jane");
        assert_eq!(view.get("book").unwrap()["genre"][0]["name"], "Romance");
        let copies = view.get("book_instances").unwrap().as_array().unwrap();
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0]["id"], f.copies[0].id.to_string());
        assert_eq!(copies[0]["due_back_formatted"], "November 1st, 2026");
    }

    #[tokio::test]
    async fn test_missing_book_detail_is_not_found() {
        let f = fixture().await;
        let err = f.service.book_detail(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_author_and_genre_details_list_books() {
        let f = fixture().await;

        let author = f.service.author_detail(f.author.id).await.unwrap();
        assert_eq!(author.get("author").unwrap()["lifespan"], "December 16th, 1775 - July 18th, 1817");
        assert_eq!(author.get("author_books").unwrap()[0]["title"], "Emma");

        let genre = f.service.genre_detail(f.genre.id).await.unwrap();
        assert_eq!(genre.title(), Some("Genre Detail"));
        assert_eq!(genre.get("genre_books").unwrap()[0]["title"], "Emma");
    }

    #[tokio::test]
    async fn test_bookinstance_detail_resolves_book() {
        let f = fixture().await;
        let view = f.service.bookinstance_detail(f.copies[1].id).await.unwrap();
        assert_eq!(view.title(), Some("Copy: Emma"));
        assert_eq!(view.get("bookinstance").unwrap()["status"], "Loaned");
        assert_eq!(view.get("bookinstance").unwrap()["book"]["url"], f.book.url());
    }

    #[tokio::test]
    async fn test_listings() {
        let f = fixture().await;
        let books = f.service.book_list().await.unwrap();
        assert_eq!(books.get("book_list").unwrap()[0]["author"]["name"], "Austen, Jane");

        let copies = f.service.bookinstance_list().await.unwrap();
        assert_eq!(copies.get("bookinstance_list").unwrap().as_array().unwrap().len(), 2);

        let authors = f.service.author_list().await.unwrap();
        assert_eq!(authors.get("author_list").unwrap()[0]["url"], f.author.url());

        let genres = f.service.genre_list().await.unwrap();
        assert_eq!(genres.get("genre_list").unwrap()[0]["name"], "Romance");
    }

    #[tokio::test]
    async fn test_delete_blocked_then_allowed_bottom_up() {
        let f = fixture().await;

        match f.service.delete::<Book>(f.book.id).await.unwrap() {
            DeletePage::Blocked(view) => {
                assert_eq!(view.title(), Some("Delete Book"));
                assert_eq!(view.get("book_instances").unwrap().as_array().unwrap().len(), 2);
            }
            DeletePage::Redirect(_) => panic!("book with copies was deleted"),
        }

        for copy in &f.copies {
            let page = f.service.delete::<BookInstance>(copy.id).await.unwrap();
            assert!(matches!(page, DeletePage::Redirect(ref to) if to == "/catalog/bookinstances"));
        }
        let page = f.service.delete::<Book>(f.book.id).await.unwrap();
        assert!(matches!(page, DeletePage::Redirect(ref to) if to == "/catalog/books"));
        assert!(f.store.get_book(f.book.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_confirmation_lists_dependents() {
        let f = fixture().await;
        let view = f.service.delete_confirmation::<Genre>(f.genre.id).await.unwrap();
        assert_eq!(view.title(), Some("Delete Genre"));
        assert_eq!(view.get("genre").unwrap()["name"], "Romance");
        assert_eq!(view.get("genre_books").unwrap().as_array().unwrap().len(), 1);

        let err = f
            .service
            .delete_confirmation::<Genre>(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_goes_through_the_form_pipeline() {
        let f = fixture().await;
        let outcome = f
            .service
            .submit::<GenreForm>(&FormContext::create(), RawForm::new().with("name", "Romance"))
            .await
            .unwrap();
        assert!(matches!(outcome, FormOutcome::Redirect(ref to) if *to == f.genre.url()));
    }
}
