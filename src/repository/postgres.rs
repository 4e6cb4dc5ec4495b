//! Postgres entity store

use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    Pool, Postgres, Row,
};
use uuid::Uuid;

use super::CatalogStore;
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::{Author, Book, BookInstance, BookStatus, Genre},
};

const AUTHOR_COLUMNS: &str = "id, first_name, family_name, date_of_birth, date_of_death";
const BOOK_COLUMNS: &str = "id, title, author, summary, isbn, genre";
const INSTANCE_COLUMNS: &str = "id, book, imprint, status, due_back";

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Open a pool and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Database migrations completed");

        Ok(Self::new(pool))
    }

    async fn count(&self, table: &str) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn delete_from(&self, table: &str, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Status is stored as its label
fn instance_from_row(row: &PgRow) -> AppResult<BookInstance> {
    let status: String = row.try_get("status")?;
    let status = BookStatus::parse(&status)
        .ok_or_else(|| AppError::Internal(format!("Unknown book status '{}'", status)))?;

    Ok(BookInstance {
        id: row.try_get("id")?,
        book: row.try_get("book")?,
        imprint: row.try_get("imprint")?,
        status,
        due_back: row.try_get("due_back")?,
    })
}

fn instances_from_rows(rows: &[PgRow]) -> AppResult<Vec<BookInstance>> {
    rows.iter().map(instance_from_row).collect()
}

#[async_trait]
impl CatalogStore for PgStore {
    // =========================================================================
    // AUTHORS
    // =========================================================================

    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY family_name, first_name",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    async fn get_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    async fn insert_author(&self, author: &Author) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(author.id)
        .bind(&author.first_name)
        .bind(&author.family_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_author(&self, author: &Author) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE authors SET
                first_name = $2,
                family_name = $3,
                date_of_birth = $4,
                date_of_death = $5
            WHERE id = $1
            "#,
        )
        .bind(author.id)
        .bind(&author.first_name)
        .bind(&author.family_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<bool> {
        self.delete_from("authors", id).await
    }

    async fn count_authors(&self) -> AppResult<i64> {
        self.count("authors").await
    }

    // =========================================================================
    // GENRES
    // =========================================================================

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    async fn get_genre(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(genre)
    }

    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let genre =
            sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE name = $1 LIMIT 1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(genre)
    }

    async fn insert_genre(&self, genre: &Genre) -> AppResult<()> {
        sqlx::query("INSERT INTO genres (id, name) VALUES ($1, $2)")
            .bind(genre.id)
            .bind(&genre.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_genre(&self, genre: &Genre) -> AppResult<bool> {
        let result = sqlx::query("UPDATE genres SET name = $2 WHERE id = $1")
            .bind(genre.id)
            .bind(&genre.name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_genre(&self, id: Uuid) -> AppResult<bool> {
        self.delete_from("genres", id).await
    }

    async fn count_genres(&self) -> AppResult<i64> {
        self.count("genres").await
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY title",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn get_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE author = $1 ORDER BY title",
            BOOK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE $1 = ANY(genre) ORDER BY title",
            BOOK_COLUMNS
        ))
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn insert_book(&self, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, summary, isbn, genre)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(book.author)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(&book.genre)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_book(&self, book: &Book) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = $2,
                author = $3,
                summary = $4,
                isbn = $5,
                genre = $6
            WHERE id = $1
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(book.author)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(&book.genre)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<bool> {
        self.delete_from("books", id).await
    }

    async fn count_books(&self) -> AppResult<i64> {
        self.count("books").await
    }

    // =========================================================================
    // BOOK INSTANCES
    // =========================================================================

    async fn list_book_instances(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM book_instances ORDER BY due_back",
            INSTANCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        instances_from_rows(&rows)
    }

    async fn get_book_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM book_instances WHERE id = $1",
            INSTANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(instance_from_row).transpose()
    }

    async fn instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM book_instances WHERE book = $1 ORDER BY due_back",
            INSTANCE_COLUMNS
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        instances_from_rows(&rows)
    }

    async fn insert_book_instance(&self, instance: &BookInstance) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(instance.id)
        .bind(instance.book)
        .bind(&instance.imprint)
        .bind(instance.status.as_str())
        .bind(instance.due_back)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_book_instance(&self, instance: &BookInstance) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances SET
                book = $2,
                imprint = $3,
                status = $4,
                due_back = $5
            WHERE id = $1
            "#,
        )
        .bind(instance.id)
        .bind(instance.book)
        .bind(&instance.imprint)
        .bind(instance.status.as_str())
        .bind(instance.due_back)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_book_instance(&self, id: Uuid) -> AppResult<bool> {
        self.delete_from("book_instances", id).await
    }

    async fn count_book_instances(&self) -> AppResult<i64> {
        self.count("book_instances").await
    }

    async fn count_book_instances_by_status(&self, status: BookStatus) -> AppResult<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }
}
