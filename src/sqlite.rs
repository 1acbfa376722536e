use crate::model::{
    Author, AuthorName, Book, BookListing, BookOrdering, BookTitle, CreateAuthorError,
    CreateAuthorRequest, CreateBookError, CreateBookRequest, DeleteAuthorError,
    DeleteAuthorRequest, DeleteBookError, DeleteBookRequest, FindAllAuthorsError, FindAuthorError,
    FindAuthorRequest, FindBookError, FindBookRequest, Isbn, ListBooksError, SearchBooksError,
    SearchBooksRequest, SortDirection, SortKey,
};
use crate::store::CatalogRepository;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!();

const LISTING_QUERY: &str = "SELECT b.id, b.author_id, b.title, b.cover, a.name AS author_name \
     FROM book b JOIN author a ON b.author_id = a.id";

#[derive(Debug, Clone)]
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::from_str(path)
            .with_context(|| format!("Invalid database path {path}"))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePool::connect_with(opts)
            .await
            .with_context(|| format!("Failed to open database at {path}"))?;

        MIGRATOR.run(&pool).await?;

        Ok(Self { pool })
    }
}

impl<'r> FromRow<'r, SqliteRow> for Author {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let name = row.try_get("name")?;
        let birth_date = row.try_get("birth_date")?;
        let date_of_death = row.try_get("date_of_death")?;

        let name = AuthorName::new_unchecked(name);
        Ok(Self::new(id, name, birth_date, date_of_death))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Book {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let author_id = row.try_get("author_id")?;
        let isbn = row.try_get("isbn")?;
        let title = row.try_get("title")?;
        let cover = row.try_get("cover")?;
        let publication_date = row.try_get("publication_date")?;

        let isbn = Isbn::new_unchecked(isbn);
        let title = BookTitle::new_unchecked(title);
        Ok(Self::new(id, author_id, isbn, title, cover, publication_date))
    }
}

impl<'r> FromRow<'r, SqliteRow> for BookListing {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let book_id = row.try_get("id")?;
        let author_id = row.try_get("author_id")?;
        let title = row.try_get("title")?;
        let cover = row.try_get("cover")?;
        let author_name = row.try_get("author_name")?;

        Ok(Self::new(book_id, author_id, title, cover, author_name))
    }
}

#[async_trait]
impl CatalogRepository for Sqlite {
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError> {
        let author = sqlx::query_as(
            "INSERT INTO author (name, birth_date, date_of_death) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(req.name().to_string())
        .bind(req.birth_date())
        .bind(req.date_of_death())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                CreateAuthorError::Duplicate {
                    name: req.name().to_string(),
                }
            } else {
                let err = anyhow!(err).context(format!(
                    r#"Failed to create author with name "{}""#,
                    req.name()
                ));
                CreateAuthorError::Other(err)
            }
        })?;

        Ok(author)
    }

    async fn find_author(
        &self,
        req: &FindAuthorRequest,
    ) -> Result<Option<Author>, FindAuthorError> {
        let author = sqlx::query_as(
            "SELECT id, name, birth_date, date_of_death FROM author WHERE id = ?",
        )
        .bind(req.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context(format!(
                r#"Failed to retrieve author with id "{}""#,
                req.id()
            ));
            FindAuthorError(err)
        })?;

        Ok(author)
    }

    async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError> {
        let authors = sqlx::query_as(
            "SELECT id, name, birth_date, date_of_death FROM author ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context("Failed to retrieve all authors");
            FindAllAuthorsError(err)
        })?;

        Ok(authors)
    }

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError> {
        // ON DELETE CASCADE removes the author's books in the same statement.
        let result = sqlx::query("DELETE FROM author WHERE id = ?")
            .bind(req.id())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                anyhow!(err).context(format!(r#"Failed to delete author with id "{}""#, req.id()))
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteAuthorError::NotFound { id: req.id() });
        }

        Ok(())
    }

    async fn create_book(&self, req: &CreateBookRequest) -> Result<Book, CreateBookError> {
        let book = sqlx::query_as(
            "INSERT INTO book (author_id, isbn, title, cover, publication_date) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(req.author_id())
        .bind(req.isbn().to_string())
        .bind(req.title().to_string())
        .bind(req.cover())
        .bind(req.publication_date())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                CreateBookError::AuthorNotFound {
                    author_id: req.author_id(),
                }
            } else if is_unique_violation(&err) {
                CreateBookError::DuplicateIsbn {
                    isbn: req.isbn().to_string(),
                }
            } else {
                let err = anyhow!(err).context(format!(
                    r#"Failed to create book with ISBN "{}""#,
                    req.isbn()
                ));
                CreateBookError::Other(err)
            }
        })?;

        Ok(book)
    }

    async fn find_book(&self, req: &FindBookRequest) -> Result<Option<Book>, FindBookError> {
        let book = sqlx::query_as(
            "SELECT id, author_id, isbn, title, cover, publication_date FROM book WHERE id = ?",
        )
        .bind(req.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            let err =
                anyhow!(err).context(format!(r#"Failed to retrieve book with id "{}""#, req.id()));
            FindBookError(err)
        })?;

        Ok(book)
    }

    async fn delete_book(&self, req: &DeleteBookRequest) -> Result<(), DeleteBookError> {
        let result = sqlx::query("DELETE FROM book WHERE id = ?")
            .bind(req.id())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                anyhow!(err).context(format!(r#"Failed to delete book with id "{}""#, req.id()))
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteBookError::NotFound { id: req.id() });
        }

        Ok(())
    }

    async fn search_books(
        &self,
        req: &SearchBooksRequest,
    ) -> Result<Vec<BookListing>, SearchBooksError> {
        let pattern = format!("%{}%", req.fragment().to_lowercase());
        let listings = sqlx::query_as(&format!("{LISTING_QUERY} WHERE lower(b.title) LIKE ?"))
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context(format!(
                    r#"Failed to search books with title fragment "{}""#,
                    req.fragment()
                ));
                SearchBooksError(err)
            })?;

        Ok(listings)
    }

    async fn list_books(
        &self,
        ordering: Option<BookOrdering>,
    ) -> Result<Vec<BookListing>, ListBooksError> {
        let query = match ordering {
            None => LISTING_QUERY.to_string(),
            Some(ordering) => {
                let column = match ordering.key() {
                    SortKey::Title => "b.title",
                    SortKey::AuthorName => "a.name",
                };
                let direction = match ordering.direction() {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                format!("{LISTING_QUERY} ORDER BY {column} {direction}")
            }
        };

        let listings = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context("Failed to list books");
                ListBooksError(err)
            })?;

        Ok(listings)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_unique_violation();
    }

    false
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_foreign_key_violation();
    }

    false
}
