use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn new(raw: &str) -> Result<Self, AuthorNameEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(AuthorNameEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("Author name cannot be empty")]
pub struct AuthorNameEmptyError;

#[derive(Debug, Clone)]
pub struct BookTitle(String);

impl BookTitle {
    pub fn new(raw: &str) -> Result<Self, BookTitleEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(BookTitleEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for BookTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("Book title cannot be empty")]
pub struct BookTitleEmptyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(raw: &str) -> Result<Self, InvalidIsbnError> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | ' '))
            .collect::<String>()
            .to_uppercase();
        if Self::is_valid(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(InvalidIsbnError(raw.trim().into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    fn is_valid(s: &str) -> bool {
        static RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^(?:\d{9}[\dX]|\d{13})$").unwrap());
        RE.is_match(s)
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("{0} is not a valid ISBN")]
pub struct InvalidIsbnError(String);

#[derive(Debug)]
pub struct Author {
    id: i64,
    name: AuthorName,
    birth_date: NaiveDate,
    date_of_death: Option<NaiveDate>,
}

impl Author {
    pub const fn new(
        id: i64,
        name: AuthorName,
        birth_date: NaiveDate,
        date_of_death: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            name,
            birth_date,
            date_of_death,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub const fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub const fn date_of_death(&self) -> Option<NaiveDate> {
        self.date_of_death
    }
}

#[derive(Debug)]
pub struct Book {
    id: i64,
    author_id: i64,
    isbn: Isbn,
    title: BookTitle,
    cover: Option<String>,
    publication_date: Option<NaiveDate>,
}

impl Book {
    pub const fn new(
        id: i64,
        author_id: i64,
        isbn: Isbn,
        title: BookTitle,
        cover: Option<String>,
        publication_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            author_id,
            isbn,
            title,
            cover,
            publication_date,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn author_id(&self) -> i64 {
        self.author_id
    }

    pub const fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub const fn title(&self) -> &BookTitle {
        &self.title
    }

    pub fn cover(&self) -> Option<&str> {
        self.cover.as_deref()
    }

    pub const fn publication_date(&self) -> Option<NaiveDate> {
        self.publication_date
    }
}

#[derive(Debug)]
pub struct BookListing {
    book_id: i64,
    author_id: i64,
    title: String,
    cover: Option<String>,
    author_name: String,
}

impl BookListing {
    pub const fn new(
        book_id: i64,
        author_id: i64,
        title: String,
        cover: Option<String>,
        author_name: String,
    ) -> Self {
        Self {
            book_id,
            author_id,
            title,
            cover,
            author_name,
        }
    }

    pub const fn book_id(&self) -> i64 {
        self.book_id
    }

    pub const fn author_id(&self) -> i64 {
        self.author_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cover(&self) -> Option<&str> {
        self.cover.as_deref()
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    AuthorName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookOrdering {
    key: SortKey,
    direction: SortDirection,
}

impl BookOrdering {
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Anything other than a recognized sort/direction pair yields `None`,
    /// which callers treat as the unordered listing.
    pub fn from_params(sort: Option<&str>, direction: Option<&str>) -> Option<Self> {
        let key = match sort? {
            "title" => SortKey::Title,
            "author" => SortKey::AuthorName,
            _ => return None,
        };
        let direction = match direction? {
            "asc" => SortDirection::Ascending,
            "desc" => SortDirection::Descending,
            _ => return None,
        };
        Some(Self { key, direction })
    }

    pub const fn key(&self) -> SortKey {
        self.key
    }

    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

#[derive(Debug)]
pub struct CreateAuthorRequest {
    name: AuthorName,
    birth_date: NaiveDate,
    date_of_death: Option<NaiveDate>,
}

impl CreateAuthorRequest {
    pub const fn new(
        name: AuthorName,
        birth_date: NaiveDate,
        date_of_death: Option<NaiveDate>,
    ) -> Self {
        Self {
            name,
            birth_date,
            date_of_death,
        }
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub const fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub const fn date_of_death(&self) -> Option<NaiveDate> {
        self.date_of_death
    }
}

#[derive(Error, Debug)]
pub enum CreateAuthorError {
    #[error("Author with name \"{name}\" already exists")]
    Duplicate { name: String },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct CreateBookRequest {
    author_id: i64,
    isbn: Isbn,
    title: BookTitle,
    publication_date: Option<NaiveDate>,
    cover: Option<String>,
}

impl CreateBookRequest {
    pub const fn new(
        author_id: i64,
        isbn: Isbn,
        title: BookTitle,
        publication_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            author_id,
            isbn,
            title,
            publication_date,
            cover: None,
        }
    }

    pub const fn author_id(&self) -> i64 {
        self.author_id
    }

    pub const fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub const fn title(&self) -> &BookTitle {
        &self.title
    }

    pub const fn publication_date(&self) -> Option<NaiveDate> {
        self.publication_date
    }

    pub fn cover(&self) -> Option<&str> {
        self.cover.as_deref()
    }

    pub fn set_cover(&mut self, cover: String) {
        self.cover = Some(cover);
    }
}

#[derive(Error, Debug)]
pub enum CreateBookError {
    #[error("Author with id \"{author_id}\" does not exist")]
    AuthorNotFound { author_id: i64 },
    #[error("Book with ISBN \"{isbn}\" already exists")]
    DuplicateIsbn { isbn: String },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct FindAuthorRequest {
    id: i64,
}

impl FindAuthorRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindAuthorError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct FindBookRequest {
    id: i64,
}

impl FindBookRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindBookError(#[from] pub anyhow::Error);

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindAllAuthorsError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct DeleteAuthorRequest {
    id: i64,
}

impl DeleteAuthorRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: i64,
}

impl DeleteBookRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteBookError {
    #[error("Book with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct SearchBooksRequest {
    fragment: String,
}

impl SearchBooksRequest {
    pub fn new(fragment: &str) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct SearchBooksError(#[from] pub anyhow::Error);

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ListBooksError(#[from] pub anyhow::Error);
