use crate::cover::CoverResolver;
use crate::http::AppState;
use crate::model::{
    Author, AuthorName, AuthorNameEmptyError, Book, BookListing, BookOrdering, BookTitle,
    BookTitleEmptyError, CreateAuthorError, CreateAuthorRequest, CreateBookError,
    CreateBookRequest, DeleteAuthorError, DeleteAuthorRequest, DeleteBookError, DeleteBookRequest,
    FindAllAuthorsError, FindAuthorError, FindAuthorRequest, FindBookError, FindBookRequest,
    InvalidIsbnError, Isbn, ListBooksError, SearchBooksError, SearchBooksRequest,
};
use crate::store::CatalogRepository;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponse<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self(status, Json(ApiResponse::new(status, data)))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> axum::response::Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    status_code: u16,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    const fn new(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    InternalServerError(String),
    Conflict(String),
    NotFound(String),
    UnprocessableEntity(String),
}

impl ApiError {
    fn internal(cause: &anyhow::Error) -> Self {
        tracing::error!("{:#}", cause);
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };
        (status, Json(ApiResponse::new(status, msg))).into_response()
    }
}

impl From<ParseCreateAuthorHttpRequestError> for ApiError {
    fn from(err: ParseCreateAuthorHttpRequestError) -> Self {
        Self::UnprocessableEntity(err.to_string())
    }
}

impl From<ParseCreateBookHttpRequestError> for ApiError {
    fn from(err: ParseCreateBookHttpRequestError) -> Self {
        Self::UnprocessableEntity(err.to_string())
    }
}

impl From<CreateAuthorError> for ApiError {
    fn from(err: CreateAuthorError) -> Self {
        match err {
            CreateAuthorError::Duplicate { name } => {
                Self::Conflict(format!("author with name \"{name}\" already exists"))
            }
            CreateAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<CreateBookError> for ApiError {
    fn from(err: CreateBookError) -> Self {
        match err {
            CreateBookError::AuthorNotFound { author_id } => {
                Self::UnprocessableEntity(format!("author with id \"{author_id}\" does not exist"))
            }
            CreateBookError::DuplicateIsbn { isbn } => {
                Self::Conflict(format!("book with ISBN \"{isbn}\" already exists"))
            }
            CreateBookError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<DeleteAuthorError> for ApiError {
    fn from(err: DeleteAuthorError) -> Self {
        match err {
            DeleteAuthorError::NotFound { id } => {
                Self::NotFound(format!("author with id \"{id}\" does not exist"))
            }
            DeleteAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<DeleteBookError> for ApiError {
    fn from(err: DeleteBookError) -> Self {
        match err {
            DeleteBookError::NotFound { id } => {
                Self::NotFound(format!("book with id \"{id}\" does not exist"))
            }
            DeleteBookError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<FindAuthorError> for ApiError {
    fn from(err: FindAuthorError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<FindBookError> for ApiError {
    fn from(err: FindBookError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<FindAllAuthorsError> for ApiError {
    fn from(err: FindAllAuthorsError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<SearchBooksError> for ApiError {
    fn from(err: SearchBooksError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<ListBooksError> for ApiError {
    fn from(err: ListBooksError) -> Self {
        Self::internal(&err.0)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAuthorHttpRequest {
    name: String,
    birth_date: String,
    date_of_death: Option<String>,
}

#[derive(Debug, Error)]
pub enum ParseCreateAuthorHttpRequestError {
    #[error(transparent)]
    Name(#[from] AuthorNameEmptyError),
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    BirthDate(String),
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    DateOfDeath(String),
}

impl TryFrom<CreateAuthorHttpRequest> for CreateAuthorRequest {
    type Error = ParseCreateAuthorHttpRequestError;

    fn try_from(value: CreateAuthorHttpRequest) -> Result<Self, Self::Error> {
        let name = AuthorName::new(&value.name)?;
        let birth_date = parse_date(&value.birth_date)
            .map_err(ParseCreateAuthorHttpRequestError::BirthDate)?;
        let date_of_death = parse_optional_date(value.date_of_death.as_deref())
            .map_err(ParseCreateAuthorHttpRequestError::DateOfDeath)?;
        Ok(Self::new(name, birth_date, date_of_death))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBookHttpRequest {
    author_id: i64,
    isbn: String,
    title: String,
    publication_date: Option<String>,
}

#[derive(Debug, Error)]
pub enum ParseCreateBookHttpRequestError {
    #[error(transparent)]
    Isbn(#[from] InvalidIsbnError),
    #[error(transparent)]
    Title(#[from] BookTitleEmptyError),
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    PublicationDate(String),
}

impl TryFrom<CreateBookHttpRequest> for CreateBookRequest {
    type Error = ParseCreateBookHttpRequestError;

    fn try_from(value: CreateBookHttpRequest) -> Result<Self, Self::Error> {
        let isbn = Isbn::new(&value.isbn)?;
        let title = BookTitle::new(&value.title)?;
        let publication_date = parse_optional_date(value.publication_date.as_deref())
            .map_err(ParseCreateBookHttpRequestError::PublicationDate)?;
        Ok(Self::new(value.author_id, isbn, title, publication_date))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    trimmed.parse().map_err(|_| trimmed.to_string())
}

fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_date(raw).map(Some),
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorHttpResponse {
    id: i64,
    name: String,
    birth_date: NaiveDate,
    date_of_death: Option<NaiveDate>,
}

impl From<Author> for AuthorHttpResponse {
    fn from(value: Author) -> Self {
        Self {
            id: value.id(),
            name: value.name().to_string(),
            birth_date: value.birth_date(),
            date_of_death: value.date_of_death(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookHttpResponse {
    id: i64,
    author_id: i64,
    isbn: String,
    title: String,
    cover: Option<String>,
    publication_date: Option<NaiveDate>,
}

impl From<Book> for BookHttpResponse {
    fn from(value: Book) -> Self {
        Self {
            id: value.id(),
            author_id: value.author_id(),
            isbn: value.isbn().to_string(),
            title: value.title().to_string(),
            cover: value.cover().map(str::to_string),
            publication_date: value.publication_date(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookDetailsHttpResponse {
    book: BookHttpResponse,
    author: AuthorHttpResponse,
}

#[derive(Debug, Serialize)]
pub struct BookListingHttpResponse {
    id: i64,
    author_id: i64,
    title: String,
    cover: Option<String>,
    author: String,
}

impl From<BookListing> for BookListingHttpResponse {
    fn from(value: BookListing) -> Self {
        Self {
            id: value.book_id(),
            author_id: value.author_id(),
            title: value.title().to_string(),
            cover: value.cover().map(str::to_string),
            author: value.author_name().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateAuthorHttpResponse {
    id: i64,
}

impl From<Author> for CreateAuthorHttpResponse {
    fn from(value: Author) -> Self {
        Self { id: value.id() }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateBookHttpResponse {
    id: i64,
    cover: Option<String>,
}

impl From<Book> for CreateBookHttpResponse {
    fn from(value: Book) -> Self {
        Self {
            id: value.id(),
            cover: value.cover().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedHttpResponse {
    id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListBooksHttpQuery {
    sort: Option<String>,
    direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchBooksHttpQuery {
    title: String,
}

pub async fn create_author<R: CatalogRepository, C: CoverResolver>(
    State(state): State<AppState<R, C>>,
    Json(body): Json<CreateAuthorHttpRequest>,
) -> Result<ApiSuccess<CreateAuthorHttpResponse>, ApiError> {
    let req = body.try_into()?;
    state
        .catalog
        .create_author(&req)
        .await
        .map_err(ApiError::from)
        .map(|author| ApiSuccess::new(StatusCode::CREATED, author.into()))
}

pub async fn create_book<R: CatalogRepository, C: CoverResolver>(
    State(state): State<AppState<R, C>>,
    Json(body): Json<CreateBookHttpRequest>,
) -> Result<ApiSuccess<CreateBookHttpResponse>, ApiError> {
    let req: CreateBookRequest = body.try_into()?;
    state
        .catalog
        .create_book(req)
        .await
        .map_err(ApiError::from)
        .map(|book| ApiSuccess::new(StatusCode::CREATED, book.into()))
}

pub async fn get_author<R: CatalogRepository, C: CoverResolver>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<AuthorHttpResponse>, ApiError> {
    let author = state
        .catalog
        .find_author(&FindAuthorRequest::new(id))
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound(format!("author with id \"{id}\" does not exist")))?;

    Ok(ApiSuccess::new(StatusCode::OK, author.into()))
}

pub async fn get_book_details<R: CatalogRepository, C: CoverResolver>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<BookDetailsHttpResponse>, ApiError> {
    let book = state
        .catalog
        .find_book(&FindBookRequest::new(id))
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound(format!("book with id \"{id}\" does not exist")))?;

    let author = state
        .catalog
        .find_author(&FindAuthorRequest::new(book.author_id()))
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            tracing::error!(
                book_id = id,
                author_id = book.author_id(),
                "book references a missing author"
            );
            ApiError::InternalServerError("Internal server error".to_string())
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        BookDetailsHttpResponse {
            book: book.into(),
            author: author.into(),
        },
    ))
}

pub async fn list_authors<R: CatalogRepository, C: CoverResolver>(
    State(state): State<AppState<R, C>>,
) -> Result<ApiSuccess<Vec<AuthorHttpResponse>>, ApiError> {
    state
        .catalog
        .find_all_authors()
        .await
        .map_err(ApiError::from)
        .map(|authors| {
            ApiSuccess::new(
                StatusCode::OK,
                authors.into_iter().map(AuthorHttpResponse::from).collect(),
            )
        })
}

pub async fn list_books<R: CatalogRepository, C: CoverResolver>(
    State(state): State<AppState<R, C>>,
    Query(query): Query<ListBooksHttpQuery>,
) -> Result<ApiSuccess<Vec<BookListingHttpResponse>>, ApiError> {
    let ordering = BookOrdering::from_params(query.sort.as_deref(), query.direction.as_deref());
    state
        .catalog
        .list_books(ordering)
        .await
        .map_err(ApiError::from)
        .map(|listings| {
            ApiSuccess::new(
                StatusCode::OK,
                listings
                    .into_iter()
                    .map(BookListingHttpResponse::from)
                    .collect(),
            )
        })
}

pub async fn search_books<R: CatalogRepository, C: CoverResolver>(
    State(state): State<AppState<R, C>>,
    Query(query): Query<SearchBooksHttpQuery>,
) -> Result<ApiSuccess<Vec<BookListingHttpResponse>>, ApiError> {
    let req = SearchBooksRequest::new(&query.title);
    state
        .catalog
        .search_books(&req)
        .await
        .map_err(ApiError::from)
        .map(|listings| {
            ApiSuccess::new(
                StatusCode::OK,
                listings
                    .into_iter()
                    .map(BookListingHttpResponse::from)
                    .collect(),
            )
        })
}

pub async fn delete_book<R: CatalogRepository, C: CoverResolver>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<DeletedHttpResponse>, ApiError> {
    state
        .catalog
        .delete_book(&DeleteBookRequest::new(id))
        .await
        .map_err(ApiError::from)
        .map(|()| ApiSuccess::new(StatusCode::OK, DeletedHttpResponse { id }))
}

pub async fn delete_author<R: CatalogRepository, C: CoverResolver>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<DeletedHttpResponse>, ApiError> {
    state
        .catalog
        .delete_author(&DeleteAuthorRequest::new(id))
        .await
        .map_err(ApiError::from)
        .map(|()| ApiSuccess::new(StatusCode::OK, DeletedHttpResponse { id }))
}
