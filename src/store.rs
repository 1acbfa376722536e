use crate::model::{
    Author, Book, BookListing, BookOrdering, CreateAuthorError, CreateAuthorRequest,
    CreateBookError, CreateBookRequest, DeleteAuthorError, DeleteAuthorRequest, DeleteBookError,
    DeleteBookRequest, FindAllAuthorsError, FindAuthorError, FindAuthorRequest, FindBookError,
    FindBookRequest, ListBooksError, SearchBooksError, SearchBooksRequest,
};
use async_trait::async_trait;

#[async_trait]
pub trait CatalogRepository: Send + Sync + 'static {
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError>;

    async fn find_author(&self, req: &FindAuthorRequest)
    -> Result<Option<Author>, FindAuthorError>;

    async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError>;

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError>;

    async fn create_book(&self, req: &CreateBookRequest) -> Result<Book, CreateBookError>;

    async fn find_book(&self, req: &FindBookRequest) -> Result<Option<Book>, FindBookError>;

    async fn delete_book(&self, req: &DeleteBookRequest) -> Result<(), DeleteBookError>;

    async fn search_books(
        &self,
        req: &SearchBooksRequest,
    ) -> Result<Vec<BookListing>, SearchBooksError>;

    async fn list_books(
        &self,
        ordering: Option<BookOrdering>,
    ) -> Result<Vec<BookListing>, ListBooksError>;
}
