use crate::cover::CoverResolver;
use crate::model::{
    Author, Book, BookListing, BookOrdering, CreateAuthorError, CreateAuthorRequest,
    CreateBookError, CreateBookRequest, DeleteAuthorError, DeleteAuthorRequest, DeleteBookError,
    DeleteBookRequest, FindAllAuthorsError, FindAuthorError, FindAuthorRequest, FindBookError,
    FindBookRequest, ListBooksError, SearchBooksError, SearchBooksRequest,
};
use crate::store::CatalogRepository;

#[derive(Debug)]
pub struct Catalog<R, C> {
    repo: R,
    covers: C,
}

impl<R, C> Catalog<R, C>
where
    R: CatalogRepository,
    C: CoverResolver,
{
    pub const fn new(repo: R, covers: C) -> Self {
        Self { repo, covers }
    }

    pub async fn create_author(
        &self,
        req: &CreateAuthorRequest,
    ) -> Result<Author, CreateAuthorError> {
        self.repo.create_author(req).await
    }

    pub async fn find_author(
        &self,
        req: &FindAuthorRequest,
    ) -> Result<Option<Author>, FindAuthorError> {
        self.repo.find_author(req).await
    }

    pub async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError> {
        self.repo.find_all_authors().await
    }

    pub async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError> {
        self.repo.delete_author(req).await
    }

    /// A failed cover lookup leaves the cover empty; book creation proceeds.
    pub async fn create_book(
        &self,
        mut req: CreateBookRequest,
    ) -> Result<Book, CreateBookError> {
        if let Some(url) = self.covers.resolve_cover(req.isbn()).await {
            req.set_cover(url);
        }

        self.repo.create_book(&req).await
    }

    pub async fn find_book(&self, req: &FindBookRequest) -> Result<Option<Book>, FindBookError> {
        self.repo.find_book(req).await
    }

    pub async fn delete_book(&self, req: &DeleteBookRequest) -> Result<(), DeleteBookError> {
        self.repo.delete_book(req).await
    }

    pub async fn search_books(
        &self,
        req: &SearchBooksRequest,
    ) -> Result<Vec<BookListing>, SearchBooksError> {
        self.repo.search_books(req).await
    }

    pub async fn list_books(
        &self,
        ordering: Option<BookOrdering>,
    ) -> Result<Vec<BookListing>, ListBooksError> {
        self.repo.list_books(ordering).await
    }
}
