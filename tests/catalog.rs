use async_trait::async_trait;
use bookshelf::catalog::Catalog;
use bookshelf::cover::CoverResolver;
use bookshelf::model::{
    AuthorName, BookOrdering, BookTitle, CreateAuthorError, CreateAuthorRequest, CreateBookError,
    CreateBookRequest, DeleteAuthorError, DeleteAuthorRequest, DeleteBookError, DeleteBookRequest,
    FindAuthorRequest, FindBookRequest, Isbn, SearchBooksRequest,
};
use bookshelf::sqlite::Sqlite;
use bookshelf::store::CatalogRepository;
use tempfile::TempDir;

async fn sqlite() -> (TempDir, Sqlite) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.sqlite3");
    let sqlite = Sqlite::new(path.to_str().unwrap()).await.unwrap();
    (dir, sqlite)
}

fn author_req(name: &str, birth_date: &str, date_of_death: Option<&str>) -> CreateAuthorRequest {
    CreateAuthorRequest::new(
        AuthorName::new(name).unwrap(),
        birth_date.parse().unwrap(),
        date_of_death.map(|d| d.parse().unwrap()),
    )
}

fn book_req(author_id: i64, isbn: &str, title: &str) -> CreateBookRequest {
    CreateBookRequest::new(
        author_id,
        Isbn::new(isbn).unwrap(),
        BookTitle::new(title).unwrap(),
        None,
    )
}

#[tokio::test]
async fn created_author_round_trips_through_lookup() {
    let (_dir, repo) = sqlite().await;

    let created = repo
        .create_author(&author_req(
            "Herman Melville",
            "1819-08-01",
            Some("1891-09-28"),
        ))
        .await
        .unwrap();

    let found = repo
        .find_author(&FindAuthorRequest::new(created.id()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.name().to_string(), "Herman Melville");
    assert_eq!(found.birth_date().to_string(), "1819-08-01");
    assert_eq!(found.date_of_death().unwrap().to_string(), "1891-09-28");
}

#[tokio::test]
async fn find_author_on_missing_id_returns_none() {
    let (_dir, repo) = sqlite().await;

    let found = repo.find_author(&FindAuthorRequest::new(42)).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn duplicate_author_name_is_rejected() {
    let (_dir, repo) = sqlite().await;

    repo.create_author(&author_req("Leo Tolstoy", "1828-09-09", None))
        .await
        .unwrap();
    let err = repo
        .create_author(&author_req("Leo Tolstoy", "1828-09-09", None))
        .await
        .unwrap_err();

    assert!(matches!(err, CreateAuthorError::Duplicate { name } if name == "Leo Tolstoy"));

    let authors = repo.find_all_authors().await.unwrap();
    assert_eq!(authors.len(), 1);
}

#[tokio::test]
async fn create_book_requires_existing_author() {
    let (_dir, repo) = sqlite().await;

    let err = repo
        .create_book(&book_req(42, "0451524934", "1984"))
        .await
        .unwrap_err();

    assert!(matches!(err, CreateBookError::AuthorNotFound { author_id: 42 }));

    let listings = repo.list_books(None).await.unwrap();
    assert!(listings.is_empty());
}

#[tokio::test]
async fn duplicate_isbn_is_rejected() {
    let (_dir, repo) = sqlite().await;

    let author = repo
        .create_author(&author_req("George Orwell", "1903-06-25", None))
        .await
        .unwrap();

    repo.create_book(&book_req(author.id(), "0451524934", "1984"))
        .await
        .unwrap();
    let err = repo
        .create_book(&book_req(author.id(), "0451524934", "Animal Farm"))
        .await
        .unwrap_err();

    assert!(matches!(err, CreateBookError::DuplicateIsbn { isbn } if isbn == "0451524934"));

    let listings = repo.list_books(None).await.unwrap();
    assert_eq!(listings.len(), 1);
}

#[tokio::test]
async fn created_book_round_trips_through_lookup() {
    let (_dir, repo) = sqlite().await;

    let author = repo
        .create_author(&author_req("George Orwell", "1903-06-25", None))
        .await
        .unwrap();

    let req = CreateBookRequest::new(
        author.id(),
        Isbn::new("0451524934").unwrap(),
        BookTitle::new("1984").unwrap(),
        Some("1949-06-08".parse().unwrap()),
    );
    let created = repo.create_book(&req).await.unwrap();

    let found = repo
        .find_book(&FindBookRequest::new(created.id()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.author_id(), author.id());
    assert_eq!(found.isbn().to_string(), "0451524934");
    assert_eq!(found.title().to_string(), "1984");
    assert_eq!(found.cover(), None);
    assert_eq!(found.publication_date().unwrap().to_string(), "1949-06-08");
}

#[tokio::test]
async fn delete_book_removes_the_row() {
    let (_dir, repo) = sqlite().await;

    let author = repo
        .create_author(&author_req("George Orwell", "1903-06-25", None))
        .await
        .unwrap();
    let book = repo
        .create_book(&book_req(author.id(), "0451524934", "1984"))
        .await
        .unwrap();

    repo.delete_book(&DeleteBookRequest::new(book.id()))
        .await
        .unwrap();

    let found = repo
        .find_book(&FindBookRequest::new(book.id()))
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn delete_book_on_missing_id_is_signaled() {
    let (_dir, repo) = sqlite().await;

    let err = repo
        .delete_book(&DeleteBookRequest::new(42))
        .await
        .unwrap_err();
    assert!(matches!(err, DeleteBookError::NotFound { id: 42 }));
}

#[tokio::test]
async fn delete_author_on_missing_id_is_signaled() {
    let (_dir, repo) = sqlite().await;

    let err = repo
        .delete_author(&DeleteAuthorRequest::new(42))
        .await
        .unwrap_err();
    assert!(matches!(err, DeleteAuthorError::NotFound { id: 42 }));
}

#[tokio::test]
async fn deleting_an_author_cascades_to_their_books() {
    let (_dir, repo) = sqlite().await;

    let tolstoy = repo
        .create_author(&author_req("Leo Tolstoy", "1828-09-09", None))
        .await
        .unwrap();
    let melville = repo
        .create_author(&author_req("Herman Melville", "1819-08-01", None))
        .await
        .unwrap();

    let war_and_peace = repo
        .create_book(&book_req(tolstoy.id(), "9780199232765", "War and Peace"))
        .await
        .unwrap();
    let anna_karenina = repo
        .create_book(&book_req(tolstoy.id(), "9780140449174", "Anna Karenina"))
        .await
        .unwrap();
    let moby_dick = repo
        .create_book(&book_req(melville.id(), "9780142437247", "Moby Dick"))
        .await
        .unwrap();

    repo.delete_author(&DeleteAuthorRequest::new(tolstoy.id()))
        .await
        .unwrap();

    for id in [war_and_peace.id(), anna_karenina.id()] {
        let found = repo.find_book(&FindBookRequest::new(id)).await.unwrap();
        assert!(found.is_none());
    }

    let remaining = repo.list_books(None).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].book_id(), moby_dick.id());
}

async fn seeded_library(repo: &Sqlite) {
    let tolstoy = repo
        .create_author(&author_req("Leo Tolstoy", "1828-09-09", None))
        .await
        .unwrap();
    let melville = repo
        .create_author(&author_req("Herman Melville", "1819-08-01", None))
        .await
        .unwrap();

    repo.create_book(&book_req(tolstoy.id(), "9780199232765", "War and Peace"))
        .await
        .unwrap();
    repo.create_book(&book_req(melville.id(), "9780142437247", "Moby Dick"))
        .await
        .unwrap();
    repo.create_book(&book_req(tolstoy.id(), "9780140449174", "Anna Karenina"))
        .await
        .unwrap();
}

#[tokio::test]
async fn listing_sorts_by_title_ascending() {
    let (_dir, repo) = sqlite().await;
    seeded_library(&repo).await;

    let ordering = BookOrdering::from_params(Some("title"), Some("asc"));
    let listings = repo.list_books(ordering).await.unwrap();

    let titles: Vec<&str> = listings.iter().map(|l| l.title()).collect();
    assert_eq!(titles, ["Anna Karenina", "Moby Dick", "War and Peace"]);
}

#[tokio::test]
async fn listing_sorts_by_author_name_descending() {
    let (_dir, repo) = sqlite().await;
    seeded_library(&repo).await;

    let ordering = BookOrdering::from_params(Some("author"), Some("desc"));
    let listings = repo.list_books(ordering).await.unwrap();

    let authors: Vec<&str> = listings.iter().map(|l| l.author_name()).collect();
    assert_eq!(authors, ["Leo Tolstoy", "Leo Tolstoy", "Herman Melville"]);
}

#[tokio::test]
async fn unrecognized_sort_params_fall_back_to_full_listing() {
    let (_dir, repo) = sqlite().await;
    seeded_library(&repo).await;

    let ordering = BookOrdering::from_params(Some("isbn"), Some("sideways"));
    assert!(ordering.is_none());

    let listings = repo.list_books(ordering).await.unwrap();
    assert_eq!(listings.len(), 3);
}

#[tokio::test]
async fn search_matches_case_insensitive_substring() {
    let (_dir, repo) = sqlite().await;
    seeded_library(&repo).await;

    let listings = repo
        .search_books(&SearchBooksRequest::new("moby"))
        .await
        .unwrap();

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].title(), "Moby Dick");
    assert_eq!(listings[0].author_name(), "Herman Melville");

    let listings = repo
        .search_books(&SearchBooksRequest::new("AND"))
        .await
        .unwrap();
    let titles: Vec<&str> = listings.iter().map(|l| l.title()).collect();
    assert!(titles.contains(&"War and Peace"));
    assert!(!titles.contains(&"Moby Dick"));
}

struct StaticCovers(Option<String>);

#[async_trait]
impl CoverResolver for StaticCovers {
    async fn resolve_cover(&self, _isbn: &Isbn) -> Option<String> {
        self.0.clone()
    }
}

#[tokio::test]
async fn catalog_stores_resolved_cover_on_new_books() {
    let (_dir, repo) = sqlite().await;
    let catalog = Catalog::new(
        repo,
        StaticCovers(Some("http://x/cover.jpg".to_string())),
    );

    let author = catalog
        .create_author(&author_req("George Orwell", "1903-06-25", None))
        .await
        .unwrap();
    let book = catalog
        .create_book(book_req(author.id(), "0451524934", "1984"))
        .await
        .unwrap();

    let found = catalog
        .find_book(&FindBookRequest::new(book.id()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.cover(), Some("http://x/cover.jpg"));
}

#[tokio::test]
async fn catalog_creates_book_without_cover_when_resolution_fails() {
    let (_dir, repo) = sqlite().await;
    let catalog = Catalog::new(repo, StaticCovers(None));

    let author = catalog
        .create_author(&author_req("George Orwell", "1903-06-25", None))
        .await
        .unwrap();
    let book = catalog
        .create_book(book_req(author.id(), "0451524934", "1984"))
        .await
        .unwrap();

    let found = catalog
        .find_book(&FindBookRequest::new(book.id()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.cover(), None);
}
