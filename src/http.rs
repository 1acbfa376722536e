use crate::catalog::Catalog;
use crate::cover::CoverResolver;
use crate::store::CatalogRepository;
use anyhow::Context;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod handler;

#[derive(Debug)]
pub struct AppState<R, C> {
    pub catalog: Arc<Catalog<R, C>>,
}

impl<R, C> AppState<R, C>
where
    R: CatalogRepository,
    C: CoverResolver,
{
    pub fn new(catalog: Catalog<R, C>) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

impl<R, C> Clone for AppState<R, C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    port: u16,
}

impl HttpServerConfig {
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<R, C>(state: AppState<R, C>, config: HttpServerConfig) -> anyhow::Result<Self>
    where
        R: CatalogRepository,
        C: CoverResolver,
    {
        let router = Router::new()
            .nest("/api/v1", api_routes())
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        axum::serve(self.listener, self.router)
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

fn api_routes<R, C>() -> Router<AppState<R, C>>
where
    R: CatalogRepository,
    C: CoverResolver,
{
    Router::new()
        .route(
            "/books",
            get(handler::list_books::<R, C>).post(handler::create_book::<R, C>),
        )
        .route("/books/search", get(handler::search_books::<R, C>))
        .route(
            "/books/{id}",
            get(handler::get_book_details::<R, C>).delete(handler::delete_book::<R, C>),
        )
        .route(
            "/authors",
            get(handler::list_authors::<R, C>).post(handler::create_author::<R, C>),
        )
        .route(
            "/authors/{id}",
            get(handler::get_author::<R, C>).delete(handler::delete_author::<R, C>),
        )
}
