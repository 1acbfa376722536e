use bookshelf::catalog::Catalog;
use bookshelf::config::Config;
use bookshelf::cover::OpenLibraryClient;
use bookshelf::http::{AppState, HttpServer, HttpServerConfig};
use bookshelf::sqlite::Sqlite;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let sqlite = Sqlite::new(config.database_url()).await?;
    let covers = OpenLibraryClient::new(config.cover_api_url())?;
    let catalog = Catalog::new(sqlite, covers);

    let state = AppState::new(catalog);
    let server_config = HttpServerConfig::new(config.server_port());
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
