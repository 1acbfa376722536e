use crate::model::Isbn;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

pub const OPEN_LIBRARY_API_URL: &str = "https://openlibrary.org/api/books";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait CoverResolver: Send + Sync + 'static {
    async fn resolve_cover(&self, isbn: &Isbn) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .context("Failed to build cover lookup client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn fetch_cover(&self, isbn: &Isbn) -> anyhow::Result<Option<String>> {
        let bibkey = format!("ISBN:{isbn}");
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("bibkeys", bibkey.as_str()),
                ("format", "json"),
                ("jscmd", "data"),
            ])
            .send()
            .await
            .context("Cover lookup request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            anyhow::bail!("Cover lookup returned status {status}");
        }

        let body: Value = response
            .json()
            .await
            .context("Cover lookup returned malformed JSON")?;

        Ok(extract_medium_cover(&body, &bibkey))
    }
}

fn extract_medium_cover(body: &Value, bibkey: &str) -> Option<String> {
    body.get(bibkey)?
        .get("cover")?
        .get("medium")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl CoverResolver for OpenLibraryClient {
    async fn resolve_cover(&self, isbn: &Isbn) -> Option<String> {
        match self.fetch_cover(isbn).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                tracing::warn!(%isbn, "no medium cover in lookup response");
                None
            }
            Err(err) => {
                tracing::warn!(%isbn, error = %err, "cover lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_medium_cover_url() {
        let body = json!({
            "ISBN:0451524934": {
                "title": "1984",
                "cover": {
                    "small": "http://x/cover-S.jpg",
                    "medium": "http://x/cover-M.jpg",
                    "large": "http://x/cover-L.jpg"
                }
            }
        });

        assert_eq!(
            extract_medium_cover(&body, "ISBN:0451524934"),
            Some("http://x/cover-M.jpg".to_string())
        );
    }

    #[test]
    fn missing_isbn_key_yields_none() {
        let body = json!({});
        assert_eq!(extract_medium_cover(&body, "ISBN:0451524934"), None);
    }

    #[test]
    fn missing_cover_field_yields_none() {
        let body = json!({ "ISBN:0451524934": { "title": "1984" } });
        assert_eq!(extract_medium_cover(&body, "ISBN:0451524934"), None);
    }

    #[test]
    fn non_string_medium_yields_none() {
        let body = json!({ "ISBN:0451524934": { "cover": { "medium": 42 } } });
        assert_eq!(extract_medium_cover(&body, "ISBN:0451524934"), None);
    }
}
