use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_LANG: &str = "pl";

const USER_AGENT: &str = "krasnale_scraper/0.1 (data extraction; contact: local-script)";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fatal fetch-stage failures. Nothing here is retried; the run aborts
/// before any output is written.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("page not found: {0}")]
    PageNotFound(String),
    #[error("title is ambiguous (disambiguation page): {0}")]
    Disambiguation(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected API response: {0}")]
    UnexpectedResponse(String),
}

/// Base origin of the wiki for the given language code.
pub fn origin(lang: &str) -> String {
    format!("https://{lang}.wikipedia.org")
}

/// Read client for one wiki's API, scoped to a single run.
pub struct WikiClient {
    http: reqwest::Client,
    api_url: String,
}

impl WikiClient {
    pub fn new(lang: &str) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_url: format!("{}/w/api.php", origin(lang)),
        })
    }

    /// Resolve a page title to its numeric page id, following redirects.
    /// Missing pages and disambiguation pages fail; a title is never
    /// auto-corrected to some other page.
    pub async fn resolve_page_id(&self, title: &str) -> Result<u64, FetchError> {
        let body: Value = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("redirects", "1"),
                ("prop", "pageprops"),
                ("ppprop", "disambiguation"),
                ("titles", title),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let pages = body
            .pointer("/query/pages")
            .and_then(Value::as_object)
            .ok_or_else(|| FetchError::UnexpectedResponse("missing query.pages".into()))?;
        let page = pages
            .values()
            .next()
            .ok_or_else(|| FetchError::UnexpectedResponse("empty query.pages".into()))?;

        if page.get("missing").is_some() {
            return Err(FetchError::PageNotFound(title.to_string()));
        }
        if page.pointer("/pageprops/disambiguation").is_some() {
            return Err(FetchError::Disambiguation(title.to_string()));
        }
        page.get("pageid")
            .and_then(Value::as_u64)
            .ok_or_else(|| FetchError::UnexpectedResponse("missing pageid".into()))
    }

    /// Fetch the server-rendered article HTML for a title.
    pub async fn fetch_page_html(&self, title: &str) -> Result<String, FetchError> {
        let page_id = self.resolve_page_id(title).await?;
        info!("Resolved '{}' to page id {}", title, page_id);

        let page_id = page_id.to_string();
        let body: Value = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "parse"),
                ("format", "json"),
                ("prop", "text"),
                ("pageid", page_id.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        body.pointer("/parse/text/*")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| FetchError::UnexpectedResponse("missing parse.text".into()))
    }
}
