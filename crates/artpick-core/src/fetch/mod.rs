//! Page sources: where the records of one page come from.

pub mod mock;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use crate::record::Record;

pub use mock::MockPageSource;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

/// One page to fetch. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

/// Records of one page in the order the source returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<Record>,
    /// Total size of the collection, when the source reports it.
    pub total: Option<usize>,
}

/// A source of paged catalog records.
pub trait PageSource: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_page<'a>(
        &'a self,
        request: PageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Page, FetchError>> + Send + 'a>>;
}

/// Fetches pages with `GET <base_url>?page=<n>&limit=<m>`.
pub struct HttpPageSource {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpPageSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("artpick/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url, timeout))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PageSource for HttpPageSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_page<'a>(
        &'a self,
        request: PageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Page, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            tracing::debug!(
                url = %self.base_url,
                page = request.page,
                limit = request.limit,
                "fetching page"
            );

            let resp = self
                .client
                .get(&self.base_url)
                .query(&[("page", request.page), ("limit", request.limit)])
                .timeout(self.timeout)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = resp.text().await?;
            parse_page_body(&body)
        })
    }
}

/// Parse a `{ "data": [...], "pagination": { "total": N } }` response body.
///
/// The envelope must be an object with a `data` array. Entries that are not
/// valid records are skipped with a warning; `pagination` is optional.
pub fn parse_page_body(body: &str) -> Result<Page, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let items = value
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| FetchError::Parse("response has no `data` array".into()))?;

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match Record::from_value(item) {
            Some(record) => records.push(record),
            None => tracing::warn!(index = i, "skipping record without a valid id"),
        }
    }

    let total = value
        .get("pagination")
        .and_then(|p| p.get("total"))
        .and_then(|t| t.as_u64())
        .and_then(|t| usize::try_from(t).ok());

    Ok(Page { records, total })
}
