use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use reqwest::{Client, Url};
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::model::AdRecord;

/// Hard per-request row cap imposed by the hosted query API.
pub const PAGE_LIMIT: u64 = 1000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store URL: {0}")]
    InvalidUrl(String),
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not determine row count: {0}")]
    Count(String),
}

/// Read-only query surface of the hosted record store. Implementations must
/// return each page ordered by `sent_date` descending.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Total row count of the collection, without fetching rows.
    async fn total_count(&self) -> Result<u64, StoreError>;

    /// One page of rows, `sent_date` descending, starting at `offset`.
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<AdRecord>, StoreError>;
}

/// Fetch the complete snapshot: one count query, then sequential range
/// queries of `PAGE_LIMIT` rows concatenated in request order. A failure on
/// any page fails the whole fetch; pages already fetched are discarded. A
/// zero (or unknown) count yields an empty snapshot, not an error.
///
/// If the store mutates between the count and the page queries the result may
/// under- or over-shoot the count; that drift is accepted, not reconciled.
#[instrument(skip_all)]
pub async fn fetch_all_records(store: &dyn RecordStore) -> Result<Vec<AdRecord>, StoreError> {
    let total = store.total_count().await?;
    info!(total, "fetching full snapshot");

    let mut all: Vec<AdRecord> = Vec::with_capacity(total as usize);
    let mut offset = 0u64;
    while offset < total {
        let page = store.fetch_page(offset, PAGE_LIMIT).await?;
        info!(offset, rows = page.len(), "fetched page");
        all.extend(page);
        offset += PAGE_LIMIT;
    }

    if all.len() as u64 != total {
        warn!(
            total,
            fetched = all.len(),
            "snapshot size drifted from count query"
        );
    }
    Ok(all)
}

/// Client for a PostgREST-style REST surface (Supabase). Rows live in a
/// single table queried through `/rest/v1/{table}`.
#[derive(Clone)]
pub struct SupabaseStore {
    http: Client,
    base_url: Url,
    api_key: String,
    table: String,
}

impl fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("base_url", &self.base_url)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl SupabaseStore {
    pub fn new(url: &str, api_key: String, table: String) -> Result<Self, StoreError> {
        let base_url = Url::parse(url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        let http = Client::builder()
            .user_agent("ads-dashboard/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Ok(Self {
            http,
            base_url,
            api_key,
            table,
        })
    }

    fn table_url(&self) -> Result<Url, StoreError> {
        self.base_url
            .join(&format!("rest/v1/{}", self.table))
            .map_err(|e| StoreError::InvalidUrl(e.to_string()))
    }

    /// HEAD request asking only for the exact row count; the total comes back
    /// in the `Content-Range` header.
    pub fn build_count_request(&self) -> Result<reqwest::Request, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("select", "*");
        let req = self
            .http
            .head(url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "count=exact")
            .header("Range-Unit", "items")
            .header("Range", "0-0")
            .build()?;
        Ok(req)
    }

    /// GET request for one page, ordered by `sent_date` descending.
    pub fn build_page_request(&self, offset: u64, limit: u64) -> Result<reqwest::Request, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "sent_date.desc")
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        let req = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .build()?;
        Ok(req)
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn total_count(&self) -> Result<u64, StoreError> {
        let request = self.build_count_request()?;
        let res = self.http.execute(request).await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            warn!(%status, "count query failed");
            return Err(StoreError::Status { status, body });
        }
        let header = match res.headers().get(CONTENT_RANGE) {
            Some(v) => v
                .to_str()
                .map_err(|_| StoreError::Count("non-ASCII Content-Range header".into()))?
                .to_string(),
            // No header at all: treat the count as unknown, i.e. zero rows.
            None => return Ok(0),
        };
        Ok(parse_content_range_total(&header).unwrap_or(0))
    }

    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<AdRecord>, StoreError> {
        let request = self.build_page_request(offset, limit)?;
        let res = self.http.execute(request).await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            warn!(%status, offset, "page query failed");
            return Err(StoreError::Status { status, body });
        }
        Ok(res.json::<Vec<AdRecord>>().await?)
    }
}

/// Parse the total out of a `Content-Range` value such as `0-0/1500` or
/// `*/37`. An unknown total (`0-0/*`) is `None`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse::<u64>().ok()
}
