//! Fetch routine for the NSE participant open interest archive
//!
//! One call to [`ArchiveFetcher::fetch`] owns one cookie-holding HTTP client
//! (the session) and one header profile. In strict mode it walks the mirror
//! list, visiting the landing page before each download so the host hands
//! out its anti-bot cookies, and returns the first table it can parse.
//! Every per-candidate failure is logged and swallowed; running out of
//! candidates yields `Ok(None)`.

mod error;
pub mod headers;
pub mod random;
pub mod table;

pub use error::FetchError;
pub use headers::{HeaderProfile, USER_AGENTS};
pub use random::{FixedRandom, RandomSource, ThreadRandom};
pub use table::{decode_body, is_usable, parse_table, Table, TextEncoding};

use crate::config::{FetchConfig, FetchMode, DATE_PLACEHOLDER};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Characters of an unusable body echoed to the log.
const UNUSABLE_PREVIEW_CHARS: usize = 500;
/// Characters of an error body echoed to the log.
const ERROR_PREVIEW_CHARS: usize = 200;

/// Something that can produce the archive table for a date.
///
/// The server depends on this rather than on [`ArchiveFetcher`] directly so
/// handlers can be exercised without a network.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Mode the source runs in; decides input validation and response shape.
    fn mode(&self) -> FetchMode;

    /// Fetches and parses the file for `date`.
    ///
    /// `Ok(None)` means no candidate produced a table. Errors are only
    /// returned in minimal mode or when the session cannot be created.
    async fn fetch(&self, date: &str) -> Result<Option<Table>, FetchError>;

    /// Issues one plain request to the landing page.
    async fn probe(&self) -> Result<ProbeReport, FetchError>;
}

/// Result of a single request to the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub content_length: usize,
}

/// Archive downloader
pub struct ArchiveFetcher {
    config: FetchConfig,
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for ArchiveFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ArchiveFetcher {
    /// Creates a fetcher that uses the thread RNG for User-Agent and pauses.
    pub fn new(config: FetchConfig) -> Self {
        Self::with_random(config, Arc::new(ThreadRandom))
    }

    /// Creates a fetcher with an explicit randomness source.
    pub fn with_random(config: FetchConfig, random: Arc<dyn RandomSource>) -> Self {
        ArchiveFetcher { config, random }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Candidate URLs for `date`, in the order they are tried.
    ///
    /// Minimal mode only ever uses the first template.
    pub fn candidate_urls(&self, date: &str) -> Vec<String> {
        let templates = match self.config.mode {
            FetchMode::Strict => &self.config.url_templates[..],
            FetchMode::Minimal => {
                let end = self.config.url_templates.len().min(1);
                &self.config.url_templates[..end]
            }
        };
        templates
            .iter()
            .map(|template| template.replace(DATE_PLACEHOLDER, date))
            .collect()
    }

    /// Header profile for one fetch, User-Agent drawn from the pool.
    pub fn header_profile(&self) -> HeaderProfile {
        let index = self.random.pick_index(USER_AGENTS.len());
        HeaderProfile::browser(USER_AGENTS[index])
    }

    /// Fetches and parses the archive file for `date`.
    pub async fn fetch(&self, date: &str) -> Result<Option<Table>, FetchError> {
        match self.config.mode {
            FetchMode::Strict => self.fetch_strict(date).await,
            FetchMode::Minimal => self.fetch_minimal(date).await,
        }
    }

    fn session(&self) -> Result<Client, FetchError> {
        Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| FetchError::ClientCreation(e.to_string()))
    }

    async fn fetch_strict(&self, date: &str) -> Result<Option<Table>, FetchError> {
        let urls = self.candidate_urls(date);
        let session = self.session()?;
        let mut profile = self.header_profile();

        info!(
            date,
            candidates = urls.len(),
            user_agent = profile.user_agent().unwrap_or_default(),
            "fetching archive file"
        );

        for (index, url) in urls.iter().enumerate() {
            let attempt = index + 1;
            match self.try_candidate(&session, &mut profile, attempt, url).await {
                Ok(Some(table)) => return Ok(Some(table)),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        attempt,
                        url = %url,
                        error_kind = err.kind(),
                        error = %err,
                        "candidate failed"
                    );
                }
            }

            if attempt < urls.len() {
                self.pause(self.random.delay_within(&self.config.retry_delay))
                    .await;
            }
        }

        warn!(date, "all attempts failed");
        Ok(None)
    }

    /// One pre-flight plus download against a single candidate.
    ///
    /// `Ok(None)` means the host answered successfully but the body did not
    /// look like the file.
    async fn try_candidate(
        &self,
        session: &Client,
        profile: &mut HeaderProfile,
        attempt: usize,
        url: &str,
    ) -> Result<Option<Table>, FetchError> {
        info!(attempt, url, "trying candidate");

        let preflight = session
            .get(&self.config.root_url)
            .headers(profile.headers().clone())
            .timeout(self.config.preflight_timeout)
            .send()
            .await?;
        let preflight_status = preflight.status();
        if preflight_status.is_success() {
            debug!(attempt, status = preflight_status.as_u16(), "pre-flight ok");
        } else {
            warn!(
                attempt,
                status = preflight_status.as_u16(),
                "pre-flight returned non-success status, continuing"
            );
        }
        drop(preflight);

        self.pause(self.random.delay_within(&self.config.preflight_delay))
            .await;

        if !profile.set_referer(&self.config.referer) {
            warn!(referer = %self.config.referer, "referer is not a valid header value, skipping");
        }

        debug!(attempt, headers = ?profile.names(), "requesting csv");
        let response = session
            .get(url)
            .headers(profile.headers().clone())
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        debug!(attempt, status = status.as_u16(), response_headers = ?response.headers(), "csv response");

        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(FetchError::Status(
                status.as_u16(),
                table::preview(&body, ERROR_PREVIEW_CHARS),
            ));
        }

        if !is_usable(&content_type, body.len(), self.config.min_body_bytes) {
            warn!(
                attempt,
                content_type = %content_type,
                bytes = body.len(),
                preview = %table::preview(&body, UNUSABLE_PREVIEW_CHARS),
                "unexpected content type or size"
            );
            return Ok(None);
        }

        let (text, encoding) = decode_body(&body);
        let table = parse_table(&text)?;
        info!(
            attempt,
            url,
            content_type = %content_type,
            bytes = body.len(),
            encoding = %encoding,
            rows = table.len(),
            "parsed archive file"
        );
        Ok(Some(table))
    }

    async fn fetch_minimal(&self, date: &str) -> Result<Option<Table>, FetchError> {
        let Some(url) = self.candidate_urls(date).into_iter().next() else {
            warn!(date, "no url template configured");
            return Ok(None);
        };
        let session = self.session()?;
        let profile = self.header_profile();

        info!(date, url = %url, "fetching archive file (minimal)");
        let response = session
            .get(&url)
            .headers(profile.headers().clone())
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(FetchError::Status(
                status.as_u16(),
                table::preview(&body, ERROR_PREVIEW_CHARS),
            ));
        }

        let (text, encoding) = decode_body(&body);
        let table = parse_table(&text)?;
        info!(url = %url, encoding = %encoding, rows = table.len(), "parsed archive file");
        Ok(Some(table))
    }

    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "pausing");
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl TableSource for ArchiveFetcher {
    fn mode(&self) -> FetchMode {
        self.config.mode
    }

    async fn fetch(&self, date: &str) -> Result<Option<Table>, FetchError> {
        ArchiveFetcher::fetch(self, date).await
    }

    async fn probe(&self) -> Result<ProbeReport, FetchError> {
        probe_connection(&self.config.root_url, self.config.probe_timeout).await
    }
}

/// Requests `url` once, without session or browser headers.
///
/// Repeated response headers are joined with `", "`.
pub async fn probe_connection(url: &str, timeout: Duration) -> Result<ProbeReport, FetchError> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::ClientCreation(e.to_string()))?;

    let response = client.get(url).send().await?;
    let status_code = response.status().as_u16();

    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let body = response.bytes().await?;
    info!(url, status = status_code, bytes = body.len(), "connectivity probe");

    Ok(ProbeReport {
        status_code,
        headers,
        content_length: body.len(),
    })
}
