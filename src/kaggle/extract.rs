use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::parse;
use super::types::{CompetitionView, Placement};

/// Why an extraction attempt produced nothing.
///
/// Every variant is recoverable from the aggregator's point of view: the
/// affected user/view contributes zero and the score is flagged
/// incomplete. The distinction exists so "nothing was found" never gets
/// conflated with "the fetch broke".
#[derive(Debug)]
pub enum ExtractError {
    Http(String),
    Status(u16),
    Timeout,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Http(msg) => write!(f, "fetch failed: {}", msg),
            ExtractError::Status(code) => write!(f, "page returned HTTP {}", code),
            ExtractError::Timeout => write!(f, "fetch timed out"),
        }
    }
}

impl std::error::Error for ExtractError {}

/// The acquisition seam the aggregator scores against.
///
/// Implementations return the raw records for one user; each call is
/// independent and may fail without affecting the others. `Ok(vec![])`
/// means the profile genuinely has nothing in that category.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    async fn fetch_kernel_votes(&self, username: &str) -> Result<Vec<u64>, ExtractError>;

    async fn fetch_placements(
        &self,
        username: &str,
        view: CompetitionView,
    ) -> Result<Vec<Placement>, ExtractError>;
}

/// Production source: fetches profile pages over HTTP and scans them.
pub struct KaggleSource {
    client: reqwest::Client,
    base_url: String,
    view_timeout: Duration,
    attempts: usize,
}

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const POLL_READS: usize = 3;

impl KaggleSource {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        view_timeout: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            view_timeout,
            attempts,
        }
    }

    /// One page fetch with exponential backoff on transport errors.
    async fn fetch_page(&self, url: &str) -> Result<String, ExtractError> {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.attempts);

        Retry::spawn(retry_strategy, || async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(classify_error)?;

            let response = match response.error_for_status() {
                Ok(r) => r,
                Err(e) => {
                    return Err(ExtractError::Status(
                        e.status().map(|s| s.as_u16()).unwrap_or(0),
                    ))
                }
            };

            response.text().await.map_err(classify_error)
        })
        .await
    }

    /// Poll a page for expected records.
    ///
    /// Profiles render their lists late, so an empty first read is
    /// ambiguous. Re-read a few times within the view timeout, then make
    /// one final direct read; if it is still empty, the profile has
    /// nothing there and the result is an empty list, not an error.
    async fn poll_records<T>(
        &self,
        url: &str,
        read: impl Fn(&str) -> Vec<T>,
    ) -> Result<Vec<T>, ExtractError> {
        let deadline = Instant::now() + self.view_timeout;

        for _ in 0..POLL_READS {
            let page = self.fetch_page(url).await?;
            let records = read(&page);
            if !records.is_empty() {
                return Ok(records);
            }
            if Instant::now() + POLL_INTERVAL >= deadline {
                break;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        let page = self.fetch_page(url).await?;
        Ok(read(&page))
    }
}

impl RecordSource for KaggleSource {
    async fn fetch_kernel_votes(&self, username: &str) -> Result<Vec<u64>, ExtractError> {
        let url = format!("{}/{}/kernels", self.base_url, username);
        self.poll_records(&url, parse::extract_vote_counts).await
    }

    async fn fetch_placements(
        &self,
        username: &str,
        view: CompetitionView,
    ) -> Result<Vec<Placement>, ExtractError> {
        let url = format!(
            "{}/{}/competitions?group={}",
            self.base_url,
            username,
            view.group_slug()
        );
        self.poll_records(&url, parse::extract_placements).await
    }
}

fn classify_error(e: reqwest::Error) -> ExtractError {
    if e.is_timeout() {
        ExtractError::Timeout
    } else if let Some(status) = e.status() {
        ExtractError::Status(status.as_u16())
    } else {
        ExtractError::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_distinguishes_variants() {
        assert!(ExtractError::Timeout.to_string().contains("timed out"));
        assert!(ExtractError::Status(404).to_string().contains("404"));
        assert!(ExtractError::Http("connection reset".into())
            .to_string()
            .contains("connection reset"));
    }
}
