use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Students to score, in the order the class roster lists them.
    pub roster: Vec<RosterEntry>,

    /// Competitions that count toward the board. Titles must match the
    /// profile pages byte-for-byte, typographic apostrophes included.
    #[serde(default)]
    pub competitions: Vec<String>,

    /// Optional cutoff: placements known to have ended before this
    /// instant are excluded from scoring.
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterEntry {
    /// Display name for the report
    pub name: String,
    /// Kaggle username, as it appears in profile URLs
    pub username: String,
}

/// Knobs for the page-fetching loop.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Per-view timeout as a humantime string, e.g. "10s" (default)
    #[serde(default)]
    pub timeout: Option<String>,

    /// Transport retry attempts per page (default: 3)
    #[serde(default)]
    pub attempts: Option<usize>,

    /// Concurrent extraction sessions (default: 1, the safe setting for
    /// a rate-limited remote)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Override the site root; used by tests and mirrors
    #[serde(default)]
    pub base_url: Option<String>,
}

impl FetchConfig {
    pub fn timeout(&self) -> Result<Duration> {
        match &self.timeout {
            Some(raw) => humantime::parse_duration(raw)
                .with_context(|| format!("fetch.timeout: invalid duration '{}'", raw)),
            None => Ok(Duration::from_secs(10)),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.unwrap_or(3)
    }

    pub fn workers(&self) -> usize {
        self.workers.unwrap_or(1).max(1)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(crate::kaggle::BASE_URL)
    }
}
