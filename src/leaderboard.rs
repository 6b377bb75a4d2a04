use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::time::timeout;

use crate::buffered_warn;
use crate::kaggle::{CompetitionView, RecordSource};
use crate::scoring::{score_kernel_votes, score_placements, ScoringConfig};

/// Final per-student artifact of a run. Never mutated after creation.
///
/// `incomplete` records that at least one extraction step failed, so a
/// zero here means "could not look" rather than "looked and found
/// nothing". The formatter renders it as a trailing `*`.
#[derive(Debug, Clone)]
pub struct UserScore {
    pub username: String,
    pub points: f64,
    pub incomplete: bool,
}

/// Everything the scoring loop needs besides the source itself.
pub struct ScoreSettings {
    pub eligible: HashSet<String>,
    pub since: Option<DateTime<Utc>>,
    pub scoring: ScoringConfig,
    pub view_timeout: Duration,
    pub workers: usize,
}

/// Score one student from their four extraction results.
///
/// Each fetch (kernels plus the three competition views) is independently
/// fault-tolerant: a failure or stall degrades to an empty contribution
/// and flags the score incomplete, and never aborts the student or the
/// run.
pub async fn score_student<S: RecordSource>(
    source: &S,
    username: &str,
    settings: &ScoreSettings,
) -> UserScore {
    let mut points = 0.0;
    let mut incomplete = false;

    match timeout(settings.view_timeout, source.fetch_kernel_votes(username)).await {
        Ok(Ok(counts)) => points += score_kernel_votes(&counts, &settings.scoring),
        Ok(Err(e)) => {
            incomplete = true;
            buffered_warn!("Warning: {}: kernels unavailable: {}", username, e);
        }
        Err(_) => {
            incomplete = true;
            buffered_warn!(
                "Warning: {}: kernels stalled past {:?}",
                username,
                settings.view_timeout
            );
        }
    }

    let formula = settings.scoring.placement();
    for view in CompetitionView::ALL {
        match timeout(
            settings.view_timeout,
            source.fetch_placements(username, view),
        )
        .await
        {
            Ok(Ok(records)) => {
                let tally =
                    score_placements(&records, &settings.eligible, settings.since, &formula);
                if tally.skipped > 0 {
                    buffered_warn!(
                        "Warning: {}: dropped {} malformed {} placement(s)",
                        username,
                        tally.skipped,
                        view
                    );
                }
                points += tally.points;
            }
            Ok(Err(e)) => {
                incomplete = true;
                buffered_warn!(
                    "Warning: {}: {} competitions unavailable: {}",
                    username,
                    view,
                    e
                );
            }
            Err(_) => {
                incomplete = true;
                buffered_warn!(
                    "Warning: {}: {} competitions stalled past {:?}",
                    username,
                    view,
                    settings.view_timeout
                );
            }
        }
    }

    UserScore {
        username: username.to_string(),
        points,
        incomplete,
    }
}

/// Score the whole roster, one output per input in input order.
///
/// With `workers <= 1` students are fetched strictly one at a time (the
/// remote session is an exclusive resource); higher counts dispatch
/// per-student work through an ordered buffered stream, so output order
/// still matches roster order. The cancel flag is honored between
/// students, never mid-student: scores already computed stay valid.
pub async fn score_roster<S: RecordSource>(
    source: &S,
    usernames: &[String],
    settings: &ScoreSettings,
    cancel: &AtomicBool,
    verbose: bool,
) -> Vec<UserScore> {
    if settings.workers <= 1 {
        let mut scores = Vec::with_capacity(usernames.len());
        for username in usernames {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let started = Instant::now();
            let score = score_student(source, username, settings).await;
            if verbose {
                eprintln!(
                    "  Scored {} ({:.0} points) in {:?}",
                    username,
                    score.points,
                    started.elapsed()
                );
            }
            scores.push(score);
        }
        return scores;
    }

    let results: Vec<Option<UserScore>> = stream::iter(usernames)
        .map(|username| async move {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let started = Instant::now();
            let score = score_student(source, username, settings).await;
            if verbose {
                eprintln!(
                    "  Scored {} ({:.0} points) in {:?}",
                    username,
                    score.points,
                    started.elapsed()
                );
            }
            Some(score)
        })
        .buffered(settings.workers)
        .collect()
        .await;

    // Cancellation leaves a tail of skipped students; keep the completed
    // prefix so the partial report stays contiguous with the roster.
    results
        .into_iter()
        .take_while(|score| score.is_some())
        .flatten()
        .collect()
}
