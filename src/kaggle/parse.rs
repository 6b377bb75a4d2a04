//! Tolerant extraction of profile data from fetched pages.
//!
//! Profile pages ship their data twice: as state JSON embedded in script
//! blocks, and as rendered markup. The JSON is the ground truth, so it is
//! read first; the markup scan is the fallback for pages rendered without
//! a state block. Both paths tolerate whitespace, attribute order, and
//! harmless markup noise rather than relying on full-document selectors.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::types::Placement;

const STATE_MARKER: &str = "Kaggle.State.push(";

const VOTE_KEYS: [&str; 3] = ["totalVotes", "voteCount", "votes"];
const RANK_KEYS: [&str; 2] = ["rank", "currentRank"];
const TEAM_KEYS: [&str; 2] = ["teamCount", "totalTeams"];
const TITLE_KEYS: [&str; 2] = ["competitionTitle", "title"];
const DEADLINE_KEYS: [&str; 2] = ["deadline", "deadlineDate"];

/// Pull every kernel vote count off a kernels page.
///
/// An empty result is normal (user has no kernels); callers decide whether
/// that is worth retrying.
pub fn extract_vote_counts(html: &str) -> Vec<u64> {
    let mut counts = Vec::new();
    for state in embedded_state(html) {
        collect_counts(&state, &mut counts);
    }
    if counts.is_empty() {
        counts = element_texts(html, "vote-button__vote-count")
            .iter()
            .filter_map(|text| digits(text))
            .collect();
    }
    counts
}

/// Pull every placement row off a competitions page.
pub fn extract_placements(html: &str) -> Vec<Placement> {
    let mut placements = Vec::new();
    for state in embedded_state(html) {
        collect_placements(&state, &mut placements);
    }
    if placements.is_empty() {
        placements = placements_from_markup(html);
    }
    placements
}

/// Strip everything but digits and parse what remains.
/// `"1,234 teams"` parses to 1234; text with no digits is None.
pub fn digits(text: &str) -> Option<u64> {
    let cleaned: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse every embedded state block on the page.
fn embedded_state(html: &str) -> Vec<Value> {
    let mut states = Vec::new();
    let mut rest = html;
    while let Some(pos) = rest.find(STATE_MARKER) {
        rest = &rest[pos + STATE_MARKER.len()..];
        if let Some(raw) = balanced_object(rest) {
            if let Ok(value) = serde_json::from_str::<Value>(raw) {
                states.push(value);
            }
        }
    }
    states
}

/// Slice out the first balanced `{...}` object, honoring JSON string
/// escapes so braces inside titles don't end the object early.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// A count may arrive as a JSON number or as a formatted string.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => digits(s),
        _ => None,
    }
}

fn collect_counts(value: &Value, out: &mut Vec<u64>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if VOTE_KEYS.contains(&key.as_str()) {
                    if let Some(count) = as_count(child) {
                        out.push(count);
                        continue;
                    }
                }
                collect_counts(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_counts(item, out);
            }
        }
        _ => {}
    }
}

fn collect_placements(value: &Value, out: &mut Vec<Placement>) {
    match value {
        Value::Object(map) => {
            if let Some(placement) = placement_from_object(map) {
                out.push(placement);
                return; // a row's nested fields are not further rows
            }
            for child in map.values() {
                collect_placements(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_placements(item, out);
            }
        }
        _ => {}
    }
}

fn placement_from_object(map: &serde_json::Map<String, Value>) -> Option<Placement> {
    let rank = first_key(map, &RANK_KEYS).and_then(as_count)?;
    let field_size = first_key(map, &TEAM_KEYS).and_then(as_count)?;
    let competition = first_key(map, &TITLE_KEYS)?.as_str()?.to_string();

    let ended_at = first_key(map, &DEADLINE_KEYS)
        .and_then(Value::as_str)
        .and_then(parse_deadline);

    Some(Placement {
        rank,
        field_size,
        competition,
        ended_at,
    })
}

fn first_key<'a>(map: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            // Deadlines sometimes come without an offset
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Rebuild placements from rendered markup, pairing the i-th rank cell
/// with the i-th team cell and the i-th name cell the way the page lays
/// them out.
fn placements_from_markup(html: &str) -> Vec<Placement> {
    let ranks = element_texts(html, "competitions__list-item-medal-rank");
    let teams = element_texts(html, "competitions__list-item-medal-teams");
    let names = element_texts(html, "competitions__list-item-name");

    ranks
        .iter()
        .zip(teams.iter())
        .zip(names.iter())
        .filter_map(|((rank_text, team_text), name)| {
            let rank = digits(rank_text)?;
            let field_size = digits(team_text)?;
            Some(Placement::new(rank, field_size, name.trim()))
        })
        .collect()
}

/// Inner text of every element whose class attribute contains `marker`.
///
/// Text is accumulated across nested inline tags until the element's own
/// closing tag, so `<span><span>12</span>th</span>` yields "12th".
fn element_texts(html: &str, marker: &str) -> Vec<String> {
    let mut texts = Vec::new();
    let mut rest = html;

    while let Some(pos) = rest.find(marker) {
        rest = &rest[pos + marker.len()..];
        let Some(tag_end) = rest.find('>') else { break };
        let mut content = &rest[tag_end + 1..];
        let mut text = String::new();
        let mut depth = 0usize;

        loop {
            let Some(lt) = content.find('<') else { break };
            text.push_str(&content[..lt]);
            content = &content[lt..];
            if content.starts_with("</") {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else {
                depth += 1;
            }
            match content.find('>') {
                Some(gt) => content = &content[gt + 1..],
                None => break,
            }
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            texts.push(trimmed.to_string());
        }
    }
    texts
}
