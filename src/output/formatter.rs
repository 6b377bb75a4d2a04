use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

/// One leaderboard row ready for display: a score joined back to its
/// roster entry.
pub struct RankedEntry<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub points: f64,
    pub incomplete: bool,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score in compact notation (1.5k, 2.3M, 847).
/// If incomplete is true, appends an asterisk to mark partial extraction.
pub fn format_score(points: f64, incomplete: bool) -> String {
    let formatted = if points >= 1_000_000.0 {
        format!("{:.1}M", points / 1_000_000.0)
    } else if points >= 1_000.0 {
        format!("{:.1}k", points / 1_000.0)
    } else {
        format!("{:.0}", points)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    let trimmed = formatted.replace(".0M", "M").replace(".0k", "k");

    if incomplete {
        format!("{}*", trimmed)
    } else {
        trimmed
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the leaderboard as a ranked table: Index, Score, Name, Username.
/// No headers. Index column right-aligned; score column 7 chars wide
/// (fits "9999.9M").
pub fn format_leaderboard(entries: &[RankedEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No students scored.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 7;
    let separator = "  ";

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format_score(entry.points, entry.incomplete);
            let score_padded = format!("{:>width$}", score_str, width = score_width);

            let username_len = entry.username.len();
            let fixed_width = index_width + 1 + score_width + separator.len() * 2 + username_len;

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(entry.name, width - fixed_width)
                } else {
                    truncate_name(entry.name, 20)
                }
            } else {
                entry.name.to_string()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name,
                    separator,
                    entry.username.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_padded, separator, name, separator, entry.username
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the leaderboard as tab-separated values for scripting.
/// Columns: points, name, username (no headers, no colors). Incomplete
/// scores keep their asterisk so downstream tooling can tell a true zero
/// from a failed extraction.
pub fn format_tsv(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let points = entry.points.round() as i64;
            let marker = if entry.incomplete { "*" } else { "" };
            format!("{}{}\t{}\t{}", points, marker, entry.name, entry.username)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line detail for one student (verbose mode)
pub fn format_student_detail(entry: &RankedEntry, use_colors: bool) -> String {
    let status = if entry.incomplete {
        "partial (some fetches failed)"
    } else {
        "complete"
    };

    if use_colors {
        format!(
            "{}\n  Username: {}\n  Points: {}\n  Extraction: {}",
            entry.name.bold(),
            entry.username.cyan(),
            format_score(entry.points, entry.incomplete).bold(),
            status
        )
    } else {
        format!(
            "{}\n  Username: {}\n  Points: {}\n  Extraction: {}",
            entry.name,
            entry.username,
            format_score(entry.points, entry.incomplete),
            status
        )
    }
}
