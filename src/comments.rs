use std::path::Path;

use regex::Regex;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::ExtractConfig;

/// Code-point ranges stripped from comments before any other cleanup.
/// A fixed blocklist covering the common emoji/pictograph blocks, not a
/// general emoji detector.
const PICTOGRAPH_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F680, 0x1F6FF), // transport & map symbols
    (0x1F700, 0x1F77F), // alchemical symbols
    (0x1F780, 0x1F7FF), // geometric shapes extended
    (0x1F800, 0x1F8FF), // supplemental arrows
    (0x1F900, 0x1F9FF), // supplemental symbols
    (0x1FA00, 0x1FA6F), // chess symbols
    (0x1FA70, 0x1FAFF), // symbols & pictographs extended
    (0x2700, 0x27BF),   // dingbats
    (0x2600, 0x26FF),   // miscellaneous symbols
];

fn is_pictograph(c: char) -> bool {
    let code = c as u32;
    PICTOGRAPH_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

/// Normalizes one raw comment: strips pictographs, rewrites `@handle` tokens
/// to bare names, collapses whitespace, and lowercases. Pure; truncation to
/// the configured character limit happens at the call site.
pub fn clean_comment(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !is_pictograph(*c)).collect();

    let handle_re = Regex::new(r"@(\w+)").unwrap_or_else(|_| Regex::new("^$").unwrap());
    let without_handles = handle_re.replace_all(&stripped, "$1");

    without_handles
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parses one input line into a cleaned comment, or `None` when the line is
/// structurally malformed or the raw trimmed message is shorter than
/// `min_length`. Rejection is measured on the original message, not the
/// cleaned one, so an all-emoji message long enough to pass still counts.
fn comment_from_line(line: &str, config: &ExtractConfig) -> Option<String> {
    let record: serde_json::Value = serde_json::from_str(line.trim()).ok()?;
    let message = record
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .trim();

    if message.is_empty() || message.chars().count() < config.min_length {
        return None;
    }

    Some(
        clean_comment(message)
            .chars()
            .take(config.char_limit)
            .collect(),
    )
}

/// Reads lines from a forward-only source, accepting up to `config.limit`
/// valid comments in input order. Malformed and too-short records are skipped
/// and do not count toward the limit.
pub async fn extract_comments<R>(reader: R, config: &ExtractConfig) -> Vec<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut comments = Vec::new();
    let mut lines = reader.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if let Some(comment) = comment_from_line(&line, config) {
            comments.push(comment);
            if comments.len() >= config.limit {
                break;
            }
        }
    }

    comments
}

/// File-backed wrapper around [`extract_comments`]. A missing or unreadable
/// file is reported and yields an empty list; the caller decides whether an
/// empty batch is fatal.
pub async fn extract_comments_from_file(path: &Path, config: &ExtractConfig) -> Vec<String> {
    match File::open(path).await {
        Ok(file) => extract_comments(BufReader::new(file), config).await,
        Err(err) => {
            tracing::warn!("could not open comment file {}: {err}", path.display());
            Vec::new()
        }
    }
}
