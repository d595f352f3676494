//! Best-effort parsing of the model's summary reply.
//!
//! The prompt asks for a `要約:` section followed by a `重要ポイント:` list.
//! Models do not always comply, so a reply without either section falls back
//! to "first paragraph is the summary, bullet lines are key points".

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefixes that open the summary section.
const SUMMARY_MARKERS: &[&str] = &["要約:", "要約：", "Summary:"];

/// Substrings that open the key points section.
const KEY_POINT_MARKERS: &[&str] = &["重要ポイント", "主要ポイント", "Key Points"];

/// Leading characters recognised as bullets.
const BULLET_MARKERS: &[char] = &['•', '・', '-'];

/// Summary and derived metrics returned as the agent's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub original_length: usize,
    pub summary_length: usize,
    pub compression_ratio: f64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Summary,
    KeyPoints,
}

fn bullet_line() -> &'static Regex {
    static BULLET_LINE: OnceLock<Regex> = OnceLock::new();
    BULLET_LINE.get_or_init(|| Regex::new(r"(?m)^[•・-][ \t]*(.+)$").unwrap())
}

fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix(BULLET_MARKERS).map(str::trim)
}

/// Split a reply into `(summary, key_points)` using the section markers.
fn parse_sections(response: &str) -> (String, Vec<String>) {
    let mut summary = String::new();
    let mut key_points = Vec::new();
    let mut section = Section::None;

    for line in response.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rest) = SUMMARY_MARKERS.iter().find_map(|m| line.strip_prefix(m)) {
            section = Section::Summary;
            summary = rest.trim().to_string();
            continue;
        }

        if KEY_POINT_MARKERS.iter().any(|m| line.contains(m)) {
            section = Section::KeyPoints;
            continue;
        }

        match section {
            Section::Summary => {
                if !summary.is_empty() {
                    summary.push(' ');
                }
                summary.push_str(line);
            }
            Section::KeyPoints => {
                if let Some(point) = strip_bullet(line).filter(|p| !p.is_empty()) {
                    key_points.push(point.to_string());
                }
            }
            Section::None => {}
        }
    }

    (summary, key_points)
}

/// Summary = first paragraph, key points = every bullet line in the reply.
fn parse_fallback(response: &str) -> (String, Vec<String>) {
    let summary = response
        .split("\n\n")
        .map(str::trim)
        .find(|block| !block.is_empty())
        .unwrap_or_default()
        .to_string();

    let key_points = bullet_line()
        .captures_iter(response)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    (summary, key_points)
}

/// `1 - summary_length / original_length`, rounded to two decimals.
///
/// An empty source has nothing to compress and yields `0.0`.
pub fn compression_ratio(original_length: usize, summary_length: usize) -> f64 {
    if original_length == 0 {
        return 0.0;
    }
    let ratio = 1.0 - (summary_length as f64 / original_length as f64);
    (ratio * 100.0).round() / 100.0
}

/// Parse a model reply into a [`SummaryResult`] for `original_text`.
pub fn parse_summary_response(response: &str, original_text: &str) -> SummaryResult {
    let (mut summary, mut key_points) = parse_sections(response);
    if summary.is_empty() && key_points.is_empty() {
        (summary, key_points) = parse_fallback(response);
    }

    let summary = summary.trim().to_string();
    let original_length = original_text.chars().count();
    let summary_length = summary.chars().count();

    SummaryResult {
        compression_ratio: compression_ratio(original_length, summary_length),
        summary,
        key_points,
        original_length,
        summary_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_structured_reply() {
        let result = parse_summary_response("要約: X\n\n重要ポイント:\n• A\n• B", "source text");
        assert_eq!(result.summary, "X");
        assert_eq!(result.key_points, vec!["A", "B"]);
    }

    #[test]
    fn multi_line_summary_is_joined_with_spaces() {
        let reply = "要約: 一行目\n二行目\n  三行目  \n\n主要ポイント:\n・甲\n- 乙\n無視される行";
        let result = parse_summary_response(reply, "source");
        assert_eq!(result.summary, "一行目 二行目 三行目");
        assert_eq!(result.key_points, vec!["甲", "乙"]);
    }

    #[test]
    fn summary_marker_without_inline_text() {
        let reply = "Summary:\nThe gist.\nKey Points:\n• one";
        let result = parse_summary_response(reply, "source");
        assert_eq!(result.summary, "The gist.");
        assert_eq!(result.key_points, vec!["one"]);
    }

    #[test]
    fn full_width_colon_marker() {
        let result = parse_summary_response("要約：短い要約", "source");
        assert_eq!(result.summary, "短い要約");
        assert!(result.key_points.is_empty());
    }

    #[test]
    fn falls_back_on_unstructured_reply() {
        let reply = "This is the gist\nof the text.\n\n- first\n- second\nclosing words";
        let result = parse_summary_response(reply, "source");
        assert_eq!(result.summary, "This is the gist\nof the text.");
        assert_eq!(result.key_points, vec!["first", "second"]);
    }

    #[test]
    fn fallback_collects_bullets_from_first_paragraph_too() {
        let reply = "• alpha\n・beta";
        let result = parse_summary_response(reply, "source");
        assert_eq!(result.summary, "• alpha\n・beta");
        assert_eq!(result.key_points, vec!["alpha", "beta"]);
    }

    #[test]
    fn empty_reply_gives_empty_result() {
        let result = parse_summary_response("", "abc");
        assert_eq!(result.summary, "");
        assert!(result.key_points.is_empty());
        assert_eq!(result.original_length, 3);
        assert_eq!(result.summary_length, 0);
        assert_eq!(result.compression_ratio, 1.0);
    }

    #[test]
    fn compression_ratio_rounds_to_two_decimals() {
        assert_eq!(compression_ratio(100, 40), 0.6);
        assert_eq!(compression_ratio(3, 1), 0.67);
        assert_eq!(compression_ratio(10, 10), 0.0);
        assert_eq!(compression_ratio(10, 15), -0.5);
    }

    #[test]
    fn compression_ratio_of_empty_source_is_zero() {
        assert_eq!(compression_ratio(0, 0), 0.0);
        assert_eq!(compression_ratio(0, 25), 0.0);

        let result = parse_summary_response("要約: something", "");
        assert_eq!(result.original_length, 0);
        assert_eq!(result.compression_ratio, 0.0);
        assert!(result.compression_ratio.is_finite());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let source = "あ".repeat(100);
        let reply = format!("要約: {}", "い".repeat(40));
        let result = parse_summary_response(&reply, &source);
        assert_eq!(result.original_length, 100);
        assert_eq!(result.summary_length, 40);
        assert_eq!(result.compression_ratio, 0.6);
    }
}
