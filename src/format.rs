// src/format.rs
//! Display helpers for feed posts: caption previews and relative dates.

use chrono::{DateTime, Datelike, Utc};

pub const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_len` chars (plus the ellipsis) without
/// splitting a word. A single word longer than `max_len` is cut hard.
pub fn truncate_caption(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }

    let cut = if chars[max_len].is_whitespace() {
        max_len
    } else {
        match chars[..max_len].iter().rposition(|c| c.is_whitespace()) {
            Some(i) if i > 0 => i,
            _ => max_len,
        }
    };

    let mut out: String = chars[..cut].iter().collect();
    out.truncate(out.trim_end().len());
    out.push_str(ELLIPSIS);
    out
}

/// Parse the upstream timestamp. Accepts RFC 3339 and the Graph API form
/// with a colon-less offset (`2024-05-01T10:00:00+0000`).
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    DateTime::parse_from_rfc3339(ts)
        .or_else(|_| DateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn format_relative_time(timestamp: &str) -> String {
    format_relative_time_at(timestamp, Utc::now())
}

/// Buckets by whole elapsed days. Unparseable input is returned as is.
pub fn format_relative_time_at(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(t) = parse_timestamp(timestamp) else {
        return timestamp.to_string();
    };

    let days = (now - t).num_days();
    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        // "weeks" stays plural for a single week too
        7..=29 => format!("{} weeks ago", days / 7),
        _ if t.year() == now.year() => t.format("%b %-d").to_string(),
        _ => t.format("%b %-d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate_caption("short text", 100), "short text");
        assert_eq!(truncate_caption("exact", 5), "exact");
        assert_eq!(truncate_caption("", 0), "");
    }

    #[test]
    fn truncates_on_word_boundary() {
        let out = truncate_caption("The quick brown fox jumps", 12);
        assert_eq!(out, "The quick...");
        // boundary right after the cut keeps the full word
        assert_eq!(truncate_caption("The quick brown", 9), "The quick...");
    }

    #[test]
    fn single_long_word_is_cut_hard() {
        assert_eq!(truncate_caption("Supercalifragilistic", 5), "Super...");
    }

    #[test]
    fn counts_chars_not_bytes() {
        let out = truncate_caption("žluťoučký kůň úpěl ódy", 12);
        assert_eq!(out, "žluťoučký...");
    }

    #[test]
    fn parses_graph_and_rfc3339_timestamps() {
        let a = parse_timestamp("2024-05-01T10:00:00+0000").unwrap();
        let b = parse_timestamp("2024-05-01T10:00:00Z").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("yesterday-ish").is_none());
    }

    #[test]
    fn relative_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let ago = |d: i64| (now - Duration::days(d)).to_rfc3339();

        assert_eq!(format_relative_time_at(&ago(0), now), "Today");
        assert_eq!(format_relative_time_at(&ago(1), now), "Yesterday");
        assert_eq!(format_relative_time_at(&ago(3), now), "3 days ago");
        assert_eq!(format_relative_time_at(&ago(6), now), "6 days ago");
        assert_eq!(format_relative_time_at(&ago(10), now), "1 weeks ago");
        assert_eq!(format_relative_time_at(&ago(29), now), "4 weeks ago");
        assert_eq!(format_relative_time_at(&ago(45), now), "May 1");
        assert_eq!(format_relative_time_at(&ago(400), now), "May 12, 2023");
    }

    #[test]
    fn future_and_garbage_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let future = (now + Duration::hours(5)).to_rfc3339();
        assert_eq!(format_relative_time_at(&future, now), "Today");
        assert_eq!(format_relative_time_at("n/a", now), "n/a");
    }
}
