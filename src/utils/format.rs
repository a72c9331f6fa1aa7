//! Countdown display formatting

/// Format milliseconds as "M:SS"
///
/// Minutes are not padded and have no upper bound; seconds are the whole
/// seconds within the current minute. Sub-second remainders are truncated
/// and negative values render as "0:00".
pub fn format_countdown(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
