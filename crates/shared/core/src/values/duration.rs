const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Render a millisecond count as a short human-readable duration
///
/// Leading zero units are omitted, seconds and milliseconds are always shown:
/// `0s 7ms`, `2m 0s 15ms`, `1d 3h 0m 2s 0ms`. Negative values get a leading `-`.
pub fn format_millis(millis: i64) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let mut rest = millis.unsigned_abs();

    let days = rest / MILLIS_PER_DAY as u64;
    rest %= MILLIS_PER_DAY as u64;
    let hours = rest / MILLIS_PER_HOUR as u64;
    rest %= MILLIS_PER_HOUR as u64;
    let minutes = rest / MILLIS_PER_MINUTE as u64;
    rest %= MILLIS_PER_MINUTE as u64;
    let seconds = rest / MILLIS_PER_SECOND as u64;
    let ms = rest % MILLIS_PER_SECOND as u64;

    let mut out = String::from(sign);
    if days > 0 {
        out.push_str(&format!("{}d ", days));
    }
    if days > 0 || hours > 0 {
        out.push_str(&format!("{}h ", hours));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m ", minutes));
    }
    out.push_str(&format!("{}s {}ms", seconds, ms));
    out
}
