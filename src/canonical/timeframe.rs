//! Timeframe parsing and canonical 24-hour rendering.
//!
//! Accepted range syntax: `HH:MM-HH:MM`, `h[:mm]am/pm-h[:mm]am/pm`, with
//! `-`, en/em dashes, or ` to ` as the separator. Ranges are minutes since
//! midnight; an end earlier than the start wraps past midnight.

use chrono::NaiveTime;

pub const DAY_MINUTES: u32 = 24 * 60;

fn parse_number(s: &str, max_digits: usize) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || s.len() > max_digits || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a single clock token like "8", "8:10", "20:10", "8pm", "8:10 pm"
/// into minutes since midnight.
pub fn parse_clock(token: &str) -> Option<u32> {
    let t = token.trim().to_ascii_lowercase();
    let (body, meridiem) = if let Some(rest) = t.strip_suffix("am") {
        (rest.trim_end(), Some("am"))
    } else if let Some(rest) = t.strip_suffix("pm") {
        (rest.trim_end(), Some("pm"))
    } else {
        (t.as_str(), None)
    };

    let (hour_str, minute_str) = match body.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (body, None),
    };
    let hour = parse_number(hour_str, 2)?;
    let minute = match minute_str {
        Some(m) => {
            // Minutes are always two digits ("8:5pm" is not a clock time).
            if m.trim().len() != 2 {
                return None;
            }
            parse_number(m, 2)?
        }
        None => 0,
    };
    if hour > 24 || minute > 59 {
        return None;
    }

    let hour = match meridiem {
        Some("am") if hour == 12 => 0,
        Some("pm") if hour != 12 => hour + 12,
        _ => hour,
    };
    Some((hour % 24) * 60 + minute)
}

/// Parse a range into (start, end) minutes. The end is shifted by 24h when
/// it precedes the start, so "23:50-00:10" yields (1430, 1450).
pub fn parse_timeframe(s: &str) -> Option<(u32, u32)> {
    let s = s
        .trim()
        .to_ascii_lowercase()
        .replace('\u{2014}', "-")
        .replace('\u{2013}', "-");
    let (first, second) = match s.split_once(" to ") {
        Some(parts) => parts,
        None => s.split_once('-')?,
    };
    let start = parse_clock(first)?;
    let mut end = parse_clock(second)?;
    if end < start {
        end += DAY_MINUTES;
    }
    Some((start, end))
}

/// Render a parsed range back into the canonical `HH:MM-HH:MM` form.
pub fn canonical_timeframe(s: &str) -> Option<String> {
    let (start, end) = parse_timeframe(s)?;
    Some(format!(
        "{}-{}",
        format_minutes(start),
        format_minutes(end % DAY_MINUTES)
    ))
}

fn format_minutes(total: u32) -> String {
    let total = total % DAY_MINUTES;
    NaiveTime::from_hms_opt(total / 60, total % 60, 0)
        .unwrap_or(NaiveTime::MIN)
        .format("%H:%M")
        .to_string()
}

/// Minutes two ranges overlap; the candidate is also tried shifted by 24h
/// so wrap-around ranges still intersect.
pub fn overlap_minutes(a: (u32, u32), b: (u32, u32)) -> u32 {
    let (a1, a2) = a;
    let mut best = 0;
    for (b1, b2) in [b, (b.0 + DAY_MINUTES, b.1 + DAY_MINUTES)] {
        let lo = a1.max(b1);
        let hi = a2.min(b2);
        best = best.max(hi.saturating_sub(lo));
    }
    best
}
