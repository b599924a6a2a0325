//! Video timestamp helpers.
//!
//! Offsets are whole seconds from the start of a video.

/// `M:SS` label for an offset; minutes are not wrapped into hours.
pub fn clock_label(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Parse a `t=`/`start=` style offset.
///
/// Accepts plain seconds (`"90"`), a trailing `s` (`"90s"`) and unit groups
/// (`"1h2m3s"`, `"1m30s"`). Returns `None` for anything else.
pub fn parse_offset(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(v) = raw.parse::<u64>() {
        return Some(v);
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut saw_unit = false;
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let unit = match ch.to_ascii_lowercase() {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        if digits.is_empty() {
            return None;
        }
        let value: u64 = digits.parse().ok()?;
        total = total.checked_add(value.checked_mul(unit)?)?;
        digits.clear();
        saw_unit = true;
    }

    if !digits.is_empty() || !saw_unit {
        return None;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::{clock_label, parse_offset};

    #[test]
    fn labels_pad_seconds() {
        assert_eq!(clock_label(5), "0:05");
        assert_eq!(clock_label(754), "12:34");
        assert_eq!(clock_label(3725), "62:05");
    }

    #[test]
    fn parses_offset_forms() {
        assert_eq!(parse_offset("90"), Some(90));
        assert_eq!(parse_offset("90s"), Some(90));
        assert_eq!(parse_offset("1m30s"), Some(90));
        assert_eq!(parse_offset("1h2m3s"), Some(3723));
        assert_eq!(parse_offset(""), None);
        assert_eq!(parse_offset("abc"), None);
        assert_eq!(parse_offset("1m30"), None);
    }
}
