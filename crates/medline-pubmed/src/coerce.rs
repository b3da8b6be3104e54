//! Field coercers: deterministic, pure functions applied while building a
//! citation from its XML event stream. None of these fail the record — a
//! coercion miss leaves the destination field unset and logs a line.

use chrono::NaiveDate;

/// If `s` is longer than `max` code units, truncate to `max - 3` and append
/// `"..."`. Otherwise return `s` unchanged.
pub fn truncate_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{truncated}...")
}

/// Three-letter month abbreviations map case-sensitively, matching source
/// behavior: `Mar` is 3, `MAR` is not recognized.
fn month_from_name(s: &str) -> Option<u32> {
    match s {
        "Jan" => Some(1),
        "Feb" => Some(2),
        "Mar" => Some(3),
        "Apr" => Some(4),
        "May" => Some(5),
        "Jun" => Some(6),
        "Jul" => Some(7),
        "Aug" => Some(8),
        "Sep" => Some(9),
        "Oct" => Some(10),
        "Nov" => Some(11),
        "Dec" => Some(12),
        _ => None,
    }
}

/// Parse a month that is either numeric or a case-sensitive three-letter
/// English abbreviation.
pub fn parse_month(s: &str) -> Option<u32> {
    s.trim()
        .parse::<u32>()
        .ok()
        .or_else(|| month_from_name(s.trim()))
}

/// Build a date from year/month/day text. Month follows [`parse_month`]. A
/// missing `Month`/`Day` element defaults to 1, matching how MEDLINE dates
/// are commonly truncated to a bare year; but if the element is present and
/// fails to parse, the whole date is left unset rather than silently
/// substituting a fabricated January 1st.
pub fn parse_date(year: Option<&str>, month: Option<&str>, day: Option<&str>) -> Option<NaiveDate> {
    let year: i32 = year?.trim().parse().ok()?;

    let month = match month {
        Some(m) => parse_month(m)?,
        None => 1,
    };
    let day: u32 = match day {
        Some(d) => d.trim().parse().ok()?,
        None => 1,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Extract a 4-digit year from free-form text (e.g. `MedlineDate`), trying a
/// numeric prefix first, then a numeric suffix. `"1998 Spring"` and
/// `"Spring 1998"` both yield `1998`.
pub fn parse_year_fallback(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.len() >= 4 {
        if let Ok(y) = text[..4].parse::<i32>() {
            return Some(y);
        }
    }
    if text.len() >= 4 {
        if let Ok(y) = text[text.len() - 4..].parse::<i32>() {
            return Some(y);
        }
    }
    None
}

/// Values outside `domain` are treated as missing rather than fatal.
pub fn enum_validate<'a>(value: &'a str, domain: &[&str]) -> Option<&'a str> {
    domain.contains(&value).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_unchanged_when_short() {
        assert_eq!(truncate_ellipsis("hello", 10), "hello");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_ellipsis("abcdefghij", 5), "ab...");
    }

    #[test]
    fn gene_symbol_boundary_from_spec() {
        let long = "a".repeat(45);
        let truncated = truncate_ellipsis(&long, 40);
        assert_eq!(truncated.len(), 40);
        assert!(truncated.ends_with("..."));
        assert_eq!(&truncated[..37], &"a".repeat(37));
    }

    #[test]
    fn month_case_sensitive() {
        assert_eq!(parse_month("Mar"), Some(3));
        assert_eq!(parse_month("MAR"), None);
        assert_eq!(parse_month("03"), Some(3));
    }

    #[test]
    fn date_numeric_and_named_month_agree() {
        let d1 = parse_date(Some("2007"), Some("Jan"), Some("05"));
        let d2 = parse_date(Some("2007"), Some("01"), Some("05"));
        assert_eq!(d1, d2);
        assert_eq!(d1, NaiveDate::from_ymd_opt(2007, 1, 5));
    }

    #[test]
    fn date_unset_when_month_present_but_unparseable() {
        assert_eq!(parse_date(Some("2007"), Some("Garbage"), Some("05")), None);
    }

    #[test]
    fn date_defaults_missing_month_and_day_to_one() {
        assert_eq!(parse_date(Some("2007"), None, None), NaiveDate::from_ymd_opt(2007, 1, 1));
    }

    #[test]
    fn year_fallback_prefix_and_suffix() {
        assert_eq!(parse_year_fallback("1998 Spring"), Some(1998));
        assert_eq!(parse_year_fallback("Spring 1998"), Some(1998));
    }

    #[test]
    fn year_fallback_gives_up_on_garbage() {
        assert_eq!(parse_year_fallback("Spring"), None);
    }

    #[test]
    fn enum_validate_rejects_outside_domain() {
        assert_eq!(enum_validate("Y", &["Y", "N"]), Some("Y"));
        assert_eq!(enum_validate("Maybe", &["Y", "N"]), None);
    }
}
