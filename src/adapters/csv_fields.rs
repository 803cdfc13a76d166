//! Field helpers shared by the CSV adapters.

use chrono::NaiveDate;

/// Parse `YYYY-MM-DD`, tolerating a trailing time component
/// (`2021-01-04 00:00:00`, `2021-01-04T00:00:00`).
pub fn parse_date(field: &str) -> Result<NaiveDate, chrono::ParseError> {
    let trimmed = field.trim();
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
}

/// Index of the first header matching any of `names`, case-insensitively.
pub fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_and_timestamped_dates() {
        let expected = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
        assert_eq!(parse_date("2021-01-04").unwrap(), expected);
        assert_eq!(parse_date(" 2021-01-04 00:00:00").unwrap(), expected);
        assert_eq!(parse_date("2021-01-04T00:00:00").unwrap(), expected);
        assert!(parse_date("04/01/2021").is_err());
    }

    #[test]
    fn find_column_by_any_name() {
        let headers = csv::StringRecord::from(vec!["Date", "High", "Adj Close"]);
        assert_eq!(find_column(&headers, &["adj close"]), Some(2));
        assert_eq!(find_column(&headers, &["adj_close", "date"]), Some(0));
        assert_eq!(find_column(&headers, &["volume"]), None);
    }
}
