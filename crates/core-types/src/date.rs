//! The `DD.MM.YYYY` release date contract shared by the enrichment payload,
//! the update body, the list filter and the JSON we send back.

use crate::error::CoreError;
use chrono::NaiveDate;

/// `chrono` format string for `DD.MM.YYYY`.
pub const RELEASE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parses a release date from its wire form.
///
/// Input must be exactly two-digit day, two-digit month and four-digit
/// year. Only real calendar dates are accepted; `31.02.2006`, `1.6.2006`
/// or `2006-06-19` fail.
pub fn parse_release_date(text: &str) -> Result<NaiveDate, CoreError> {
    let invalid = || CoreError::InvalidReleaseDate(text.to_string());
    if !has_wire_layout(text) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(text, RELEASE_DATE_FORMAT).map_err(|_| invalid())
}

/// `DD.MM.YYYY`: digits everywhere except the dots at 2 and 5.
fn has_wire_layout(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

/// Renders a release date in its wire form.
pub fn format_release_date(date: NaiveDate) -> String {
    date.format(RELEASE_DATE_FORMAT).to_string()
}

/// `#[serde(with = "...")]` adapter so `Song::release_date` leaves the API in
/// the same form it came in.
pub mod release_date_format {
    use super::{format_release_date, parse_release_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_release_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_release_date(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_month_year() {
        let date = parse_release_date("19.06.2006").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2006, 6, 19).unwrap());
    }

    #[test]
    fn rejects_other_layouts_and_impossible_dates() {
        for text in [
            "2006-06-19",
            "06/19/2006",
            "31.02.2006",
            "",
            "19.06",
            "1.6.2006",
            "19.6.2006",
            " 19.06.2006 ",
            "19.06.20061",
            "+9.06.2006",
        ] {
            assert_eq!(
                parse_release_date(text),
                Err(CoreError::InvalidReleaseDate(text.to_string())),
                "{text} should not parse"
            );
        }
    }

    #[test]
    fn format_then_parse_is_the_same_day() {
        let dates = [
            NaiveDate::from_ymd_opt(1969, 7, 20).unwrap(),
            NaiveDate::from_ymd_opt(2000, 2, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        ];
        for date in dates {
            let text = format_release_date(date);
            assert_eq!(parse_release_date(&text).unwrap(), date);
        }
        assert_eq!(format_release_date(dates[0]), "20.07.1969");
    }
}
