use crate::date::parse_release_date;
use crate::error::CoreError;
use chrono::NaiveDate;

/// List filters as they arrive from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilterInput {
    pub group: Option<String>,
    pub song: Option<String>,
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
}

/// Equality filters over the `songs` columns. `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub group: Option<String>,
    pub song: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl SongFilterInput {
    /// Parses the release date filter, passing every other field through.
    pub fn parse(self) -> Result<SongFilter, CoreError> {
        let release_date = self
            .release_date
            .as_deref()
            .map(parse_release_date)
            .transpose()?;

        Ok(SongFilter {
            group: self.group,
            song: self.song,
            release_date,
            text: self.text,
            link: self.link,
        })
    }
}

impl SongFilter {
    pub fn is_empty(&self) -> bool {
        self.group.is_none()
            && self.song.is_none()
            && self.release_date.is_none()
            && self.text.is_none()
            && self.link.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_date_is_parsed_and_the_rest_passes_through() {
        let input = SongFilterInput {
            group: Some("Muse".into()),
            release_date: Some("19.06.2006".into()),
            ..Default::default()
        };
        let filter = input.parse().unwrap();
        assert_eq!(filter.group.as_deref(), Some("Muse"));
        assert_eq!(filter.release_date, NaiveDate::from_ymd_opt(2006, 6, 19));
        assert!(filter.song.is_none());
    }

    #[test]
    fn bad_release_date_is_an_error() {
        let input = SongFilterInput {
            release_date: Some("2006-06-19".into()),
            ..Default::default()
        };
        assert!(matches!(
            input.parse(),
            Err(CoreError::InvalidReleaseDate(_))
        ));
    }

    #[test]
    fn empty_filter() {
        assert!(SongFilterInput::default().parse().unwrap().is_empty());
    }
}
