//! Parsing of release names of the form `vYYYY.MM.DD-<variant>`.

use std::fmt;

const PREFIX: char = 'v';
/// `YYYY.MM.DD`
const DATE_LEN: usize = 10;
const SEPARATOR: char = '-';

/// A release name split into its date and variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseName {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Everything after the date and its separator, e.g. `planes-staging-0`.
    pub variant: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    MissingPrefix(String),
    BadDate(String),
    MissingSeparator(String),
    EmptyVariant(String),
}

impl NameError {
    pub fn name(&self) -> &str {
        match self {
            NameError::MissingPrefix(name)
            | NameError::BadDate(name)
            | NameError::MissingSeparator(name)
            | NameError::EmptyVariant(name) => name,
        }
    }
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::MissingPrefix(name) => {
                write!(f, "release name {name:?} does not start with '{PREFIX}'")
            }
            NameError::BadDate(name) => {
                write!(f, "release name {name:?} has no YYYY.MM.DD date after '{PREFIX}'")
            }
            NameError::MissingSeparator(name) => {
                write!(f, "release name {name:?} has no '{SEPARATOR}' after its date")
            }
            NameError::EmptyVariant(name) => {
                write!(f, "release name {name:?} has an empty variant")
            }
        }
    }
}

impl std::error::Error for NameError {}

impl ReleaseName {
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let rest = name
            .strip_prefix(PREFIX)
            .ok_or_else(|| NameError::MissingPrefix(name.to_string()))?;

        let date = rest
            .get(..DATE_LEN)
            .filter(|date| is_dotted_date(date))
            .ok_or_else(|| NameError::BadDate(name.to_string()))?;

        let variant = rest[DATE_LEN..]
            .strip_prefix(SEPARATOR)
            .ok_or_else(|| NameError::MissingSeparator(name.to_string()))?;
        if variant.is_empty() {
            return Err(NameError::EmptyVariant(name.to_string()));
        }

        Ok(ReleaseName {
            date: date.replace('.', "-"),
            variant: variant.to_string(),
        })
    }

    /// `YYYY.MM.DD`, as used in tags.
    pub fn date_with_dots(&self) -> String {
        self.date.replace('-', ".")
    }

    /// The git tag of this release: `vYYYY.MM.DD-<variant>`.
    pub fn tag(&self) -> String {
        tag_for(&self.date, &self.variant)
    }
}

/// Tag for a `YYYY-MM-DD` date and variant.
pub fn tag_for(date: &str, variant: &str) -> String {
    format!("{PREFIX}{}{SEPARATOR}{variant}", date.replace('-', "."))
}

/// `DDDD.DD.DD`: ASCII digits with dots at offsets 4 and 7.
fn is_dotted_date(s: &str) -> bool {
    s.len() == DATE_LEN
        && s.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '.',
            _ => c.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_and_variant() {
        let parsed = ReleaseName::parse("v2024.03.02-planes-staging-0").unwrap();
        assert_eq!(parsed.date, "2024-03-02");
        assert_eq!(parsed.variant, "planes-staging-0");
        assert_eq!(parsed.date_with_dots(), "2024.03.02");
        assert_eq!(parsed.tag(), "v2024.03.02-planes-staging-0");
    }

    #[test]
    fn rejects_each_malformed_shape() {
        assert!(matches!(
            ReleaseName::parse("2024.03.02-planes"),
            Err(NameError::MissingPrefix(_))
        ));
        assert!(matches!(
            ReleaseName::parse("v2024-03-02-planes"),
            Err(NameError::BadDate(_))
        ));
        assert!(matches!(ReleaseName::parse("v2024.3.2-x"), Err(NameError::BadDate(_))));
        assert!(matches!(ReleaseName::parse("v"), Err(NameError::BadDate(_))));
        assert!(matches!(
            ReleaseName::parse("v2024.03.02_planes"),
            Err(NameError::MissingSeparator(_))
        ));
        assert!(matches!(
            ReleaseName::parse("v2024.03.02"),
            Err(NameError::MissingSeparator(_))
        ));
        assert!(matches!(
            ReleaseName::parse("v2024.03.02-"),
            Err(NameError::EmptyVariant(_))
        ));
    }

    #[test]
    fn multibyte_names_do_not_panic() {
        let err = ReleaseName::parse("vé024.03.02-x").unwrap_err();
        assert_eq!(err.name(), "vé024.03.02-x");
    }
}
