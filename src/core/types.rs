use std::fmt;
use indexmap::IndexMap;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, Result};

/// A movie rating, always within [0, 10]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    pub fn new(value: f64) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(Error::validation(format!(
                "Rating {} is invalid! Number must be between {} and {}",
                value, Self::MIN, Self::MAX
            )));
        }
        // -0.0 would otherwise print as "-0"
        Ok(Rating(value + 0.0))
    }

    /// Parse user or service input; surrounding whitespace is ignored
    pub fn parse(input: &str) -> Result<Self> {
        let value = input
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::validation(format!("'{}' is not a number (0-10)", input.trim())))?;
        Self::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Rating::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> f64 {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything stored for a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub year: i32,
    pub rating: Option<Rating>,
    pub poster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub details: MovieDetails,
}

impl MovieRecord {
    pub fn new(
        title: impl Into<String>,
        year: i32,
        rating: Option<Rating>,
        poster: Option<String>,
    ) -> Result<Self> {
        let title = title.into();
        validate_title(&title)?;

        Ok(MovieRecord {
            title,
            details: MovieDetails { year, rating, poster },
        })
    }

    pub fn year(&self) -> i32 {
        self.details.year
    }

    pub fn rating(&self) -> Option<Rating> {
        self.details.rating
    }

    pub fn poster(&self) -> Option<&str> {
        self.details.poster.as_deref()
    }
}

/// Snapshot of the store, keyed by title in insertion order
pub type Collection = IndexMap<String, MovieDetails>;

pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::validation("Title cannot be empty"));
    }
    Ok(())
}

/// Case-insensitive title comparison used by lookup, delete and update
pub fn titles_match(stored: &str, requested: &str) -> bool {
    stored.to_lowercase() == requested.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(Rating::new(0.0).is_ok());
        assert!(Rating::new(10.0).is_ok());
        assert!(Rating::new(-1.0).unwrap_err().is_validation());
        assert!(Rating::new(10.5).unwrap_err().is_validation());
        assert!(Rating::new(f64::NAN).is_err());
    }

    #[test]
    fn rating_parse_rejects_garbage() {
        assert_eq!(Rating::parse(" 7.5 ").unwrap().value(), 7.5);
        assert!(Rating::parse("N/A").unwrap_err().is_validation());
        assert!(Rating::parse("").is_err());
    }

    #[test]
    fn negative_zero_rating_is_plain_zero() {
        let rating = Rating::parse("-0").unwrap();
        assert!(rating.value().is_sign_positive());
        assert_eq!(rating.to_string(), "0");
    }

    #[test]
    fn empty_title_is_rejected() {
        assert!(MovieRecord::new("   ", 1999, None, None).unwrap_err().is_validation());
        assert!(MovieRecord::new("Heat", 1995, None, None).is_ok());
    }

    #[test]
    fn title_matching_ignores_case() {
        assert!(titles_match("Movie", "MOVIE"));
        assert!(titles_match("Amélie", "AMÉLIE"));
        assert!(!titles_match("Movie", "Movies"));
    }
}
