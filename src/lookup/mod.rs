//! Movie information lookup.
//!
//! The add flow is a two-step pipeline: a [`MovieLookup`] produces a raw
//! [`MovieInfo`], which is validated into a [`MovieRecord`] and only then
//! handed to the store.

pub mod omdb;

use serde::Deserialize;
use crate::core::error::{Error, Result};
use crate::core::types::{MovieRecord, Rating};

pub use omdb::OmdbClient;

/// Marker the service uses for missing values
const NOT_AVAILABLE: &str = "N/A";

/// Source of movie data keyed by title
pub trait MovieLookup {
    /// `Ok(None)` when the service has no such movie
    fn fetch_by_title(&self, title: &str) -> Result<Option<MovieInfo>>;
}

/// Movie data as the service reports it, before validation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieInfo {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "imdbRating", default)]
    pub rating_raw: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster_url: Option<String>,
}

impl MovieInfo {
    /// Validate into a storable record.
    ///
    /// Unparsable ratings ("N/A") become an absent rating; a parsable rating
    /// outside [0, 10] is rejected.
    pub fn into_record(self) -> Result<MovieRecord> {
        let year = parse_year(&self.year)?;

        let rating = match self.rating_raw.as_deref().map(str::trim) {
            None | Some(NOT_AVAILABLE) | Some("") => None,
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) => Some(Rating::new(value)?),
                Err(_) => None,
            },
        };

        let poster = self
            .poster_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty() && url != NOT_AVAILABLE);

        MovieRecord::new(self.title.trim(), year, rating, poster)
    }
}

/// Leading digits of the year field: "1999" -> 1999, "2005–2008" -> 2005
fn parse_year(raw: &str) -> Result<i32> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<i32>()
        .map_err(|_| Error::lookup(format!("Unrecognized release year '{}'", raw)))
}
