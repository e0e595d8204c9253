use std::cmp::Ordering;
use rand::Rng;
use crate::core::types::{Collection, MovieDetails};

/// Result of an aggregate over present ratings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingStat {
    Computed(f64),
    NoData,
}

impl RatingStat {
    /// The computed value, or the 0.0 sentinel when no record is rated
    pub fn value(&self) -> f64 {
        match self {
            RatingStat::Computed(value) => *value,
            RatingStat::NoData => 0.0,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, RatingStat::NoData)
    }
}

/// Every title sharing an extremal rating
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatedTitles {
    pub titles: Vec<String>,
    pub rating: Option<f64>,
}

impl RatedTitles {
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

fn present_ratings(collection: &Collection) -> Vec<f64> {
    collection
        .values()
        .filter_map(|details| details.rating)
        .map(|rating| rating.value())
        .collect()
}

pub fn average_rating(collection: &Collection) -> RatingStat {
    let ratings = present_ratings(collection);
    if ratings.is_empty() {
        return RatingStat::NoData;
    }

    RatingStat::Computed(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

pub fn median_rating(collection: &Collection) -> RatingStat {
    let mut ratings = present_ratings(collection);
    if ratings.is_empty() {
        return RatingStat::NoData;
    }

    // Ratings are validated finite values, total_cmp orders them as expected
    ratings.sort_by(f64::total_cmp);

    let mid = ratings.len() / 2;
    let median = if ratings.len() % 2 == 0 {
        (ratings[mid - 1] + ratings[mid]) / 2.0
    } else {
        ratings[mid]
    };

    RatingStat::Computed(median)
}

pub fn best_rated(collection: &Collection) -> RatedTitles {
    extremal(collection, Ordering::Greater)
}

pub fn worst_rated(collection: &Collection) -> RatedTitles {
    extremal(collection, Ordering::Less)
}

/// Titles whose rating compares as `wanted` against every other rating, ties kept
fn extremal(collection: &Collection, wanted: Ordering) -> RatedTitles {
    let target = present_ratings(collection)
        .into_iter()
        .reduce(|acc, rating| if rating.total_cmp(&acc) == wanted { rating } else { acc });

    let Some(target) = target else {
        return RatedTitles::default();
    };

    let titles = collection
        .iter()
        .filter(|(_, details)| details.rating.map(|r| r.value()) == Some(target))
        .map(|(title, _)| title.clone())
        .collect();

    RatedTitles {
        titles,
        rating: Some(target),
    }
}

/// Highest rating first; unrated movies last; ties keep collection order
pub fn sorted_by_rating(collection: &Collection) -> Vec<(&String, &MovieDetails)> {
    let mut movies: Vec<_> = collection.iter().collect();

    movies.sort_by(|(_, a), (_, b)| match (a.rating, b.rating) {
        (Some(a), Some(b)) => b.value().total_cmp(&a.value()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    movies
}

pub fn random_movie<'a, R: Rng + ?Sized>(
    collection: &'a Collection,
    rng: &mut R,
) -> Option<(&'a String, &'a MovieDetails)> {
    if collection.is_empty() {
        return None;
    }
    collection.get_index(rng.gen_range(0..collection.len()))
}
