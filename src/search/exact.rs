use crate::core::types::{Collection, Rating};

/// A title containing the query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub title: &'a str,
    pub year: i32,
    pub rating: Option<Rating>,
}

/// Case-insensitive substring search in collection order.
///
/// Lazy: nothing is scanned until the iterator is driven. An empty query
/// matches nothing; callers reject it as invalid input before searching.
pub fn exact_search<'a>(
    collection: &'a Collection,
    query: &str,
) -> impl Iterator<Item = SearchHit<'a>> + use<'a> {
    let needle = query.trim().to_lowercase();

    collection
        .iter()
        .filter(move |(title, _)| !needle.is_empty() && title.to_lowercase().contains(&needle))
        .map(|(title, details)| SearchHit {
            title: title.as_str(),
            year: details.year,
            rating: details.rating,
        })
}
