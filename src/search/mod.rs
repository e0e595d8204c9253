pub mod exact;
pub mod fuzzy;
pub mod results;

pub use exact::{exact_search, SearchHit};
pub use fuzzy::{fuzzy_search, FuzzyMatch, FuzzyMatcher, DEFAULT_LIMIT, DEFAULT_SCORE_THRESHOLD};
