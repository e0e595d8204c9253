use crate::core::types::Collection;
use crate::search::results::{ScoredTitle, TopKCollector};

pub const DEFAULT_LIMIT: usize = 3;
pub const DEFAULT_SCORE_THRESHOLD: f64 = 30.0;

/// "Did you mean" suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub title: String,
    pub score: f64,
}

/// Scores candidates against a fixed query on a 0-100 scale.
///
/// The score is the normalized indel similarity of the lowercased strings:
/// `100 * (1 - indel / (len_a + len_b))` with `indel = len_a + len_b - 2 * lcs`,
/// lengths counted in chars.
pub struct FuzzyMatcher {
    query: Vec<char>,
}

impl FuzzyMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_lowercase().chars().collect(),
        }
    }

    pub fn score(&self, candidate: &str) -> f64 {
        let candidate: Vec<char> = candidate.to_lowercase().chars().collect();
        let total = self.query.len() + candidate.len();
        if total == 0 {
            return 100.0;
        }

        let lcs = longest_common_subsequence(&self.query, &candidate);
        let indel = total - 2 * lcs;

        100.0 * (1.0 - indel as f64 / total as f64)
    }
}

/// Length of the longest common subsequence, two rolling rows
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev_row = vec![0usize; b.len() + 1];
    let mut curr_row = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr_row[j + 1] = if ca == cb {
                prev_row[j] + 1
            } else {
                prev_row[j + 1].max(curr_row[j])
            };
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

/// Rank every title against `query`, keep the best `limit`, then drop those
/// scoring below `threshold`. Equal scores keep collection order.
pub fn fuzzy_search(
    collection: &Collection,
    query: &str,
    limit: usize,
    threshold: f64,
) -> Vec<FuzzyMatch> {
    let matcher = FuzzyMatcher::new(query);
    let mut collector = TopKCollector::new(limit);

    for (position, title) in collection.keys().enumerate() {
        collector.collect(ScoredTitle {
            title: title.clone(),
            score: matcher.score(title),
            position,
        });
    }

    collector
        .get_results()
        .into_iter()
        .filter(|candidate| candidate.score >= threshold)
        .map(|candidate| FuzzyMatch {
            title: candidate.title,
            score: candidate.score,
        })
        .collect()
}
