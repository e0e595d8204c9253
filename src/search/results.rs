use std::collections::BinaryHeap;
use std::cmp::Ordering;

/// Title with similarity score
#[derive(Debug, Clone)]
pub struct ScoredTitle {
    pub title: String,
    pub score: f64,
    pub position: usize,    // index in the collection, breaks ties
}

// Heap ordering: "greater" means a worse candidate, so the heap top is the
// first one to evict
impl PartialEq for ScoredTitle {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredTitle {}

impl PartialOrd for ScoredTitle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredTitle {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then(self.position.cmp(&other.position))
    }
}

/// Top-K collector, stable for equal scores
pub struct TopKCollector {
    pub heap: BinaryHeap<ScoredTitle>,
    pub k: usize,
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        TopKCollector {
            heap: BinaryHeap::with_capacity(k + 1),
            k,
        }
    }

    pub fn collect(&mut self, candidate: ScoredTitle) {
        if self.k == 0 {
            return;
        }

        self.heap.push(candidate);
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    /// Best first
    pub fn get_results(self) -> Vec<ScoredTitle> {
        self.heap.into_sorted_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, score: f64, position: usize) -> ScoredTitle {
        ScoredTitle { title: title.to_string(), score, position }
    }

    #[test]
    fn keeps_highest_scores_and_earliest_ties() {
        let mut collector = TopKCollector::new(2);
        collector.collect(candidate("a", 50.0, 0));
        collector.collect(candidate("b", 80.0, 1));
        collector.collect(candidate("c", 50.0, 2));
        collector.collect(candidate("d", 10.0, 3));

        let titles: Vec<String> = collector.get_results().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[test]
    fn zero_capacity_collects_nothing() {
        let mut collector = TopKCollector::new(0);
        collector.collect(candidate("a", 99.0, 0));
        assert!(collector.get_results().is_empty());
    }
}
