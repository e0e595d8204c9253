mod common;

use common::{collection, matrix_collection, open_temp_db, record};
use moviedex::core::stats::{self, RatingStat};
use moviedex::core::types::Collection;
use moviedex::search::{exact_search, fuzzy_search, DEFAULT_LIMIT, DEFAULT_SCORE_THRESHOLD};

#[test]
fn exact_search_is_case_insensitive_and_ordered() {
    let movies = matrix_collection();

    let titles: Vec<&str> = exact_search(&movies, "mat").map(|hit| hit.title).collect();
    assert_eq!(titles, vec!["Matrix", "The Matrix Reloaded"]);

    let titles: Vec<&str> = exact_search(&movies, "MATRIX RE").map(|hit| hit.title).collect();
    assert_eq!(titles, vec!["The Matrix Reloaded"]);
}

#[test]
fn exact_search_carries_year_and_rating() {
    let movies = matrix_collection();
    let hit = exact_search(&movies, "incep").next().unwrap();

    assert_eq!(hit.year, 2010);
    assert_eq!(hit.rating.map(|r| r.value()), Some(8.8));
}

#[test]
fn exact_search_is_lazy_and_reiterable() {
    let movies = matrix_collection();
    let mut hits = exact_search(&movies, "e");

    assert_eq!(hits.next().unwrap().title, "The Matrix Reloaded");
    assert_eq!(exact_search(&movies, "e").count(), 2);
}

#[test]
fn exact_search_with_empty_query_finds_nothing() {
    assert_eq!(exact_search(&matrix_collection(), "").count(), 0);
    assert_eq!(exact_search(&Collection::new(), "mat").count(), 0);
}

#[test]
fn fuzzy_search_ranks_close_titles_first() {
    let movies = matrix_collection();
    assert_eq!(exact_search(&movies, "Matricks").count(), 0);

    let matches = fuzzy_search(&movies, "Matricks", DEFAULT_LIMIT, DEFAULT_SCORE_THRESHOLD);
    let titles: Vec<&str> = matches.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Matrix", "The Matrix Reloaded"]);
    assert!(matches.iter().all(|m| m.score >= DEFAULT_SCORE_THRESHOLD));
    assert!(matches[0].score > matches[1].score);
}

#[test]
fn fuzzy_search_drops_everything_below_threshold() {
    let matches = fuzzy_search(&matrix_collection(), "Zzzzz", DEFAULT_LIMIT, DEFAULT_SCORE_THRESHOLD);
    assert!(matches.is_empty());
}

#[test]
fn fuzzy_search_respects_limit_and_keeps_order_on_ties() {
    let movies = collection(&[
        ("Cars", 2006, None),
        ("Bars", 2001, None),
        ("Jars", 2003, None),
        ("Wars", 2005, None),
    ]);

    let matches = fuzzy_search(&movies, "Mars", 3, 0.0);
    let titles: Vec<&str> = matches.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Cars", "Bars", "Jars"]);
    assert!(matches.iter().all(|m| m.score == matches[0].score));
}

#[test]
fn fuzzy_search_limits_before_filtering() {
    let movies = collection(&[
        ("Heat", 1995, None),
        ("Heath", 2000, None),
        ("Xyz", 2001, None),
    ]);

    let matches = fuzzy_search(&movies, "heat", 1, DEFAULT_SCORE_THRESHOLD);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].title, "Heat");
    assert_eq!(matches[0].score, 100.0);
}

#[test]
fn statistics_over_a_stored_snapshot() {
    let (_dir, db) = open_temp_db();
    db.add(record("A", 2000, Some(9.0))).unwrap();
    db.add(record("B", 2001, Some(9.0))).unwrap();
    db.add(record("C", 2002, Some(5.0))).unwrap();
    db.add(record("D", 2003, None)).unwrap();

    let movies = db.list().unwrap();

    let best = stats::best_rated(&movies);
    assert_eq!(best.titles, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(best.rating, Some(9.0));

    let worst = stats::worst_rated(&movies);
    assert_eq!(worst.titles, vec!["C".to_string()]);
    assert_eq!(worst.rating, Some(5.0));

    assert_eq!(stats::median_rating(&movies), RatingStat::Computed(9.0));
    assert!((stats::average_rating(&movies).value() - 23.0 / 3.0).abs() < 1e-12);
}

#[test]
fn statistics_on_empty_store_report_no_data() {
    let (_dir, db) = open_temp_db();
    let movies = db.list().unwrap();

    assert!(stats::average_rating(&movies).is_no_data());
    assert!(stats::median_rating(&movies).is_no_data());
    assert!(stats::best_rated(&movies).titles.is_empty());
    assert_eq!(stats::worst_rated(&movies).rating, None);
}
