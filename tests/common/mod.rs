#![allow(dead_code)]

use moviedex::core::config::Config;
use moviedex::core::database::MovieDatabase;
use moviedex::core::types::{Collection, MovieDetails, MovieRecord, Rating};
use tempfile::TempDir;

/// Database in a fresh temporary directory; keep the TempDir alive
pub fn open_temp_db() -> (TempDir, MovieDatabase) {
    let dir = TempDir::new().expect("temp dir");
    let db = MovieDatabase::open(Config::with_storage_path(dir.path())).expect("open database");
    (dir, db)
}

pub fn record(title: &str, year: i32, rating: Option<f64>) -> MovieRecord {
    let rating = rating.map(|r| Rating::new(r).expect("valid rating"));
    MovieRecord::new(title, year, rating, None).expect("valid record")
}

pub fn collection(movies: &[(&str, i32, Option<f64>)]) -> Collection {
    movies
        .iter()
        .map(|(title, year, rating)| {
            let details = MovieDetails {
                year: *year,
                rating: rating.map(|r| Rating::new(r).expect("valid rating")),
                poster: None,
            };
            (title.to_string(), details)
        })
        .collect()
}

pub fn matrix_collection() -> Collection {
    collection(&[
        ("Matrix", 1999, Some(8.7)),
        ("The Matrix Reloaded", 2003, Some(7.2)),
        ("Inception", 2010, Some(8.8)),
    ])
}
