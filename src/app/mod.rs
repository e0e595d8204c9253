//! Console menu over the movie database.

pub mod display;

use std::io::{BufRead, Write};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};
use crate::core::database::MovieDatabase;
use crate::core::error::{ErrorKind, Result};
use crate::core::stats::{self, RatedTitles, RatingStat};
use crate::core::types::{MovieRecord, Rating};
use crate::lookup::MovieLookup;
use crate::search::{self, DEFAULT_LIMIT, DEFAULT_SCORE_THRESHOLD};
use crate::site;
use display::{format_rating, Painter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    SortedByRating,
    GenerateWebsite,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        let choice = match input.trim() {
            "0" => MenuChoice::Exit,
            "1" => MenuChoice::List,
            "2" => MenuChoice::Add,
            "3" => MenuChoice::Delete,
            "4" => MenuChoice::Update,
            "5" => MenuChoice::Stats,
            "6" => MenuChoice::Random,
            "7" => MenuChoice::Search,
            "8" => MenuChoice::SortedByRating,
            "9" => MenuChoice::GenerateWebsite,
            _ => return None,
        };
        Some(choice)
    }
}

const MENU: &[&str] = &[
    "1. List movies",
    "2. Add movie",
    "3. Delete movie",
    "4. Update movie",
    "5. Stats",
    "6. Random movie",
    "7. Search movie",
    "8. Movies sorted by rating",
    "9. Generate website",
    "0. Exit",
];

/// Interactive session; reads answers from `input`, writes everything to `output`
pub struct App<R, W> {
    db: MovieDatabase,
    lookup: Option<Box<dyn MovieLookup>>,
    input: R,
    output: W,
    painter: Painter,
    rng: StdRng,
    pause_after_action: bool,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(db: MovieDatabase, lookup: Option<Box<dyn MovieLookup>>, input: R, output: W) -> Self {
        App {
            db,
            lookup,
            input,
            output,
            painter: Painter::new(true),
            rng: StdRng::from_entropy(),
            pause_after_action: true,
        }
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.painter = Painter::new(enabled);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_pause(mut self, pause: bool) -> Self {
        self.pause_after_action = pause;
        self
    }

    /// Give the database back for an orderly close
    pub fn into_database(self) -> MovieDatabase {
        self.db
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Run the menu until "0" or end of input
    pub fn run(&mut self) -> Result<()> {
        let banner = format!("{} My Movies Database {}", "*".repeat(10), "*".repeat(10));
        writeln!(self.output, "{}\n", self.painter.heading(&banner))?;

        loop {
            self.show_menu()?;

            let Some(answer) = self.prompt("Enter choice (0-9): ")? else {
                break;
            };
            writeln!(self.output)?;

            let Some(choice) = MenuChoice::parse(&answer) else {
                let msg = self.painter.error("Invalid input, please try again.");
                writeln!(self.output, "{}", msg)?;
                continue;
            };

            if choice == MenuChoice::Exit {
                break;
            }

            debug!(?choice, "menu action");
            if let Err(e) = self.dispatch(choice) {
                if matches!(e.kind, ErrorKind::Io | ErrorKind::Corrupted) {
                    warn!(error = %e, "storage failure during menu action");
                }
                let msg = self.painter.error(&format!("Error: {}", e.context));
                writeln!(self.output, "{}", msg)?;
            }

            self.pause()?;
        }

        writeln!(self.output, "{}", self.painter.heading("\nBye!"))?;
        Ok(())
    }

    pub fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Exit => Ok(()),
            MenuChoice::List => self.list_movies(),
            MenuChoice::Add => self.add_movie(),
            MenuChoice::Delete => self.delete_movie(),
            MenuChoice::Update => self.update_movie(),
            MenuChoice::Stats => self.show_stats(),
            MenuChoice::Random => self.random_movie(),
            MenuChoice::Search => self.search_movie(),
            MenuChoice::SortedByRating => self.sorted_by_rating(),
            MenuChoice::GenerateWebsite => self.generate_website(),
        }
    }

    fn show_menu(&mut self) -> Result<()> {
        writeln!(self.output, "{}", self.painter.heading("\nMenu:"))?;
        for line in MENU {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn list_movies(&mut self) -> Result<()> {
        let movies = self.db.list()?;

        self.say(&format!("{} movies in total", movies.len()))?;
        for (title, details) in &movies {
            self.say(&format!(
                "Title: {}, rating: {}, year: {}",
                title,
                format_rating(details.rating),
                details.year
            ))?;
        }
        Ok(())
    }

    fn add_movie(&mut self) -> Result<()> {
        let Some(title) = self.prompt_non_empty("Enter a new movie name: ")? else {
            return Ok(());
        };

        let fetched = self.lookup.as_ref().map(|lookup| lookup.fetch_by_title(&title));

        let record = match fetched {
            Some(Ok(Some(info))) => info.into_record()?,
            Some(Ok(None)) => {
                return self.complain(&format!("Movie '{}' not found.", title));
            }
            Some(Err(e)) => {
                warn!(%title, error = %e, "movie lookup failed");
                return self.complain(&format!("Movie lookup unavailable: {}", e.context));
            }
            None => match self.prompt_offline_record(&title)? {
                Some(record) => record,
                None => return Ok(()),
            },
        };

        let added_title = record.title.clone();
        match self.db.add(record) {
            Ok(()) => self.say(&format!("Movie '{}' added successfully.", added_title)),
            Err(e) if e.is_duplicate() => self.complain(&format!("Movie '{}' already exists.", added_title)),
            Err(e) => Err(e),
        }
    }

    /// Year and rating typed by hand when no lookup service is configured
    fn prompt_offline_record(&mut self, title: &str) -> Result<Option<MovieRecord>> {
        let Some(year) = self.prompt("Enter release year: ")? else {
            return Ok(None);
        };
        let Ok(year) = year.trim().parse::<i32>() else {
            self.complain("Invalid input! Year must be a whole number.")?;
            return Ok(None);
        };

        let Some(rating) = self.prompt("Enter rating (0-10, leave empty if unknown): ")? else {
            return Ok(None);
        };
        let rating = if rating.trim().is_empty() {
            None
        } else {
            match Rating::parse(&rating) {
                Ok(rating) => Some(rating),
                Err(e) => {
                    self.complain(&e.context)?;
                    return Ok(None);
                }
            }
        };

        MovieRecord::new(title, year, rating, None).map(Some)
    }

    fn delete_movie(&mut self) -> Result<()> {
        let Some(title) = self.prompt_non_empty("Enter movie name to delete: ")? else {
            return Ok(());
        };

        if self.db.delete(&title)? {
            self.say(&format!("Movie {} successfully deleted", title))
        } else {
            self.complain(&format!("Movie {} doesn't exist!", title))
        }
    }

    fn update_movie(&mut self) -> Result<()> {
        let Some(title) = self.prompt_non_empty("Enter movie name: ")? else {
            return Ok(());
        };
        let Some(answer) = self.prompt("Enter new movie rating (0-10): ")? else {
            return Ok(());
        };

        let rating = match Rating::parse(&answer) {
            Ok(rating) => rating,
            Err(e) => return self.complain(&format!("Invalid input! {}", e.context)),
        };

        if self.db.update(&title, rating)? {
            self.say(&format!("Movie {} successfully updated", title))
        } else {
            self.complain(&format!("Movie {} doesn't exist!", title))
        }
    }

    fn show_stats(&mut self) -> Result<()> {
        let movies = self.db.list()?;

        let average = stats::average_rating(&movies);
        let median = stats::median_rating(&movies);
        self.say(&describe_stat("Average", average))?;
        self.say(&describe_stat("Median", median))?;

        self.show_extremes("Best", stats::best_rated(&movies))?;
        self.show_extremes("Worst", stats::worst_rated(&movies))
    }

    fn show_extremes(&mut self, label: &str, rated: RatedTitles) -> Result<()> {
        let Some(rating) = rated.rating else {
            return self.complain(&format!(
                "No ratings available to determine {} movies.",
                label.to_lowercase()
            ));
        };

        for title in &rated.titles {
            self.say(&format!("{} movie(s): {}, {}", label, title, rating))?;
        }
        Ok(())
    }

    fn random_movie(&mut self) -> Result<()> {
        let movies = self.db.list()?;

        match stats::random_movie(&movies, &mut self.rng) {
            Some((title, details)) => {
                let line = format!(
                    "Your movie tonight: {} ({}), it's rated {}",
                    title,
                    details.year,
                    format_rating(details.rating)
                );
                self.say(&line)
            }
            None => self.complain("No movies available."),
        }
    }

    fn search_movie(&mut self) -> Result<()> {
        let Some(query) = self.prompt_non_empty("Enter a part of a movie name: ")? else {
            return Ok(());
        };
        let movies = self.db.list()?;

        let hits: Vec<String> = search::exact_search(&movies, &query)
            .map(|hit| {
                format!(
                    "The movie {} ({}) with rating {}",
                    hit.title,
                    hit.year,
                    format_rating(hit.rating)
                )
            })
            .collect();

        if !hits.is_empty() {
            for line in &hits {
                self.say(line)?;
            }
            return Ok(());
        }

        self.complain("\nNo movie found!")?;

        let suggestions = search::fuzzy_search(&movies, &query, DEFAULT_LIMIT, DEFAULT_SCORE_THRESHOLD);
        if suggestions.is_empty() {
            return self.complain("No similar movies found!");
        }
        for suggestion in &suggestions {
            self.say(&format!("Did you mean: {}?", suggestion.title))?;
        }
        Ok(())
    }

    fn sorted_by_rating(&mut self) -> Result<()> {
        let movies = self.db.list()?;
        let lines: Vec<String> = stats::sorted_by_rating(&movies)
            .into_iter()
            .map(|(title, details)| format!("{}: {}", title, format_rating(details.rating)))
            .collect();

        for line in &lines {
            self.say(line)?;
        }
        Ok(())
    }

    fn generate_website(&mut self) -> Result<()> {
        let movies = self.db.list()?;

        match site::generate_site(self.db.config(), &movies) {
            Ok(()) => self.say("Website was generated successfully."),
            Err(e) if e.kind == ErrorKind::Template => self.complain("Template file not found!"),
            Err(e) => Err(e),
        }
    }

    /// `None` on end of input
    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", self.painter.prompt(question))?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Empty answers are reported and yield `None`
    fn prompt_non_empty(&mut self, question: &str) -> Result<Option<String>> {
        let Some(answer) = self.prompt(question)? else {
            return Ok(None);
        };

        if answer.is_empty() {
            self.complain("Invalid input! Cannot be empty.")?;
            return Ok(None);
        }
        Ok(Some(answer))
    }

    fn pause(&mut self) -> Result<()> {
        if self.pause_after_action {
            self.prompt("\nPress Enter to continue")?;
            writeln!(self.output)?;
        }
        Ok(())
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", self.painter.result(text))?;
        Ok(())
    }

    fn complain(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", self.painter.error(text))?;
        Ok(())
    }
}

fn describe_stat(label: &str, stat: RatingStat) -> String {
    match stat {
        RatingStat::Computed(value) => format!("{} rating: {:.1}", label, value),
        RatingStat::NoData => format!("{} rating: no ratings available", label),
    }
}

