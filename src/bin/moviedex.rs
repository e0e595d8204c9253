//! moviedex CLI
//!
//! Interactive console for a personal movie collection: list, add (via OMDb
//! or by hand), delete, rate, statistics, search and static site generation.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use moviedex::app::App;
use moviedex::core::config::Config;
use moviedex::core::database::MovieDatabase;
use moviedex::core::error::Result;
use moviedex::lookup::{MovieLookup, OmdbClient};
use moviedex::storage::wal::SyncMode;

#[derive(Parser, Debug)]
#[command(name = "moviedex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal movie collection manager")]
struct Cli {
    /// Directory holding the movie database
    #[arg(short, long, env = "MOVIEDEX_DATA", default_value = "./data", value_name = "DIR")]
    data_dir: PathBuf,

    /// When the write-ahead log is flushed to disk
    #[arg(long, value_enum, default_value_t = SyncArg::Immediate)]
    sync: SyncArg,

    /// OMDb API key; without it movies are added by hand
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OMDb endpoint
    #[arg(long, default_value = "http://www.omdbapi.com/", value_name = "URL")]
    omdb_url: String,

    /// Lookup timeout in seconds
    #[arg(long, default_value_t = 5, value_name = "SECS")]
    lookup_timeout: u64,

    /// Retries after a lookup timeout
    #[arg(long, default_value_t = 2)]
    lookup_retries: u32,

    /// HTML template for the generated website
    #[arg(long, default_value = "./static/index_template.html", value_name = "FILE")]
    template: PathBuf,

    /// Where the generated website is written
    #[arg(short, long, default_value = "./static/index.html", value_name = "FILE")]
    output: PathBuf,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SyncArg {
    /// fsync after every change
    Immediate,
    /// fsync once enough log data has accumulated
    Batch,
    /// leave flushing to the OS
    None,
}

impl From<SyncArg> for SyncMode {
    fn from(arg: SyncArg) -> Self {
        match arg {
            SyncArg::Immediate => SyncMode::Immediate,
            SyncArg::Batch => SyncMode::Batch,
            SyncArg::None => SyncMode::None,
        }
    }
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            storage_path: self.data_dir,
            sync_mode: self.sync.into(),
            template_path: self.template,
            output_path: self.output,
            omdb_api_key: self.api_key,
            omdb_base_url: self.omdb_url,
            lookup_timeout: Duration::from_secs(self.lookup_timeout),
            lookup_retries: self.lookup_retries,
            ..Config::default()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let color = !cli.no_color;
    let config = cli.into_config();

    let lookup = OmdbClient::from_config(&config).map(|client| Box::new(client) as Box<dyn MovieLookup>);
    if lookup.is_none() {
        info!("no OMDb API key configured, movies will be entered by hand");
    }

    let db = MovieDatabase::open(config)?;

    let stdin = io::stdin();
    let mut app = App::new(db, lookup, stdin.lock(), io::stdout()).with_color(color);
    let outcome = app.run();

    app.into_database().close()?;
    outcome
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "moviedex failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
