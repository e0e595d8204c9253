use std::path::PathBuf;
use std::time::Duration;
use crate::storage::wal::SyncMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_path: PathBuf,

    // Store
    pub checkpoint_interval: usize,             // WAL records folded into a new checkpoint
    pub sync_mode: SyncMode,

    // Site generator
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub site_title: String,
    pub placeholder_poster: String,

    // OMDb lookup
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub lookup_timeout: Duration,
    pub lookup_retries: u32,
}

impl Config {
    pub fn with_storage_path(path: impl Into<PathBuf>) -> Self {
        Config {
            storage_path: path.into(),
            ..Config::default()
        }
    }

    /// Lookup is enabled only when an API key is configured
    pub fn lookup_enabled(&self) -> bool {
        self.omdb_api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: PathBuf::from("./data"),

            checkpoint_interval: 64,
            sync_mode: SyncMode::Immediate,

            template_path: PathBuf::from("./static/index_template.html"),
            output_path: PathBuf::from("./static/index.html"),
            site_title: "My movie collection".to_string(),
            placeholder_poster: "https://via.placeholder.com/150".to_string(),

            omdb_api_key: None,
            omdb_base_url: "http://www.omdbapi.com/".to_string(),
            lookup_timeout: Duration::from_secs(5),
            lookup_retries: 2,
        }
    }
}
