use std::time::Duration;
use serde_json::Value;
use tracing::{debug, warn};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::lookup::{MovieInfo, MovieLookup};

const MAX_BACKOFF: Duration = Duration::from_secs(4);
const BASE_BACKOFF: Duration = Duration::from_millis(300);

/// OMDb (omdbapi.com) client
pub struct OmdbClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
    retries: u32,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration, retries: u32) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();

        OmdbClient {
            agent,
            base_url: base_url.into(),
            api_key: api_key.into(),
            retries,
        }
    }

    /// `None` when no API key is configured
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.lookup_enabled() {
            return None;
        }
        let api_key = config.omdb_api_key.clone()?;

        Some(OmdbClient::new(
            api_key,
            config.omdb_base_url.clone(),
            config.lookup_timeout,
            config.lookup_retries,
        ))
    }

    fn request_once(&self, title: &str) -> std::result::Result<Option<String>, ureq::Error> {
        match self
            .agent
            .get(&self.base_url)
            .query("apikey", &self.api_key)
            .query("t", title)
            .set("Accept", "application/json")
            .call()
        {
            Ok(response) => Ok(Some(response.into_string()?)),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn backoff_delay(attempt: u32) -> Duration {
        let multiplier = 1u32 << attempt.saturating_sub(1).min(6);
        BASE_BACKOFF
            .checked_mul(multiplier)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }
}

impl MovieLookup for OmdbClient {
    fn fetch_by_title(&self, title: &str) -> Result<Option<MovieInfo>> {
        let mut attempt = 1u32;

        loop {
            match self.request_once(title) {
                Ok(Some(body)) => return parse_response(&body),
                Ok(None) => return Ok(None),
                Err(error) if is_timeout(&error) && attempt <= self.retries => {
                    let backoff = Self::backoff_delay(attempt);
                    warn!(title, attempt, ?backoff, "movie lookup timed out, retrying");
                    std::thread::sleep(backoff);
                    attempt += 1;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }
}

fn is_timeout(error: &ureq::Error) -> bool {
    match error {
        ureq::Error::Status(code, _) => matches!(code, 408 | 504),
        ureq::Error::Transport(transport) => {
            let lowered = transport.to_string().to_ascii_lowercase();
            lowered.contains("timed out") || lowered.contains("timeout")
        }
    }
}

/// OMDb answers 200 with `"Response": "False"` for unknown titles
pub fn parse_response(body: &str) -> Result<Option<MovieInfo>> {
    let value: Value = serde_json::from_str(body)?;

    if value.get("Response").and_then(Value::as_str) == Some("False") {
        let reason = value.get("Error").and_then(Value::as_str).unwrap_or("unknown");
        debug!(reason, "movie not found");
        return Ok(None);
    }

    let info: MovieInfo = serde_json::from_value(value)
        .map_err(|e| Error::lookup(format!("Malformed movie data: {}", e)))?;
    Ok(Some(info))
}
