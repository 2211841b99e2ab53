use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

use crate::tracks::TrackSelection;

/// Client configuration module
/// This module holds the request constants of the caption pipeline
/// (endpoints, headers, client context) together with their defaults
/// and validation.
/// Represents the client configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Watch page URL; the video id is appended as the `v` query parameter
    #[serde(default = "default_watch_url")]
    pub watch_url: String,

    /// Player API URL; the key is appended as the `key` query parameter
    #[serde(default = "default_player_api_url")]
    pub player_api_url: String,

    /// Browser-like User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header for the watch page
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Client context sent to the player API
    #[serde(default)]
    pub client: ClientContext,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Which caption track to pick
    #[serde(default)]
    pub track_selection: TrackSelection,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Client metadata embedded in the player API request body
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    // @field: Interface language
    #[serde(default = "default_hl")]
    pub hl: String,

    // @field: Region
    #[serde(default = "default_gl")]
    pub gl: String,

    // @field: Client name pinned by the platform
    #[serde(default = "default_client_name")]
    pub client_name: String,

    // @field: Client version pinned by the platform
    #[serde(default = "default_client_version")]
    pub client_version: String,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            hl: default_hl(),
            gl: default_gl(),
            client_name: default_client_name(),
            client_version: default_client_version(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_watch_url() -> String {
    "https://www.youtube.com/watch".to_string()
}

fn default_player_api_url() -> String {
    "https://www.youtube.com/youtubei/v1/player".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_hl() -> String {
    "en".to_string()
}

fn default_gl() -> String {
    "US".to_string()
}

fn default_client_name() -> String {
    "ANDROID".to_string()
}

fn default_client_version() -> String {
    "20.10.38".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Parse a configuration from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)
            .context("Failed to parse configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.watch_url)
            .with_context(|| format!("Invalid watch URL: {}", self.watch_url))?;
        Url::parse(&self.player_api_url)
            .with_context(|| format!("Invalid player API URL: {}", self.player_api_url))?;

        if self.user_agent.trim().is_empty() {
            return Err(anyhow!("User-Agent must not be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("Timeout must be at least one second"));
        }

        if self.client.client_name.is_empty() || self.client.client_version.is_empty() {
            return Err(anyhow!("Client name and version are required"));
        }

        if let TrackSelection::PreferLanguage(tag) = &self.track_selection {
            if tag.trim().is_empty() {
                return Err(anyhow!("Preferred caption language must not be empty"));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            watch_url: default_watch_url(),
            player_api_url: default_player_api_url(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            client: ClientContext::default(),
            timeout_secs: default_timeout_secs(),
            track_selection: TrackSelection::default(),
            log_level: LogLevel::default(),
        }
    }
}
