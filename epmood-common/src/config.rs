//! Configuration loading and validation
//!
//! The configuration file is TOML. Its location is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. `EPMOOD_CONFIG` environment variable
//! 3. `config.toml` in the working directory
//!
//! Spotify client credentials may additionally be supplied through
//! `EPMOOD_SPOTIFY_CLIENT_ID` / `EPMOOD_SPOTIFY_CLIENT_SECRET`, which take
//! precedence over the file when non-blank.

use crate::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "EPMOOD_CONFIG";
/// Environment variable overriding `spotify_client_id`
pub const CLIENT_ID_ENV_VAR: &str = "EPMOOD_SPOTIFY_CLIENT_ID";
/// Environment variable overriding `spotify_client_secret`
pub const CLIENT_SECRET_ENV_VAR: &str = "EPMOOD_SPOTIFY_CLIENT_SECRET";
/// Fallback configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
/// Placeholder substituted with the looked-up ID in URL templates
pub const ID_PLACEHOLDER: &str = "{id}";

pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolve the configuration file path
pub fn resolve_config_path(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// RFC 3986 unreserved characters pass through; everything else is escaped
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `id` for use as a single URL path segment
pub fn encode_path_segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// Substitute `id` into a URL template
///
/// The ID is percent-encoded, so `/`, `?` and `#` cannot change the target.
pub fn fill_template(template: &str, id: &str) -> String {
    template.replace(ID_PLACEHOLDER, &encode_path_segment(id))
}

/// On-disk representation; every field may be absent so that validation
/// can name exactly which one is missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    cert_file: String,
    key_file: String,
    spotify_client_id: String,
    spotify_client_secret: String,
    music_url: String,
    ibl_url: String,
    playlister_url: String,
    spotify_token_url: Option<String>,
    spotify_api_url: Option<String>,
    timeout_secs: Option<u64>,
    insecure_skip_verify: bool,
}

impl RawConfig {
    fn apply_env_overrides(&mut self) {
        if let Some(id) = non_blank_env(CLIENT_ID_ENV_VAR) {
            debug!("Spotify client ID taken from environment");
            self.spotify_client_id = id;
        }
        if let Some(secret) = non_blank_env(CLIENT_SECRET_ENV_VAR) {
            debug!("Spotify client secret taken from environment");
            self.spotify_client_secret = secret;
        }
    }

    fn validate(self) -> Result<ServiceConfig> {
        let required = [
            ("cert_file", &self.cert_file),
            ("key_file", &self.key_file),
            ("spotify_client_id", &self.spotify_client_id),
            ("spotify_client_secret", &self.spotify_client_secret),
            ("music_url", &self.music_url),
            ("ibl_url", &self.ibl_url),
            ("playlister_url", &self.playlister_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("Config incomplete: {} is empty", name)));
            }
        }

        let templates = [
            ("music_url", &self.music_url),
            ("ibl_url", &self.ibl_url),
            ("playlister_url", &self.playlister_url),
        ];
        for (name, template) in templates {
            if !template.contains(ID_PLACEHOLDER) {
                return Err(Error::Config(format!(
                    "Config invalid: {} must contain the {} placeholder",
                    name, ID_PLACEHOLDER
                )));
            }
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config(
                "Config invalid: timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(ServiceConfig {
            cert_file: PathBuf::from(self.cert_file),
            key_file: PathBuf::from(self.key_file),
            spotify: SpotifyCredentials {
                client_id: self.spotify_client_id,
                client_secret: self.spotify_client_secret,
            },
            music_url: self.music_url,
            ibl_url: self.ibl_url,
            playlister_url: self.playlister_url,
            spotify_token_url: self
                .spotify_token_url
                .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string()),
            spotify_api_url: self
                .spotify_api_url
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            insecure_skip_verify: self.insecure_skip_verify,
        })
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Client-credentials pair for the streaming service
#[derive(Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Validated configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Client certificate (PEM) for the music metadata service
    pub cert_file: PathBuf,
    /// Private key (PEM) matching `cert_file`
    pub key_file: PathBuf,
    pub spotify: SpotifyCredentials,
    /// Music metadata URL template, keyed by record ID
    pub music_url: String,
    /// Episode lookup URL template, keyed by episode ID
    pub ibl_url: String,
    /// Segment mapping URL template, keyed by version ID
    pub playlister_url: String,
    pub spotify_token_url: String,
    /// Base URL of the Spotify Web API (no trailing slash)
    pub spotify_api_url: String,
    /// End-to-end deadline for one pipeline run
    pub timeout: Duration,
    /// Skip server certificate verification on the music metadata channel
    ///
    /// Defaults to `false`. Earlier deployments of this tool never verified
    /// the music service certificate; set this to `true` to keep that
    /// behaviour against hosts with self-signed certificates.
    pub insecure_skip_verify: bool,
}

impl ServiceConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut raw: RawConfig = toml::from_str(content)?;
        raw.apply_env_overrides();
        raw.validate()
    }
}
