use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Drafts older than this are discarded on read
pub const DEFAULT_DRAFT_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Quiet period before the auto-save controller runs a save
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);
/// Interval between connectivity polls
pub const DEFAULT_CONNECTIVITY_POLL: Duration = Duration::from_millis(5000);
/// Deadline for a single connectivity poll
pub const DEFAULT_CONNECTIVITY_TIMEOUT: Duration = Duration::from_millis(3000);
/// How long `was_offline` stays set after reconnecting
pub const DEFAULT_RECONNECT_WINDOW: Duration = Duration::from_millis(3000);
/// Interval between pending-count refreshes
pub const DEFAULT_PENDING_POLL: Duration = Duration::from_secs(5 * 60);
/// Deadline for one API request (submission or pending count)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Interval between background flushes of the submission queue
pub const DEFAULT_QUEUE_FLUSH: Duration = Duration::from_secs(30);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    /// Path probed by the network monitor
    pub health_path: String,
    pub draft_retention: Duration,
    pub autosave_delay: Duration,
    pub connectivity_poll_interval: Duration,
    pub connectivity_timeout: Duration,
    pub reconnect_window: Duration,
    pub pending_poll_interval: Duration,
    /// Deadline for each API request; a hung server counts as a failure
    pub request_timeout: Duration,
    /// How often queued submissions are retried while online
    pub queue_flush_interval: Duration,
    /// Where the SQLite draft store lives; `None` means the platform data dir
    pub storage_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let app = std::env::var("CLIENT_API_URL")
            .ok()
            .and_then(|url| AppConfig::builder().server_url(url).build().ok())
            .unwrap_or_else(|| AppConfig {
                server_url: Some(DEFAULT_SERVER_URL.to_string()),
            });
        Self::from_app(app)
    }
}

/// On-disk shape of the client config. Every field is optional; durations are
/// in milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server_url: Option<String>,
    health_path: Option<String>,
    draft_retention_days: Option<u64>,
    autosave_delay_ms: Option<u64>,
    connectivity_poll_ms: Option<u64>,
    connectivity_timeout_ms: Option<u64>,
    reconnect_window_ms: Option<u64>,
    pending_poll_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    queue_flush_ms: Option<u64>,
    storage_path: Option<PathBuf>,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self::from_app(app))
    }

    fn from_app(app: AppConfig) -> Self {
        Self {
            app,
            health_path: "/health".to_string(),
            draft_retention: DEFAULT_DRAFT_RETENTION,
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            connectivity_poll_interval: DEFAULT_CONNECTIVITY_POLL,
            connectivity_timeout: DEFAULT_CONNECTIVITY_TIMEOUT,
            reconnect_window: DEFAULT_RECONNECT_WINDOW,
            pending_poll_interval: DEFAULT_PENDING_POLL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            queue_flush_interval: DEFAULT_QUEUE_FLUSH,
            storage_path: None,
        }
    }

    /// Parse a TOML config. `CLIENT_API_URL` in the environment overrides the
    /// file's `server_url`.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;

        let server_url = std::env::var("CLIENT_API_URL")
            .ok()
            .or(file.server_url)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::with_builder(AppConfig::builder().server_url(server_url))?;

        if let Some(path) = file.health_path {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    key: "health_path",
                    message: "must start with '/'".to_string(),
                });
            }
            config.health_path = path;
        }
        if let Some(days) = file.draft_retention_days {
            config.draft_retention = Duration::from_secs(days * 24 * 60 * 60);
        }
        if let Some(ms) = file.autosave_delay_ms {
            config.autosave_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.connectivity_poll_ms {
            config.connectivity_poll_interval = non_zero("connectivity_poll_ms", ms)?;
        }
        if let Some(ms) = file.connectivity_timeout_ms {
            config.connectivity_timeout = non_zero("connectivity_timeout_ms", ms)?;
        }
        if let Some(ms) = file.reconnect_window_ms {
            config.reconnect_window = Duration::from_millis(ms);
        }
        if let Some(ms) = file.pending_poll_ms {
            config.pending_poll_interval = non_zero("pending_poll_ms", ms)?;
        }
        if let Some(ms) = file.request_timeout_ms {
            config.request_timeout = non_zero("request_timeout_ms", ms)?;
        }
        if let Some(ms) = file.queue_flush_ms {
            config.queue_flush_interval = non_zero("queue_flush_ms", ms)?;
        }
        config.storage_path = file.storage_path;

        Ok(config)
    }

    /// Load a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// URL probed by the network monitor
    pub fn health_url(&self) -> String {
        self.api_url(&self.health_path)
    }
}

fn non_zero(key: &'static str, ms: u64) -> Result<Duration, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_millis(ms))
}
