//! Fetch and server configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Landing page visited before each download to collect session cookies.
pub const DEFAULT_ROOT_URL: &str = "https://www.nseindia.com";

/// Mirrors serving the participant-wise open interest file, tried in order.
pub const DEFAULT_URL_TEMPLATES: [&str; 3] = [
    "https://archives.nseindia.com/content/nsccl/fao_participant_oi_{date}.csv",
    "https://www1.nseindia.com/content/nsccl/fao_participant_oi_{date}.csv",
    "https://www.nseindia.com/content/nsccl/fao_participant_oi_{date}.csv",
];

/// Placeholder substituted with the date token in each URL template.
pub const DATE_PLACEHOLDER: &str = "{date}";

/// How the fetch routine behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Validated input, mirror retry, content heuristic, wrapped response.
    #[default]
    Strict,
    /// Single URL, raw input, errors propagate, bare table response.
    Minimal,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Strict => "strict",
            FetchMode::Minimal => "minimal",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(FetchMode::Strict),
            "minimal" => Ok(FetchMode::Minimal),
            other => Err(ConfigError::InvalidValue {
                key: "NSE_FETCH_MODE".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Half-open interval `[min, max)` a randomized pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Self {
        DelayRange { min, max }
    }

    pub fn from_secs(min: u64, max: u64) -> Self {
        DelayRange::new(Duration::from_secs(min), Duration::from_secs(max))
    }

    /// A range that always yields no pause.
    pub fn zero() -> Self {
        DelayRange::new(Duration::ZERO, Duration::ZERO)
    }
}

/// Configuration for the archive fetch routine
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Strict or minimal behavior (default: strict)
    pub mode: FetchMode,
    /// Candidate URL templates containing `{date}`, tried in order
    pub url_templates: Vec<String>,
    /// Root page used for the pre-flight request and the connectivity probe
    pub root_url: String,
    /// Referer sent with the download request after the first pre-flight
    pub referer: String,
    /// Timeout for the pre-flight request (default: 15s)
    pub preflight_timeout: Duration,
    /// Timeout for the CSV download request (default: 30s)
    pub request_timeout: Duration,
    /// Timeout for the connectivity probe (default: 10s)
    pub probe_timeout: Duration,
    /// Pause after the pre-flight request (default: 2-4s)
    pub preflight_delay: DelayRange,
    /// Pause between candidate URLs (default: 1-3s)
    pub retry_delay: DelayRange,
    /// Bodies larger than this are usable even without a CSV content type (default: 100)
    pub min_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            mode: FetchMode::Strict,
            url_templates: DEFAULT_URL_TEMPLATES.iter().map(|t| t.to_string()).collect(),
            root_url: DEFAULT_ROOT_URL.to_string(),
            referer: referer_for(DEFAULT_ROOT_URL),
            preflight_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            preflight_delay: DelayRange::from_secs(2, 4),
            retry_delay: DelayRange::from_secs(1, 3),
            min_body_bytes: 100,
        }
    }
}

impl FetchConfig {
    /// Builds a configuration from environment variables, falling back to defaults.
    ///
    /// Recognized variables:
    /// * `NSE_FETCH_MODE` - `strict` or `minimal`
    /// * `NSE_ROOT_URL` - pre-flight/probe root; also sets the referer
    /// * `NSE_URL_TEMPLATES` - comma-separated candidate templates
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for an unknown mode or an empty template list.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = FetchConfig::default();

        if let Ok(mode) = std::env::var("NSE_FETCH_MODE") {
            config.mode = mode.parse()?;
        }

        if let Ok(root) = std::env::var("NSE_ROOT_URL") {
            config = config.with_root_url(root);
        }

        if let Ok(templates) = std::env::var("NSE_URL_TEMPLATES") {
            let parsed = parse_templates(&templates);
            if parsed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "NSE_URL_TEMPLATES".to_string(),
                    value: templates,
                });
            }
            config.url_templates = parsed;
        }

        Ok(config)
    }

    /// Points the pre-flight, probe and referer at a different root.
    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        let root_url = root_url.into();
        self.referer = referer_for(&root_url);
        self.root_url = root_url;
        self
    }

    /// Removes every randomized pause.
    pub fn without_delays(mut self) -> Self {
        self.preflight_delay = DelayRange::zero();
        self.retry_delay = DelayRange::zero();
        self
    }
}

fn referer_for(root_url: &str) -> String {
    format!("{}/", root_url.trim_end_matches('/'))
}

fn parse_templates(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that cannot be used
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
