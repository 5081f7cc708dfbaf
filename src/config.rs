use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::{Validate, ValidationErrors};

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub api: ApiSettings,
    #[serde(default)]
    #[validate(nested)]
    pub feed: FeedSettings,
    #[serde(default)]
    #[validate(nested)]
    pub gesture: GestureSettings,
    #[serde(default)]
    #[validate(nested)]
    pub actions: ActionSettings,
    #[serde(default)]
    #[validate(nested)]
    pub matches: MatchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    #[validate(length(min = 1))]
    pub base_url: String,
    #[serde(default)]
    pub telegram_id: i64,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            telegram_id: 0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String { "http://localhost:8000".to_string() }
fn default_timeout_secs() -> u64 { 30 }

/// Queue refill and pagination
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedSettings {
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u32,
    #[serde(default = "default_low_water_mark")]
    pub low_water_mark: usize,
    #[serde(default = "default_likes_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub likes_page_size: u32,
    /// Zero disables backoff: every trigger retries immediately
    #[serde(default)]
    pub backoff_base_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            low_water_mark: default_low_water_mark(),
            likes_page_size: default_likes_page_size(),
            backoff_base_ms: 0,
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

fn default_page_size() -> u32 { 10 }
fn default_low_water_mark() -> usize { 3 }
fn default_likes_page_size() -> u32 { 20 }
fn default_backoff_max_ms() -> u64 { 30_000 }

/// Swipe gesture tuning
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct GestureSettings {
    #[serde(default = "default_threshold")]
    #[validate(range(exclusive_min = 0.0))]
    pub threshold: f64,
    #[serde(default = "default_feedback_span")]
    #[validate(range(exclusive_min = 0.0))]
    pub feedback_span: f64,
    #[serde(default = "default_feedback_cap")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub feedback_cap: f64,
    #[serde(default = "default_hint_threshold")]
    #[validate(range(min = 0.0))]
    pub hint_threshold: f64,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            feedback_span: default_feedback_span(),
            feedback_cap: default_feedback_cap(),
            hint_threshold: default_hint_threshold(),
        }
    }
}

fn default_threshold() -> f64 { 100.0 }
fn default_feedback_span() -> f64 { 200.0 }
fn default_feedback_cap() -> f64 { 0.8 }
fn default_hint_threshold() -> f64 { 50.0 }

/// What happens to a profile whose like call failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptFailurePolicy {
    /// The profile stays removed from the queue
    #[default]
    FailForward,
    /// The profile is put back as the current card
    Restore,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActionSettings {
    #[serde(default)]
    pub accept_failure: AcceptFailurePolicy,
    #[serde(default = "default_swipe_out_ms")]
    pub swipe_out_ms: u64,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            accept_failure: AcceptFailurePolicy::default(),
            swipe_out_ms: default_swipe_out_ms(),
        }
    }
}

fn default_swipe_out_ms() -> u64 { 500 }

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MatchSettings {
    #[serde(default = "default_window_hours")]
    #[validate(range(min = 1, max = 8760))]
    pub window_hours: i64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self { window_hours: default_window_hours() }
    }
}

fn default_window_hours() -> i64 { 24 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CAMPUS_MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CAMPUS_MATCH__FEED__LOW_WATER_MARK -> feed.low_water_mark
            .add_source(env_source())
            .build()?;

        Self::validated(settings.try_deserialize()?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        Self::validated(settings.try_deserialize()?)
    }

    fn validated(settings: Self) -> Result<Self, ConfigError> {
        settings
            .check()
            .map_err(|e| ConfigError::Message(format!("invalid settings: {}", e)))?;
        Ok(settings)
    }

    /// Parse settings from an in-memory TOML document
    ///
    /// Parsing only; call [`Settings::check`] before handing the result to a session.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Range checks on the numeric knobs
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }

    pub fn match_window(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.matches.window_hours)
            .unwrap_or_else(|| chrono::Duration::hours(default_window_hours()))
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("CAMPUS_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
