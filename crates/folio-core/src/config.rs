use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::parallax::{Direction, ParallaxConfig};

/// Environment variable that overrides `api.base_url`
pub const API_BASE_URL_ENV: &str = "FOLIO_API_BASE_URL";

/// Environment variable that overrides `api.admin_token`
pub const ADMIN_TOKEN_ENV: &str = "FOLIO_ADMIN_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub loading: LoadingConfig,
    #[serde(default)]
    pub parallax: ParallaxDefaults,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL, e.g. "http://localhost:8000"
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Profile owner
    #[serde(default = "default_user_id")]
    pub user_id: u64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Extra attempts after a failed profile load
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// How long a loaded profile is served from cache
    #[serde(default = "default_stale_time")]
    pub stale_time_secs: u64,
    /// Sent as `Authorization: Token <token>` on every request when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: default_user_id(),
            request_timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            stale_time_secs: default_stale_time(),
            admin_token: None,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }
}

/// A status message shown while an endpoint containing `pattern` is loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRule {
    pub pattern: String,
    pub message: String,
}

impl MessageRule {
    pub fn new(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingConfig {
    /// Sustained loading required before the indicator is shown
    #[serde(default = "default_display_delay")]
    pub display_delay_ms: u64,
    /// Buffered loading events per subscriber before it lags
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Status messages, first match wins
    #[serde(default = "default_message_rules")]
    pub messages: Vec<MessageRule>,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            display_delay_ms: default_display_delay(),
            event_capacity: default_event_capacity(),
            messages: default_message_rules(),
        }
    }
}

impl LoadingConfig {
    pub fn display_delay(&self) -> Duration {
        Duration::from_millis(self.display_delay_ms)
    }
}

/// Defaults applied to parallax bindings that do not set their own parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxDefaults {
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub offset_px: f64,
    #[serde(default = "default_easing")]
    pub easing: f64,
    #[serde(default)]
    pub disabled: bool,
}

impl Default for ParallaxDefaults {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            direction: Direction::default(),
            offset_px: 0.0,
            easing: default_easing(),
            disabled: false,
        }
    }
}

impl From<&ParallaxDefaults> for ParallaxConfig {
    fn from(defaults: &ParallaxDefaults) -> Self {
        ParallaxConfig {
            speed: defaults.speed,
            direction: defaults.direction,
            offset_px: defaults.offset_px,
            easing: defaults.easing,
            disabled: defaults.disabled,
        }
    }
}

/// Easing curve for the terminal smooth-scroll animation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Lines moved per step when smooth scrolling is off
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Track the pointer and highlight hovered links
    #[serde(default = "default_true")]
    pub cursor_enabled: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            cursor_enabled: default_true(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_user_id() -> u64 {
    1
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_stale_time() -> u64 {
    300 // 5 minutes
}

fn default_display_delay() -> u64 {
    300
}

fn default_event_capacity() -> usize {
    256
}

fn default_message_rules() -> Vec<MessageRule> {
    vec![
        MessageRule::new("profile", "Loading profile..."),
        MessageRule::new("projects", "Loading projects..."),
        MessageRule::new("skills", "Loading skills..."),
        MessageRule::new("social", "Loading social links..."),
        MessageRule::new("experience", "Loading work experience..."),
    ]
}

fn default_speed() -> f64 {
    0.5
}

fn default_easing() -> f64 {
    0.5
}

fn default_animation_duration() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_animation_fps() -> u16 {
    60
}

fn default_tick_rate() -> u64 {
    100
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults, then apply env overrides
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.api.base_url = base_url;
            }
        }

        if let Ok(token) = std::env::var(ADMIN_TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.api.admin_token = Some(token.trim().to_string());
            }
        }

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/folio/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("folio")
            .join("config.toml")
    }

    /// Get the log file path used while the terminal viewer owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("folio.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
