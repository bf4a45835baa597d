use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default schedule: every minute.
pub const DEFAULT_CRON: &str = "* * * * *";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Load a specific env file. Unlike [`load_dotenv`], a missing file is an error.
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    dotenvy::from_path(path).map_err(|e| ConfigError::Invalid {
        key: "env_file".to_string(),
        reason: format!("{}: {}", path.display(), e),
    })
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_required(profile: &str, key: &str) -> Result<String, ConfigError> {
    profiled_env_opt(profile, key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> Result<bool, ConfigError> {
    match profiled_env_opt(profile, key) {
        None => Ok(default),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key: key.to_string(),
                reason: format!("expected a boolean, got '{v}'"),
            }),
        },
    }
}

/// Keep only scheme and host of a URL; credentials, path and query never reach logs.
fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) => format!(
            "{}://{}/***",
            parsed.scheme(),
            parsed.host_str().unwrap_or("")
        ),
        Err(_) => "***".to_string(),
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub telegram: TelegramConfig,
    pub availability: AvailabilityConfig,
    pub schedule: ScheduleConfig,
    pub message: MessageConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SLOTWATCH_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let profile = env_or("SLOTWATCH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Result<Self, ConfigError> {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Ok(Self {
            profile: p.to_string(),
            telegram: TelegramConfig::from_env_profiled(p)?,
            availability: AvailabilityConfig::from_env_profiled(p)?,
            schedule: ScheduleConfig::from_env_profiled(p)?,
            message: MessageConfig::from_env_profiled(p),
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  telegram:     channel={}, api={}",
            self.telegram.channel_id,
            redact_url(&self.telegram.bot_api)
        );
        tracing::info!(
            "  availability: api={}, district={}",
            self.availability.endpoint,
            self.availability.district_id
        );
        tracing::info!(
            "  schedule:     cron='{}', prune_state={}",
            self.schedule.cron,
            self.schedule.prune_state
        );
        tracing::info!(
            "  message:      template={}",
            match (&self.message.template, &self.message.template_file) {
                (Some(_), _) => "inline".to_string(),
                (None, Some(path)) => path.display().to_string(),
                (None, None) => "(default)".to_string(),
            }
        );
    }
}

// ── Telegram ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Target chat or channel id (e.g. `@my_channel` or `-100123`).
    pub channel_id: String,
    /// Full `sendMessage` URL. May contain `${VAR}` references.
    pub bot_api: String,
}

impl TelegramConfig {
    fn from_env_profiled(p: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            channel_id: profiled_env_required(p, "TELEGRAM_CHANNEL_ID")?,
            bot_api: profiled_env_required(p, "TELEGRAM_BOT_API")?,
        })
    }
}

// ── Availability API ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    pub endpoint: String,
    pub district_id: String,
}

impl AvailabilityConfig {
    fn from_env_profiled(p: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: profiled_env_required(p, "VACCINE_AVAILABILITY_API")?,
            district_id: profiled_env_required(p, "DISTRICT_ID")?,
        })
    }
}

// ── Schedule ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// 5- or 6-field cron expression.
    pub cron: String,
    /// Drop cooldown entries once they have expired.
    pub prune_state: bool,
}

impl ScheduleConfig {
    fn from_env_profiled(p: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            cron: profiled_env_or(p, "SLOTWATCH_CRON", DEFAULT_CRON),
            prune_state: profiled_env_bool(p, "SLOTWATCH_PRUNE_STATE", false)?,
        })
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: DEFAULT_CRON.to_string(),
            prune_state: false,
        }
    }
}

// ── Message template ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Inline template; takes precedence over `template_file`.
    pub template: Option<String>,
    pub template_file: Option<PathBuf>,
}

impl MessageConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            template: profiled_env_opt(p, "SLOTWATCH_MESSAGE_TEMPLATE"),
            template_file: profiled_env_opt(p, "SLOTWATCH_MESSAGE_TEMPLATE_FILE")
                .map(PathBuf::from),
        }
    }

    /// Resolve the operator template, reading `template_file` if needed.
    /// `None` means the built-in template should be used.
    pub fn resolve_template(&self) -> Result<Option<String>, ConfigError> {
        if let Some(ref inline) = self.template {
            return Ok(Some(inline.clone()));
        }
        match self.template_file {
            Some(ref path) => Ok(Some(std::fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }
}
