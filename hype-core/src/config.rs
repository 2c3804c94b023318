//! Configuration for the interaction engine.
//!
//! Loadable from TOML; every field has a default so a partial file (or no
//! file at all) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::likes::LIKE_EVICTION_TICKS;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HypeConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Like accumulation and threshold firing.
    #[serde(default)]
    pub likes: LikesConfig,
    /// Which incoming events get echoed to the local player.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Composite effect tuning.
    #[serde(default)]
    pub effects: EffectsConfig,
    /// Periodic settings auto-save.
    #[serde(default)]
    pub autosave: AutosaveConfig,
}

impl HypeConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`crate::HypeError::Config`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::HypeError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether event handling is enabled; when off, events are dropped
    /// at the session boundary (the scheduler keeps ticking).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
        }
    }
}

/// Like accumulation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikesConfig {
    /// Inactivity window after which a user's accumulated state is evicted.
    #[serde(default = "default_eviction_ticks")]
    pub eviction_ticks: u64,
    /// Cap on threshold firings executed per incoming like event, per
    /// threshold. 0 means uncapped; a positive cap bounds the work a
    /// single huge like burst can trigger.
    #[serde(default)]
    pub max_threshold_firings_per_event: u64,
}

impl Default for LikesConfig {
    fn default() -> Self {
        Self {
            eviction_ticks: LIKE_EVICTION_TICKS,
            max_threshold_firings_per_event: 0,
        }
    }
}

/// Per-category display/notification toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Echo chat messages to the local player.
    #[serde(default = "default_true")]
    pub show_chat: bool,
    /// Announce member joins.
    #[serde(default = "default_true")]
    pub show_joins: bool,
    /// Announce follows and shares.
    #[serde(default = "default_true")]
    pub show_follows: bool,
    /// Announce gifts.
    #[serde(default = "default_true")]
    pub show_gifts: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_chat: true,
            show_joins: true,
            show_follows: true,
            show_gifts: true,
        }
    }
}

/// Tuning for composite, scheduler-batched effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    /// Max entities summoned in one batch; larger requests are split into
    /// scheduler-staggered waves.
    #[serde(default = "default_wave_size")]
    pub summon_wave_size: u32,
    /// Ticks between summon waves.
    #[serde(default = "default_wave_interval")]
    pub summon_wave_interval_ticks: u64,
    /// Default fuse for TNT rockets when the action does not specify one.
    #[serde(default = "default_rocket_fuse")]
    pub tnt_rocket_fuse_ticks: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            summon_wave_size: 12,
            summon_wave_interval_ticks: 10,
            tnt_rocket_fuse_ticks: 40,
        }
    }
}

/// Periodic auto-save of the configured action book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Whether auto-save runs at all.
    #[serde(default)]
    pub enabled: bool,
    /// Ticks between snapshots.
    #[serde(default = "default_autosave_interval")]
    pub interval_ticks: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ticks: 1200,
        }
    }
}

// ---------------------------------------------------------------------------
// serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_eviction_ticks() -> u64 {
    LIKE_EVICTION_TICKS
}

fn default_wave_size() -> u32 {
    12
}

fn default_wave_interval() -> u64 {
    10
}

fn default_rocket_fuse() -> u64 {
    40
}

fn default_autosave_interval() -> u64 {
    1200
}
