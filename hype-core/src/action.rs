//! The user-configurable action model.
//!
//! All categories share one tagged-union action type with a category
//! discriminant rather than per-category subtypes — the per-category
//! differences are entirely in the payload variant, and a single type
//! keeps the registries, dispatcher, and settings snapshots homogeneous.

use serde::{Deserialize, Serialize};

use crate::error::{HypeError, Result};
use crate::types::{parse_threshold_key, EventCategory};

/// The effect payload of an action, tagged per effect kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Summon entities, in scheduler-batched waves when the count exceeds
    /// the configured wave size.
    Summon {
        /// Entity type identifier understood by the game backend.
        entity_type: String,
        /// How many to summon in total.
        count: u32,
        /// Horizontal scatter radius around the spawn point.
        spread: f32,
    },
    /// Clear all placed blocks inside the structure bounds.
    ClearBlocks,
    /// Fill the structure bounds with a block type.
    Fill {
        /// Block type identifier.
        block: String,
        /// Fill only the shell, leaving the interior empty.
        hollow: bool,
    },
    /// Play a sound for the local player.
    PlaySound {
        /// Sound identifier.
        sound_id: String,
    },
    /// Show a full-screen title.
    ScreenTitle {
        /// Title text.
        text: String,
    },
    /// Show a screen subtitle.
    ScreenSubtitle {
        /// Subtitle text.
        text: String,
    },
    /// Run a raw game command.
    RunCommand {
        /// The command string, without leading slash.
        command: String,
    },
    /// Lock the player in the jail cage for a while.
    Jail {
        /// How long the player stays jailed.
        duration_ticks: u64,
        /// Status effect identifiers applied while jailed.
        effects: Vec<String>,
    },
    /// Adjust the win counter.
    Win {
        /// Signed win delta (gifts usually +1, sabotage actions -1).
        delta: i64,
    },
    /// Staggered rain of TNT over the play area.
    TntRain {
        /// Total TNT to drop.
        count: u32,
        /// TNT per wave.
        wave_size: u32,
        /// Ticks between waves.
        wave_interval_ticks: u64,
    },
    /// A single TNT rocket with a delayed detonation.
    TntRocket {
        /// Ticks between launch and detonation.
        fuse_ticks: u64,
    },
}

impl ActionKind {
    /// Stable kind name for logs and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Summon { .. } => "summon",
            Self::ClearBlocks => "clear_blocks",
            Self::Fill { .. } => "fill",
            Self::PlaySound { .. } => "play_sound",
            Self::ScreenTitle { .. } => "screen_title",
            Self::ScreenSubtitle { .. } => "screen_subtitle",
            Self::RunCommand { .. } => "run_command",
            Self::Jail { .. } => "jail",
            Self::Win { .. } => "win",
            Self::TntRain { .. } => "tnt_rain",
            Self::TntRocket { .. } => "tnt_rocket",
        }
    }
}

/// A single configured effect bound to an event key within a category.
///
/// Within one key's list, actions execute in registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Which category's registry this action lives in.
    pub category: EventCategory,
    /// The key it is registered under (keyword, threshold, fixed name,
    /// or gift name).
    pub event_key: String,
    /// The effect to execute.
    pub kind: ActionKind,
}

impl Action {
    /// Construct an action.
    #[must_use]
    pub fn new(category: EventCategory, event_key: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            category,
            event_key: event_key.into(),
            kind,
        }
    }

    /// Validate at registration time. Malformed actions are rejected here,
    /// never silently coerced at dispatch.
    ///
    /// # Errors
    /// Returns [`HypeError::InvalidThreshold`] for a non-numeric like key,
    /// [`HypeError::InvalidAction`] for a payload that can never execute.
    pub fn validate(&self) -> Result<()> {
        if self.event_key.is_empty() {
            return self.invalid("event key is empty");
        }
        if self.category == EventCategory::Like {
            parse_threshold_key(&self.event_key)?;
        }
        match &self.kind {
            ActionKind::Summon { entity_type, count, spread } => {
                if entity_type.is_empty() {
                    return self.invalid("summon entity type is empty");
                }
                if *count == 0 {
                    return self.invalid("summon count must be at least 1");
                }
                if !spread.is_finite() || *spread < 0.0 {
                    return self.invalid("summon spread must be finite and non-negative");
                }
            }
            ActionKind::Fill { block, .. } => {
                if block.is_empty() {
                    return self.invalid("fill block type is empty");
                }
            }
            ActionKind::PlaySound { sound_id } => {
                if sound_id.is_empty() {
                    return self.invalid("sound id is empty");
                }
            }
            ActionKind::ScreenTitle { text } | ActionKind::ScreenSubtitle { text } => {
                if text.is_empty() {
                    return self.invalid("screen text is empty");
                }
            }
            ActionKind::RunCommand { command } => {
                if command.trim().is_empty() {
                    return self.invalid("command is empty");
                }
            }
            ActionKind::TntRain { count, wave_size, .. } => {
                if *count == 0 || *wave_size == 0 {
                    return self.invalid("tnt rain count and wave size must be at least 1");
                }
            }
            ActionKind::ClearBlocks
            | ActionKind::Jail { .. }
            | ActionKind::Win { .. }
            | ActionKind::TntRocket { .. } => {}
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> Result<()> {
        Err(HypeError::InvalidAction {
            kind: self.kind.name(),
            key: self.event_key.clone(),
            reason: reason.to_string(),
        })
    }
}
