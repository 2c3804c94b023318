//! Core type definitions shared across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Event categories
// ---------------------------------------------------------------------------

/// The six live-audience event categories the engine understands.
///
/// Each category owns one action registry; lookup semantics differ per
/// category (substring match for chat, numeric thresholds for likes,
/// a single fixed key for follow/share/member, gift name for gifts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Chat messages, matched by case-insensitive keyword containment.
    Chat,
    /// Like batches, matched by cumulative per-user thresholds.
    Like,
    /// New followers — single fixed key.
    Follow,
    /// Gifts, matched by gift name (numeric id as fallback).
    Gift,
    /// Stream shares — single fixed key.
    Share,
    /// Viewers joining the room — single fixed key.
    Member,
}

impl EventCategory {
    /// All categories, in a stable order (used for snapshot/restore).
    pub const ALL: [Self; 6] = [
        Self::Chat,
        Self::Like,
        Self::Follow,
        Self::Gift,
        Self::Share,
        Self::Member,
    ];

    /// The fixed event key for categories that use one, `None` for the
    /// keyword/threshold/name-matched categories.
    #[must_use]
    pub fn fixed_key(self) -> Option<&'static str> {
        match self {
            Self::Follow => Some(FOLLOW_KEY),
            Self::Share => Some(SHARE_KEY),
            Self::Member => Some(MEMBER_KEY),
            Self::Chat | Self::Like | Self::Gift => None,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chat => "chat",
            Self::Like => "like",
            Self::Follow => "follow",
            Self::Gift => "gift",
            Self::Share => "share",
            Self::Member => "member",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Fixed event keys
// ---------------------------------------------------------------------------

/// The single event key under which follow actions are registered.
pub const FOLLOW_KEY: &str = "follow";
/// The single event key under which share actions are registered.
pub const SHARE_KEY: &str = "share";
/// The single event key under which member-join actions are registered.
pub const MEMBER_KEY: &str = "member";

/// Parse a like-threshold event key into its numeric threshold.
///
/// # Errors
/// Returns [`crate::HypeError::InvalidThreshold`] if the key is not a
/// positive integer. Malformed keys are rejected at registration time,
/// never silently coerced.
pub fn parse_threshold_key(key: &str) -> crate::error::Result<u32> {
    match key.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(crate::HypeError::InvalidThreshold {
            key: key.to_string(),
        }),
    }
}
