//! Raw live-audience events, one variant per category.
//!
//! These mirror the platform's wire payloads closely: `username` is the
//! stable account handle (accumulator key), `nickname` the display name
//! shown in notifications.

use hype_core::EventCategory;

/// A raw event pulled from the live-platform connection.
#[derive(Debug, Clone)]
pub enum LiveEvent {
    /// A chat message.
    Chat {
        /// Display name of the sender.
        nickname: String,
        /// Message text.
        comment: String,
    },

    /// A batch of likes from one viewer.
    Like {
        /// Stable account handle.
        username: String,
        /// Display name.
        nickname: String,
        /// Likes in this batch — platforms coalesce rapid taps.
        like_count: u64,
    },

    /// A viewer followed the stream.
    Follow {
        /// Stable account handle.
        username: String,
        /// Display name.
        nickname: String,
    },

    /// A viewer shared the stream.
    Share {
        /// Stable account handle.
        username: String,
        /// Display name.
        nickname: String,
    },

    /// A viewer joined the room.
    Member {
        /// Stable account handle.
        username: String,
        /// Display name.
        nickname: String,
    },

    /// A viewer sent a gift.
    Gift {
        /// Stable account handle.
        username: String,
        /// Display name.
        nickname: String,
        /// Gift name — the primary registry key.
        gift_name: String,
        /// Numeric gift id — fallback registry key.
        gift_id: u64,
        /// How many times the gift repeated in this event.
        repeat_count: u32,
    },
}

impl LiveEvent {
    /// The category this event belongs to.
    #[must_use]
    pub fn category(&self) -> EventCategory {
        match self {
            Self::Chat { .. } => EventCategory::Chat,
            Self::Like { .. } => EventCategory::Like,
            Self::Follow { .. } => EventCategory::Follow,
            Self::Share { .. } => EventCategory::Share,
            Self::Member { .. } => EventCategory::Member,
            Self::Gift { .. } => EventCategory::Gift,
        }
    }

    /// Display name of the viewer behind the event.
    #[must_use]
    pub fn nickname(&self) -> &str {
        match self {
            Self::Chat { nickname, .. }
            | Self::Like { nickname, .. }
            | Self::Follow { nickname, .. }
            | Self::Share { nickname, .. }
            | Self::Member { nickname, .. }
            | Self::Gift { nickname, .. } => nickname,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_map_one_to_one() {
        let event = LiveEvent::Gift {
            username: "u".into(),
            nickname: "n".into(),
            gift_name: "Rose".into(),
            gift_id: 5655,
            repeat_count: 3,
        };
        assert_eq!(event.category(), EventCategory::Gift);
        assert_eq!(event.nickname(), "n");
    }
}
