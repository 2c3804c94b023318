//! Cumulative per-user like accumulation with threshold bookkeeping.
//!
//! Likes arrive as bursty batches (`username`, `like_count`). Each user's
//! total accumulates monotonically while they stay active; configured
//! thresholds fire exactly once per crossing — a single large batch that
//! jumps past a threshold k times fires k times, and a later update that
//! stays below the next multiple fires zero times.
//!
//! Inactivity eviction is scheduler-backed: the like handler re-arms a
//! per-user one-shot task (see [`eviction_task_id`]) on every like, and
//! the task firing calls [`LikeAccumulator::evict`]. Eviction drops the
//! user's state entirely, so their next like starts a fresh accumulation.

use std::collections::HashMap;

/// Default inactivity window, in ticks, after which a user's accumulated
/// like state is evicted. Configurable via `likes.eviction_ticks`.
pub const LIKE_EVICTION_TICKS: u64 = 200;

/// The scheduler task id under which a user's eviction timer is registered.
///
/// One id per username, so re-arming is a plain scheduler `add` (which
/// cancels the pending timer atomically).
#[must_use]
pub fn eviction_task_id(username: &str) -> String {
    format!("like-evict:{username}")
}

/// One active user's cumulative like state.
#[derive(Debug, Clone, Default)]
pub struct UserLikeState {
    /// Cumulative likes — monotonic while the user stays active.
    total_likes: u64,
    /// threshold -> how many crossings have already fired.
    executed: HashMap<u32, u64>,
}

impl UserLikeState {
    /// Cumulative like total.
    #[must_use]
    pub fn total_likes(&self) -> u64 {
        self.total_likes
    }

    /// How many times this threshold's actions have already fired.
    #[must_use]
    pub fn executed(&self, threshold: u32) -> u64 {
        self.executed.get(&threshold).copied().unwrap_or(0)
    }
}

/// Per-user cumulative like counter with per-threshold execution bookkeeping.
#[derive(Debug, Default)]
pub struct LikeAccumulator {
    users: HashMap<String, UserLikeState>,
}

impl LikeAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a like batch, creating state on the user's first like.
    /// Returns the updated cumulative total.
    pub fn record(&mut self, username: &str, like_count: u64) -> u64 {
        let state = self.users.entry(username.to_string()).or_default();
        state.total_likes = state.total_likes.saturating_add(like_count);
        state.total_likes
    }

    /// Number of threshold crossings not yet fired for this user, marking
    /// them fired.
    ///
    /// `times_reached = total / threshold`; the delta against the stored
    /// fired count is returned and the stored count updated, so every
    /// crossing fires exactly once and none double-fires on the next call.
    ///
    /// Returns 0 for unknown users or a zero threshold.
    pub fn firings(&mut self, username: &str, threshold: u32) -> u64 {
        if threshold == 0 {
            return 0;
        }
        let Some(state) = self.users.get_mut(username) else {
            return 0;
        };
        let times_reached = state.total_likes / u64::from(threshold);
        let already = state.executed.get(&threshold).copied().unwrap_or(0);
        if times_reached > already {
            state.executed.insert(threshold, times_reached);
            times_reached - already
        } else {
            0
        }
    }

    /// Drop a user's state entirely. Returns whether the user was present.
    ///
    /// All progress toward thresholds resets — later likes start a fresh
    /// accumulation from zero.
    pub fn evict(&mut self, username: &str) -> bool {
        self.users.remove(username).is_some()
    }

    /// Read a user's state, if active.
    #[must_use]
    pub fn user(&self, username: &str) -> Option<&UserLikeState> {
        self.users.get(username)
    }

    /// Number of currently-active users.
    #[must_use]
    pub fn active_users(&self) -> usize {
        self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_accumulate_across_batches() {
        let mut acc = LikeAccumulator::new();
        assert_eq!(acc.record("ana", 10), 10);
        assert_eq!(acc.record("ana", 15), 25);
        assert_eq!(acc.record("bob", 3), 3);
        assert_eq!(acc.active_users(), 2);
    }

    #[test]
    fn single_large_batch_fires_once_per_crossing() {
        let mut acc = LikeAccumulator::new();
        acc.record("ana", 120);
        assert_eq!(acc.firings("ana", 50), 2); // crossed 50 and 100
        assert_eq!(acc.user("ana").map(|u| u.executed(50)), Some(2));

        acc.record("ana", 20); // 140 — still below 150
        assert_eq!(acc.firings("ana", 50), 0);

        acc.record("ana", 10); // 150
        assert_eq!(acc.firings("ana", 50), 1);
    }

    #[test]
    fn thresholds_are_tracked_independently() {
        let mut acc = LikeAccumulator::new();
        acc.record("ana", 60);
        assert_eq!(acc.firings("ana", 10), 6);
        assert_eq!(acc.firings("ana", 25), 2);
        assert_eq!(acc.firings("ana", 100), 0);
    }

    #[test]
    fn eviction_resets_accumulation() {
        let mut acc = LikeAccumulator::new();
        acc.record("ana", 90);
        assert_eq!(acc.firings("ana", 50), 1);

        assert!(acc.evict("ana"));
        assert!(!acc.evict("ana"));

        // fresh accumulation — no carried total, no carried bookkeeping
        assert_eq!(acc.record("ana", 40), 40);
        assert_eq!(acc.firings("ana", 50), 0);
        assert_eq!(acc.record("ana", 10), 50);
        assert_eq!(acc.firings("ana", 50), 1);
    }

    #[test]
    fn unknown_user_and_zero_threshold_fire_nothing() {
        let mut acc = LikeAccumulator::new();
        assert_eq!(acc.firings("ghost", 10), 0);
        acc.record("ana", 100);
        assert_eq!(acc.firings("ana", 0), 0);
    }
}
