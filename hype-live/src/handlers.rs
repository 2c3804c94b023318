//! Per-category event handlers.
//!
//! Thin adapters between a raw event and the core machinery: each one
//! optionally echoes a notification, resolves the matching action lists
//! through the category's registry (and, for likes, the accumulator),
//! and hands them to the dispatcher. The session wraps every call here
//! so a failure is logged and surfaced without crashing the event loop.

use tracing::debug;

use hype_core::action::Action;
use hype_core::context::GameContext;
use hype_core::dispatch::execute_all;
use hype_core::error::Result;
use hype_core::likes::eviction_task_id;
use hype_core::scheduler::TaskScheduler;
use hype_core::types::parse_threshold_key;
use hype_core::EventCategory;

use crate::session::SessionState;

type Sched<C> = TaskScheduler<SessionState<C>>;

/// Chat: echo the message, then fire the action list of every registered
/// keyword contained (case-insensitively) in the comment, in key
/// registration order.
pub(crate) fn on_chat<C: GameContext>(
    sched: &mut Sched<C>,
    state: &mut SessionState<C>,
    nickname: &str,
    comment: &str,
) -> Result<()> {
    if state.config.display.show_chat {
        state.send_message(&format!("<{nickname}> {comment}"))?;
    }
    if state.actions.chat.is_empty() {
        return Ok(());
    }

    let comment_lower = comment.to_lowercase();
    let matched: Vec<Action> = state
        .actions
        .chat
        .entries()
        .filter(|(key, _)| comment_lower.contains(&key.to_lowercase()))
        .flat_map(|(_, actions)| actions.iter().cloned())
        .collect();
    if matched.is_empty() {
        return Ok(());
    }

    debug!(nickname, matched = matched.len(), "chat keywords matched");
    let effects = state.config.effects.clone();
    execute_all(sched, state, &matched, &effects);
    Ok(())
}

/// Likes: accumulate, re-arm the inactivity eviction timer, then fire
/// every registered threshold once per newly-crossed multiple.
pub(crate) fn on_like<C: GameContext>(
    sched: &mut Sched<C>,
    state: &mut SessionState<C>,
    username: &str,
    like_count: u64,
) -> Result<()> {
    let total = state.likes.record(username, like_count);

    // Re-arming replaces the pending timer, so one inactive window after
    // the *last* like evicts the user's accumulated state.
    let evicted_user = username.to_string();
    sched.add(
        eviction_task_id(username),
        state.config.likes.eviction_ticks,
        Box::new(move |_, state| {
            state.likes.evict(&evicted_user);
            debug!(username = %evicted_user, "like state evicted after inactivity");
            Ok(())
        }),
    );

    if state.actions.like.is_empty() {
        return Ok(());
    }
    debug!(username, like_count, total, "likes recorded");

    let thresholds: Vec<(u32, Vec<Action>)> = state
        .actions
        .like
        .entries()
        .filter_map(|(key, actions)| {
            // non-numeric keys are rejected at registration; skip defensively
            parse_threshold_key(key)
                .ok()
                .map(|threshold| (threshold, actions.to_vec()))
        })
        .collect();

    let cap = state.config.likes.max_threshold_firings_per_event;
    let effects = state.config.effects.clone();
    for (threshold, actions) in thresholds {
        let mut firings = state.likes.firings(username, threshold);
        if cap > 0 {
            firings = firings.min(cap);
        }
        for _ in 0..firings {
            execute_all(sched, state, &actions, &effects);
        }
    }
    Ok(())
}

/// Follow / share / member: announce, then fire the category's single
/// fixed-key action list.
pub(crate) fn on_fixed<C: GameContext>(
    sched: &mut Sched<C>,
    state: &mut SessionState<C>,
    category: EventCategory,
    nickname: &str,
) -> Result<()> {
    let announce = match category {
        EventCategory::Member if state.config.display.show_joins => {
            Some(format!("{nickname} joined the stream"))
        }
        EventCategory::Follow if state.config.display.show_follows => {
            Some(format!("{nickname} followed!"))
        }
        EventCategory::Share if state.config.display.show_follows => {
            Some(format!("{nickname} shared the stream!"))
        }
        _ => None,
    };
    if let Some(text) = announce {
        state.send_message(&text)?;
    }

    let Some(key) = category.fixed_key() else {
        return Ok(());
    };
    let registry = state.actions.registry(category);
    if registry.is_empty() {
        return Ok(());
    }
    let actions = registry.actions_for(key).to_vec();
    let effects = state.config.effects.clone();
    execute_all(sched, state, &actions, &effects);
    Ok(())
}

/// Gifts: announce, then fire the action list registered under the gift
/// name, falling back to the numeric gift id.
pub(crate) fn on_gift<C: GameContext>(
    sched: &mut Sched<C>,
    state: &mut SessionState<C>,
    nickname: &str,
    gift_name: &str,
    gift_id: u64,
    repeat_count: u32,
) -> Result<()> {
    if state.config.display.show_gifts {
        let text = if repeat_count > 1 {
            format!("{nickname} sent {gift_name} x{repeat_count}")
        } else {
            format!("{nickname} sent {gift_name}")
        };
        state.send_message(&text)?;
    }
    if state.actions.gift.is_empty() {
        return Ok(());
    }

    let mut actions = state.actions.gift.actions_for(gift_name).to_vec();
    if actions.is_empty() {
        actions = state
            .actions
            .gift
            .actions_for(&gift_id.to_string())
            .to_vec();
    }
    if actions.is_empty() {
        return Ok(());
    }

    let effects = state.config.effects.clone();
    execute_all(sched, state, &actions, &effects);
    Ok(())
}
