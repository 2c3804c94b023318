//! The session — the explicitly-constructed context object the host drives.
//!
//! One `Session` per live connection: it owns the task scheduler, the six
//! per-category action registries, the like accumulator, and the game
//! backend. There are no hidden singletons — tests build a session around
//! a recording backend and throw it away.
//!
//! The host calls exactly two things per frame: [`Session::tick`] once,
//! and [`Session::handle_event`] for each event pulled off the platform
//! connection. Both run to completion on the caller's thread; everything
//! deferred goes through the scheduler.

use tracing::{error, info};

use hype_core::action::Action;
use hype_core::config::HypeConfig;
use hype_core::context::{FillOptions, GameContext, ScreenOptions, SummonOptions};
use hype_core::error::Result;
use hype_core::likes::LikeAccumulator;
use hype_core::registry::EventActionRegistry;
use hype_core::scheduler::{TaskCallback, TaskScheduler};
use hype_core::EventCategory;

use crate::events::LiveEvent;
use crate::handlers;
use crate::persistence::{SettingsStore, ACTIONS_KEY};

/// Task id of the periodic action-book auto-save.
const AUTOSAVE_TASK_ID: &str = "autosave";

// ---------------------------------------------------------------------------
// Action book
// ---------------------------------------------------------------------------

/// The six per-category action registries.
#[derive(Debug, Clone, Default)]
pub struct ActionBook {
    /// Keyword-matched chat actions.
    pub chat: EventActionRegistry<Action>,
    /// Threshold-keyed like actions.
    pub like: EventActionRegistry<Action>,
    /// Fixed-key follow actions.
    pub follow: EventActionRegistry<Action>,
    /// Gift-name-keyed gift actions.
    pub gift: EventActionRegistry<Action>,
    /// Fixed-key share actions.
    pub share: EventActionRegistry<Action>,
    /// Fixed-key member-join actions.
    pub member: EventActionRegistry<Action>,
}

impl ActionBook {
    /// The registry owning a category.
    #[must_use]
    pub fn registry(&self, category: EventCategory) -> &EventActionRegistry<Action> {
        match category {
            EventCategory::Chat => &self.chat,
            EventCategory::Like => &self.like,
            EventCategory::Follow => &self.follow,
            EventCategory::Gift => &self.gift,
            EventCategory::Share => &self.share,
            EventCategory::Member => &self.member,
        }
    }

    /// Mutable access to a category's registry.
    pub fn registry_mut(&mut self, category: EventCategory) -> &mut EventActionRegistry<Action> {
        match category {
            EventCategory::Chat => &mut self.chat,
            EventCategory::Like => &mut self.like,
            EventCategory::Follow => &mut self.follow,
            EventCategory::Gift => &mut self.gift,
            EventCategory::Share => &mut self.share,
            EventCategory::Member => &mut self.member,
        }
    }

    /// Every configured action, category by category, in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Action> {
        let mut all = Vec::new();
        for category in EventCategory::ALL {
            for (_, actions) in self.registry(category).entries() {
                all.extend(actions.iter().cloned());
            }
        }
        all
    }

    /// Rebuild a book from a snapshot, re-validating every action.
    ///
    /// # Errors
    /// Returns the first validation error; a snapshot with any malformed
    /// entry is rejected whole rather than partially applied.
    pub fn restore(actions: Vec<Action>) -> Result<Self> {
        let mut book = Self::default();
        for action in actions {
            action.validate()?;
            book.registry_mut(action.category)
                .register(action.event_key.clone(), action);
        }
        Ok(book)
    }

    /// Total configured actions across all categories.
    #[must_use]
    pub fn total_actions(&self) -> usize {
        EventCategory::ALL
            .iter()
            .map(|&c| {
                self.registry(c)
                    .entries()
                    .map(|(_, actions)| actions.len())
                    .sum::<usize>()
            })
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything a scheduler callback or handler may touch: the game backend,
/// the action book, the like accumulator, and the configuration.
///
/// Implements [`GameContext`] by delegating to the backend, so the
/// dispatcher and scheduled effects share one context type with the
/// engine's own state.
pub struct SessionState<C> {
    pub(crate) backend: C,
    /// The six per-category registries.
    pub actions: ActionBook,
    /// Cumulative per-user like state.
    pub likes: LikeAccumulator,
    /// Engine configuration.
    pub config: HypeConfig,
}

impl<C: GameContext> GameContext for SessionState<C> {
    fn display_screen(&mut self, options: ScreenOptions) -> Result<()> {
        self.backend.display_screen(options)
    }

    fn play_sound(&mut self, sound_id: &str) -> Result<()> {
        self.backend.play_sound(sound_id)
    }

    fn send_message(&mut self, text: &str) -> Result<()> {
        self.backend.send_message(text)
    }

    fn summon_entities(&mut self, options: SummonOptions) -> Result<()> {
        self.backend.summon_entities(options)
    }

    fn fill_blocks(&mut self, options: FillOptions) -> Result<()> {
        self.backend.fill_blocks(options)
    }

    fn clear_blocks(&mut self) -> Result<()> {
        self.backend.clear_blocks()
    }

    fn run_command(&mut self, command: &str) -> Result<()> {
        self.backend.run_command(command)
    }

    fn jail(&mut self, duration_ticks: u64, effects: &[String]) -> Result<()> {
        self.backend.jail(duration_ticks, effects)
    }

    fn adjust_wins(&mut self, delta: i64) -> Result<()> {
        self.backend.adjust_wins(delta)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A live session: scheduler plus state, driven by the host's tick loop.
pub struct Session<C: GameContext> {
    scheduler: TaskScheduler<SessionState<C>>,
    state: SessionState<C>,
}

impl<C: GameContext> Session<C> {
    /// Create a session around a game backend.
    #[must_use]
    pub fn new(backend: C, config: HypeConfig) -> Self {
        Self {
            scheduler: TaskScheduler::new(),
            state: SessionState {
                backend,
                actions: ActionBook::default(),
                likes: LikeAccumulator::new(),
                config,
            },
        }
    }

    /// Register a user-configured action under its category and key.
    ///
    /// # Errors
    /// Rejects malformed actions (non-numeric like threshold, empty
    /// payload fields) at registration time.
    pub fn register_action(&mut self, action: Action) -> Result<()> {
        action.validate()?;
        self.state
            .actions
            .registry_mut(action.category)
            .register(action.event_key.clone(), action);
        Ok(())
    }

    /// Remove actions under a key matching the predicate; returns how many
    /// were removed.
    pub fn unregister_actions(
        &mut self,
        category: EventCategory,
        event_key: &str,
        predicate: impl FnMut(&Action) -> bool,
    ) -> usize {
        self.state
            .actions
            .registry_mut(category)
            .unregister(event_key, predicate)
    }

    /// Process one raw event to completion.
    ///
    /// Any failure escaping matching or dispatch is caught here, logged,
    /// and surfaced to the local player — a malformed event never crashes
    /// the consuming loop and never touches other categories.
    pub fn handle_event(&mut self, event: LiveEvent) {
        if !self.state.config.general.enabled {
            return;
        }
        let category = event.category();
        let result = match event {
            LiveEvent::Chat { nickname, comment } => {
                handlers::on_chat(&mut self.scheduler, &mut self.state, &nickname, &comment)
            }
            LiveEvent::Like {
                username,
                like_count,
                ..
            } => handlers::on_like(&mut self.scheduler, &mut self.state, &username, like_count),
            LiveEvent::Follow { nickname, .. }
            | LiveEvent::Share { nickname, .. }
            | LiveEvent::Member { nickname, .. } => {
                handlers::on_fixed(&mut self.scheduler, &mut self.state, category, &nickname)
            }
            LiveEvent::Gift {
                nickname,
                gift_name,
                gift_id,
                repeat_count,
                ..
            } => handlers::on_gift(
                &mut self.scheduler,
                &mut self.state,
                &nickname,
                &gift_name,
                gift_id,
                repeat_count,
            ),
        };
        if let Err(err) = result {
            error!(%category, %err, "event handler failed");
            let _ = self
                .state
                .send_message(&format!("Failed to process {category} event: {err}"));
        }
    }

    /// Advance the scheduler to the host's current tick, firing due tasks.
    pub fn tick(&mut self, current_tick: u64) {
        self.scheduler.tick(current_tick, &mut self.state);
    }

    /// Register a one-shot task. See [`TaskScheduler::add`].
    pub fn schedule_task(
        &mut self,
        id: impl Into<String>,
        delay_ticks: u64,
        callback: TaskCallback<SessionState<C>>,
    ) {
        self.scheduler.add(id, delay_ticks, callback);
    }

    /// Register a repeating task. See [`TaskScheduler::add_repeating`].
    pub fn schedule_repeating(
        &mut self,
        id: impl Into<String>,
        interval_ticks: u64,
        callback: TaskCallback<SessionState<C>>,
    ) {
        self.scheduler.add_repeating(id, interval_ticks, callback);
    }

    /// Cancel a scheduled task; unknown ids are a no-op.
    pub fn cancel_task(&mut self, id: &str) {
        self.scheduler.clear(id);
    }

    /// Whether a task with this id is pending.
    #[must_use]
    pub fn has_task(&self, id: &str) -> bool {
        self.scheduler.has_task(id)
    }

    /// Snapshot the action book into a store.
    ///
    /// # Errors
    /// Propagates serialization and store failures.
    pub fn save_actions(&self, store: &mut dyn SettingsStore) -> Result<()> {
        let value = serde_json::to_value(self.state.actions.snapshot())
            .map_err(|e| hype_core::HypeError::Serialization(e.to_string()))?;
        store.set(ACTIONS_KEY, value)
    }

    /// Replace the action book from a store snapshot. Returns how many
    /// actions were restored (0 when the store holds no snapshot).
    ///
    /// # Errors
    /// Propagates store failures; rejects snapshots containing malformed
    /// actions without touching the current book.
    pub fn restore_actions(&mut self, store: &dyn SettingsStore) -> Result<usize> {
        let Some(value) = store.get(ACTIONS_KEY)? else {
            return Ok(0);
        };
        let actions: Vec<Action> = serde_json::from_value(value)
            .map_err(|e| hype_core::HypeError::Serialization(e.to_string()))?;
        let count = actions.len();
        self.state.actions = ActionBook::restore(actions)?;
        info!(count, "action book restored");
        Ok(count)
    }

    /// Start periodic auto-save of the action book into `store`, every
    /// `autosave.interval_ticks`. Replaces a previous auto-save task.
    /// Hosts typically call this when `autosave.enabled` is set.
    pub fn enable_autosave<S: SettingsStore + 'static>(&mut self, mut store: S) {
        let interval = self.state.config.autosave.interval_ticks;
        self.scheduler.add_repeating(
            AUTOSAVE_TASK_ID,
            interval,
            Box::new(move |_, state| {
                let value = serde_json::to_value(state.actions.snapshot())
                    .map_err(|e| hype_core::HypeError::Serialization(e.to_string()))?;
                store.set(ACTIONS_KEY, value)
            }),
        );
    }

    /// Stop the periodic auto-save, if running.
    pub fn disable_autosave(&mut self) {
        self.scheduler.clear(AUTOSAVE_TASK_ID);
    }

    /// The game backend, for inspection.
    #[must_use]
    pub fn backend(&self) -> &C {
        &self.state.backend
    }

    /// Mutable access to the game backend.
    pub fn backend_mut(&mut self) -> &mut C {
        &mut self.state.backend
    }

    /// The like accumulator, for inspection.
    #[must_use]
    pub fn likes(&self) -> &LikeAccumulator {
        &self.state.likes
    }

    /// A category's registry, for inspection.
    #[must_use]
    pub fn actions(&self, category: EventCategory) -> &EventActionRegistry<Action> {
        self.state.actions.registry(category)
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &HypeConfig {
        &self.state.config
    }
}
