//! The collaborator surface the engine drives effects through.
//!
//! Rendering, geometry construction, block painting, and the concrete
//! visual/sound calls live behind this trait — the core only decides
//! *what* happens and *when*.

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Option payloads
// ---------------------------------------------------------------------------

/// On-screen overlay content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenOptions {
    /// Large title text, if any.
    pub title: Option<String>,
    /// Subtitle text, if any.
    pub subtitle: Option<String>,
}

/// A batch of entities to summon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummonOptions {
    /// Entity type identifier.
    pub entity_type: String,
    /// How many to summon in this batch.
    pub count: u32,
    /// Horizontal scatter radius around the spawn point.
    pub spread: f32,
}

/// A block-fill request over the structure bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOptions {
    /// Block type identifier.
    pub block: String,
    /// Fill only the shell.
    pub hollow: bool,
}

// ---------------------------------------------------------------------------
// Game context trait
// ---------------------------------------------------------------------------

/// Mutable game-state surface consumed by the dispatcher and scheduled
/// effects. One implementation per game backend; tests use
/// [`RecordingContext`].
///
/// Every method is synchronous and must not block the tick; failures are
/// reported as errors and contained by the caller.
pub trait GameContext {
    /// Show an on-screen overlay (title and/or subtitle).
    fn display_screen(&mut self, options: ScreenOptions) -> Result<()>;
    /// Play a sound for the local player.
    fn play_sound(&mut self, sound_id: &str) -> Result<()>;
    /// Send a chat message to the local player.
    fn send_message(&mut self, text: &str) -> Result<()>;
    /// Summon a batch of entities.
    fn summon_entities(&mut self, options: SummonOptions) -> Result<()>;
    /// Fill the structure bounds with blocks.
    fn fill_blocks(&mut self, options: FillOptions) -> Result<()>;
    /// Clear all placed blocks inside the structure bounds.
    fn clear_blocks(&mut self) -> Result<()>;
    /// Run a raw game command.
    fn run_command(&mut self, command: &str) -> Result<()>;
    /// Lock the player in the jail cage.
    fn jail(&mut self, duration_ticks: u64, effects: &[String]) -> Result<()>;
    /// Adjust the win counter by a signed delta.
    fn adjust_wins(&mut self, delta: i64) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Recording backend
// ---------------------------------------------------------------------------

/// One recorded [`GameContext`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextCall {
    /// `display_screen` was called.
    DisplayScreen(ScreenOptions),
    /// `play_sound` was called.
    PlaySound(String),
    /// `send_message` was called.
    SendMessage(String),
    /// `summon_entities` was called.
    Summon(SummonOptions),
    /// `fill_blocks` was called.
    Fill(FillOptions),
    /// `clear_blocks` was called.
    ClearBlocks,
    /// `run_command` was called.
    RunCommand(String),
    /// `jail` was called.
    Jail {
        /// Requested jail duration.
        duration_ticks: u64,
        /// Requested status effects.
        effects: Vec<String>,
    },
    /// `adjust_wins` was called.
    AdjustWins(i64),
}

/// A [`GameContext`] that records every call — the reference backend for
/// tests and headless dry runs.
///
/// Individual call families can be made to fail, to exercise the
/// per-action and per-task containment paths.
#[derive(Debug, Default)]
pub struct RecordingContext {
    /// Every call, in invocation order.
    pub calls: Vec<ContextCall>,
    /// Make `play_sound` fail.
    pub fail_sounds: bool,
    /// Make `run_command` fail.
    pub fail_commands: bool,
    /// Make `summon_entities` fail.
    pub fail_summons: bool,
}

impl RecordingContext {
    /// Create an all-succeeding recording backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent via `send_message`, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ContextCall::SendMessage(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Sounds played via `play_sound`, in order.
    #[must_use]
    pub fn sounds(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ContextCall::PlaySound(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Total entities summoned across all batches.
    #[must_use]
    pub fn summoned(&self) -> u32 {
        self.calls
            .iter()
            .map(|c| match c {
                ContextCall::Summon(options) => options.count,
                _ => 0,
            })
            .sum()
    }
}

impl GameContext for RecordingContext {
    fn display_screen(&mut self, options: ScreenOptions) -> Result<()> {
        self.calls.push(ContextCall::DisplayScreen(options));
        Ok(())
    }

    fn play_sound(&mut self, sound_id: &str) -> Result<()> {
        if self.fail_sounds {
            return Err(crate::HypeError::Backend(format!(
                "sound unavailable: {sound_id}"
            )));
        }
        self.calls.push(ContextCall::PlaySound(sound_id.to_string()));
        Ok(())
    }

    fn send_message(&mut self, text: &str) -> Result<()> {
        self.calls.push(ContextCall::SendMessage(text.to_string()));
        Ok(())
    }

    fn summon_entities(&mut self, options: SummonOptions) -> Result<()> {
        if self.fail_summons {
            return Err(crate::HypeError::Backend(format!(
                "spawn cap reached: {}",
                options.entity_type
            )));
        }
        self.calls.push(ContextCall::Summon(options));
        Ok(())
    }

    fn fill_blocks(&mut self, options: FillOptions) -> Result<()> {
        self.calls.push(ContextCall::Fill(options));
        Ok(())
    }

    fn clear_blocks(&mut self) -> Result<()> {
        self.calls.push(ContextCall::ClearBlocks);
        Ok(())
    }

    fn run_command(&mut self, command: &str) -> Result<()> {
        if self.fail_commands {
            return Err(crate::HypeError::Backend(format!(
                "command rejected: {command}"
            )));
        }
        self.calls.push(ContextCall::RunCommand(command.to_string()));
        Ok(())
    }

    fn jail(&mut self, duration_ticks: u64, effects: &[String]) -> Result<()> {
        self.calls.push(ContextCall::Jail {
            duration_ticks,
            effects: effects.to_vec(),
        });
        Ok(())
    }

    fn adjust_wins(&mut self, delta: i64) -> Result<()> {
        self.calls.push(ContextCall::AdjustWins(delta));
        Ok(())
    }
}
