//! # HYPE Core Library
//!
//! Game-agnostic engine for turning a high-rate stream of live-audience
//! events (chat, likes, follows, gifts) into in-world game effects.
//!
//! The two load-bearing pieces:
//!
//! - [`scheduler::TaskScheduler`] — tick-indexed registry of named,
//!   cancellable, delayed/repeating callbacks. Every subsystem that needs
//!   "wait N ticks" or "do X every N ticks" goes through it; nothing else
//!   owns a timer.
//! - [`registry::EventActionRegistry`] + [`likes::LikeAccumulator`] +
//!   [`dispatch`] — map event keys (keywords, like thresholds, fixed
//!   category names) onto ordered lists of user-configured actions, with
//!   cumulative per-user like state and per-action failure isolation.
//!
//! ## Execution Contract
//!
//! Everything here is single-threaded and tick-synchronous: one driver
//! advances the scheduler and delivers events, nothing blocks the tick,
//! and "waiting" is only ever expressed as a future-tick task. Failure is
//! contained at four boundaries (scheduler callback, dispatched action,
//! event handler, registration-time validation) and never fatal.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod likes;
pub mod registry;
pub mod scheduler;
pub mod types;

pub use action::{Action, ActionKind};
pub use config::HypeConfig;
pub use context::GameContext;
pub use error::HypeError;
pub use types::EventCategory;
