//! # hype-live — Live-Platform Integration for HYPE
//!
//! This crate binds a live-streaming platform's raw audience events to the
//! game-agnostic `hype-core` engine.
//!
//! ## Architecture
//!
//! ```text
//! raw platform event
//!        │
//!        ▼
//! LiveEvent (events) ──▶ Session::handle_event (session)
//!                              │
//!                              ▼
//!                    per-category handler (handlers)
//!                              │
//!              ┌───────────────┼────────────────┐
//!              ▼               ▼                ▼
//!       LikeAccumulator  ActionRegistry   TaskScheduler
//!              └───────────────┼────────────────┘
//!                              ▼
//!                    dispatch → GameContext
//! ```
//!
//! ## Modules
//!
//! - `events` — raw per-category event payloads
//! - `handlers` — per-category matching and dispatch
//! - `session` — the explicitly-constructed context object the host drives
//! - `persistence` — opaque JSON settings store for action snapshots

pub mod events;
pub mod handlers;
pub mod persistence;
pub mod session;

pub use events::LiveEvent;
pub use persistence::{JsonFileStore, MemoryStore, SettingsStore};
pub use session::{ActionBook, Session, SessionState};
