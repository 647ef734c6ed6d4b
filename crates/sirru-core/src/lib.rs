//! # Sirru Core Library
//!
//! This library provides the logic behind the Sirru check-in and
//! peer-support app. Screens are thin views over the same core: they issue
//! commands, advance the clock, and render the events that come back.
//!
//! ## Architecture
//!
//! - **Scheduler**: A virtual-time timer queue; every controller owns one
//! - **Breathing**: Box-breathing phase sequencer with cycle and time accounting
//! - **Chat**: Scripted group-chat playback with typing indicators and canned replies
//! - **Pulse**: Anonymous mood check-ins and per-region tallies
//! - **Config**: TOML-based timing configuration
//!
//! ## Key Components
//!
//! - [`BreathingSession`]: Breathing controller state machine
//! - [`ScriptedConversation`]: Chat playback scheduler
//! - [`PulseBoard`]: In-memory check-in aggregation
//! - [`Config`]: Configuration loading and validation

pub mod ambience;
pub mod breathing;
pub mod chat;
pub mod config;
pub mod error;
pub mod events;
pub mod profile;
pub mod pulse;
pub mod scheduler;

pub use ambience::Ambience;
pub use breathing::{format_elapsed, BreathPhase, BreathingSession};
pub use chat::{ChatMessage, Responder, Script, ScriptEvent, ScriptedConversation};
pub use config::{BreathingConfig, ChatConfig, Config};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use profile::Profile;
pub use pulse::{Mood, PulseBoard, PulseStats, SupportOption, TideBand, TidePoint};
pub use scheduler::{Scheduler, TimerId};
