use serde::{Deserialize, Serialize};

use crate::breathing::BreathPhase;
use crate::chat::ChatMessage;

/// Every state change in the core produces an Event.
/// The view layer polls for events after each command or clock advance.
///
/// `at_ms` is the controller's virtual time, not wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        phase: BreathPhase,
        remaining_in_phase: u32,
        target_cycles: u32,
        at_ms: u64,
    },
    /// One-second countdown tick.
    Tick {
        phase: BreathPhase,
        remaining_in_phase: u32,
        elapsed_secs: u64,
        at_ms: u64,
    },
    PhaseChanged {
        from: BreathPhase,
        to: BreathPhase,
        remaining_in_phase: u32,
        completed_cycles: u32,
        at_ms: u64,
    },
    CycleCompleted {
        completed_cycles: u32,
        target_cycles: u32,
        at_ms: u64,
    },
    /// Terminal event: the session reached its target cycle count.
    SessionComplete {
        completed_cycles: u32,
        elapsed_secs: u64,
        at_ms: u64,
    },
    SessionStopped {
        completed_cycles: u32,
        elapsed_secs: u64,
        at_ms: u64,
    },
    CountersReset {
        at_ms: u64,
    },
    BreathingSnapshot {
        phase: BreathPhase,
        remaining_in_phase: u32,
        completed_cycles: u32,
        target_cycles: u32,
        elapsed_secs: u64,
        elapsed_label: String,
        at_ms: u64,
    },
    ScriptStarted {
        script_len: usize,
        at_ms: u64,
    },
    MessageRevealed {
        message: ChatMessage,
        at_ms: u64,
    },
    /// The view should scroll its message list to the newest entry.
    ScrollToLatest {
        at_ms: u64,
    },
    /// The shown typing indicator changed. `None` hides it.
    TypingChanged {
        speaker_id: Option<String>,
        at_ms: u64,
    },
    ScriptFinished {
        revealed: usize,
        at_ms: u64,
    },
}

impl Event {
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::SessionStarted { at_ms, .. }
            | Event::Tick { at_ms, .. }
            | Event::PhaseChanged { at_ms, .. }
            | Event::CycleCompleted { at_ms, .. }
            | Event::SessionComplete { at_ms, .. }
            | Event::SessionStopped { at_ms, .. }
            | Event::CountersReset { at_ms }
            | Event::BreathingSnapshot { at_ms, .. }
            | Event::ScriptStarted { at_ms, .. }
            | Event::MessageRevealed { at_ms, .. }
            | Event::ScrollToLatest { at_ms }
            | Event::TypingChanged { at_ms, .. }
            | Event::ScriptFinished { at_ms, .. } => *at_ms,
        }
    }
}
