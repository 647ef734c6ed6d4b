use serde::{Deserialize, Serialize};

/// Where a box-breathing session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathPhase {
    /// Not running.
    Idle,
    Inhale,
    HoldAfterInhale,
    Exhale,
    HoldAfterExhale,
}

impl BreathPhase {
    /// The phase that follows this one in the cycle.
    ///
    /// `Idle` leads into `Inhale`; `HoldAfterExhale` wraps back to `Inhale`.
    pub fn next(self) -> Self {
        match self {
            BreathPhase::Idle => BreathPhase::Inhale,
            BreathPhase::Inhale => BreathPhase::HoldAfterInhale,
            BreathPhase::HoldAfterInhale => BreathPhase::Exhale,
            BreathPhase::Exhale => BreathPhase::HoldAfterExhale,
            BreathPhase::HoldAfterExhale => BreathPhase::Inhale,
        }
    }

    /// Leaving this phase finishes a cycle.
    pub fn ends_cycle(self) -> bool {
        self == BreathPhase::HoldAfterExhale
    }

    pub fn is_running(self) -> bool {
        self != BreathPhase::Idle
    }

    /// Prompt shown under the breathing circle.
    pub fn prompt(self) -> &'static str {
        match self {
            BreathPhase::Idle => "Ready",
            BreathPhase::Inhale => "Inhale...",
            BreathPhase::HoldAfterInhale | BreathPhase::HoldAfterExhale => "Hold...",
            BreathPhase::Exhale => "Exhale...",
        }
    }
}
