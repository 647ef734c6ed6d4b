use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One scripted chat message, revealed `offset_ms` after the script starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEvent {
    pub id: String,
    pub speaker_id: String,
    pub content: String,
    pub offset_ms: u64,
}

impl ScriptEvent {
    pub fn new(
        id: impl Into<String>,
        speaker_id: impl Into<String>,
        content: impl Into<String>,
        offset_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            speaker_id: speaker_id.into(),
            content: content.into(),
            offset_ms,
        }
    }
}

/// Ordered script with non-decreasing offsets and unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Script {
    events: Vec<ScriptEvent>,
}

impl Script {
    pub fn new(events: Vec<ScriptEvent>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        let mut previous_ms = 0;
        for event in &events {
            if event.offset_ms < previous_ms {
                return Err(ValidationError::OffsetOutOfOrder {
                    id: event.id.clone(),
                    offset_ms: event.offset_ms,
                    previous_ms,
                });
            }
            if !seen.insert(event.id.as_str()) {
                return Err(ValidationError::DuplicateId(event.id.clone()));
            }
            previous_ms = event.offset_ms;
        }
        Ok(Self { events })
    }

    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }

    pub fn get(&self, index: usize) -> Option<&ScriptEvent> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Offset of the last event, i.e. when playback finishes.
    pub fn duration_ms(&self) -> u64 {
        self.events.last().map(|e| e.offset_ms).unwrap_or(0)
    }

    /// The group chat played when someone joins the Faru.
    pub fn faru() -> Self {
        Self {
            events: vec![
                ScriptEvent::new(
                    "1",
                    "koamas",
                    "Hey everyone. Safe space here. How's everyone's storm tonight?",
                    0,
                ),
                ScriptEvent::new("2", "turtle", "can't sleep again 😔", 3000),
                ScriptEvent::new("3", "shark", "same here. brain won't shut up", 5500),
                ScriptEvent::new(
                    "4",
                    "koamas",
                    "Those nights are the hardest. You're not alone, clearly others are up too.",
                    8500,
                ),
                ScriptEvent::new("5", "octopus", "it helps knowing others feel it too", 12000),
                ScriptEvent::new("6", "turtle", "yeah... thanks for being here everyone 💙", 15000),
                ScriptEvent::new(
                    "7",
                    "koamas",
                    "That's what the Faru is for. We're all just floating through this together.",
                    18500,
                ),
                ScriptEvent::new(
                    "8",
                    "shark",
                    "anyone tried the breathing exercise? actually helped me yesterday",
                    22000,
                ),
                ScriptEvent::new("9", "octopus", "the 4-4-4-4 one? gonna try it now", 25000),
            ],
        }
    }

    /// Opening line of the one-to-one companion chat.
    pub fn companion_greeting() -> Self {
        Self {
            events: vec![ScriptEvent::new(
                "greeting",
                "koamas",
                "Hey there 🌊 I'm Koamas. This is a safe space, no judgments, just listening. What's on your mind tonight?",
                0,
            )],
        }
    }
}

/// Display name for a speaker id.
pub fn speaker_name(speaker_id: &str) -> &'static str {
    match speaker_id {
        "koamas" => "Koamas",
        "turtle" => "Turtle",
        "shark" => "Shark",
        "octopus" => "Octopus",
        "crab" => "Crab",
        "fish" => "Fish",
        "dolphin" => "Dolphin",
        "user" => "You",
        _ => "Anonymous",
    }
}
