//! Display annotations added to core events before they are printed.

use serde_json::{json, Value};
use sirru_core::chat::speaker_name;
use sirru_core::Event;

/// The phase whose prompt a breathing event should show.
fn shown_phase(event: &Event) -> Option<sirru_core::BreathPhase> {
    match event {
        Event::SessionStarted { phase, .. }
        | Event::Tick { phase, .. }
        | Event::BreathingSnapshot { phase, .. } => Some(*phase),
        Event::PhaseChanged { to, .. } => Some(*to),
        _ => None,
    }
}

fn shown_speaker(event: &Event) -> Option<&str> {
    match event {
        Event::MessageRevealed { message, .. } => Some(&message.speaker_id),
        Event::TypingChanged {
            speaker_id: Some(id),
            ..
        } => Some(id),
        _ => None,
    }
}

/// `event` as JSON, plus `prompt` for breathing events that name a phase
/// and `speaker_name` for chat events that name a speaker.
pub fn annotate(event: &Event) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(event)?;
    if let Value::Object(map) = &mut value {
        if let Some(phase) = shown_phase(event) {
            map.insert("prompt".into(), json!(phase.prompt()));
        }
        if let Some(id) = shown_speaker(event) {
            map.insert("speaker_name".into(), json!(speaker_name(id)));
        }
    }
    Ok(value)
}

/// Print one annotated event as a JSON line.
pub fn emit_event(event: &Event) -> Result<(), serde_json::Error> {
    crate::clock::emit(&annotate(event)?)
}
