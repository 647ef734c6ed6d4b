//! Integration tests for scripted chat playback.

use sirru_core::chat::{FixedResponder, MessageOrigin};
use sirru_core::{ChatConfig, Event, Script, ScriptEvent, ScriptedConversation};

fn timeline(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::MessageRevealed { message, at_ms } => {
                Some(format!("{at_ms}:reveal:{}", message.id))
            }
            Event::TypingChanged {
                speaker_id: Some(s),
                at_ms,
            } => Some(format!("{at_ms}:typing:{s}")),
            Event::TypingChanged { speaker_id: None, at_ms } => Some(format!("{at_ms}:typing:-")),
            _ => None,
        })
        .collect()
}

#[test]
fn three_event_script_timeline() {
    let script = Script::new(vec![
        ScriptEvent::new("a", "koamas", "welcome", 0),
        ScriptEvent::new("b", "turtle", "hi", 3000),
        ScriptEvent::new("c", "shark", "hey", 5000),
    ])
    .unwrap();
    let mut chat = ScriptedConversation::new(
        script,
        Box::new(FixedResponder::default()),
        ChatConfig::default(),
    );

    let mut events = chat.start_script();
    // Advance in uneven frames to show the result does not depend on step size.
    for step in [7, 1493, 1, 1999, 333, 2167, 10_000] {
        events.extend(chat.advance(step));
    }

    assert_eq!(
        timeline(&events),
        vec![
            "0:reveal:a",
            "1500:typing:turtle",
            "3000:reveal:b",
            "3000:typing:-",
            "3500:typing:shark",
            "5000:reveal:c",
            "5000:typing:-",
        ]
    );
}

#[test]
fn user_message_reply_timeline() {
    let mut chat = ScriptedConversation::new(
        Script::default(),
        Box::new(FixedResponder::new("koamas", "got it")),
        ChatConfig::default(),
    );
    assert!(chat.submit_user_message("").is_empty());
    assert!(chat.submit_user_message("   ").is_empty());
    assert_eq!(chat.pending_timers(), 0);

    let mut events = chat.submit_user_message("hello");
    events.extend(chat.advance(5000));
    assert_eq!(
        timeline(&events),
        vec![
            "0:reveal:user-0",
            "1000:typing:koamas",
            "3000:reveal:reply-0",
            "3000:typing:-",
        ]
    );
    let origins: Vec<_> = chat.revealed().iter().map(|m| m.origin).collect();
    assert_eq!(origins, vec![MessageOrigin::User, MessageOrigin::Responder]);
}

#[test]
fn every_reveal_requests_scroll() {
    let mut chat = ScriptedConversation::faru(ChatConfig::default());
    let mut events = chat.start_script();
    events.extend(chat.submit_user_message("same"));
    events.extend(chat.advance(30_000));

    let reveals = events
        .iter()
        .filter(|e| matches!(e, Event::MessageRevealed { .. }))
        .count();
    let scrolls = events
        .iter()
        .filter(|e| matches!(e, Event::ScrollToLatest { .. }))
        .count();
    assert_eq!(reveals, 11);
    assert_eq!(scrolls, reveals);

    let mut last = 0;
    for e in &events {
        assert!(e.at_ms() >= last, "events out of time order");
        last = e.at_ms();
    }
}

#[test]
fn revealed_history_is_append_only() {
    let mut chat = ScriptedConversation::faru(ChatConfig::default());
    chat.start_script();
    let mut seen = Vec::new();
    for _ in 0..30 {
        chat.advance(1000);
        let now = chat.revealed().to_vec();
        assert!(now.starts_with(&seen));
        seen = now;
    }
    let script_ids: Vec<_> = chat.script().events().iter().map(|e| e.id.clone()).collect();
    let revealed_ids: Vec<_> = seen.iter().map(|m| m.id.clone()).collect();
    assert_eq!(revealed_ids, script_ids);
}
