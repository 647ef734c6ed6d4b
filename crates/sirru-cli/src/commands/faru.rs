use clap::Args;
use serde_json::json;
use sirru_core::ambience::Ambience;
use sirru_core::{Config, ScriptedConversation};

use crate::clock::{drive, emit};
use crate::render::emit_event;

/// A user message injected at a virtual time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedMessage {
    pub at_ms: u64,
    pub text: String,
}

fn parse_timed(s: &str) -> Result<TimedMessage, String> {
    let (at, text) = s
        .split_once(':')
        .ok_or_else(|| format!("expected MS:TEXT, got '{s}'"))?;
    let at_ms = at
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad time '{at}': {e}"))?;
    Ok(TimedMessage {
        at_ms,
        text: text.to_string(),
    })
}

#[derive(Args)]
pub struct FaruArgs {
    /// Send a message at a virtual time, e.g. --say "4000:can't sleep either"
    #[arg(long = "say", value_name = "MS:TEXT", value_parser = parse_timed)]
    says: Vec<TimedMessage>,
    /// Stop at this virtual time (defaults to when everything has played)
    #[arg(long)]
    until: Option<u64>,
    /// Pace playback with the wall clock
    #[arg(long)]
    realtime: bool,
}

pub fn run(args: FaruArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut ambience = Ambience::new(config.ambience.seed);
    emit(&json!({ "type": "header", "online": ambience.online_count(3, 14) }))?;

    let mut says = args.says;
    says.sort_by_key(|m| m.at_ms);
    let reply_tail = config
        .chat
        .response_delay_ms
        .saturating_add(config.chat.response_typing_ms);

    let mut chat = ScriptedConversation::faru(config.chat);
    let script_end = chat.script().duration_ms();
    let last_say = says.last().map(|m| m.at_ms.saturating_add(reply_tail)).unwrap_or(0);
    let until = args.until.unwrap_or(script_end.max(last_say));

    for event in chat.start_script() {
        emit_event(&event)?;
    }

    let mut pending = says.into_iter().peekable();
    let mut failure = None;
    let frame_ms = if args.realtime { 50 } else { 500 };

    drive(args.realtime, frame_ms, |delta| {
        let frame_end = chat.now_ms().saturating_add(delta).min(until);
        let mut events = Vec::new();
        while let Some(say) = pending.next_if(|m| m.at_ms <= frame_end) {
            events.extend(chat.advance_to(say.at_ms));
            events.extend(chat.submit_user_message(&say.text));
        }
        events.extend(chat.advance_to(frame_end));

        for event in &events {
            if let Err(e) = emit_event(event) {
                failure = Some(e);
                return false;
            }
        }
        chat.now_ms() < until
    })?;

    if let Some(e) = failure {
        return Err(e.into());
    }
    let snapshot = chat.snapshot();
    let cancelled = chat.teardown();
    emit(&json!({
        "type": "summary",
        "messages": snapshot.messages.len(),
        "script_finished": snapshot.script_finished,
        "cancelled_timers": cancelled,
    }))?;
    Ok(())
}
