//! Scripted chat playback.
//!
//! A `ScriptedConversation` reveals the events of a [`Script`] one after
//! another on virtual time, showing the next speaker as typing shortly before
//! each reveal. User messages are appended immediately and answered by a
//! [`Responder`] on a separate, overlapping timeline.
//!
//! Like the breathing controller, the conversation has no threads: the caller
//! advances time and renders the returned events. All pending work lives in
//! the conversation's own [`Scheduler`], so dropping the conversation (or
//! calling [`ScriptedConversation::teardown`]) leaves nothing behind to fire.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::responder::{FixedResponder, KeywordResponder, Responder};
use super::script::Script;
use crate::config::ChatConfig;
use crate::events::Event;
use crate::scheduler::Scheduler;

pub const USER_SPEAKER: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageOrigin {
    Script,
    User,
    Responder,
}

/// A message that has been revealed. Never changed after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub speaker_id: String,
    pub content: String,
    pub origin: MessageOrigin,
    pub revealed_at_ms: u64,
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        self.origin == MessageOrigin::User
    }
}

/// Render-ready view of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub messages: Vec<ChatMessage>,
    pub typing_speaker: Option<String>,
    pub script_finished: bool,
    pub at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatAction {
    ScriptTyping { index: usize },
    ScriptReveal { index: usize },
    ReplyTyping { reply: u64 },
    Reply { reply: u64, content: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypingOwner {
    Script(usize),
    Reply(u64),
}

#[derive(Debug, Clone)]
struct TypingSlot {
    owner: TypingOwner,
    speaker_id: String,
    reveal_at_ms: u64,
}

pub struct ScriptedConversation {
    config: ChatConfig,
    script: Script,
    responder: Box<dyn Responder>,
    timers: Scheduler<ChatAction>,
    revealed: Vec<ChatMessage>,
    /// Every speaker currently typing; only the one due soonest is shown.
    typing: Vec<TypingSlot>,
    shown_typing: Option<String>,
    script_started_at_ms: Option<u64>,
    script_revealed: usize,
    next_user_seq: u64,
}

impl fmt::Debug for ScriptedConversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedConversation")
            .field("config", &self.config)
            .field("script_len", &self.script.len())
            .field("responder", &self.responder.speaker())
            .field("revealed", &self.revealed.len())
            .field("typing", &self.shown_typing)
            .field("pending_timers", &self.timers.pending())
            .finish_non_exhaustive()
    }
}

impl ScriptedConversation {
    pub fn new(script: Script, responder: Box<dyn Responder>, config: ChatConfig) -> Self {
        Self {
            config,
            script,
            responder,
            timers: Scheduler::new(),
            revealed: Vec::new(),
            typing: Vec::new(),
            shown_typing: None,
            script_started_at_ms: None,
            script_revealed: 0,
            next_user_seq: 0,
        }
    }

    /// The group chat: Faru script, fixed acknowledgement for user messages.
    pub fn faru(config: ChatConfig) -> Self {
        Self::new(Script::faru(), Box::new(FixedResponder::default()), config)
    }

    /// The one-to-one companion: a greeting, then keyword replies.
    pub fn companion(config: ChatConfig) -> Self {
        Self::new(
            Script::companion_greeting(),
            Box::new(KeywordResponder::koamas()),
            config,
        )
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn revealed(&self) -> &[ChatMessage] {
        &self.revealed
    }

    /// Speaker shown as typing, if any.
    pub fn typing_speaker(&self) -> Option<&str> {
        self.shown_typing.as_deref()
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn is_script_started(&self) -> bool {
        self.script_started_at_ms.is_some()
    }

    pub fn is_script_finished(&self) -> bool {
        self.is_script_started() && self.script_revealed == self.script.len()
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.timers.next_due_ms()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: self.revealed.clone(),
            typing_speaker: self.shown_typing.clone(),
            script_finished: self.is_script_finished(),
            at_ms: self.now_ms(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin script playback. Runs once; later calls are no-ops.
    pub fn start_script(&mut self) -> Vec<Event> {
        if self.is_script_started() {
            debug!("script already started, ignoring");
            return Vec::new();
        }
        let now = self.now_ms();
        self.script_started_at_ms = Some(now);

        let mut events = vec![Event::ScriptStarted {
            script_len: self.script.len(),
            at_ms: now,
        }];
        if self.script.is_empty() {
            events.push(Event::ScriptFinished {
                revealed: 0,
                at_ms: now,
            });
            return events;
        }

        self.arm_script_event(0);
        events.extend(self.advance_to(now));
        events
    }

    /// Append a user message and schedule the canned reply.
    ///
    /// Blank text is ignored and schedules nothing.
    pub fn submit_user_message(&mut self, text: &str) -> Vec<Event> {
        let content = text.trim();
        if content.is_empty() {
            return Vec::new();
        }
        let now = self.now_ms();
        let seq = self.next_user_seq;
        self.next_user_seq += 1;

        let mut events = Vec::new();
        self.append(
            ChatMessage {
                id: format!("user-{seq}"),
                speaker_id: USER_SPEAKER.to_string(),
                content: content.to_string(),
                origin: MessageOrigin::User,
                revealed_at_ms: now,
            },
            &mut events,
        );

        let reply = self.responder.respond(content);
        let delay = self.config.response_delay_ms;
        self.timers.schedule(delay, ChatAction::ReplyTyping { reply: seq });
        self.timers.schedule(
            delay.saturating_add(self.config.response_typing_ms),
            ChatAction::Reply {
                reply: seq,
                content: reply,
            },
        );

        events.extend(self.advance_to(now));
        events
    }

    /// Move virtual time forward by `delta_ms`.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<Event> {
        self.advance_to(self.now_ms().saturating_add(delta_ms))
    }

    /// Fire every timer due up to `target_ms`, in order.
    pub fn advance_to(&mut self, target_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(target_ms) {
            let now = fired.at_ms;
            match fired.action {
                ChatAction::ScriptTyping { index } => {
                    self.on_script_typing(index, now, &mut events)
                }
                ChatAction::ScriptReveal { index } => {
                    self.on_script_reveal(index, now, &mut events)
                }
                ChatAction::ReplyTyping { reply } => self.on_reply_typing(reply, now, &mut events),
                ChatAction::Reply { reply, content } => {
                    self.on_reply(reply, content, now, &mut events)
                }
            }
        }
        self.timers.advance_clock(target_ms);
        events
    }

    /// Cancel everything still pending and discard the conversation.
    ///
    /// Returns how many timers were cancelled.
    pub fn teardown(mut self) -> usize {
        let cancelled = self.timers.cancel_all();
        debug!(cancelled, revealed = self.revealed.len(), "conversation torn down");
        cancelled
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Schedule typing and reveal for `index`, relative to the previous reveal.
    fn arm_script_event(&mut self, index: usize) {
        let Some(event) = self.script.get(index) else {
            return;
        };
        let previous_ms = match index {
            0 => 0,
            _ => self
                .script
                .get(index - 1)
                .map(|e| e.offset_ms)
                .unwrap_or(0),
        };
        let gap = event.offset_ms.saturating_sub(previous_ms);
        let lead = self.config.typing_lead_ms;

        // The first event appears without a typing indicator.
        if index > 0 && gap > 0 && lead > 0 {
            self.timers
                .schedule(gap.saturating_sub(lead), ChatAction::ScriptTyping { index });
        }
        self.timers.schedule(gap, ChatAction::ScriptReveal { index });
    }

    fn on_script_typing(&mut self, index: usize, now: u64, events: &mut Vec<Event>) {
        let (Some(event), Some(started)) = (self.script.get(index), self.script_started_at_ms)
        else {
            return;
        };
        self.typing.push(TypingSlot {
            owner: TypingOwner::Script(index),
            speaker_id: event.speaker_id.clone(),
            reveal_at_ms: started.saturating_add(event.offset_ms),
        });
        self.refresh_typing(now, events);
    }

    fn on_script_reveal(&mut self, index: usize, now: u64, events: &mut Vec<Event>) {
        let Some(event) = self.script.get(index) else {
            return;
        };
        let message = ChatMessage {
            id: event.id.clone(),
            speaker_id: event.speaker_id.clone(),
            content: event.content.clone(),
            origin: MessageOrigin::Script,
            revealed_at_ms: now,
        };
        debug!(
            id = %message.id,
            speaker = %message.speaker_id,
            at_ms = now,
            "script message revealed"
        );

        self.typing.retain(|slot| slot.owner != TypingOwner::Script(index));
        self.append(message, events);
        self.script_revealed += 1;
        self.refresh_typing(now, events);

        if index + 1 < self.script.len() {
            self.arm_script_event(index + 1);
        } else {
            events.push(Event::ScriptFinished {
                revealed: self.script_revealed,
                at_ms: now,
            });
        }
    }

    fn on_reply_typing(&mut self, reply: u64, now: u64, events: &mut Vec<Event>) {
        self.typing.push(TypingSlot {
            owner: TypingOwner::Reply(reply),
            speaker_id: self.responder.speaker().to_string(),
            reveal_at_ms: now.saturating_add(self.config.response_typing_ms),
        });
        self.refresh_typing(now, events);
    }

    fn on_reply(&mut self, reply: u64, content: String, now: u64, events: &mut Vec<Event>) {
        self.typing.retain(|slot| slot.owner != TypingOwner::Reply(reply));
        self.append(
            ChatMessage {
                id: format!("reply-{reply}"),
                speaker_id: self.responder.speaker().to_string(),
                content,
                origin: MessageOrigin::Responder,
                revealed_at_ms: now,
            },
            events,
        );
        self.refresh_typing(now, events);
    }

    fn append(&mut self, message: ChatMessage, events: &mut Vec<Event>) {
        let at_ms = message.revealed_at_ms;
        self.revealed.push(message.clone());
        events.push(Event::MessageRevealed { message, at_ms });
        events.push(Event::ScrollToLatest { at_ms });
    }

    fn refresh_typing(&mut self, now: u64, events: &mut Vec<Event>) {
        let shown = self
            .typing
            .iter()
            .min_by_key(|slot| slot.reveal_at_ms)
            .map(|slot| slot.speaker_id.clone());
        if shown != self.shown_typing {
            self.shown_typing = shown.clone();
            events.push(Event::TypingChanged {
                speaker_id: shown,
                at_ms: now,
            });
        }
    }
}
