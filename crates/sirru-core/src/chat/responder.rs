//! Canned replies to user messages.

/// Suggested openers offered above the companion chat input.
pub const QUICK_PROMPTS: [&str; 4] = ["can't sleep", "feeling alone", "stressed", "anxious"];

/// Picks the reply a simulated speaker sends after a user message.
pub trait Responder: Send {
    /// Speaker id the reply is attributed to.
    fn speaker(&self) -> &str;

    fn respond(&self, user_text: &str) -> String;
}

/// Always answers with the same acknowledgement.
#[derive(Debug, Clone)]
pub struct FixedResponder {
    speaker: String,
    reply: String,
}

impl FixedResponder {
    pub fn new(speaker: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            reply: reply.into(),
        }
    }
}

impl Default for FixedResponder {
    fn default() -> Self {
        Self::new("koamas", "Thank you for sharing. The Faru hears you 💙")
    }
}

impl Responder for FixedResponder {
    fn speaker(&self) -> &str {
        &self.speaker
    }

    fn respond(&self, _user_text: &str) -> String {
        self.reply.clone()
    }
}

/// Case-insensitive keyword table, first match wins.
#[derive(Debug, Clone)]
pub struct KeywordResponder {
    speaker: String,
    table: Vec<(String, String)>,
    fallback: String,
}

const KOAMAS_TABLE: [(&str, &str); 7] = [
    (
        "can't sleep",
        "Those nights are the worst. Mind racing, or just can't switch off?",
    ),
    (
        "overwhelmed",
        "That sounds heavy. What's weighing on you the most right now?",
    ),
    (
        "alone",
        "That loneliness hits different. You're not alone right now though, I'm here.",
    ),
    (
        "expectations",
        "That's exhausting. Carrying everyone's expectations is really hard.",
    ),
    (
        "stressed",
        "I hear you. Stress can feel suffocating sometimes. What's going on?",
    ),
    (
        "anxious",
        "Anxiety is rough. Is it about something specific, or just... everything?",
    ),
    (
        "hurt myself",
        "I'm really glad you told me. Please reach out to: Mental Health Hotline 1425 (24/7), Thibaa 722 1212, Emergency 119. I'm still here too.",
    ),
];

const KOAMAS_FALLBACK: &str = "I hear you. Want to tell me more about what's going on?";

impl KeywordResponder {
    pub fn new(
        speaker: impl Into<String>,
        table: Vec<(String, String)>,
        fallback: impl Into<String>,
    ) -> Self {
        let table = table
            .into_iter()
            .map(|(keyword, reply)| (keyword.to_lowercase(), reply))
            .collect();
        Self {
            speaker: speaker.into(),
            table,
            fallback: fallback.into(),
        }
    }

    /// The companion's table.
    pub fn koamas() -> Self {
        Self::new(
            "koamas",
            KOAMAS_TABLE
                .iter()
                .map(|(k, r)| (k.to_string(), r.to_string()))
                .collect(),
            KOAMAS_FALLBACK,
        )
    }
}

impl Responder for KeywordResponder {
    fn speaker(&self) -> &str {
        &self.speaker
    }

    fn respond(&self, user_text: &str) -> String {
        let normalized = user_text.to_lowercase();
        self.table
            .iter()
            .find(|(keyword, _)| normalized.contains(keyword.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
