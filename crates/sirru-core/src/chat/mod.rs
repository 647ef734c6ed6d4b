mod playback;
mod responder;
mod script;

pub use playback::{
    ChatMessage, ConversationSnapshot, MessageOrigin, ScriptedConversation, USER_SPEAKER,
};
pub use responder::{FixedResponder, KeywordResponder, Responder, QUICK_PROMPTS};
pub use script::{speaker_name, Script, ScriptEvent};
