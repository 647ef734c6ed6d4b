use clap::Args;
use sirru_core::chat::QUICK_PROMPTS;
use sirru_core::{Config, ScriptedConversation};

use crate::render::emit_event;

#[derive(Args)]
pub struct KoamasArgs {
    /// Messages to send, in order. Each waits for its reply.
    #[arg(required_unless_present = "prompts")]
    messages: Vec<String>,
    /// List the quick prompts instead of chatting
    #[arg(long)]
    prompts: bool,
}

pub fn run(args: KoamasArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if args.prompts {
        println!("{}", serde_json::to_string_pretty(&QUICK_PROMPTS)?);
        return Ok(());
    }

    let mut chat = ScriptedConversation::companion(config.chat);
    let reply_after = config
        .chat
        .response_delay_ms
        .saturating_add(config.chat.response_typing_ms);

    for event in chat.start_script() {
        emit_event(&event)?;
    }
    for message in &args.messages {
        let mut events = chat.submit_user_message(message);
        events.extend(chat.advance(reply_after));
        for event in &events {
            emit_event(event)?;
        }
    }
    Ok(())
}
