//! Built-in plugin shipped with the bot

use std::sync::Arc;

use tracing::debug;

use super::data::PluginData;
use super::trait_def::{HandlerResult, Plugin};
use crate::application::errors::PluginError;
use crate::domain::entities::{CommandInvocation, RoomEvent, MESSAGE_EVENT};
use crate::domain::traits::Bot;

const DONE: &str = "✅";
const WAVE: &str = "👋";

async fn ping(command: CommandInvocation) -> HandlerResult {
    command.reply_notice("pong").await?;
    Ok(())
}

async fn echo(command: CommandInvocation) -> HandlerResult {
    if command.args.is_empty() {
        return Err(PluginError::InvalidArgs("Usage: `echo <text>`".to_string()));
    }
    command.reply(&command.args.join(" ")).await?;
    Ok(())
}

/// `note` shows the stored note, `note clear` drops it, `note <text>` replaces it
async fn note(data: PluginData, command: CommandInvocation) -> HandlerResult {
    match command.args.first().map(String::as_str) {
        None => {
            let text = data.read().await?.unwrap_or_else(|| "No note stored".to_string());
            command.reply_notice(&text).await?;
        }
        Some("clear") if command.args.len() == 1 => {
            data.clear().await?;
            command.react(DONE).await?;
        }
        Some(_) => {
            data.write(&command.args.join(" ")).await?;
            command.react(DONE).await?;
        }
    }
    Ok(())
}

/// Wave at messages that mention the bot
async fn wave(client: Arc<dyn Bot>, room_id: String, event: RoomEvent) -> HandlerResult {
    let user_id = client.bot_info().user_id;
    let mentioned = [event.body.as_deref(), event.formatted_body.as_deref()]
        .into_iter()
        .flatten()
        .any(|text| text.contains(&user_id));

    if mentioned {
        client.react(&room_id, &event.event_id, WAVE).await?;
    }
    Ok(())
}

async fn heartbeat(client: Arc<dyn Bot>) -> HandlerResult {
    debug!("Heartbeat from {}", client.bot_info().user_id);
    Ok(())
}

/// The `core` plugin: `ping`, `echo`, `note`, a mention hook and a heartbeat timer
pub fn plugin() -> Plugin {
    let mut plugin = Plugin::new("core", "General", "Basic commands and a shared note");
    let data = plugin.data();
    plugin
        .add_command("ping", "Check whether the bot is alive", ping)
        .add_command("echo", "Repeat the given text", echo)
        .add_command("note", "Show, replace or clear the stored note", move |command| {
            note(data.clone(), command)
        })
        .add_hook(MESSAGE_EVENT, wave)
        .add_timer("heartbeat", heartbeat);
    plugin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_plugin_declarations() {
        let plugin = plugin();
        let words: Vec<&str> = plugin.commands().iter().map(|c| c.word.as_str()).collect();

        assert_eq!(plugin.name(), "core");
        assert_eq!(words, vec!["ping", "echo", "note"]);
        assert_eq!(plugin.hooks()[0].event_type, MESSAGE_EVENT);
        assert_eq!(plugin.timers().len(), 1);
        assert_eq!(plugin.data().key(), "plugin_data/core");
    }
}
