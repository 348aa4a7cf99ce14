use std::fmt;
use std::sync::Arc;

use super::{Room, RoomEvent};
use crate::domain::traits::Bot;

/// A single incoming command, built by the runtime and handed to the loader.
///
/// Lives for one dispatch call.
#[derive(Clone)]
pub struct CommandInvocation {
    /// Command text with the prefix stripped, e.g. `date_add bob tomorrow`
    pub command: String,
    pub args: Vec<String>,
    pub room: Room,
    pub event: RoomEvent,
    pub client: Arc<dyn Bot>,
}

impl CommandInvocation {
    pub fn new(command: impl Into<String>, room: Room, event: RoomEvent, client: Arc<dyn Bot>) -> Self {
        let command = command.into();
        let args = command
            .split_whitespace()
            .skip(1)
            .map(str::to_string)
            .collect();

        Self {
            command,
            args,
            room,
            event,
            client,
        }
    }

    /// First word of the command, lower-cased. Empty if there is none.
    pub fn word(&self) -> String {
        self.command
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_lowercase()
    }

    pub fn sender(&self) -> &str {
        &self.event.sender
    }

    pub fn room_id(&self) -> &str {
        &self.room.room_id
    }

    /// Reply in the originating room
    pub async fn reply(&self, text: &str) -> Result<String, crate::application::errors::BotError> {
        self.client.send_message(&self.room.room_id, text).await
    }

    /// Reply in the originating room as a notice
    pub async fn reply_notice(&self, text: &str) -> Result<String, crate::application::errors::BotError> {
        self.client.send_notice(&self.room.room_id, text).await
    }

    /// React to the triggering event
    pub async fn react(&self, key: &str) -> Result<String, crate::application::errors::BotError> {
        self.client.react(&self.room.room_id, &self.event.event_id, key).await
    }
}

impl fmt::Debug for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandInvocation")
            .field("command", &self.command)
            .field("args", &self.args)
            .field("room", &self.room.room_id)
            .field("sender", &self.event.sender)
            .finish()
    }
}
