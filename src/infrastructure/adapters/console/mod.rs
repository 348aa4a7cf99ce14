//! Console adapter for development/testing

use async_trait::async_trait;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Console bot adapter for local development.
///
/// Serves a single room; sending anywhere else is an error.
pub struct ConsoleAdapter {
    info: BotInfo,
    room_id: String,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                user_id: "@roombot:localhost".to_string(),
                name: "roombot".to_string(),
            },
            room_id: "!console:localhost".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.info.name = name.into();
        self
    }

    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = room_id.into();
        self
    }

    fn check_room(&self, room_id: &str) -> Result<(), BotError> {
        if room_id != self.room_id {
            return Err(BotError::UnknownRoom(room_id.to_string()));
        }
        Ok(())
    }

    fn next_event_id() -> String {
        format!("${}", uuid::Uuid::new_v4())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn send_message(&self, room_id: &str, text: &str) -> Result<String, BotError> {
        self.check_room(room_id)?;
        println!("[{}] {}", room_id, text);
        Ok(Self::next_event_id())
    }

    async fn send_notice(&self, room_id: &str, text: &str) -> Result<String, BotError> {
        self.check_room(room_id)?;
        println!("[{}] (notice) {}", room_id, text);
        Ok(Self::next_event_id())
    }

    async fn react(&self, room_id: &str, event_id: &str, key: &str) -> Result<String, BotError> {
        self.check_room(room_id)?;
        println!("[{}] reacted {} to {}", room_id, key, event_id);
        Ok(Self::next_event_id())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_serves_its_room() {
        let adapter = ConsoleAdapter::new().with_room("!here:localhost");

        assert!(adapter.send_message("!here:localhost", "hi").await.is_ok());
        let err = adapter.send_notice("!elsewhere:localhost", "hi").await.unwrap_err();
        assert!(matches!(err, BotError::UnknownRoom(room) if room == "!elsewhere:localhost"));
    }
}
