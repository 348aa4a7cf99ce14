use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - handle on the chat protocol client.
///
/// The dispatch core passes it through to handlers untouched.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a text message to a room, returning the new event id
    async fn send_message(&self, room_id: &str, text: &str) -> Result<String, BotError>;

    /// Send a notice (a message other bots should not react to)
    async fn send_notice(&self, room_id: &str, text: &str) -> Result<String, BotError>;

    /// React to an event with an annotation key, usually an emoji
    async fn react(&self, room_id: &str, event_id: &str, key: &str) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub user_id: String,
    pub name: String,
}
