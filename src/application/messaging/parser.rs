//! Message parser - Turns message events into command invocations

use std::sync::Arc;

use crate::domain::entities::{CommandInvocation, Room, RoomEvent};
use crate::domain::traits::Bot;

/// Recognises commands in message bodies
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Command text of a body, with the prefix stripped.
    ///
    /// `None` for plain messages and for a bare prefix.
    pub fn command_text<'a>(&self, body: &'a str) -> Option<&'a str> {
        let text = body.trim_start().strip_prefix(self.command_prefix.as_str())?.trim();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Build an invocation if `event` is a message carrying a command
    pub fn parse(&self, room: &Room, event: &RoomEvent, client: Arc<dyn Bot>) -> Option<CommandInvocation> {
        if !event.is_message() {
            return None;
        }
        let text = self.command_text(event.body.as_deref()?)?;
        Some(CommandInvocation::new(text, room.clone(), event.clone(), client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::console::ConsoleAdapter;

    fn client() -> Arc<dyn Bot> {
        Arc::new(ConsoleAdapter::new())
    }

    #[test]
    fn test_command_text() {
        let parser = MessageParser::new("!");
        assert_eq!(parser.command_text("!ping"), Some("ping"));
        assert_eq!(parser.command_text("  !date_add bob  tomorrow "), Some("date_add bob  tomorrow"));
        assert_eq!(parser.command_text("!"), None);
        assert_eq!(parser.command_text("hello"), None);
    }

    #[test]
    fn test_parse_builds_invocation() {
        let parser = MessageParser::new("!");
        let room = Room::new("!abc");
        let event = RoomEvent::message("@bob:host", "!Echo hello   world");

        let invocation = parser.parse(&room, &event, client()).unwrap();
        assert_eq!(invocation.command, "Echo hello   world");
        assert_eq!(invocation.word(), "echo");
        assert_eq!(invocation.args, vec!["hello", "world"]);
        assert_eq!(invocation.room_id(), "!abc");
        assert_eq!(invocation.sender(), "@bob:host");
    }

    #[test]
    fn test_parse_ignores_non_messages() {
        let parser = MessageParser::new("!");
        let event = RoomEvent::new("m.reaction", "@bob:host").with_body("!ping");

        assert!(parser.parse(&Room::new("!abc"), &event, client()).is_none());
    }
}
