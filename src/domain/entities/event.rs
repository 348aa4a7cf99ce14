/// Event type of plain room messages
pub const MESSAGE_EVENT: &str = "m.room.message";

/// A room event delivered by the protocol client
#[derive(Debug, Clone)]
pub struct RoomEvent {
    pub event_id: String,
    pub event_type: String,
    pub sender: String,
    pub body: Option<String>,
    /// HTML body, where mentions of users are links
    pub formatted_body: Option<String>,
}

impl RoomEvent {
    pub fn new(event_type: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            event_id: format!("${}", uuid::Uuid::new_v4()),
            event_type: event_type.into(),
            sender: sender.into(),
            body: None,
            formatted_body: None,
        }
    }

    /// A plain text message event
    pub fn message(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(MESSAGE_EVENT, sender).with_body(body)
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_formatted_body(mut self, formatted: impl Into<String>) -> Self {
        self.formatted_body = Some(formatted.into());
        self
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = event_id.into();
        self
    }

    pub fn is_message(&self) -> bool {
        self.event_type == MESSAGE_EVENT
    }
}
