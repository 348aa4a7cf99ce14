//! Message dispatcher - Routes room events into the plugin loader

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::parser::MessageParser;
use crate::application::services::CommandService;
use crate::domain::entities::{Room, RoomEvent};
use crate::domain::traits::Bot;
use crate::plugins::{CommandOutcome, SharedPluginLoader};

const FORBIDDEN_NOTICE: &str = "You do not have the required power level for this command";

/// Entry point of the bot runtime for every event it receives
pub struct MessageDispatcher {
    parser: MessageParser,
    help: CommandService,
    loader: SharedPluginLoader,
    notify_forbidden: bool,
    last_timer_run: Mutex<Option<DateTime<Utc>>>,
}

impl MessageDispatcher {
    pub fn new(prefix: impl Into<String>, loader: SharedPluginLoader) -> Self {
        let prefix = prefix.into();
        Self {
            parser: MessageParser::new(prefix.clone()),
            help: CommandService::new(prefix),
            loader,
            notify_forbidden: true,
            last_timer_run: Mutex::new(None),
        }
    }

    /// Whether to answer `Forbidden` outcomes with a notice
    pub fn with_forbidden_notice(mut self, enabled: bool) -> Self {
        self.notify_forbidden = enabled;
        self
    }

    /// Handle one room event: run its hooks, then the command it carries.
    ///
    /// Returns the command outcome if the event was a command. Events sent
    /// by the bot itself are ignored.
    pub async fn handle_event(&self, client: Arc<dyn Bot>, room: &Room, event: RoomEvent) -> Option<CommandOutcome> {
        if event.sender == client.bot_info().user_id {
            return None;
        }

        self.loader.run_hooks(client.clone(), &event.event_type, room, &event).await;

        let invocation = self.parser.parse(room, &event, client.clone())?;

        let word = invocation.word();
        if word == "help" && self.loader.commands().get("help").is_none() {
            let text = self.help.get_help(&self.loader, invocation.args.first().map(String::as_str));
            if let Err(e) = client.send_notice(&room.room_id, &text).await {
                tracing::warn!("Failed to send help to {}: {}", room.room_id, e);
            }
            return Some(CommandOutcome::Executed);
        }

        let outcome = self.loader.run_command(invocation).await;
        if outcome == CommandOutcome::Forbidden && self.notify_forbidden {
            if let Err(e) = client.send_notice(&room.room_id, FORBIDDEN_NOTICE).await {
                tracing::warn!("Failed to send notice to {}: {}", room.room_id, e);
            }
        }
        Some(outcome)
    }

    /// Give timers a chance to run; cheap when the interval has not passed
    pub async fn tick(&self, client: Arc<dyn Bot>) {
        let mut last_run = self.last_timer_run.lock().await;
        *last_run = self.loader.run_timers(client, *last_run).await;
    }

    /// When timers last ran
    pub async fn last_timer_run(&self) -> Option<DateTime<Utc>> {
        *self.last_timer_run.lock().await
    }
}
