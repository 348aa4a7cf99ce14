//! Plugin descriptor definitions

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

use super::data::PluginData;
use crate::application::errors::PluginError;
use crate::domain::entities::{CommandInvocation, RoomEvent};
use crate::domain::traits::Bot;

/// Result every plugin handler produces
pub type HandlerResult = Result<(), PluginError>;

/// Boxed handler future
pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// Command handler: receives the full invocation
pub type CommandHandler = Arc<dyn Fn(CommandInvocation) -> HandlerFuture + Send + Sync>;

/// Hook handler: receives (client, room id, event)
pub type HookHandler = Arc<dyn Fn(Arc<dyn Bot>, String, RoomEvent) -> HandlerFuture + Send + Sync>;

/// Timer handler: receives the client only
pub type TimerHandler = Arc<dyn Fn(Arc<dyn Bot>) -> HandlerFuture + Send + Sync>;

/// A text command declared by a plugin
#[derive(Clone)]
pub struct CommandSpec {
    /// Lower-cased command word
    pub word: String,
    pub help: String,
    /// Minimum room permission level, 0 = unrestricted
    pub power_level: i64,
    /// Rooms the command is valid in, `None` = all rooms
    pub room_ids: Option<Vec<String>>,
    /// Name of the declaring plugin, filled in by `Plugin::add_command_spec`
    pub plugin: String,
    pub handler: CommandHandler,
}

impl CommandSpec {
    pub fn new<F, Fut>(word: impl Into<String>, help: impl Into<String>, handler: F) -> Self
    where
        F: Fn(CommandInvocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            word: word.into().to_lowercase(),
            help: help.into(),
            power_level: 0,
            room_ids: None,
            plugin: String::new(),
            handler: Arc::new(move |invocation| handler(invocation).boxed()),
        }
    }

    pub fn with_power_level(mut self, level: i64) -> Self {
        self.power_level = level;
        self
    }

    pub fn in_rooms<I, S>(mut self, room_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.room_ids = Some(room_ids.into_iter().map(Into::into).collect());
        self
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("word", &self.word)
            .field("plugin", &self.plugin)
            .field("power_level", &self.power_level)
            .field("room_ids", &self.room_ids)
            .finish()
    }
}

/// An event hook declared by a plugin
#[derive(Clone)]
pub struct HookSpec {
    pub event_type: String,
    pub room_ids: Option<Vec<String>>,
    pub plugin: String,
    pub handler: HookHandler,
}

impl HookSpec {
    pub fn new<F, Fut>(event_type: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arc<dyn Bot>, String, RoomEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            event_type: event_type.into(),
            room_ids: None,
            plugin: String::new(),
            handler: Arc::new(move |client, room_id, event| handler(client, room_id, event).boxed()),
        }
    }

    pub fn in_rooms<I, S>(mut self, room_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.room_ids = Some(room_ids.into_iter().map(Into::into).collect());
        self
    }
}

impl fmt::Debug for HookSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSpec")
            .field("event_type", &self.event_type)
            .field("plugin", &self.plugin)
            .field("room_ids", &self.room_ids)
            .finish()
    }
}

/// A periodic handler declared by a plugin
#[derive(Clone)]
pub struct TimerSpec {
    pub name: String,
    pub plugin: String,
    pub handler: TimerHandler,
}

impl TimerSpec {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arc<dyn Bot>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            plugin: String::new(),
            handler: Arc::new(move |client| handler(client).boxed()),
        }
    }
}

impl fmt::Debug for TimerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerSpec")
            .field("name", &self.name)
            .field("plugin", &self.plugin)
            .finish()
    }
}

/// Everything a plugin declares at registration time.
///
/// Built once by the plugin author and handed to
/// [`PluginLoader::load`](super::manager::PluginLoader::load). Only
/// `plugin_data` is filled in afterwards, and the [`PluginData`] handle is
/// attached to the store, by the loader.
#[derive(Debug, Clone)]
pub struct Plugin {
    name: String,
    category: String,
    description: String,
    commands: Vec<CommandSpec>,
    hooks: Vec<HookSpec>,
    timers: Vec<TimerSpec>,
    plugin_data: Option<String>,
    data: PluginData,
}

impl Plugin {
    pub fn new(name: impl Into<String>, category: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            data: PluginData::new(&name),
            name,
            category: category.into(),
            description: description.into(),
            commands: Vec::new(),
            hooks: Vec::new(),
            timers: Vec::new(),
            plugin_data: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Register an unrestricted command
    pub fn add_command<F, Fut>(&mut self, word: &str, help: &str, handler: F) -> &mut Self
    where
        F: Fn(CommandInvocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.add_command_spec(CommandSpec::new(word, help, handler))
    }

    /// Register a command with a permission level or room restriction.
    ///
    /// A command word declared twice keeps the later declaration.
    pub fn add_command_spec(&mut self, mut spec: CommandSpec) -> &mut Self {
        spec.plugin = self.name.clone();
        match self.commands.iter_mut().find(|c| c.word == spec.word) {
            Some(existing) => *existing = spec,
            None => self.commands.push(spec),
        }
        self
    }

    pub fn add_hook<F, Fut>(&mut self, event_type: &str, handler: F) -> &mut Self
    where
        F: Fn(Arc<dyn Bot>, String, RoomEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.add_hook_spec(HookSpec::new(event_type, handler))
    }

    pub fn add_hook_spec(&mut self, mut spec: HookSpec) -> &mut Self {
        spec.plugin = self.name.clone();
        self.hooks.push(spec);
        self
    }

    pub fn add_timer<F, Fut>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(Arc<dyn Bot>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let mut spec = TimerSpec::new(name, handler);
        spec.plugin = self.name.clone();
        self.timers.push(spec);
        self
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn hooks(&self) -> &[HookSpec] {
        &self.hooks
    }

    pub fn timers(&self) -> &[TimerSpec] {
        &self.timers
    }

    /// Data blob read from storage when the plugin was loaded
    pub fn plugin_data(&self) -> Option<&str> {
        self.plugin_data.as_deref()
    }

    pub(crate) fn set_plugin_data(&mut self, data: Option<String>) {
        self.plugin_data = data;
    }

    /// Handle on this plugin's stored data, for handlers to capture
    pub fn data(&self) -> PluginData {
        self.data.clone()
    }
}

/// Tunables of the dispatch engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DispatchConfig {
    /// Minimum seconds between two timer sweeps
    pub timer_interval_secs: u64,
    /// Fuzzy matches must score strictly above this (0-100)
    pub fuzzy_threshold: u8,
}

impl DispatchConfig {
    pub fn timer_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timer_interval_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timer_interval_secs: super::manager::DEFAULT_TIMER_INTERVAL_SECS,
            fuzzy_threshold: super::resolver::DEFAULT_FUZZY_THRESHOLD,
        }
    }
}
